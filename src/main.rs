use std::io::Write;
use std::path::Path;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use mybank_client::api::ledger::{LedgerApi, LedgerClient};
use mybank_client::client::BankClient;
use mybank_client::models::{DashboardView, TransferDraft};
use mybank_client::services::transfer_service::{
    SubmitOutcome, TransferError, TransferPipeline,
};

type InputLines = Lines<BufReader<Stdin>>;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("mybank_client=info".parse().unwrap()),
        )
        .with_target(false)
        .init();

    let base_url =
        std::env::var("BANK_API_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());
    let submit_timeout = std::env::var("BANK_SUBMIT_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(Duration::from_secs(30));

    info!("Starting MyBank client against {}", base_url);

    let ledger = LedgerClient::with_base_url(base_url);
    let mut client = BankClient::with_pipeline(
        ledger,
        TransferPipeline::with_submit_timeout(submit_timeout),
    );

    println!("Welcome to MyBank. Type `help` for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        let _ = std::io::stdout().flush();

        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!("Failed to read input: {}", e);
                break;
            }
        };

        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("help") => print_help(),
            Some("login") => run_login(&mut client, &mut lines).await,
            Some("dashboard") => run_dashboard(&mut client).await,
            Some("transfer") => run_transfer(&mut client, &mut lines).await,
            Some("cancel") => {
                client.cancel_transfer_draft();
                println!("Transfer draft discarded.");
            }
            Some("statement") => run_statement(&client, &mut lines).await,
            Some("logout") => {
                client.logout();
                println!("Logged out.");
            }
            Some("quit") | Some("exit") => break,
            Some(other) => println!("Unknown command `{}`. Type `help` for commands.", other),
            None => {}
        }
    }

    println!("Goodbye.");
}

fn print_help() {
    println!("Commands:");
    println!("  login       authenticate against the ledger service");
    println!("  dashboard   show balance and transaction history");
    println!("  transfer    start (or resume) a money transfer");
    println!("  cancel      discard the open transfer draft");
    println!("  statement   download a monthly statement as CSV");
    println!("  logout      end the session");
    println!("  quit        exit");
}

async fn prompt(lines: &mut InputLines, label: &str) -> Option<String> {
    print!("{}: ", label);
    let _ = std::io::stdout().flush();
    match lines.next_line().await {
        Ok(Some(line)) => Some(line.trim().to_string()),
        _ => None,
    }
}

fn render_dashboard(view: &DashboardView) {
    println!();
    println!("Balance: ${:.2}", view.balance);
    println!("Transaction history:");
    println!("  {:<12} {:>12}  {:<3} {}", "Date", "Amount", "", "Description");
    for row in &view.rows {
        println!(
            "  {:<12} {:>12}  {:<3} {}",
            row.display_date, row.signed_amount_text, row.status_glyph, row.description
        );
    }
    println!();
}

async fn run_login<L: LedgerApi>(client: &mut BankClient<L>, lines: &mut InputLines) {
    let Some(user_id) = prompt(lines, "User ID").await else { return };
    let Some(email) = prompt(lines, "Email").await else { return };
    let Some(password) = prompt(lines, "Password").await else { return };

    match client.login(&user_id, &email, &password).await {
        Ok(view) => {
            let name = client
                .session()
                .identity()
                .map(|i| i.name.clone())
                .unwrap_or_default();
            println!("Welcome, {}!", name);
            render_dashboard(&view);
        }
        Err(e) => println!("❌ Login failed: {}", e),
    }
}

async fn run_dashboard<L: LedgerApi>(client: &mut BankClient<L>) {
    match client.refresh_dashboard().await {
        Ok(view) => render_dashboard(&view),
        Err(e) => println!("❌ {}", e),
    }
}

async fn run_transfer<L: LedgerApi>(client: &mut BankClient<L>, lines: &mut InputLines) {
    match client.open_transfer_form() {
        Ok(()) => {}
        // a preserved draft from a decline or failure is resumed, not lost
        Err(TransferError::FormAlreadyOpen) => println!("Resuming the open transfer draft."),
        Err(e) => {
            println!("❌ {}", e);
            return;
        }
    }

    let Some(receiver_name) = prompt(lines, "Receiver name").await else { return };
    let Some(receiver_id) = prompt(lines, "Receiver ID").await else { return };
    let Some(receiver_email) = prompt(lines, "Receiver email").await else { return };
    let Some(receiver_account) = prompt(lines, "Receiver account number").await else { return };
    let Some(amount) = prompt(lines, "Amount").await else { return };
    let Some(checked) = prompt(lines, "I have checked these details (yes/no)").await else {
        return;
    };

    let fields = TransferDraft {
        receiver_name,
        receiver_id,
        receiver_email,
        receiver_account,
        amount,
        confirmed: checked.eq_ignore_ascii_case("yes") || checked.eq_ignore_ascii_case("y"),
    };

    let outcome = match client.submit_transfer_draft(fields) {
        Ok(outcome) => outcome,
        Err(e) => {
            println!("❌ {}", e);
            return;
        }
    };

    let confirmation = match outcome {
        SubmitOutcome::Rejected(errors) => {
            println!("❌ The draft has problems:");
            for error in errors {
                println!("   {}: {}", error.field, error.reason);
            }
            println!("Run `transfer` to correct it, or `cancel` to discard.");
            return;
        }
        SubmitOutcome::NeedsConfirmation(prompt) => prompt,
    };

    let answer = prompt(
        lines,
        &format!(
            "Send ${:.2} to {}? (yes/no)",
            confirmation.amount, confirmation.receiver_name
        ),
    )
    .await;

    let approved = matches!(answer.as_deref(), Some("yes") | Some("y"));
    if !approved {
        if let Err(e) = client.decline_transfer_draft() {
            println!("❌ {}", e);
            return;
        }
        println!("Transfer canceled. The draft is preserved; run `transfer` to resume.");
        return;
    }

    match client.confirm_transfer_draft().await {
        Ok(receipt) => {
            println!("✅ Transfer complete. New balance: ${:.2}", receipt.new_balance);
            render_dashboard(&receipt.dashboard);
        }
        Err(e) => {
            println!("❌ Transfer failed: {}", e);
            println!("The draft is preserved; run `transfer` to retry or `cancel` to discard.");
        }
    }
}

async fn run_statement<L: LedgerApi>(client: &BankClient<L>, lines: &mut InputLines) {
    let Some(month) = prompt(lines, "Month (1-12)").await else { return };
    let Some(year) = prompt(lines, "Year").await else { return };

    let (Ok(month), Ok(year)) = (month.parse::<u32>(), year.parse::<i32>()) else {
        println!("❌ Month and year must be numbers.");
        return;
    };

    match client.download_statement(month, year, Path::new(".")).await {
        Ok(path) => println!("✅ Statement saved to {}", path.display()),
        Err(e) => println!("❌ {}", e),
    }
}
