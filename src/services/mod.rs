pub mod statement_service;
pub mod transaction_service;
pub mod transfer_service;
pub mod validation_service;
