// Retail-banking domain core: customers, accounts, cards, term deposits
// and transfers, persisted across runs as five flat JSON collections with
// post-load relinking of the ownership graph.

pub mod bank;
pub mod entities;
pub mod error;
pub mod money;
pub mod store;

// Re-export commonly used types
pub use bank::Bank;
pub use entities::{
    Account, AccountKind, Card, CardKind, Customer, SavingsTerms, TermDeposit, TransactionEntry,
    TransactionKind,
};
pub use error::{BankError, Result};
pub use money::{is_valid_amount, MonthStamp};
pub use store::JsonStore;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
