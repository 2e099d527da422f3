// Domain entities. Cross-entity ownership is expressed through opaque
// string IDs resolved against the global collections, never through
// references between entities.

pub mod account;
pub mod card;
pub mod customer;
pub mod deposit;
pub mod transaction;

pub use account::{Account, AccountKind, SavingsTerms};
pub use card::{validate_pin, Card, CardKind};
pub use customer::Customer;
pub use deposit::TermDeposit;
pub use transaction::{TransactionEntry, TransactionKind};
