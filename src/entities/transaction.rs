// Transaction log entry. Immutable once appended.

use chrono::Local;

// ============================================================================
// TRANSACTION KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    Transfer,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "deposit",
            TransactionKind::Withdrawal => "withdrawal",
            TransactionKind::Transfer => "transfer",
        }
    }

    pub fn parse(value: &str) -> Option<TransactionKind> {
        match value {
            "deposit" => Some(TransactionKind::Deposit),
            "withdrawal" => Some(TransactionKind::Withdrawal),
            "transfer" => Some(TransactionKind::Transfer),
            _ => None,
        }
    }
}

// ============================================================================
// TRANSACTION ENTRY
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct TransactionEntry {
    pub amount: f64,
    pub kind: TransactionKind,

    /// Local time, `YYYY-MM-DD HH:MM:SS`.
    pub timestamp: String,

    /// Source account number; empty unless kind is Transfer.
    pub sender: String,

    /// Destination account number; empty unless kind is Transfer. Not
    /// required to name an existing account.
    pub receiver: String,
}

impl TransactionEntry {
    fn now_timestamp() -> String {
        Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
    }

    pub fn deposit(amount: f64) -> TransactionEntry {
        TransactionEntry {
            amount,
            kind: TransactionKind::Deposit,
            timestamp: Self::now_timestamp(),
            sender: String::new(),
            receiver: String::new(),
        }
    }

    pub fn withdrawal(amount: f64) -> TransactionEntry {
        TransactionEntry {
            amount,
            kind: TransactionKind::Withdrawal,
            timestamp: Self::now_timestamp(),
            sender: String::new(),
            receiver: String::new(),
        }
    }

    pub fn transfer(amount: f64, sender: String, receiver: String) -> TransactionEntry {
        TransactionEntry {
            amount,
            kind: TransactionKind::Transfer,
            timestamp: Self::now_timestamp(),
            sender,
            receiver,
        }
    }
}
