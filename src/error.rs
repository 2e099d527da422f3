// Single error type for the library surface.
//
// Validation errors and business-rule rejections are separate variant
// groups: the boundary layer retries validation errors, while business
// rejections are final for the attempted operation.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BankError {
    // ========================================================================
    // VALIDATION ERRORS (bad input shape, caller should re-prompt)
    // ========================================================================
    #[error("invalid date format: {0:?} (expected MMYY or MM/YYYY)")]
    BadDateFormat(String),

    #[error("PIN must be exactly 4 digits")]
    BadPin,

    #[error("amount must be greater than zero")]
    BadAmount,

    #[error("limit must not be negative")]
    BadLimit,

    // ========================================================================
    // BUSINESS-RULE REJECTIONS (well-formed input, operation not applicable)
    // ========================================================================
    #[error("login already taken: {0}")]
    LoginTaken(String),

    #[error("national ID already registered: {0}")]
    NationalIdTaken(String),

    #[error("no customer is logged in")]
    NoSession,

    #[error("customer has no accounts")]
    NoAccounts,

    #[error("no such account: {0}")]
    NoSuchAccount(String),

    #[error("account number already in use: {0}")]
    AccountNumberTaken(String),

    #[error("card is expired")]
    CardExpired,

    #[error("daily card limit exceeded")]
    DailyLimitExceeded,

    #[error("no such card: {0}")]
    NoSuchCard(String),

    #[error("insufficient funds")]
    InsufficientFunds,

    #[error("monthly withdrawal limit reached")]
    WithdrawalCapReached,

    #[error("account is not a savings account")]
    NotSavings,

    // ========================================================================
    // PERSISTENCE ERRORS
    // ========================================================================
    #[error("record decode error: {0}")]
    Decode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BankError>;
