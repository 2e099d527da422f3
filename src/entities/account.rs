// Account entity - base balance operations plus the savings variant.
//
// The savings variant layers two rules on top of the base account: a
// monthly withdrawal cap enforced before the balance is touched, and
// month-granular interest capitalization that is idempotent within the
// stored month.

use chrono::NaiveDate;
use tracing::warn;

use crate::money::{self, is_valid_amount, MonthStamp};

// ============================================================================
// ACCOUNT KIND
// ============================================================================

/// Parameters specific to a savings account.
#[derive(Debug, Clone, PartialEq)]
pub struct SavingsTerms {
    /// Annual interest rate in percent.
    pub interest_rate: f64,

    /// Month of the last capitalization, stored `MMYY`.
    pub last_capitalized: String,

    /// Maximum number of withdrawals per month.
    pub monthly_withdrawal_cap: u32,

    /// Withdrawals performed since the last explicit reset. Session state,
    /// never persisted.
    pub withdrawals_used: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AccountKind {
    Standard,
    Savings(SavingsTerms),
}

impl AccountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Standard => "Standard",
            AccountKind::Savings(_) => "Savings",
        }
    }
}

// ============================================================================
// ACCOUNT
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// Account number, the primary key across all collections.
    pub number: String,

    /// Current balance. Never negative.
    pub balance: f64,

    /// National ID of the owning customer (foreign key).
    pub owner_id: String,

    pub kind: AccountKind,
}

impl Account {
    pub fn new_standard(number: String, owner_id: String, balance: f64) -> Account {
        Account {
            number,
            balance: balance.max(0.0),
            owner_id,
            kind: AccountKind::Standard,
        }
    }

    pub fn new_savings(
        number: String,
        owner_id: String,
        balance: f64,
        interest_rate: f64,
        monthly_withdrawal_cap: u32,
        today: NaiveDate,
    ) -> Account {
        Account {
            number,
            balance: balance.max(0.0),
            owner_id,
            kind: AccountKind::Savings(SavingsTerms {
                interest_rate: interest_rate.max(0.0),
                last_capitalized: MonthStamp::of(today).encode(),
                monthly_withdrawal_cap,
                withdrawals_used: 0,
            }),
        }
    }

    pub fn is_savings(&self) -> bool {
        matches!(self.kind, AccountKind::Savings(_))
    }

    /// Add funds. Rejects non-positive amounts.
    pub fn deposit(&mut self, amount: f64) -> bool {
        if !is_valid_amount(amount) {
            warn!(account = %self.number, amount, "deposit rejected: amount must be positive");
            return false;
        }
        self.balance += amount;
        true
    }

    /// Remove funds. Rejects non-positive amounts and overdrawing; on a
    /// savings account also rejects once the monthly cap is used up. The
    /// usage counter moves only on a successful withdrawal.
    pub fn withdraw(&mut self, amount: f64) -> bool {
        if self.cap_reached() {
            warn!(account = %self.number, "withdrawal rejected: monthly limit reached");
            return false;
        }
        if !is_valid_amount(amount) {
            warn!(account = %self.number, amount, "withdrawal rejected: amount must be positive");
            return false;
        }
        if amount > self.balance {
            warn!(
                account = %self.number,
                amount,
                balance = self.balance,
                "withdrawal rejected: insufficient funds"
            );
            return false;
        }
        self.balance -= amount;
        if let AccountKind::Savings(terms) = &mut self.kind {
            terms.withdrawals_used += 1;
        }
        true
    }

    /// Overwrite the balance. Negative values are logged and ignored.
    pub fn set_balance(&mut self, balance: f64) -> bool {
        if balance < 0.0 {
            warn!(account = %self.number, balance, "set_balance rejected: negative value");
            return false;
        }
        self.balance = balance;
        true
    }

    /// True iff this is a savings account whose monthly withdrawals are
    /// used up.
    pub fn cap_reached(&self) -> bool {
        match &self.kind {
            AccountKind::Savings(terms) => terms.withdrawals_used >= terms.monthly_withdrawal_cap,
            AccountKind::Standard => false,
        }
    }

    /// Withdrawals still available this month. Always ≥ 0.
    pub fn withdrawals_left(&self) -> u32 {
        match &self.kind {
            AccountKind::Savings(terms) => {
                terms.monthly_withdrawal_cap.saturating_sub(terms.withdrawals_used)
            }
            AccountKind::Standard => u32::MAX,
        }
    }

    /// Explicitly reset the monthly withdrawal counter. There is no
    /// calendar-driven reset.
    pub fn reset_withdrawals(&mut self) {
        if let AccountKind::Savings(terms) = &mut self.kind {
            terms.withdrawals_used = 0;
        }
    }

    /// Capitalize one month of interest if the stored stamp is strictly
    /// before the month of `today`. Returns the interest added, or 0.0 when
    /// not yet due, not a savings account, or the stored stamp is
    /// malformed.
    pub fn capitalize_at(&mut self, today: NaiveDate) -> f64 {
        let balance = self.balance;
        let number = self.number.clone();
        let terms = match &mut self.kind {
            AccountKind::Savings(terms) => terms,
            AccountKind::Standard => return 0.0,
        };
        let stamp = match MonthStamp::parse(&terms.last_capitalized) {
            Some(stamp) => stamp,
            None => {
                warn!(
                    account = %number,
                    stamp = %terms.last_capitalized,
                    "capitalization skipped: malformed stamp"
                );
                return 0.0;
            }
        };
        if !stamp.is_before(today) {
            return 0.0;
        }
        let interest = balance * terms.interest_rate / 100.0 / 12.0;
        terms.last_capitalized = MonthStamp::of(today).encode();
        self.balance += interest;
        interest
    }

    /// [`Account::capitalize_at`] against the current local date.
    pub fn capitalize(&mut self) -> f64 {
        self.capitalize_at(money::today())
    }
}
