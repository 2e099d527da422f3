// Term deposit - a fixed-parameter value object tied to one account.

use chrono::NaiveDate;

use crate::error::{BankError, Result};
use crate::money::{self, MonthStamp};

#[derive(Debug, Clone, PartialEq)]
pub struct TermDeposit {
    /// In-memory identity, regenerated on every load. The wire format has
    /// no natural key for deposits.
    pub id: String,

    /// Principal moved out of the account.
    pub amount: f64,

    /// Annual interest rate in percent.
    pub interest_rate: f64,

    /// Maturity month, stored `MMYY`.
    pub maturity: String,

    /// Number of the funding account (foreign key).
    pub linked_account: String,
}

impl TermDeposit {
    /// Build a deposit from boundary input. The maturity accepts either
    /// `MMYY` or `MM/YYYY`; the principal must not be negative.
    pub fn new(
        amount: f64,
        interest_rate: f64,
        maturity: &str,
        linked_account: String,
    ) -> Result<TermDeposit> {
        if amount < 0.0 {
            return Err(BankError::BadAmount);
        }
        Ok(TermDeposit {
            id: uuid::Uuid::new_v4().to_string(),
            amount,
            interest_rate,
            maturity: MonthStamp::normalize(maturity)?.encode(),
            linked_account,
        })
    }

    /// True iff the maturity month has passed. A malformed stored maturity
    /// counts as not due.
    pub fn is_mature_at(&self, today: NaiveDate) -> bool {
        match MonthStamp::parse(&self.maturity) {
            Some(stamp) => stamp.is_before(today),
            None => false,
        }
    }

    /// [`TermDeposit::is_mature_at`] against the current local date.
    pub fn is_mature(&self) -> bool {
        self.is_mature_at(money::today())
    }
}
