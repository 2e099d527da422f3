// Card entity - expiry-based validity plus the debit variant.
//
// A debit card is tied to exactly one account and carries a daily spending
// limit. The limit is only decremented by successful payments; there is no
// calendar-driven daily reset, only an explicit re-set of the limit.

use chrono::NaiveDate;
use tracing::warn;

use crate::error::{BankError, Result};
use crate::money::{self, is_valid_amount, MonthStamp};

// ============================================================================
// CARD KIND
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum CardKind {
    Debit {
        /// Number of the account this card spends from (foreign key).
        linked_account: String,

        /// Remaining daily spending limit.
        daily_limit: f64,
    },
}

impl CardKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardKind::Debit { .. } => "Debit",
        }
    }
}

// ============================================================================
// CARD
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub number: String,

    /// Expiry month, stored `MMYY`.
    pub expiry: String,

    pub cvc: String,

    /// Exactly 4 digits.
    pub pin: String,

    pub kind: CardKind,
}

impl Card {
    /// Build a debit card from boundary input. The expiry accepts either
    /// `MMYY` or `MM/YYYY` and is stored normalized; the PIN and limit are
    /// validated up front.
    pub fn new_debit(
        number: String,
        expiry: &str,
        cvc: String,
        pin: String,
        linked_account: String,
        daily_limit: f64,
    ) -> Result<Card> {
        let expiry = MonthStamp::normalize(expiry)?.encode();
        validate_pin(&pin)?;
        if daily_limit < 0.0 {
            return Err(BankError::BadLimit);
        }
        Ok(Card {
            number,
            expiry,
            cvc,
            pin,
            kind: CardKind::Debit {
                linked_account,
                daily_limit,
            },
        })
    }

    /// Number of the linked account.
    pub fn linked_account(&self) -> &str {
        match &self.kind {
            CardKind::Debit { linked_account, .. } => linked_account,
        }
    }

    /// Remaining daily spending limit.
    pub fn daily_limit(&self) -> f64 {
        match &self.kind {
            CardKind::Debit { daily_limit, .. } => *daily_limit,
        }
    }

    /// True iff the expiry month is the month of `today` or later. A
    /// malformed stored expiry makes the card invalid.
    pub fn is_valid_at(&self, today: NaiveDate) -> bool {
        match MonthStamp::parse(&self.expiry) {
            Some(stamp) => stamp.is_current_or_future_at(today),
            None => false,
        }
    }

    /// [`Card::is_valid_at`] against the current local date.
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(money::today())
    }

    /// Spend against the daily limit. Rejects non-positive amounts, expired
    /// cards, and amounts exceeding the remaining limit; the limit is never
    /// clamped.
    pub fn pay_at(&mut self, amount: f64, today: NaiveDate) -> bool {
        if !is_valid_amount(amount) {
            warn!(card = %self.number, amount, "payment rejected: amount must be positive");
            return false;
        }
        if !self.is_valid_at(today) {
            warn!(card = %self.number, expiry = %self.expiry, "payment rejected: card expired");
            return false;
        }
        let CardKind::Debit { daily_limit, .. } = &mut self.kind;
        if amount > *daily_limit {
            warn!(
                card = %self.number,
                amount,
                remaining = *daily_limit,
                "payment rejected: daily limit exceeded"
            );
            return false;
        }
        *daily_limit -= amount;
        true
    }

    /// [`Card::pay_at`] against the current local date.
    pub fn pay(&mut self, amount: f64) -> bool {
        self.pay_at(amount, money::today())
    }

    /// Replace the remaining daily limit. Negative limits are a validation
    /// error.
    pub fn set_daily_limit(&mut self, limit: f64) -> Result<()> {
        if limit < 0.0 {
            return Err(BankError::BadLimit);
        }
        let CardKind::Debit { daily_limit, .. } = &mut self.kind;
        *daily_limit = limit;
        Ok(())
    }

    pub fn set_pin(&mut self, pin: String) -> Result<()> {
        validate_pin(&pin)?;
        self.pin = pin;
        Ok(())
    }
}

/// A PIN is exactly 4 ASCII digits.
pub fn validate_pin(pin: &str) -> Result<()> {
    if pin.len() == 4 && pin.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(BankError::BadPin)
    }
}
