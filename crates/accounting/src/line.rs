use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use estatebooks_core::AccountId;

use crate::amount::{coerce_amount, non_negative};
use crate::voucher_type::Side;

/// A single user-entered voucher line.
///
/// At most one of `debit`/`credit` is non-zero. The fields are private so
/// every mutation goes through the setters, which zero the other side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Line {
    account_id: AccountId,
    debit: Decimal,
    credit: Decimal,
    description: String,
}

impl Line {
    /// A blank line (no account, no amounts) as the form shows it.
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn debit(account_id: impl Into<AccountId>, amount: Decimal) -> Self {
        let mut line = Self::blank();
        line.set_account(account_id);
        line.set_debit(amount);
        line
    }

    pub fn credit(account_id: impl Into<AccountId>, amount: Decimal) -> Self {
        let mut line = Self::blank();
        line.set_account(account_id);
        line.set_credit(amount);
        line
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn account_id(&self) -> &AccountId {
        &self.account_id
    }

    pub fn debit_amount(&self) -> Decimal {
        self.debit
    }

    pub fn credit_amount(&self) -> Decimal {
        self.credit
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_account(&mut self, account_id: impl Into<AccountId>) {
        self.account_id = account_id.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Set the debit amount; a positive debit clears the credit.
    pub fn set_debit(&mut self, amount: Decimal) {
        self.debit = non_negative(amount);
        if self.debit > Decimal::ZERO {
            self.credit = Decimal::ZERO;
        }
    }

    /// Set the credit amount; a positive credit clears the debit.
    pub fn set_credit(&mut self, amount: Decimal) {
        self.credit = non_negative(amount);
        if self.credit > Decimal::ZERO {
            self.debit = Decimal::ZERO;
        }
    }

    /// Set the debit from raw field text (coerced, see [`coerce_amount`]).
    pub fn set_debit_input(&mut self, input: &str) {
        self.set_debit(coerce_amount(input));
    }

    /// Set the credit from raw field text.
    pub fn set_credit_input(&mut self, input: &str) {
        self.set_credit(coerce_amount(input));
    }

    /// The populated side and its amount, if any.
    pub fn entry(&self) -> Option<(Side, Decimal)> {
        if self.debit > Decimal::ZERO {
            Some((Side::Debit, self.debit))
        } else if self.credit > Decimal::ZERO {
            Some((Side::Credit, self.credit))
        } else {
            None
        }
    }

    pub fn has_amount(&self) -> bool {
        self.entry().is_some()
    }
}

/// Wire shape of a line. Funnels deserialized data through the setters so a
/// payload carrying both sides cannot bypass single-sidedness.
#[derive(Deserialize)]
struct RawLine {
    #[serde(default)]
    account_id: AccountId,
    #[serde(default)]
    debit: Decimal,
    #[serde(default)]
    credit: Decimal,
    #[serde(default)]
    description: String,
}

impl<'de> Deserialize<'de> for Line {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawLine::deserialize(deserializer)?;
        let mut line = Line::blank();
        line.set_account(raw.account_id);
        line.set_description(raw.description);
        // Debit first: when both arrive populated the credit wins, matching
        // "last edited field wins" in the entry form.
        line.set_debit(raw.debit);
        line.set_credit(raw.credit);
        Ok(line)
    }
}
