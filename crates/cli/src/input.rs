//! JSON shape of a voucher draft as exported by the entry form.
//!
//! Amount fields arrive as numbers, numeric strings, empty strings or null
//! depending on which form produced them; all are coerced the same way.

use std::io::Read;

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use estatebooks_accounting::{Line, VoucherType, coerce_amount};
use estatebooks_core::{AccountId, DomainResult};

#[derive(Debug, Clone, Deserialize)]
pub struct DraftInput {
    /// Name (`bank_payment`) or short code (`BPV`).
    pub voucher_type: String,
    #[serde(default, alias = "account_id", alias = "accountId")]
    pub primary_account: String,
    #[serde(default)]
    pub lines: Vec<LineInput>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LineInput {
    #[serde(default, alias = "accountId")]
    pub account_id: String,
    #[serde(default)]
    pub debit: Value,
    #[serde(default)]
    pub credit: Value,
    #[serde(default)]
    pub description: String,
}

impl DraftInput {
    pub fn from_reader(reader: impl Read) -> Result<Self, serde_json::Error> {
        serde_json::from_reader(reader)
    }

    /// Resolve into balancer inputs.
    pub fn resolve(self) -> DomainResult<(VoucherType, AccountId, Vec<Line>)> {
        let voucher_type: VoucherType = self.voucher_type.parse()?;
        let lines = self.lines.into_iter().map(LineInput::into_line).collect();
        Ok((voucher_type, AccountId::new(self.primary_account), lines))
    }
}

impl LineInput {
    /// Apply the fields in entry order: debit, then credit.
    pub fn into_line(self) -> Line {
        let mut line = Line::blank();
        line.set_account(self.account_id);
        line.set_description(self.description);
        line.set_debit(coerce_value(&self.debit));
        line.set_credit(coerce_value(&self.credit));
        line
    }
}

/// `Number(x) || 0` for JSON values.
fn coerce_value(value: &Value) -> Decimal {
    match value {
        Value::Number(n) => coerce_amount(&n.to_string()),
        Value::String(s) => coerce_amount(s),
        _ => Decimal::ZERO,
    }
}
