use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use estatebooks_core::AccountId;

use crate::balancer::Totals;
use crate::line::Line;
use crate::voucher_type::Side;

/// Fully resolved ledger line sent for posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingLine {
    pub account_id: AccountId,
    pub side: Side,
    /// Always positive.
    pub amount: Decimal,
    pub description: String,
    /// True for the derived bank/cash counter-line.
    pub system: bool,
}

impl PostingLine {
    /// Same line on the opposite side (used for reversals).
    pub fn reversed(&self) -> Self {
        Self {
            side: self.side.opposite(),
            ..self.clone()
        }
    }

    pub fn signed_amount(&self) -> Decimal {
        match self.side {
            Side::Debit => self.amount,
            Side::Credit => -self.amount,
        }
    }
}

/// Resolve user lines plus the system line into posting lines.
///
/// `totals` must come from the same `lines`. Lines without an amount and
/// lines excluded from the user sums are dropped.
pub fn posting_lines(totals: &Totals, lines: &[Line], narration: &str) -> Vec<PostingLine> {
    let mut out: Vec<PostingLine> = lines
        .iter()
        .filter(|line| {
            crate::balancer::is_user_line(totals.voucher_type, &totals.primary_account_id, line)
        })
        .filter_map(|line| {
            let (side, amount) = line.entry()?;
            Some(PostingLine {
                account_id: line.account_id().clone(),
                side,
                amount,
                description: line.description().to_string(),
                system: false,
            })
        })
        .collect();

    if let Some(system) = totals.system_line() {
        out.push(PostingLine {
            account_id: system.account_id,
            side: system.side,
            amount: system.amount,
            description: narration.to_string(),
            system: true,
        });
    }

    out
}

/// Net of debits minus credits; zero for a balanced set.
///
/// Each side saturates at `Decimal::MAX`, so the result never panics.
pub fn net(lines: &[PostingLine]) -> Decimal {
    let side_total = |side: Side| {
        lines
            .iter()
            .filter(|line| line.side == side)
            .fold(Decimal::ZERO, |sum, line| sum.saturating_add(line.amount))
    };
    side_total(Side::Debit) - side_total(Side::Credit)
}
