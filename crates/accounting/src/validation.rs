//! Submit-time validation of a voucher.
//!
//! Every issue is collected; an imbalance never hides an entry-side problem
//! and vice versa.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use estatebooks_core::{AccountId, DomainError};

use crate::balancer::{Totals, compute_totals, is_user_line};
use crate::line::Line;
use crate::voucher_type::{Instrument, Side, VoucherType};

/// A single reason a voucher cannot be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VoucherIssue {
    #[error("voucher must have at least one line with an amount")]
    NoLines,

    #[error("{voucher_type} voucher requires a {instrument} account")]
    MissingPrimaryAccount {
        voucher_type: VoucherType,
        instrument: Instrument,
    },

    /// `line` is the zero-based index into the submitted lines.
    #[error("line {} has an amount but no account", .line + 1)]
    LineMissingAccount { line: usize },

    #[error("{side} entries are not allowed in a {voucher_type} voucher")]
    ManualEntryNotAllowed { voucher_type: VoucherType, side: Side },

    #[error("{voucher_type} voucher requires at least one {side} entry")]
    RequiredSideMissing { voucher_type: VoucherType, side: Side },

    #[error("voucher is out of balance by {balance}")]
    Unbalanced { balance: Decimal },
}

impl VoucherIssue {
    /// True for the imbalance failure, false for every structural one.
    pub fn is_imbalance(&self) -> bool {
        matches!(self, VoucherIssue::Unbalanced { .. })
    }

    pub fn is_entry_side(&self) -> bool {
        matches!(
            self,
            VoucherIssue::ManualEntryNotAllowed { .. } | VoucherIssue::RequiredSideMissing { .. }
        )
    }
}

/// All issues found for one voucher, together with the totals the form
/// should keep displaying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub totals: Totals,
    pub issues: Vec<VoucherIssue>,
}

impl ValidationReport {
    pub fn has_imbalance(&self) -> bool {
        self.issues.iter().any(VoucherIssue::is_imbalance)
    }

    pub fn has_entry_side_violation(&self) -> bool {
        self.issues.iter().any(VoucherIssue::is_entry_side)
    }

    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }
}

impl core::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.messages().join("; "))
    }
}

impl From<ValidationReport> for DomainError {
    fn from(report: ValidationReport) -> Self {
        DomainError::validation(report.to_string())
    }
}

/// Validate a voucher for submission.
///
/// Returns the totals when the voucher may be posted, otherwise a report
/// listing every issue.
pub fn validate_for_submit(
    voucher_type: VoucherType,
    primary_account_id: &AccountId,
    lines: &[Line],
) -> Result<Totals, ValidationReport> {
    let totals = compute_totals(voucher_type, primary_account_id, lines);
    let mut issues = Vec::new();

    if let Some(instrument) = voucher_type.instrument() {
        if primary_account_id.is_unset() {
            issues.push(VoucherIssue::MissingPrimaryAccount {
                voucher_type,
                instrument,
            });
        }
    }

    let user_lines: Vec<(usize, &Line)> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| is_user_line(voucher_type, primary_account_id, line))
        .collect();

    if !user_lines.iter().any(|(_, line)| line.has_amount()) {
        issues.push(VoucherIssue::NoLines);
    }

    for (idx, line) in &user_lines {
        if line.has_amount() && line.account_id().is_unset() {
            issues.push(VoucherIssue::LineMissingAccount { line: *idx });
        }
    }

    if let Some(allowed) = voucher_type.entry_side() {
        let disallowed = allowed.opposite();
        let has_side = |side: Side| {
            user_lines
                .iter()
                .any(|(_, line)| matches!(line.entry(), Some((s, _)) if s == side))
        };

        if has_side(disallowed) {
            issues.push(VoucherIssue::ManualEntryNotAllowed {
                voucher_type,
                side: disallowed,
            });
        }
        if !has_side(allowed) {
            issues.push(VoucherIssue::RequiredSideMissing {
                voucher_type,
                side: allowed,
            });
        }
    }

    if !totals.is_balanced {
        issues.push(VoucherIssue::Unbalanced {
            balance: totals.balance,
        });
    }

    if issues.is_empty() {
        Ok(totals)
    } else {
        tracing::debug!(
            voucher_type = voucher_type.as_str(),
            issues = issues.len(),
            "voucher rejected at submit"
        );
        Err(ValidationReport { totals, issues })
    }
}
