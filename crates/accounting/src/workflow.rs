//! Voucher status lifecycle.
//!
//! ```text
//! draft --submit--> submitted --approve--> approved --post--> posted --reverse--> reversed
//! ```

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use estatebooks_core::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoucherStatus {
    Draft,
    Submitted,
    Approved,
    Posted,
    Reversed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoucherAction {
    Submit,
    Approve,
    Post,
    Reverse,
}

/// Every legal `(from, action, to)` triple. Anything not listed is illegal.
pub const TRANSITIONS: [(VoucherStatus, VoucherAction, VoucherStatus); 4] = [
    (VoucherStatus::Draft, VoucherAction::Submit, VoucherStatus::Submitted),
    (VoucherStatus::Submitted, VoucherAction::Approve, VoucherStatus::Approved),
    (VoucherStatus::Approved, VoucherAction::Post, VoucherStatus::Posted),
    (VoucherStatus::Posted, VoucherAction::Reverse, VoucherStatus::Reversed),
];

impl VoucherStatus {
    pub const ALL: [VoucherStatus; 5] = [
        VoucherStatus::Draft,
        VoucherStatus::Submitted,
        VoucherStatus::Approved,
        VoucherStatus::Posted,
        VoucherStatus::Reversed,
    ];

    /// Status reached by `action`, or `None` when the action is illegal here.
    pub fn apply(self, action: VoucherAction) -> Option<VoucherStatus> {
        TRANSITIONS
            .iter()
            .find(|(from, a, _)| *from == self && *a == action)
            .map(|(_, _, to)| *to)
    }

    /// Like [`apply`](Self::apply) but with a domain error for illegal moves.
    pub fn transition(self, action: VoucherAction) -> DomainResult<VoucherStatus> {
        self.apply(action)
            .ok_or_else(|| DomainError::illegal_transition(self, action))
    }

    /// Actions a user may take next, in workflow order.
    pub fn available_actions(self) -> Vec<VoucherAction> {
        TRANSITIONS
            .iter()
            .filter(|(from, _, _)| *from == self)
            .map(|(_, action, _)| *action)
            .collect()
    }

    /// Lines may only change while the voucher is a draft.
    pub fn is_editable(self) -> bool {
        matches!(self, VoucherStatus::Draft)
    }

    pub fn is_terminal(self) -> bool {
        self.available_actions().is_empty()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VoucherStatus::Draft => "draft",
            VoucherStatus::Submitted => "submitted",
            VoucherStatus::Approved => "approved",
            VoucherStatus::Posted => "posted",
            VoucherStatus::Reversed => "reversed",
        }
    }
}

impl VoucherAction {
    pub fn as_str(self) -> &'static str {
        match self {
            VoucherAction::Submit => "submit",
            VoucherAction::Approve => "approve",
            VoucherAction::Post => "post",
            VoucherAction::Reverse => "reverse",
        }
    }
}

impl core::fmt::Display for VoucherStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::fmt::Display for VoucherAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoucherStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        VoucherStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| DomainError::validation(format!("unknown voucher status: {s}")))
    }
}
