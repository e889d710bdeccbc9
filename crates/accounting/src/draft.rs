//! Entry-form state shared by the create and edit flows.
//!
//! Both flows hold a [`VoucherDraft`], mutate it per keystroke, read
//! [`VoucherDraft::totals`] for display and turn it into a command on save.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use estatebooks_core::{AccountId, DomainError, DomainResult, TenantId, UserId};

use crate::balancer::{Totals, compute_totals};
use crate::line::Line;
use crate::validation::{ValidationReport, validate_for_submit};
use crate::voucher::{CreateVoucher, EditVoucher, Voucher, VoucherHeader, VoucherId};
use crate::voucher_type::VoucherType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoucherDraft {
    pub voucher_type: VoucherType,
    pub primary_account_id: AccountId,
    pub date: NaiveDate,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub narration: Option<String>,
    lines: Vec<Line>,
}

impl VoucherDraft {
    /// Fresh draft with a single blank line.
    pub fn new(voucher_type: VoucherType, date: NaiveDate) -> Self {
        Self {
            voucher_type,
            primary_account_id: AccountId::unset(),
            date,
            reference: None,
            narration: None,
            lines: vec![Line::blank()],
        }
    }

    /// Seed a draft from an existing voucher for the edit flow.
    pub fn from_voucher(voucher: &Voucher) -> DomainResult<Self> {
        let header = voucher.header().ok_or_else(DomainError::not_found)?;
        if !voucher.status().is_editable() {
            return Err(DomainError::conflict(format!(
                "voucher is {} and can no longer be edited",
                voucher.status()
            )));
        }

        let mut lines = voucher.lines().to_vec();
        if lines.is_empty() {
            lines.push(Line::blank());
        }

        Ok(Self {
            voucher_type: header.voucher_type,
            primary_account_id: header.primary_account_id.clone(),
            date: header.date,
            reference: header.reference.clone(),
            narration: header.narration.clone(),
            lines,
        })
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn set_voucher_type(&mut self, voucher_type: VoucherType) {
        self.voucher_type = voucher_type;
        if voucher_type.is_journal() {
            self.primary_account_id = AccountId::unset();
        }
    }

    pub fn set_primary_account(&mut self, account_id: impl Into<AccountId>) {
        self.primary_account_id = account_id.into();
    }

    /// Append a blank line and return its index.
    pub fn add_line(&mut self) -> usize {
        self.lines.push(Line::blank());
        self.lines.len() - 1
    }

    /// Append a prepared line and return its index.
    pub fn push_line(&mut self, line: Line) -> usize {
        self.lines.push(line);
        self.lines.len() - 1
    }

    /// Remove a line. The form always keeps at least one line, so removing
    /// the last remaining one is refused.
    pub fn remove_line(&mut self, index: usize) -> DomainResult<Line> {
        self.check_index(index)?;
        if self.lines.len() == 1 {
            return Err(DomainError::validation("voucher must keep at least one line"));
        }
        Ok(self.lines.remove(index))
    }

    pub fn set_line_account(&mut self, index: usize, account_id: impl Into<AccountId>) -> DomainResult<()> {
        self.line_mut(index)?.set_account(account_id);
        Ok(())
    }

    pub fn set_line_description(&mut self, index: usize, description: impl Into<String>) -> DomainResult<()> {
        self.line_mut(index)?.set_description(description);
        Ok(())
    }

    /// Debit field edited; the raw text is coerced and the credit cleared
    /// when the debit is positive.
    pub fn set_line_debit(&mut self, index: usize, input: &str) -> DomainResult<()> {
        self.line_mut(index)?.set_debit_input(input);
        Ok(())
    }

    /// Credit field edited; see [`set_line_debit`](Self::set_line_debit).
    pub fn set_line_credit(&mut self, index: usize, input: &str) -> DomainResult<()> {
        self.line_mut(index)?.set_credit_input(input);
        Ok(())
    }

    pub fn totals(&self) -> Totals {
        compute_totals(self.voucher_type, &self.primary_account_id, &self.lines)
    }

    pub fn validate(&self) -> Result<Totals, ValidationReport> {
        validate_for_submit(self.voucher_type, &self.primary_account_id, &self.lines)
    }

    pub fn header(&self) -> VoucherHeader {
        VoucherHeader {
            voucher_type: self.voucher_type,
            primary_account_id: self.primary_account_id.clone(),
            date: self.date,
            reference: self.reference.clone(),
            narration: self.narration.clone(),
        }
    }

    /// Validate and build the command for the create flow.
    pub fn into_create_command(
        self,
        tenant_id: TenantId,
        voucher_id: VoucherId,
        created_by: UserId,
        occurred_at: DateTime<Utc>,
    ) -> Result<CreateVoucher, ValidationReport> {
        self.validate()?;
        Ok(CreateVoucher {
            tenant_id,
            voucher_id,
            header: self.header(),
            lines: self.submitted_lines(),
            created_by,
            occurred_at,
        })
    }

    /// Validate and build the command for the edit flow.
    pub fn into_edit_command(
        self,
        tenant_id: TenantId,
        voucher_id: VoucherId,
        edited_by: UserId,
        occurred_at: DateTime<Utc>,
    ) -> Result<EditVoucher, ValidationReport> {
        self.validate()?;
        Ok(EditVoucher {
            tenant_id,
            voucher_id,
            header: self.header(),
            lines: self.submitted_lines(),
            edited_by,
            occurred_at,
        })
    }

    /// Lines worth sending: blank rows are dropped.
    fn submitted_lines(&self) -> Vec<Line> {
        self.lines
            .iter()
            .filter(|line| line.has_amount() || !line.account_id().is_unset())
            .cloned()
            .collect()
    }

    fn check_index(&self, index: usize) -> DomainResult<()> {
        if index >= self.lines.len() {
            return Err(DomainError::validation(format!("no line at position {}", index + 1)));
        }
        Ok(())
    }

    fn line_mut(&mut self, index: usize) -> DomainResult<&mut Line> {
        self.check_index(index)?;
        Ok(&mut self.lines[index])
    }
}
