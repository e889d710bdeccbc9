use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use estatebooks_core::{
    AccountId, Aggregate, AggregateId, AggregateRoot, DomainError, DomainResult, TenantId, UserId,
};
use estatebooks_events::Event;

use crate::balancer::{Totals, compute_totals};
use crate::line::Line;
use crate::posting::{PostingLine, posting_lines};
use crate::validation::validate_for_submit;
use crate::voucher_type::VoucherType;
use crate::workflow::{VoucherAction, VoucherStatus};

/// Voucher identifier (aggregate id).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoucherId(pub AggregateId);

impl VoucherId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for VoucherId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Descriptive fields shared by create and edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoucherHeader {
    pub voucher_type: VoucherType,
    /// Bank/cash account balanced by the system line. Unset for journals.
    pub primary_account_id: AccountId,
    pub date: NaiveDate,
    pub reference: Option<String>,
    pub narration: Option<String>,
}

/// Aggregate root: Voucher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voucher {
    id: VoucherId,
    tenant_id: Option<TenantId>,
    header: Option<VoucherHeader>,
    lines: Vec<Line>,
    status: VoucherStatus,
    posted_lines: Vec<PostingLine>,
    version: u64,
    created: bool,
}

impl Voucher {
    /// Create an empty, not-yet-created aggregate instance for rehydration.
    pub fn empty(id: VoucherId) -> Self {
        Self {
            id,
            tenant_id: None,
            header: None,
            lines: Vec::new(),
            status: VoucherStatus::Draft,
            posted_lines: Vec::new(),
            version: 0,
            created: false,
        }
    }

    pub fn id_typed(&self) -> VoucherId {
        self.id
    }

    pub fn tenant_id(&self) -> Option<TenantId> {
        self.tenant_id
    }

    pub fn header(&self) -> Option<&VoucherHeader> {
        self.header.as_ref()
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn status(&self) -> VoucherStatus {
        self.status
    }

    /// Lines recorded in the ledger; empty until posted.
    pub fn posted_lines(&self) -> &[PostingLine] {
        &self.posted_lines
    }

    pub fn is_created(&self) -> bool {
        self.created
    }

    /// Current totals, recomputed from the stored lines.
    pub fn totals(&self) -> Option<Totals> {
        let header = self.header.as_ref()?;
        Some(compute_totals(
            header.voucher_type,
            &header.primary_account_id,
            &self.lines,
        ))
    }

    pub fn available_actions(&self) -> Vec<VoucherAction> {
        if !self.created {
            return Vec::new();
        }
        self.status.available_actions()
    }
}

impl AggregateRoot for Voucher {
    type Id = VoucherId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: CreateVoucher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateVoucher {
    pub tenant_id: TenantId,
    pub voucher_id: VoucherId,
    pub header: VoucherHeader,
    pub lines: Vec<Line>,
    pub created_by: UserId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: EditVoucher (replaces header and lines of a draft).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditVoucher {
    pub tenant_id: TenantId,
    pub voucher_id: VoucherId,
    pub header: VoucherHeader,
    pub lines: Vec<Line>,
    pub edited_by: UserId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: TransitionVoucher (submit / approve / post / reverse).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionVoucher {
    pub tenant_id: TenantId,
    pub voucher_id: VoucherId,
    pub action: VoucherAction,
    pub actor: UserId,
    pub reason: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoucherCommand {
    CreateVoucher(CreateVoucher),
    EditVoucher(EditVoucher),
    TransitionVoucher(TransitionVoucher),
}

/// Event: VoucherCreated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoucherCreated {
    pub tenant_id: TenantId,
    pub voucher_id: VoucherId,
    pub header: VoucherHeader,
    pub lines: Vec<Line>,
    pub totals: Totals,
    pub created_by: UserId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: VoucherEdited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoucherEdited {
    pub tenant_id: TenantId,
    pub voucher_id: VoucherId,
    pub header: VoucherHeader,
    pub lines: Vec<Line>,
    pub totals: Totals,
    pub edited_by: UserId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: a workflow step without ledger effect (submitted, approved).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoucherStatusChanged {
    pub tenant_id: TenantId,
    pub voucher_id: VoucherId,
    pub actor: UserId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: VoucherPosted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoucherPosted {
    pub tenant_id: TenantId,
    pub voucher_id: VoucherId,
    pub actor: UserId,
    pub posting_lines: Vec<PostingLine>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: VoucherReversed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoucherReversed {
    pub tenant_id: TenantId,
    pub voucher_id: VoucherId,
    pub actor: UserId,
    pub reason: Option<String>,
    pub reversal_lines: Vec<PostingLine>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoucherEvent {
    VoucherCreated(VoucherCreated),
    VoucherEdited(VoucherEdited),
    VoucherSubmitted(VoucherStatusChanged),
    VoucherApproved(VoucherStatusChanged),
    VoucherPosted(VoucherPosted),
    VoucherReversed(VoucherReversed),
}

impl Event for VoucherEvent {
    fn event_type(&self) -> &'static str {
        match self {
            VoucherEvent::VoucherCreated(_) => "accounting.voucher.created",
            VoucherEvent::VoucherEdited(_) => "accounting.voucher.edited",
            VoucherEvent::VoucherSubmitted(_) => "accounting.voucher.submitted",
            VoucherEvent::VoucherApproved(_) => "accounting.voucher.approved",
            VoucherEvent::VoucherPosted(_) => "accounting.voucher.posted",
            VoucherEvent::VoucherReversed(_) => "accounting.voucher.reversed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            VoucherEvent::VoucherCreated(e) => e.occurred_at,
            VoucherEvent::VoucherEdited(e) => e.occurred_at,
            VoucherEvent::VoucherSubmitted(e) => e.occurred_at,
            VoucherEvent::VoucherApproved(e) => e.occurred_at,
            VoucherEvent::VoucherPosted(e) => e.occurred_at,
            VoucherEvent::VoucherReversed(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Voucher {
    type Command = VoucherCommand;
    type Event = VoucherEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            VoucherEvent::VoucherCreated(e) => {
                self.id = e.voucher_id;
                self.tenant_id = Some(e.tenant_id);
                self.header = Some(e.header.clone());
                self.lines = e.lines.clone();
                self.status = VoucherStatus::Draft;
                self.created = true;
            }
            VoucherEvent::VoucherEdited(e) => {
                self.header = Some(e.header.clone());
                self.lines = e.lines.clone();
            }
            VoucherEvent::VoucherSubmitted(_) => {
                self.status = VoucherStatus::Submitted;
            }
            VoucherEvent::VoucherApproved(_) => {
                self.status = VoucherStatus::Approved;
            }
            VoucherEvent::VoucherPosted(e) => {
                self.posted_lines = e.posting_lines.clone();
                self.status = VoucherStatus::Posted;
            }
            VoucherEvent::VoucherReversed(_) => {
                self.status = VoucherStatus::Reversed;
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            VoucherCommand::CreateVoucher(cmd) => self.handle_create(cmd),
            VoucherCommand::EditVoucher(cmd) => self.handle_edit(cmd),
            VoucherCommand::TransitionVoucher(cmd) => self.handle_transition(cmd),
        }
    }
}

impl Voucher {
    fn ensure_tenant(&self, tenant_id: TenantId) -> DomainResult<()> {
        if !self.created {
            return Ok(());
        }
        if self.tenant_id != Some(tenant_id) {
            return Err(DomainError::invariant("tenant mismatch"));
        }
        Ok(())
    }

    fn ensure_voucher_id(&self, voucher_id: VoucherId) -> DomainResult<()> {
        if self.id != voucher_id {
            return Err(DomainError::invariant("voucher_id mismatch"));
        }
        Ok(())
    }

    fn handle_create(&self, cmd: &CreateVoucher) -> DomainResult<Vec<VoucherEvent>> {
        if self.created {
            return Err(DomainError::conflict("voucher already exists"));
        }

        let header = normalized_header(&cmd.header);
        let totals = validate_for_submit(header.voucher_type, &header.primary_account_id, &cmd.lines)?;

        tracing::debug!(
            voucher_id = %cmd.voucher_id,
            voucher_type = header.voucher_type.as_str(),
            "voucher created"
        );

        Ok(vec![VoucherEvent::VoucherCreated(VoucherCreated {
            tenant_id: cmd.tenant_id,
            voucher_id: cmd.voucher_id,
            header,
            lines: cmd.lines.clone(),
            totals,
            created_by: cmd.created_by,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_edit(&self, cmd: &EditVoucher) -> DomainResult<Vec<VoucherEvent>> {
        if !self.created {
            return Err(DomainError::not_found());
        }
        self.ensure_tenant(cmd.tenant_id)?;
        self.ensure_voucher_id(cmd.voucher_id)?;

        if !self.status.is_editable() {
            return Err(DomainError::conflict(format!(
                "voucher is {} and can no longer be edited",
                self.status
            )));
        }

        let header = normalized_header(&cmd.header);
        let totals = validate_for_submit(header.voucher_type, &header.primary_account_id, &cmd.lines)?;

        Ok(vec![VoucherEvent::VoucherEdited(VoucherEdited {
            tenant_id: cmd.tenant_id,
            voucher_id: cmd.voucher_id,
            header,
            lines: cmd.lines.clone(),
            totals,
            edited_by: cmd.edited_by,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_transition(&self, cmd: &TransitionVoucher) -> DomainResult<Vec<VoucherEvent>> {
        if !self.created {
            return Err(DomainError::not_found());
        }
        self.ensure_tenant(cmd.tenant_id)?;
        self.ensure_voucher_id(cmd.voucher_id)?;

        self.status.transition(cmd.action)?;

        tracing::debug!(
            voucher_id = %cmd.voucher_id,
            from = self.status.as_str(),
            action = cmd.action.as_str(),
            "voucher workflow action"
        );

        let changed = VoucherStatusChanged {
            tenant_id: cmd.tenant_id,
            voucher_id: cmd.voucher_id,
            actor: cmd.actor,
            occurred_at: cmd.occurred_at,
        };

        let event = match cmd.action {
            VoucherAction::Submit => VoucherEvent::VoucherSubmitted(changed),
            VoucherAction::Approve => VoucherEvent::VoucherApproved(changed),
            VoucherAction::Post => {
                let header = self
                    .header
                    .as_ref()
                    .ok_or_else(|| DomainError::invariant("created voucher has no header"))?;
                let totals = validate_for_submit(
                    header.voucher_type,
                    &header.primary_account_id,
                    &self.lines,
                )?;
                let narration = header.narration.as_deref().unwrap_or_default();
                VoucherEvent::VoucherPosted(VoucherPosted {
                    tenant_id: cmd.tenant_id,
                    voucher_id: cmd.voucher_id,
                    actor: cmd.actor,
                    posting_lines: posting_lines(&totals, &self.lines, narration),
                    occurred_at: cmd.occurred_at,
                })
            }
            VoucherAction::Reverse => VoucherEvent::VoucherReversed(VoucherReversed {
                tenant_id: cmd.tenant_id,
                voucher_id: cmd.voucher_id,
                actor: cmd.actor,
                reason: cmd.reason.clone(),
                reversal_lines: self.posted_lines.iter().map(PostingLine::reversed).collect(),
                occurred_at: cmd.occurred_at,
            }),
        };

        Ok(vec![event])
    }
}

/// Journals have no primary account; drop whatever the form left behind.
fn normalized_header(header: &VoucherHeader) -> VoucherHeader {
    let mut header = header.clone();
    if header.voucher_type.is_journal() {
        header.primary_account_id = AccountId::unset();
    }
    header
}
