//! Accounting module: voucher entry and double-entry balancing.
//!
//! Pure domain logic only: no IO, no HTTP, no persistence concerns.

pub mod amount;
pub mod balancer;
pub mod draft;
pub mod line;
pub mod posting;
pub mod validation;
pub mod voucher;
pub mod voucher_type;
pub mod workflow;

pub use amount::{BALANCE_TOLERANCE, coerce_amount};
pub use balancer::{SystemLine, Totals, compute_totals};
pub use draft::VoucherDraft;
pub use line::Line;
pub use posting::PostingLine;
pub use validation::{ValidationReport, VoucherIssue, validate_for_submit};
pub use voucher::{
    CreateVoucher, EditVoucher, TransitionVoucher, Voucher, VoucherCommand, VoucherCreated,
    VoucherEdited, VoucherEvent, VoucherHeader, VoucherId, VoucherPosted, VoucherReversed,
    VoucherStatusChanged,
};
pub use voucher_type::{Instrument, Side, VoucherType};
pub use workflow::{VoucherAction, VoucherStatus};
