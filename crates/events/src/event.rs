use chrono::{DateTime, Utc};

/// A domain-agnostic event.
///
/// Events are immutable facts. Once a voucher event has been emitted the
/// back end treats it as append-only history; schema changes bump
/// `version()`.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name (e.g. "accounting.voucher.posted").
    fn event_type(&self) -> &'static str;

    /// Schema version for this event type.
    fn version(&self) -> u32;

    /// When the event occurred (business time).
    fn occurred_at(&self) -> DateTime<Utc>;
}
