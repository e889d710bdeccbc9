//! Domain events emitted by estatebooks aggregates.

pub mod event;

pub use event::Event;
