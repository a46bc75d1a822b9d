//! The `node` module is the core of `holdq`: a single-slot, event-driven
//! message buffering stage.
//!
//! Messages enter one at a time, wait in an ordered backlog with per-message
//! time-to-live, and leave either on an explicit trigger or automatically on
//! the recurring bypass timer. Control messages reset the node, query the
//! backlog length, retune the release cadence, or switch it into
//! pass-through mode.

pub mod backlog;
pub mod clock;
pub mod engine;
pub mod message;
pub mod status;

pub use engine::{NodeHandle, NodeSender, QueueNode};
