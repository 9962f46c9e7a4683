//! Discovery and reconciliation of links.
pub mod context;
pub mod discover;
pub mod reconcile;

pub use context::{Context, LinkOptions};
pub use discover::discover;
pub use reconcile::{LinkOutcome, LinkReport, LinkSummary, SkipReason, reconcile};
