//! Pre-built [`tracing::Span`] constructors for engine operations.
//!
//! Consistent span names and field sets make it easy to filter and
//! correlate one operation's logs across the state machines and the
//! payment rail.

use tracing::{info_span, Span};

/// Span covering one dispatched operation, from lock to commit.
pub fn operation_span(entity: &str, id: Option<u64>, method: &str, sender: &str) -> Span {
    match id {
        Some(id) => info_span!("operation", entity = %entity, id, method = %method, sender = %sender),
        None => info_span!("operation", entity = %entity, method = %method, sender = %sender),
    }
}

/// Span covering the encode-and-write of a committed record.
pub fn commit_span(entity: &str, id: u64) -> Span {
    info_span!("commit", entity = %entity, id)
}
