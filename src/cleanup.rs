// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Cooldown-bookkeeping cleanup.
//!
//! `session_pages` grows by one entry per distinct URL reported; without a
//! bound it would grow for the life of the visitor record. On each engine
//! activation this job drops entries older than the retention window
//! (default 1h). The caller persists only when something was actually
//! removed, avoiding a needless store write on every activation.

use tracing::debug;

use crate::records::VisitorRecord;

/// Drop `session_pages` entries older than `max_age_ms` before `now_ms`.
///
/// Returns whether any entry was removed; the record is untouched (and
/// should not be persisted) when nothing qualified.
pub fn prune_session_pages(visitor: &mut VisitorRecord, now_ms: i64, max_age_ms: i64) -> bool {
    let before = visitor.session_pages.len();
    visitor
        .session_pages
        .retain(|_, &mut stamped| now_ms - stamped <= max_age_ms);
    let removed = before - visitor.session_pages.len();

    if removed > 0 {
        debug!(removed, retained = visitor.session_pages.len(), "Pruned stale page cooldowns");
    }
    removed > 0
}
