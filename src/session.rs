// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Session lifecycle: resolve, touch, expire.
//!
//! State machine:
//!
//! ```text
//! Absent ──(first activation)──▶ Active
//! Active ──(report within 30 min)──▶ Active (refreshed)
//! Active ──(30 min idle)──▶ Expired ──(next report)──▶ Active (new id)
//! ```
//!
//! An expired session is never mutated back to life; it is superseded by a
//! fresh record with a new id.

use crate::records::SessionRecord;

/// Return the current session if still valid at `now_ms`, otherwise a
/// freshly constructed replacement.
#[must_use]
pub fn resolve_session(
    current: Option<SessionRecord>,
    now_ms: i64,
    timeout_ms: i64,
) -> SessionRecord {
    match current {
        Some(session) if !session.is_expired(now_ms, timeout_ms) => session,
        _ => SessionRecord::new(now_ms),
    }
}

/// Record an accepted report against the session: refresh activity and
/// append the url to the visited list if not already present (order
/// preserved, no duplicates). Idempotent for repeated calls with the same
/// arguments.
pub fn touch(session: &mut SessionRecord, url: &str, now_ms: i64) {
    session.last_activity = now_ms;
    if !session.pages_visited.iter().any(|p| p == url) {
        session.pages_visited.push(url.to_string());
    }
}
