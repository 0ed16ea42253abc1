// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Typed identity and session persistence over the [`StateStore`] port.
//!
//! Reads tolerate a corrupted or missing underlying store by returning
//! defaults; writes are shallow merges onto the last known record (or a
//! fresh default), so callers never read-before-write themselves. No
//! storage fault escapes this module; the worst case is fresh state.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::records::{SessionRecord, VisitorRecord};
use crate::storage::StateStore;

/// Key holding the VisitorRecord blob
pub const VISITOR_KEY: &str = "vt:visitor";
/// Key holding the SessionRecord blob
pub const SESSION_KEY: &str = "vt:session";
/// Key holding the administrative flag, read but never written here
pub const ADMIN_KEY: &str = "vt:admin";

#[derive(Clone)]
pub struct IdentityStore {
    store: Arc<dyn StateStore>,
}

impl IdentityStore {
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self { store }
    }

    /// Raw JSON value under a key; any fault (missing, unreadable store,
    /// malformed JSON) degrades to `None`.
    fn read_value(&self, key: &str) -> Option<Value> {
        let raw = match self.store.load(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                debug!(key, error = %e, "Store read failed, treating as absent");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!(key, error = %e, "Stored blob malformed, treating as absent");
                None
            }
        }
    }

    fn write_value(&self, key: &str, value: &Value) {
        match serde_json::to_string(value) {
            Ok(raw) => {
                if let Err(e) = self.store.save(key, &raw) {
                    debug!(key, error = %e, "Store write failed, dropping update");
                }
            }
            Err(e) => debug!(key, error = %e, "Record serialization failed, dropping update"),
        }
    }

    /// Shallow-merge `partial` onto the last known blob under `key`, or onto
    /// `base` if none exists. Only top-level object keys are merged.
    fn merge(&self, key: &str, base: Value, partial: Value) {
        let mut current = self.read_value(key).unwrap_or(base);
        if let (Some(target), Some(updates)) = (current.as_object_mut(), partial.as_object()) {
            for (k, v) in updates {
                target.insert(k.clone(), v.clone());
            }
        } else {
            current = partial;
        }
        self.write_value(key, &current);
    }

    /// Current visitor record; corrupt or missing state yields the default.
    #[must_use]
    pub fn visitor(&self) -> VisitorRecord {
        self.read_value(VISITOR_KEY)
            .and_then(|v| match serde_json::from_value(v) {
                Ok(rec) => Some(rec),
                Err(e) => {
                    debug!(error = %e, "Visitor blob has wrong shape, starting fresh");
                    None
                }
            })
            .unwrap_or_default()
    }

    /// Shallow-merge a partial update onto the visitor record.
    pub fn merge_visitor(&self, partial: Value) {
        let base = serde_json::to_value(VisitorRecord::default()).unwrap_or(Value::Null);
        self.merge(VISITOR_KEY, base, partial);
    }

    /// Current session record, if one is persisted. Expiry is the caller's
    /// concern (see [`crate::session::resolve_session`]).
    #[must_use]
    pub fn session(&self) -> Option<SessionRecord> {
        self.read_value(SESSION_KEY).and_then(|v| {
            match serde_json::from_value(v) {
                Ok(rec) => Some(rec),
                Err(e) => {
                    debug!(error = %e, "Session blob has wrong shape, discarding");
                    None
                }
            }
        })
    }

    /// Replace the session record (a superseded session is never mutated,
    /// always overwritten by its replacement).
    pub fn put_session(&self, session: &SessionRecord) {
        match serde_json::to_value(session) {
            Ok(value) => self.write_value(SESSION_KEY, &value),
            Err(e) => debug!(error = %e, "Session serialization failed, dropping update"),
        }
    }

    /// Administrative flag; this engine reads it but never writes it.
    /// Accepts JSON `true` or the strings "true"/"1".
    #[must_use]
    pub fn is_admin(&self) -> bool {
        match self.store.load(ADMIN_KEY) {
            Ok(Some(raw)) => {
                let raw = raw.trim();
                raw == "1" || raw.eq_ignore_ascii_case("true")
            }
            Ok(None) => false,
            Err(e) => {
                debug!(error = %e, "Admin flag read failed, assuming non-admin");
                false
            }
        }
    }
}
