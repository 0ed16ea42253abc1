// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Visitor and session record data structures.
//!
//! These are the two JSON blobs the engine persists through the
//! [`StateStore`](crate::storage::StateStore) port. Field names are
//! camelCase on the wire so the blobs stay interchangeable with what the
//! storefront's other clients write.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Durable visitor identity, survives indefinitely unless the store is
/// cleared.
///
/// # Example
///
/// ```
/// use visit_engine::VisitorRecord;
///
/// let visitor = VisitorRecord::default();
/// assert!(visitor.visitor_id.is_empty());   // backend assigns one later
/// assert!(visitor.is_new_visitor);
/// assert!(visitor.session_pages.is_empty());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VisitorRecord {
    /// Opaque identifier; empty until the backend assigns one
    pub visitor_id: String,
    /// Calendar date (day granularity) of the last recorded visit
    pub last_visit_date: Option<NaiveDate>,
    /// True exactly for the first visit of a given calendar day
    pub is_new_visitor: bool,
    /// Page URL → last-report epoch millis, for same-page cooldown.
    /// Bounded by the cleanup job (entries older than 1h are pruned).
    pub session_pages: HashMap<String, i64>,
    /// Epoch millis of the most recent accepted report of any page
    pub last_page_visit: Option<i64>,
}

impl Default for VisitorRecord {
    fn default() -> Self {
        Self {
            visitor_id: String::new(),
            last_visit_date: None,
            is_new_visitor: true,
            session_pages: HashMap::new(),
            last_page_visit: None,
        }
    }
}

impl VisitorRecord {
    /// Whether `today` would be this visitor's first visit of the day.
    #[must_use]
    pub fn is_first_visit_of(&self, today: NaiveDate) -> bool {
        self.last_visit_date != Some(today)
    }
}

/// Semi-durable session, expires after 30 minutes of inactivity.
///
/// An expired record is discarded and replaced, never mutated back to life.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// Unique per session
    pub session_id: String,
    /// Epoch millis the session began
    pub start_time: i64,
    /// Epoch millis of the last accepted report within this session
    pub last_activity: i64,
    /// Distinct URLs visited this session, in first-visit order
    #[serde(default)]
    pub pages_visited: Vec<String>,
}

impl SessionRecord {
    /// Create a fresh session starting now.
    #[must_use]
    pub fn new(now_ms: i64) -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            start_time: now_ms,
            last_activity: now_ms,
            pages_visited: Vec::new(),
        }
    }

    /// A session is valid iff less than `timeout_ms` have elapsed since its
    /// last activity.
    #[must_use]
    pub fn is_expired(&self, now_ms: i64, timeout_ms: i64) -> bool {
        now_ms - self.last_activity >= timeout_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_visitor_is_new() {
        let visitor = VisitorRecord::default();
        assert!(visitor.visitor_id.is_empty());
        assert!(visitor.is_new_visitor);
        assert!(visitor.last_visit_date.is_none());
        assert!(visitor.last_page_visit.is_none());
    }

    #[test]
    fn test_first_visit_of_day() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();
        let yesterday = NaiveDate::from_ymd_opt(2026, 8, 28).unwrap();

        let mut visitor = VisitorRecord::default();
        assert!(visitor.is_first_visit_of(today));

        visitor.last_visit_date = Some(yesterday);
        assert!(visitor.is_first_visit_of(today));

        visitor.last_visit_date = Some(today);
        assert!(!visitor.is_first_visit_of(today));
    }

    #[test]
    fn test_session_expiry_boundary() {
        let session = SessionRecord::new(0);
        let timeout = 30 * 60 * 1000;

        assert!(!session.is_expired(timeout - 1, timeout)); // 29:59.999
        assert!(session.is_expired(timeout, timeout)); // exactly 30:00
        assert!(session.is_expired(timeout + 1, timeout));
    }

    #[test]
    fn test_session_ids_are_unique() {
        let a = SessionRecord::new(0);
        let b = SessionRecord::new(0);
        assert_ne!(a.session_id, b.session_id);
    }

    #[test]
    fn test_visitor_record_wire_shape() {
        let mut visitor = VisitorRecord {
            visitor_id: "v-1".into(),
            ..Default::default()
        };
        visitor.session_pages.insert("/home".into(), 1000);

        let json = serde_json::to_value(&visitor).unwrap();
        assert_eq!(json["visitorId"], "v-1");
        assert_eq!(json["isNewVisitor"], true);
        assert_eq!(json["sessionPages"]["/home"], 1000);
    }

    #[test]
    fn test_visitor_record_tolerates_partial_json() {
        // Older blobs may miss fields entirely; defaults fill the gaps
        let visitor: VisitorRecord = serde_json::from_str(r#"{"visitorId":"v-2"}"#).unwrap();
        assert_eq!(visitor.visitor_id, "v-2");
        assert!(visitor.is_new_visitor);
        assert!(visitor.session_pages.is_empty());
    }
}
