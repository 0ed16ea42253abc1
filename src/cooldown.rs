// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Cooldown policy: decide whether a visit is worth reporting.
//!
//! Two windows guard against inflated counts. The long same-page window
//! stops re-counting a page the user lingers on; the short cross-page
//! window absorbs bursts of programmatic or accidental navigations while
//! still allowing genuine fast browsing.
//!
//! The policy is a pure function over the visitor record and a supplied
//! timestamp; after a report is actually sent the caller stamps
//! `session_pages[url]` and `last_page_visit` with the send time.

use crate::config::TrackerConfig;
use crate::records::VisitorRecord;

/// Outcome of a cooldown check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Visit is worth reporting
    Report,
    /// Same page re-visited within the same-page window
    SamePageCooldown,
    /// Any page visited within the cross-page window
    CrossPageCooldown,
}

impl Decision {
    #[must_use]
    pub fn is_report(self) -> bool {
        self == Self::Report
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Report => write!(f, "report"),
            Self::SamePageCooldown => write!(f, "same-page-cooldown"),
            Self::CrossPageCooldown => write!(f, "cross-page-cooldown"),
        }
    }
}

/// Pure suppression policy over the visitor's report history.
#[derive(Debug, Clone, Copy)]
pub struct CooldownPolicy {
    same_page_ms: i64,
    cross_page_ms: i64,
}

impl CooldownPolicy {
    #[must_use]
    pub fn new(same_page_ms: i64, cross_page_ms: i64) -> Self {
        Self {
            same_page_ms,
            cross_page_ms,
        }
    }

    #[must_use]
    pub fn from_config(config: &TrackerConfig) -> Self {
        Self::new(config.same_page_cooldown_ms, config.cross_page_cooldown_ms)
    }

    /// Evaluate whether a visit to `url` at `now_ms` should be reported.
    ///
    /// Same-page check runs first (longer window), then the cross-page
    /// check against the last accepted report of any page.
    #[must_use]
    pub fn evaluate(&self, visitor: &VisitorRecord, url: &str, now_ms: i64) -> Decision {
        if let Some(&last) = visitor.session_pages.get(url) {
            if now_ms - last < self.same_page_ms {
                return Decision::SamePageCooldown;
            }
        }

        if let Some(last) = visitor.last_page_visit {
            if now_ms - last < self.cross_page_ms {
                return Decision::CrossPageCooldown;
            }
        }

        Decision::Report
    }
}
