//! Property-based tests for engine resilience.
//!
//! Uses proptest to generate random/malformed inputs and verify the
//! decision functions uphold their invariants and deserialization never
//! panics, only returns clean errors.
//!
//! Run with: `cargo test --test proptest_fuzz`

use std::collections::HashMap;

use proptest::prelude::*;

use visit_engine::cleanup::prune_session_pages;
use visit_engine::session::{resolve_session, touch};
use visit_engine::{CooldownPolicy, SessionRecord, VisitorRecord};

// =============================================================================
// Strategies
// =============================================================================

/// URL-ish strings, including empty and unicode
fn url_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "/[a-z]{1,12}(/[a-z0-9]{1,12}){0,3}",
        ".*",
    ]
}

fn session_pages_strategy() -> impl Strategy<Value = HashMap<String, i64>> {
    prop::collection::hash_map(url_strategy(), 0_i64..10_000_000, 0..20)
}

// =============================================================================
// Deserialization Fuzz
// =============================================================================

proptest! {
    /// VisitorRecord deserialization never panics on arbitrary bytes
    #[test]
    fn fuzz_visitor_record_from_random_bytes(bytes in prop::collection::vec(any::<u8>(), 0..4096)) {
        let _: Result<VisitorRecord, _> = serde_json::from_slice(&bytes);
    }

    /// SessionRecord deserialization never panics on arbitrary bytes
    #[test]
    fn fuzz_session_record_from_random_bytes(bytes in prop::collection::vec(any::<u8>(), 0..4096)) {
        let _: Result<SessionRecord, _> = serde_json::from_slice(&bytes);
    }
}

// =============================================================================
// Decision Invariants
// =============================================================================

proptest! {
    /// After pruning, every retained entry is within the retention window,
    /// and the job reports a removal iff the map shrank
    #[test]
    fn prune_retains_exactly_the_recent(
        pages in session_pages_strategy(),
        now in 0_i64..20_000_000,
        max_age in 1_i64..10_000_000,
    ) {
        let mut visitor = VisitorRecord {
            session_pages: pages.clone(),
            ..Default::default()
        };

        let removed = prune_session_pages(&mut visitor, now, max_age);

        prop_assert_eq!(removed, visitor.session_pages.len() < pages.len());
        for (url, &stamp) in &visitor.session_pages {
            prop_assert!(now - stamp <= max_age, "stale entry survived: {}", url);
            prop_assert_eq!(pages.get(url), Some(&stamp));
        }
        // Nothing recent was dropped
        let expected_retained = pages.values().filter(|&&s| now - s <= max_age).count();
        prop_assert_eq!(visitor.session_pages.len(), expected_retained);
    }

    /// The policy reports iff both windows have cleared
    #[test]
    fn cooldown_reports_iff_windows_clear(
        pages in session_pages_strategy(),
        last_page_visit in prop::option::of(0_i64..10_000_000),
        url in url_strategy(),
        now in 0_i64..20_000_000,
        same_ms in 1_i64..100_000,
        cross_ms in 1_i64..100_000,
    ) {
        let visitor = VisitorRecord {
            session_pages: pages,
            last_page_visit,
            ..Default::default()
        };
        let policy = CooldownPolicy::new(same_ms, cross_ms);

        let same_blocked = visitor
            .session_pages
            .get(&url)
            .is_some_and(|&t| now - t < same_ms);
        let cross_blocked = last_page_visit.is_some_and(|t| now - t < cross_ms);

        let decision = policy.evaluate(&visitor, &url, now);
        prop_assert_eq!(decision.is_report(), !same_blocked && !cross_blocked);
    }

    /// A resolved session is always valid at resolution time, and touching
    /// never introduces duplicate pages
    #[test]
    fn resolved_session_is_valid_and_pages_distinct(
        urls in prop::collection::vec(url_strategy(), 1..10),
        start in 0_i64..1_000_000,
        gaps in prop::collection::vec(0_i64..3_600_000, 1..10),
        timeout in 1_i64..3_600_000,
    ) {
        let mut session: Option<SessionRecord> = None;
        let mut now = start;

        for (url, gap) in urls.iter().zip(gaps.iter()) {
            now += gap;
            let mut resolved = resolve_session(session.take(), now, timeout);
            prop_assert!(!resolved.is_expired(now, timeout));

            touch(&mut resolved, url, now);
            prop_assert_eq!(resolved.last_activity, now);

            let mut seen = std::collections::HashSet::new();
            for page in &resolved.pages_visited {
                prop_assert!(seen.insert(page.clone()), "duplicate page: {}", page);
            }
            session = Some(resolved);
        }
    }
}
