// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! The visit pipeline: cooldown → session → persist → dispatch.
//!
//! Every accepted visit walks the same path:
//!
//! 1. gate on engine state (config / admin checked at activation)
//! 2. cooldown policy over the visitor's report history
//! 3. resolve or replace the session, touch it with the url
//! 4. stamp cooldown bookkeeping and persist both records
//! 5. dispatch, then fold any backend ack into the visitor record
//!
//! Nothing in this path can error out to the caller; every failure mode
//! degrades to "the visit was not tracked".

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::debug;

use crate::dispatch::VisitPayload;
use crate::environment::{BrowserFamily, DeviceType};
use crate::session::{resolve_session, touch};

use super::{EngineState, VisitEngine};

impl VisitEngine {
    /// Report a page visit.
    ///
    /// The manual entry point (the navigation watcher calls this too). A
    /// missing `url` or `title` falls back to the engine's
    /// [`EnvironmentInfo`](crate::EnvironmentInfo). Never errors and never
    /// panics; a suppressed or failed visit is simply not tracked.
    pub async fn track_visit(&self, url: Option<&str>, title: Option<&str>) {
        let (fallback_url, fallback_title) = {
            let env = self.environment.read();
            (env.url.clone(), env.title.clone())
        };
        let url = url.map(str::to_string).unwrap_or(fallback_url);
        let title = title.map(str::to_string).unwrap_or(fallback_title);

        self.process_visit(&url, &title, Utc::now()).await;
    }

    /// Pipeline body with an explicit clock, so tests drive timelines
    /// without waiting on the wall clock.
    pub(crate) async fn process_visit(&self, url: &str, title: &str, now: DateTime<Utc>) {
        if self.state() != EngineState::Running {
            return;
        }
        if url.is_empty() {
            debug!("No url available, visit ignored");
            return;
        }

        let now_ms = now.timestamp_millis();
        let mut visitor = self.identity.visitor();

        let decision = self.policy.evaluate(&visitor, url, now_ms);
        if !decision.is_report() {
            debug!(url, reason = %decision, "Visit suppressed");
            return;
        }

        // Resolve (or supersede) the session and record this page against it
        let mut session = resolve_session(
            self.identity.session(),
            now_ms,
            self.config.session_timeout_ms,
        );
        touch(&mut session, url, now_ms);

        let today = now.date_naive();
        let is_new_visitor = visitor.is_first_visit_of(today);

        let payload = {
            let env = self.environment.read();
            VisitPayload {
                visitor_id: (!visitor.visitor_id.is_empty()).then(|| visitor.visitor_id.clone()),
                session_id: session.session_id.clone(),
                page_url: url.to_string(),
                page_title: title.to_string(),
                referrer: env.referrer.clone(),
                device_type: DeviceType::classify(&env.user_agent),
                browser: BrowserFamily::classify(&env.user_agent),
                language: env.language.clone(),
                timestamp: now.to_rfc3339(),
                is_new_visitor,
                session_page_count: session.pages_visited.len(),
            }
        };

        // The report is being sent: stamp the cooldown bookkeeping now so a
        // burst racing the network call is still suppressed
        visitor.session_pages.insert(url.to_string(), now_ms);
        self.identity.merge_visitor(json!({
            "sessionPages": visitor.session_pages,
            "lastPageVisit": now_ms,
        }));
        self.identity.put_session(&session);

        let Some(dispatcher) = self.dispatcher.as_ref() else {
            return; // unreachable when Running, but never panic here
        };

        let Some(ack) = dispatcher.send(&payload).await else {
            return; // dropped; the next navigation is the retry
        };

        // Success: the visit counts toward today, and the new-visitor flag
        // flips permanently for the day
        let mut updates = json!({
            "lastVisitDate": today,
            "isNewVisitor": false,
        });
        if visitor.visitor_id.is_empty() {
            if let Some(assigned) = ack.visitor_id {
                debug!(visitor_id = %assigned, "Backend assigned visitor id");
                updates["visitorId"] = json!(assigned);
            }
        }
        self.identity.merge_visitor(updates);
    }
}
