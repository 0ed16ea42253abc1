//! Configuration for the tracking engine.
//!
//! # Example
//!
//! ```
//! use visit_engine::TrackerConfig;
//!
//! // Disabled config (no endpoint)
//! let config = TrackerConfig::default();
//! assert!(config.api_base.is_none());
//! assert_eq!(config.same_page_cooldown_ms, 30_000);
//!
//! // Full config
//! let config = TrackerConfig {
//!     api_base: Some("https://api.example.com".into()),
//!     debounce_ms: 500,
//!     ..Default::default()
//! };
//! ```

use serde::Deserialize;

/// Configuration for the tracking engine.
///
/// All timing fields have the source system's defaults. Without an
/// `api_base` the engine runs as a no-op: no store access, no network.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackerConfig {
    /// Analytics API base (e.g., "https://api.example.com").
    /// Absence disables the engine entirely.
    #[serde(default)]
    pub api_base: Option<String>,

    /// Explicit kill switch, independent of the endpoint
    #[serde(default)]
    pub disabled: bool,

    /// Same page re-visited sooner than this is suppressed (default 30s)
    #[serde(default = "default_same_page_cooldown_ms")]
    pub same_page_cooldown_ms: i64,

    /// Any page visited sooner than this after the last accepted report is
    /// suppressed, even a different one (default 5s)
    #[serde(default = "default_cross_page_cooldown_ms")]
    pub cross_page_cooldown_ms: i64,

    /// Session expires after this much inactivity (default 30min)
    #[serde(default = "default_session_timeout_ms")]
    pub session_timeout_ms: i64,

    /// Quiet period before a detected navigation is reported (default 500ms)
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Client-side cancel for in-flight dispatches (default 8s)
    #[serde(default = "default_dispatch_timeout_ms")]
    pub dispatch_timeout_ms: u64,

    /// Cleanup drops `session_pages` entries older than this (default 1h)
    #[serde(default = "default_page_history_max_age_ms")]
    pub page_history_max_age_ms: i64,
}

fn default_same_page_cooldown_ms() -> i64 { 30_000 }
fn default_cross_page_cooldown_ms() -> i64 { 5_000 }
fn default_session_timeout_ms() -> i64 { 30 * 60 * 1000 }
fn default_debounce_ms() -> u64 { 500 }
fn default_dispatch_timeout_ms() -> u64 { 8_000 }
fn default_page_history_max_age_ms() -> i64 { 60 * 60 * 1000 }

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            api_base: None,
            disabled: false,
            same_page_cooldown_ms: default_same_page_cooldown_ms(),
            cross_page_cooldown_ms: default_cross_page_cooldown_ms(),
            session_timeout_ms: default_session_timeout_ms(),
            debounce_ms: default_debounce_ms(),
            dispatch_timeout_ms: default_dispatch_timeout_ms(),
            page_history_max_age_ms: default_page_history_max_age_ms(),
        }
    }
}

impl TrackerConfig {
    /// Build a config from the process environment.
    ///
    /// - `VISIT_API_BASE`: analytics endpoint base; unset disables tracking
    /// - `VISIT_TRACKING_DISABLED`: "1"/"true" flips the kill switch
    #[must_use]
    pub fn from_env() -> Self {
        let api_base = std::env::var("VISIT_API_BASE").ok().filter(|s| !s.is_empty());
        let disabled = std::env::var("VISIT_TRACKING_DISABLED")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Self {
            api_base,
            disabled,
            ..Default::default()
        }
    }

    /// Whether the configuration alone permits tracking.
    ///
    /// The engine additionally requires a non-administrative operator; see
    /// [`VisitEngine::is_tracking`](crate::VisitEngine::is_tracking).
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.api_base.is_some() && !self.disabled
    }
}
