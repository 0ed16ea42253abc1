// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Execution-environment description and device/browser classification.
//!
//! Classification is a pure function over an opaque user-agent string. The
//! exact heuristics are incidental rather than load-bearing, so they live
//! here in one place where tests can pin them and hosts can stub the whole
//! [`EnvironmentInfo`].

use serde::Serialize;

/// Snapshot of the host execution environment at navigation time.
///
/// The host supplies this; url/title arguments omitted at
/// [`track_visit`](crate::VisitEngine::track_visit) time fall back to
/// these values.
#[derive(Debug, Clone, Default)]
pub struct EnvironmentInfo {
    /// Current page URL
    pub url: String,
    /// Current document title
    pub title: String,
    /// Referrer URL, empty if none
    pub referrer: String,
    /// BCP 47 language tag (e.g., "en-US")
    pub language: String,
    /// Raw user-agent string
    pub user_agent: String,
}

/// Device class inferred from environment signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Desktop,
    Mobile,
    Tablet,
}

impl DeviceType {
    /// Classify a user-agent string.
    ///
    /// Tablets are checked before mobiles: an Android tablet carries
    /// "Android" but not "Mobile", an iPad carries neither.
    #[must_use]
    pub fn classify(user_agent: &str) -> Self {
        let ua = user_agent.to_ascii_lowercase();
        if ua.contains("ipad") || ua.contains("tablet") {
            Self::Tablet
        } else if ua.contains("mobile") || ua.contains("iphone") || ua.contains("android") {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }
}

impl std::fmt::Display for DeviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Desktop => write!(f, "desktop"),
            Self::Mobile => write!(f, "mobile"),
            Self::Tablet => write!(f, "tablet"),
        }
    }
}

/// Browser family inferred from the user-agent string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserFamily {
    Chrome,
    Firefox,
    Safari,
    Edge,
    Other,
}

impl BrowserFamily {
    /// Classify a user-agent string.
    ///
    /// Edge ships "Edg/" alongside "Chrome", and Chrome ships "Safari",
    /// so the checks run most-specific first.
    #[must_use]
    pub fn classify(user_agent: &str) -> Self {
        let ua = user_agent.to_ascii_lowercase();
        if ua.contains("edg/") || ua.contains("edge") {
            Self::Edge
        } else if ua.contains("chrome") || ua.contains("crios") {
            Self::Chrome
        } else if ua.contains("firefox") || ua.contains("fxios") {
            Self::Firefox
        } else if ua.contains("safari") {
            Self::Safari
        } else {
            Self::Other
        }
    }
}

impl std::fmt::Display for BrowserFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Chrome => write!(f, "chrome"),
            Self::Firefox => write!(f, "firefox"),
            Self::Safari => write!(f, "safari"),
            Self::Edge => write!(f, "edge"),
            Self::Other => write!(f, "other"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHROME_DESKTOP: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";
    const EDGE_DESKTOP: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36 Edg/126.0.0.0";
    const SAFARI_IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_5 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Mobile/15E148 Safari/604.1";
    const SAFARI_IPAD: &str = "Mozilla/5.0 (iPad; CPU OS 17_5 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Safari/604.1";
    const FIREFOX_DESKTOP: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:127.0) Gecko/20100101 Firefox/127.0";
    const ANDROID_PHONE: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Mobile Safari/537.36";
    const ANDROID_TABLET: &str = "Mozilla/5.0 (Linux; Android 14; SM-X910) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36 Tablet";

    #[test]
    fn test_device_classification() {
        assert_eq!(DeviceType::classify(CHROME_DESKTOP), DeviceType::Desktop);
        assert_eq!(DeviceType::classify(SAFARI_IPHONE), DeviceType::Mobile);
        assert_eq!(DeviceType::classify(ANDROID_PHONE), DeviceType::Mobile);
        assert_eq!(DeviceType::classify(SAFARI_IPAD), DeviceType::Tablet);
        assert_eq!(DeviceType::classify(ANDROID_TABLET), DeviceType::Tablet);
        assert_eq!(DeviceType::classify(""), DeviceType::Desktop);
    }

    #[test]
    fn test_browser_classification() {
        assert_eq!(BrowserFamily::classify(CHROME_DESKTOP), BrowserFamily::Chrome);
        assert_eq!(BrowserFamily::classify(EDGE_DESKTOP), BrowserFamily::Edge);
        assert_eq!(BrowserFamily::classify(SAFARI_IPHONE), BrowserFamily::Safari);
        assert_eq!(BrowserFamily::classify(FIREFOX_DESKTOP), BrowserFamily::Firefox);
        assert_eq!(BrowserFamily::classify("curl/8.0"), BrowserFamily::Other);
    }

    #[test]
    fn test_wire_strings() {
        assert_eq!(DeviceType::Tablet.to_string(), "tablet");
        assert_eq!(BrowserFamily::Edge.to_string(), "edge");
    }
}
