// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Network dispatch: best-effort, silent-failure event delivery.
//!
//! One POST per accepted visit. A client-side timeout cancels the in-flight
//! request; timeouts, transport failures, and non-success statuses are all
//! treated identically: logged at debug level and dropped. No retry is
//! scheduled; the next organic navigation is the natural retry opportunity.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::environment::{BrowserFamily, DeviceType};

/// JSON body of the outbound tracking call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitPayload {
    /// Known visitor id, omitted until the backend assigns one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visitor_id: Option<String>,
    pub session_id: String,
    pub page_url: String,
    pub page_title: String,
    pub referrer: String,
    pub device_type: DeviceType,
    pub browser: BrowserFamily,
    pub language: String,
    /// RFC 3339 timestamp of the visit
    pub timestamp: String,
    pub is_new_visitor: bool,
    /// Distinct pages seen this session, including this one
    pub session_page_count: usize,
}

/// Success response from the tracking endpoint. Every field is optional;
/// an empty body is a valid ack.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendAck {
    /// Backend-assigned visitor id, if the backend minted one
    #[serde(default)]
    pub visitor_id: Option<String>,
}

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Request timed out")]
    Timeout,
    #[error("Transport failure: {0}")]
    Transport(String),
    #[error("Server returned status {0}")]
    Status(u16),
}

/// Seam between the engine and the wire. Production uses [`HttpTransport`];
/// tests substitute a recording fake.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_visit(&self, payload: &VisitPayload) -> Result<BackendAck, TransportError>;
}

/// Reqwest-backed transport posting to `{api_base}/track`.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    /// Build a transport with the request timeout baked into the client.
    pub fn new(api_base: &str, timeout_ms: u64) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| TransportError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/track", api_base.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_visit(&self, payload: &VisitPayload) -> Result<BackendAck, TransportError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout
                } else {
                    TransportError::Transport(e.to_string())
                }
            })?;

        if !resp.status().is_success() {
            return Err(TransportError::Status(resp.status().as_u16()));
        }

        // A success body without the ack shape still counts as delivered
        Ok(resp.json::<BackendAck>().await.unwrap_or_default())
    }
}

/// Silent-failure wrapper over a [`Transport`].
#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Send a visit event. Failure of any kind returns `None`; nothing
    /// propagates to the caller.
    pub async fn send(&self, payload: &VisitPayload) -> Option<BackendAck> {
        match self.transport.post_visit(payload).await {
            Ok(ack) => {
                debug!(url = %payload.page_url, "Visit dispatched");
                Some(ack)
            }
            Err(e) => {
                debug!(url = %payload.page_url, error = %e, "Visit dropped");
                None
            }
        }
    }
}
