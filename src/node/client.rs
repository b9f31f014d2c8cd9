//! HTTP client for polling one node instance
//!
//! Issues the fixed sequence of authenticated read queries against an
//! instance's REST endpoint and assembles them into a [`NodeSnapshot`].
//! A snapshot is all-or-nothing: the first failing query aborts the poll.

use std::time::{Duration, Instant};

use base64::prelude::{Engine, BASE64_STANDARD};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use tracing::debug;

use crate::profile::InstanceEndpoints;
use crate::types::{LookoutError, Result};

use super::{NodeBalance, NodeIdentity, NodeSnapshot};

/// Client for the per-instance node REST API and health endpoint
#[derive(Debug, Clone)]
pub struct NodeApiClient {
    http: reqwest::Client,
}

impl NodeApiClient {
    /// Create a client with a per-request timeout.
    ///
    /// The timeout bounds every individual query, so a hung instance can
    /// stall a fleet load for at most `timeout` per query rather than
    /// indefinitely.
    pub fn new(timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("lookout/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();

        Self { http }
    }

    /// Poll one instance and build its snapshot.
    ///
    /// The Authorization header is constructed once and reused across all
    /// queries of the poll.
    pub async fn poll(
        &self,
        endpoints: &InstanceEndpoints,
        access_token: &str,
        instance_index: usize,
    ) -> Result<NodeSnapshot> {
        let headers = auth_headers(access_token)?;
        let base = &endpoints.http;

        let hopr_address = self.get_text(base, "/api/v1/address/hopr", &headers).await?;
        let native_address = self.get_text(base, "/api/v1/address/native", &headers).await?;
        let hopr_balance = self.get_text(base, "/api/v1/balance/hopr", &headers).await?;
        let native_balance = self.get_text(base, "/api/v1/balance/native", &headers).await?;
        let version = self.get_text(base, "/api/v1/version", &headers).await?;
        let info = self.get_json(base, "/api/v1/info", &headers).await?;
        let channels = self.get_json(base, "/api/v1/channels", &headers).await?;
        let tickets = self
            .get_json(base, "/api/v1/tickets/statistics", &headers)
            .await?;

        debug!(endpoint = %base, index = instance_index, "Instance poll complete");

        Ok(NodeSnapshot {
            instance_index,
            http_endpoint: endpoints.http.clone(),
            ws_endpoint: endpoints.ws.clone(),
            identity: NodeIdentity {
                hopr_address,
                native_address,
            },
            balance: NodeBalance {
                hopr: hopr_balance,
                native: native_balance,
            },
            version,
            info,
            channels,
            tickets,
        })
    }

    /// Probe the unauthenticated health endpoint, returning the response
    /// latency in milliseconds as the liveness sample.
    pub async fn probe_health(&self, health_endpoint: &str) -> Result<f64> {
        let started = Instant::now();
        let response = self.http.get(health_endpoint).send().await?;

        if !response.status().is_success() {
            return Err(LookoutError::Probe(format!(
                "{} returned {}",
                health_endpoint,
                response.status()
            )));
        }

        Ok(started.elapsed().as_secs_f64() * 1000.0)
    }

    async fn get_text(&self, base: &str, path: &str, headers: &HeaderMap) -> Result<String> {
        let response = self
            .http
            .get(format!("{}{}", base, path))
            .headers(headers.clone())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookoutError::Api(format!("GET {} returned {}", path, status)));
        }

        Ok(response.text().await?)
    }

    async fn get_json(
        &self,
        base: &str,
        path: &str,
        headers: &HeaderMap,
    ) -> Result<serde_json::Value> {
        let response = self
            .http
            .get(format!("{}{}", base, path))
            .headers(headers.clone())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookoutError::Api(format!("GET {} returned {}", path, status)));
        }

        Ok(response.json().await?)
    }
}

/// Build the Basic auth header map for one poll
fn auth_headers(access_token: &str) -> Result<HeaderMap> {
    let value = format!("Basic {}", BASE64_STANDARD.encode(access_token));
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&value)
            .map_err(|e| LookoutError::Internal(format!("invalid auth header: {}", e)))?,
    );
    Ok(headers)
}
