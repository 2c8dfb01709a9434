//! Elasticsearch `_search` client

use super::{BackendError, SearchBackend};
use crate::config::SearchConfig;
use async_trait::async_trait;
use catalog_query::{EngineQuery, MatchedDocument};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;

const READY_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// HTTP client for one index on an Elasticsearch cluster.
pub struct ElasticsearchClient {
    http: Client,
    nodes: Vec<String>,
    index: String,
    username: Option<String>,
    password: Option<String>,
    timeout: Duration,
    next_node: AtomicUsize,
}

#[derive(Debug, Deserialize)]
struct SearchBody {
    hits: HitsBody,
}

#[derive(Debug, Deserialize)]
struct HitsBody {
    #[serde(default)]
    hits: Vec<HitBody>,
}

#[derive(Debug, Deserialize)]
struct HitBody {
    #[serde(rename = "_source", default)]
    source: Value,
}

impl ElasticsearchClient {
    pub fn new(config: &SearchConfig) -> Result<Self, BackendError> {
        if config.nodes.is_empty() {
            return Err(BackendError::Transport(
                "no elasticsearch nodes configured".to_string(),
            ));
        }

        let timeout = config.timeout();
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Transport(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            nodes: config
                .nodes
                .iter()
                .map(|n| n.trim_end_matches('/').to_string())
                .collect(),
            index: config.index.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
            timeout,
            next_node: AtomicUsize::new(0),
        })
    }

    /// Pick the next node, round-robin.
    fn node(&self) -> &str {
        let idx = self.next_node.fetch_add(1, Ordering::Relaxed) % self.nodes.len();
        &self.nodes[idx]
    }

    fn with_auth(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.username {
            Some(user) => request.basic_auth(user, self.password.as_deref()),
            None => request,
        }
    }

    fn transport_error(&self, err: reqwest::Error) -> BackendError {
        if err.is_timeout() {
            BackendError::Timeout(self.timeout)
        } else {
            BackendError::Transport(err.to_string())
        }
    }

    /// Ping the cluster every 100ms until it answers or `timeout` elapses.
    ///
    /// The deadline also bounds a ping in flight. Returns the last ping error,
    /// or `Timeout` when no ping completed at all.
    pub async fn wait_until_ready(&self, timeout: Duration) -> Result<(), BackendError> {
        let deadline = tokio::time::Instant::now() + timeout;
        let mut ticker = tokio::time::interval(READY_POLL_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last_error: Option<BackendError> = None;

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = tokio::time::sleep_until(deadline) => {
                    return Err(last_error.unwrap_or(BackendError::Timeout(timeout)));
                }
            }

            match tokio::time::timeout_at(deadline, self.ping()).await {
                Ok(Ok(())) => return Ok(()),
                Ok(Err(e)) => {
                    tracing::debug!(error = %e, "Elasticsearch not ready yet");
                    last_error = Some(e);
                }
                Err(_) => return Err(last_error.unwrap_or(BackendError::Timeout(timeout))),
            }
        }
    }
}

#[async_trait]
impl SearchBackend for ElasticsearchClient {
    async fn search(&self, query: &EngineQuery) -> Result<Vec<MatchedDocument>, BackendError> {
        let url = format!("{}/{}/_search", self.node(), self.index);
        let started = Instant::now();

        let response = self
            .with_auth(self.http.post(&url))
            .json(query)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;

        tracing::debug!(
            url = %url,
            status = status.as_u16(),
            duration_ms = started.elapsed().as_millis(),
            "Elasticsearch query completed"
        );

        if !status.is_success() {
            return Err(BackendError::Rejected {
                status: status.as_u16(),
                reason: error_reason(&bytes),
            });
        }

        decode_hits(&bytes)
    }

    async fn ping(&self) -> Result<(), BackendError> {
        let url = format!("{}/", self.node());
        let response = self
            .with_auth(self.http.get(&url))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        match response.status() {
            s if s.is_success() => Ok(()),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(BackendError::Rejected {
                status: response.status().as_u16(),
                reason: Some("cluster credentials rejected".to_string()),
            }),
            s => Err(BackendError::Rejected {
                status: s.as_u16(),
                reason: None,
            }),
        }
    }
}

/// Decode `hits.hits[]._source` in engine order.
fn decode_hits(bytes: &[u8]) -> Result<Vec<MatchedDocument>, BackendError> {
    let body: SearchBody =
        serde_json::from_slice(bytes).map_err(|e| BackendError::Decode(e.to_string()))?;
    Ok(body
        .hits
        .hits
        .iter()
        .map(|hit| MatchedDocument::from_source(&hit.source))
        .collect())
}

/// Pull `error.reason` (or a string `error`) out of an engine error body.
fn error_reason(bytes: &[u8]) -> Option<String> {
    let body: Value = serde_json::from_slice(bytes).ok()?;
    let error = body.get("error")?;
    match error {
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => {
            let kind = obj.get("type").and_then(|v| v.as_str());
            let reason = obj.get("reason").and_then(|v| v.as_str());
            match (kind, reason) {
                (Some(k), Some(r)) => Some(format!("{k}: {r}")),
                (None, Some(r)) => Some(r.to_string()),
                (Some(k), None) => Some(k.to_string()),
                (None, None) => None,
            }
        }
        _ => None,
    }
}
