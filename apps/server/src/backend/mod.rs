//! Search backend abstraction
//!
//! The gateway talks to the search engine through [`SearchBackend`]. The
//! production implementation is [`ElasticsearchClient`]; tests plug in
//! in-memory backends.

mod elasticsearch;

pub use elasticsearch::ElasticsearchClient;

use async_trait::async_trait;
use catalog_query::{EngineQuery, MatchedDocument};
use std::time::Duration;
use thiserror::Error;

/// Why a backend call failed. Callers surface every variant as the same
/// "search backend unavailable" outcome; the detail is for logs only.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error(
        "engine rejected query with HTTP {status}: {}",
        reason.as_deref().unwrap_or("no reason given")
    )]
    Rejected { status: u16, reason: Option<String> },

    #[error("failed to decode engine response: {0}")]
    Decode(String),
}

impl BackendError {
    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Timeout(_) => "timeout",
            Self::Rejected { .. } => "rejected",
            Self::Decode(_) => "decode",
        }
    }
}

/// Query executor in front of the search engine.
///
/// Implementations issue exactly one engine call per `search` and return hits
/// in engine order, without filtering, re-sorting or re-paginating them.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, query: &EngineQuery) -> Result<Vec<MatchedDocument>, BackendError>;

    /// Cheap liveness probe used at startup.
    async fn ping(&self) -> Result<(), BackendError>;
}
