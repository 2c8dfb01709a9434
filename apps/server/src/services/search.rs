//! Product search service
//!
//! Runs one request through the pipeline: parse the parameters, build the
//! engine query, execute it on the backend and map the hits to public records.
//! Authorization has already happened in the auth middleware by the time the
//! service is called.

use crate::{
    backend::SearchBackend,
    metrics::{self, SearchOutcome},
    Result,
};
use catalog_query::{map_documents, EngineQuery, ParseOptions, SearchRequest, SearchResponse};
use std::sync::Arc;
use std::time::Instant;

/// Request lifecycle, in order. Any stage may end in an error instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Received,
    Authorized,
    Parsed,
    Queried,
    Mapped,
    Rendered,
}

impl PipelineStage {
    pub fn as_str(self) -> &'static str {
        match self {
            PipelineStage::Received => "received",
            PipelineStage::Authorized => "authorized",
            PipelineStage::Parsed => "parsed",
            PipelineStage::Queried => "queried",
            PipelineStage::Mapped => "mapped",
            PipelineStage::Rendered => "rendered",
        }
    }

    /// Log the transition into this stage.
    pub fn enter(self) {
        tracing::debug!(stage = self.as_str(), "Search pipeline stage");
    }
}

/// Successful search plus the rendering hint parsed alongside it.
#[derive(Debug, Clone)]
pub struct SearchOutput {
    pub response: SearchResponse,
    pub pretty: bool,
}

/// Search service coordinates product search operations
pub struct SearchService {
    backend: Arc<dyn SearchBackend>,
    options: ParseOptions,
}

impl SearchService {
    pub fn new(backend: Arc<dyn SearchBackend>, options: ParseOptions) -> Self {
        Self { backend, options }
    }

    /// Run a search from decoded query-string items.
    ///
    /// Validation failures return before the backend is touched. Exactly one
    /// backend call is made otherwise.
    pub async fn search(&self, items: &[(String, String)]) -> Result<SearchOutput> {
        let request = match SearchRequest::from_items_with(items, &self.options) {
            Ok(request) => request,
            Err(e) => {
                metrics::record_search(SearchOutcome::Invalid);
                return Err(e.into());
            }
        };
        PipelineStage::Parsed.enter();

        let query = EngineQuery::build(&request);
        tracing::debug!(query = %query.body(), "Built engine query");

        let started = Instant::now();
        let outcome = self.backend.search(&query).await;
        metrics::BACKEND_QUERY_DURATION_SECONDS.observe(started.elapsed().as_secs_f64());

        let documents = match outcome {
            Ok(documents) => documents,
            Err(e) => {
                metrics::BACKEND_ERRORS_TOTAL
                    .with_label_values(&[e.kind()])
                    .inc();
                metrics::record_search(SearchOutcome::BackendError);
                return Err(e.into());
            }
        };
        PipelineStage::Queried.enter();

        let results = map_documents(&documents);
        PipelineStage::Mapped.enter();

        metrics::record_search(SearchOutcome::Success);
        metrics::SEARCH_RESULTS.observe(results.len() as f64);
        tracing::debug!(
            hits = documents.len(),
            offset = request.offset,
            limit = request.limit,
            "Search completed"
        );

        Ok(SearchOutput {
            response: SearchResponse::success(results),
            pretty: request.pretty,
        })
    }
}
