//! Per-request context injected by middleware.

/// Inserted by `request_id_middleware` before any handler runs.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
}
