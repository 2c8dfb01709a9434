//! Product search handler
//!
//! `GET /v1/products` decodes the raw query string itself so that repeated
//! `filter` / `sort` parameters keep their order.

use axum::{
    extract::{RawQuery, State},
    http::header,
    response::{IntoResponse, Response},
};
use catalog_query::SearchResponse;

use crate::{
    auth::AuthenticatedPrincipal, services::PipelineStage, state::AppState, Error, Result,
};

pub async fn search_products(
    State(state): State<AppState>,
    principal: Option<AuthenticatedPrincipal>,
    RawQuery(query): RawQuery,
) -> Result<Response> {
    let items = parse_form_urlencoded(query.as_deref().unwrap_or_default());

    let output = state.search.search(&items).await?;

    let user = principal
        .as_ref()
        .map(|p| p.0.username.as_str())
        .unwrap_or("anonymous");
    tracing::info!(
        user = %user,
        results = output.response.results.len(),
        "Product search served"
    );

    let body = render_json(&output.response, output.pretty)?;
    PipelineStage::Rendered.enter();

    Ok((
        [
            (header::CONTENT_TYPE, "application/json"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        body,
    )
        .into_response())
}

fn parse_form_urlencoded(s: &str) -> Vec<(String, String)> {
    // `url::form_urlencoded` implements `application/x-www-form-urlencoded` semantics (including '+' = space).
    url::form_urlencoded::parse(s.as_bytes())
        .into_owned()
        .collect()
}

fn render_json(response: &SearchResponse, pretty: bool) -> Result<Vec<u8>> {
    let rendered = if pretty {
        serde_json::to_vec_pretty(response)
    } else {
        serde_json::to_vec(response)
    };
    rendered.map_err(|e| Error::Internal(format!("Failed to serialize search response: {e}")))
}
