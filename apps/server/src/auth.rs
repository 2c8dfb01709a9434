//! Access control for the `/v1` API.
//!
//! Requests present HTTP Basic credentials which are checked against an
//! allow-list loaded from configuration at startup. The list is immutable for
//! the life of the process. Every rejection looks the same to the client.

use axum::{
    extract::{FromRequestParts, OriginalUri, State},
    http::{header, request::Parts, HeaderMap},
    response::{IntoResponse, Response},
};
use base64::{
    engine::general_purpose::{STANDARD, STANDARD_NO_PAD},
    Engine as _,
};
use std::collections::{HashMap, HashSet};

use crate::{
    config::AuthConfig,
    metrics::{self, SearchOutcome},
    request_context::RequestContext,
    services::PipelineStage,
    state::AppState,
    Error,
};

/// Caller identity attached to authorized requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
}

/// Why a credential was refused. Only ever logged; clients see a plain 401.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    MissingCredentials,
    MalformedCredentials(&'static str),
    UnknownUser,
    WrongPassword,
}

impl AuthError {
    fn reason(&self) -> &'static str {
        match self {
            Self::MissingCredentials => "missing Authorization header",
            Self::MalformedCredentials(why) => why,
            Self::UnknownUser => "unknown user",
            Self::WrongPassword => "wrong password",
        }
    }
}

/// Read-only Basic-auth allow-list.
#[derive(Debug, Clone)]
pub struct AccessGate {
    enabled: bool,
    realm: String,
    credentials: HashMap<String, String>,
    public_paths: HashSet<String>,
}

impl AccessGate {
    pub fn from_config(config: &AuthConfig) -> Self {
        Self {
            enabled: config.enabled,
            realm: config.realm.clone(),
            credentials: config
                .credentials
                .iter()
                .map(|c| (c.username.clone(), c.password.clone()))
                .collect(),
            public_paths: config.public_paths.iter().cloned().collect(),
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_public_path(&self, path: &str) -> bool {
        self.public_paths.contains(path)
    }

    /// Check the `Authorization` header against the allow-list.
    pub fn verify(&self, headers: &HeaderMap) -> Result<Principal, AuthError> {
        let value = headers
            .get(header::AUTHORIZATION)
            .ok_or(AuthError::MissingCredentials)?
            .to_str()
            .map_err(|_| AuthError::MalformedCredentials("non-ASCII Authorization header"))?;

        let (username, password) = parse_basic(value)?;

        match self.credentials.get(&username) {
            None => Err(AuthError::UnknownUser),
            Some(expected) if *expected != password => Err(AuthError::WrongPassword),
            Some(_) => Ok(Principal { username }),
        }
    }

    pub fn unauthorized(&self) -> Error {
        Error::Unauthorized {
            realm: self.realm.clone(),
        }
    }
}

/// Decode `Basic <base64(user:pass)>`. The scheme is case-insensitive and
/// both padded and unpadded base64 are accepted.
fn parse_basic(value: &str) -> Result<(String, String), AuthError> {
    let (scheme, encoded) = value
        .trim()
        .split_once(' ')
        .ok_or(AuthError::MalformedCredentials("missing credentials after scheme"))?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return Err(AuthError::MalformedCredentials("unsupported authorization scheme"));
    }

    let encoded = encoded.trim();
    let decoded = STANDARD
        .decode(encoded)
        .or_else(|_| STANDARD_NO_PAD.decode(encoded))
        .map_err(|_| AuthError::MalformedCredentials("invalid base64"))?;
    let decoded = String::from_utf8(decoded)
        .map_err(|_| AuthError::MalformedCredentials("credentials are not UTF-8"))?;

    let (username, password) = decoded
        .split_once(':')
        .ok_or(AuthError::MalformedCredentials("missing ':' separator"))?;

    Ok((username.to_string(), password.to_string()))
}

/// Extractor for the principal attached by [`auth_middleware`].
///
/// Use `Option<AuthenticatedPrincipal>` in handlers that also run with the
/// gate disabled.
#[derive(Debug, Clone)]
pub struct AuthenticatedPrincipal(pub Principal);

#[async_trait::async_trait]
impl<S> FromRequestParts<S> for AuthenticatedPrincipal
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(AuthenticatedPrincipal)
            .ok_or_else(|| {
                Error::Internal("route requires an authenticated principal".to_string())
                    .into_response()
            })
    }
}

/// Middleware for attaching `Principal` (or rejecting) on protected routes.
///
/// Rejections return before any handler work, so the search backend is never
/// called for an unauthorized request.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: axum::extract::Request,
    next: axum::middleware::Next,
) -> Response {
    PipelineStage::Received.enter();

    if !state.gate.enabled() {
        return next.run(req).await;
    }

    // Nested routers see a stripped path; match public paths on the full one.
    let path = req
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.path().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());
    if state.gate.is_public_path(&path) || req.method() == axum::http::Method::OPTIONS {
        return next.run(req).await;
    }

    match state.gate.verify(req.headers()) {
        Ok(principal) => {
            PipelineStage::Authorized.enter();
            tracing::debug!(user = %principal.username, "Request authorized");
            req.extensions_mut().insert::<Principal>(principal);
            next.run(req).await
        }
        Err(err) => {
            let request_id = req
                .extensions()
                .get::<RequestContext>()
                .map(|c| c.request_id.as_str())
                .unwrap_or("-");
            tracing::info!(
                path = %path,
                reason = err.reason(),
                request_id = %request_id,
                "Rejected unauthorized request"
            );
            metrics::record_search(SearchOutcome::Unauthorized);
            state.gate.unauthorized().into_response()
        }
    }
}
