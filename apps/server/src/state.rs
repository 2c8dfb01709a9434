//! Shared application state

use std::sync::Arc;

use crate::{
    auth::AccessGate, backend::SearchBackend, config::Config, services::SearchService,
};

/// State handed to every handler. Cloning is cheap; everything is behind `Arc`
/// and nothing in it is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub gate: Arc<AccessGate>,
    pub search: Arc<SearchService>,
}

impl AppState {
    pub fn new(config: Config, backend: Arc<dyn SearchBackend>) -> Self {
        let gate = AccessGate::from_config(&config.auth);
        let search = SearchService::new(backend, config.query.parse_options());
        Self {
            config: Arc::new(config),
            gate: Arc::new(gate),
            search: Arc::new(search),
        }
    }
}
