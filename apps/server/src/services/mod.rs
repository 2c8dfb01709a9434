//! Service layer - business logic between handlers and the search backend

pub mod search;

pub use search::{PipelineStage, SearchOutput, SearchService};
