//! Product catalog query core
//!
//! Pure, I/O-free pieces of the product search gateway:
//! - [`params`]: parse query-string items into a validated [`SearchRequest`]
//! - [`query`]: compile a request into an Elasticsearch [`EngineQuery`]
//! - [`mapper`]: project engine hits onto the public [`ProductRecord`] shape
//!
//! ```
//! use catalog_query::{EngineQuery, SearchRequest};
//!
//! let items = vec![("q".to_string(), "Nike".to_string())];
//! let request = SearchRequest::from_items(&items).unwrap();
//! let query = EngineQuery::build(&request);
//! assert_eq!(query.body()["size"], 10);
//! ```

mod escape;

pub mod error;
pub mod fields;
pub mod mapper;
pub mod models;
pub mod params;
pub mod query;

pub use error::{QueryError, Result};
pub use fields::{FieldKind, ProductField};
pub use mapper::{map_documents, FieldValue, MatchedDocument};
pub use models::{ProductRecord, ResponseStatus, SearchResponse};
pub use params::{Filter, FilterValue, ParseOptions, SearchRequest, SortDirection, SortKey};
pub use query::{EngineQuery, QueryBuilder};
