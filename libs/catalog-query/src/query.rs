//! Elasticsearch query builder for product searches.
//!
//! Compiles a [`SearchRequest`] into a Query DSL body:
//! - term clause: `multi_match` over the full-text fields (OR across tokens)
//! - filter clauses: one `term` per filter in the `bool.filter` context
//! - sort: passed through in request order, omitted when empty
//! - pagination: `from` / `size` passed through verbatim

use crate::fields::ProductField;
use crate::params::{Filter, FilterValue, SearchRequest, SortKey};
use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value};

/// Compiled, engine-native query.
///
/// Only [`QueryBuilder`] constructs it and nothing mutates it afterwards;
/// consumers get a read-only view of the body.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineQuery {
    body: Value,
}

impl EngineQuery {
    /// Compile a request. Shorthand for `QueryBuilder::new(request).build()`.
    pub fn build(request: &SearchRequest) -> Self {
        QueryBuilder::new(request).build()
    }

    /// The Query DSL body to submit to `_search`.
    pub fn body(&self) -> &Value {
        &self.body
    }
}

impl Serialize for EngineQuery {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.body.serialize(serializer)
    }
}

pub struct QueryBuilder<'a> {
    request: &'a SearchRequest,
}

impl<'a> QueryBuilder<'a> {
    pub fn new(request: &'a SearchRequest) -> Self {
        Self { request }
    }

    pub fn build(&self) -> EngineQuery {
        let mut bool_query = Map::new();
        bool_query.insert("must".to_string(), Value::Array(vec![self.term_clause()]));

        let filters = self.filter_clauses();
        if !filters.is_empty() {
            bool_query.insert("filter".to_string(), Value::Array(filters));
        }

        let mut body = Map::new();
        body.insert("query".to_string(), json!({ "bool": bool_query }));

        let sort = self.sort_clause();
        if !sort.is_empty() {
            body.insert("sort".to_string(), Value::Array(sort));
        }

        body.insert("from".to_string(), json!(self.request.offset));
        body.insert("size".to_string(), json!(self.request.limit));

        EngineQuery {
            body: Value::Object(body),
        }
    }

    fn term_clause(&self) -> Value {
        match &self.request.term {
            Some(term) => {
                let fields: Vec<&str> = ProductField::full_text_fields()
                    .map(ProductField::name)
                    .collect();
                json!({
                    "multi_match": {
                        "query": term,
                        "fields": fields,
                        "operator": "or"
                    }
                })
            }
            None => json!({ "match_all": {} }),
        }
    }

    fn filter_clauses(&self) -> Vec<Value> {
        self.request.filters.iter().map(filter_clause).collect()
    }

    fn sort_clause(&self) -> Vec<Value> {
        self.request.sort.iter().map(sort_clause).collect()
    }
}

fn filter_clause(filter: &Filter) -> Value {
    let value = match &filter.value {
        FilterValue::Text(s) => json!(s),
        FilterValue::Integer(n) => json!(n),
    };
    let mut term = Map::new();
    term.insert(filter.field.exact_path().to_string(), value);
    json!({ "term": term })
}

fn sort_clause(key: &SortKey) -> Value {
    let mut clause = Map::new();
    clause.insert(
        key.field.exact_path().to_string(),
        json!({ "order": key.direction.as_str() }),
    );
    Value::Object(clause)
}
