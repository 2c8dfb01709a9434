//! Search backends for router tests.

use async_trait::async_trait;
use catalog_gateway::backend::{BackendError, SearchBackend};
use catalog_query::{EngineQuery, MatchedDocument};
use serde_json::Value;
use std::cmp::Ordering as CmpOrdering;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Evaluates the subset of the Query DSL the gateway emits (`match_all`,
/// `multi_match`, `term`, `sort`, `from`/`size`) over seeded `_source`
/// documents. Seed order stands in for relevance order.
pub struct InMemoryBackend {
    documents: Vec<Value>,
    calls: AtomicUsize,
    queries: Mutex<Vec<Value>>,
}

impl InMemoryBackend {
    pub fn new(documents: Vec<Value>) -> Arc<Self> {
        Arc::new(Self {
            documents,
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_query(&self) -> Option<Value> {
        self.queries.lock().unwrap().last().cloned()
    }

    fn evaluate(&self, body: &Value) -> Vec<Value> {
        let bool_query = &body["query"]["bool"];
        let must = bool_query["must"].as_array().cloned().unwrap_or_default();
        let filters = bool_query["filter"].as_array().cloned().unwrap_or_default();

        let mut hits: Vec<Value> = self
            .documents
            .iter()
            .filter(|doc| must.iter().all(|clause| matches_clause(doc, clause)))
            .filter(|doc| filters.iter().all(|clause| matches_clause(doc, clause)))
            .cloned()
            .collect();

        if let Some(sort) = body["sort"].as_array() {
            hits.sort_by(|a, b| compare_by_sort(a, b, sort));
        }

        let from = body["from"].as_u64().unwrap_or(0) as usize;
        let size = body["size"].as_u64().unwrap_or(10) as usize;
        hits.into_iter().skip(from).take(size).collect()
    }
}

#[async_trait]
impl SearchBackend for InMemoryBackend {
    async fn search(&self, query: &EngineQuery) -> Result<Vec<MatchedDocument>, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.body().clone());
        Ok(self
            .evaluate(query.body())
            .iter()
            .map(MatchedDocument::from_source)
            .collect())
    }

    async fn ping(&self) -> Result<(), BackendError> {
        Ok(())
    }
}

/// Always fails with the configured error, counting calls.
pub struct FailingBackend {
    error: BackendError,
    calls: AtomicUsize,
}

impl FailingBackend {
    pub fn new(error: BackendError) -> Arc<Self> {
        Arc::new(Self {
            error,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchBackend for FailingBackend {
    async fn search(&self, _query: &EngineQuery) -> Result<Vec<MatchedDocument>, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(self.error.clone())
    }

    async fn ping(&self) -> Result<(), BackendError> {
        Err(self.error.clone())
    }
}

fn matches_clause(doc: &Value, clause: &Value) -> bool {
    if clause.get("match_all").is_some() {
        return true;
    }
    if let Some(multi) = clause.get("multi_match") {
        let wanted = tokens(multi["query"].as_str().unwrap_or_default());
        let fields = multi["fields"].as_array().cloned().unwrap_or_default();
        return fields.iter().filter_map(Value::as_str).any(|field| {
            let have = tokens(&field_text(doc, field));
            wanted.iter().any(|t| have.contains(t))
        });
    }
    if let Some(term) = clause.get("term").and_then(Value::as_object) {
        return term.iter().all(|(path, expected)| {
            let field = path.strip_suffix(".keyword").unwrap_or(path);
            doc.get(field) == Some(expected)
        });
    }
    panic!("unsupported query clause: {clause}");
}

fn compare_by_sort(a: &Value, b: &Value, sort: &[Value]) -> CmpOrdering {
    for key in sort {
        let Some((path, options)) = key.as_object().and_then(|o| o.iter().next()) else {
            continue;
        };
        let field = path.strip_suffix(".keyword").unwrap_or(path);
        let ordering = compare_values(a.get(field), b.get(field));
        let ordering = match options["order"].as_str() {
            Some("desc") => ordering.reverse(),
            _ => ordering,
        };
        if ordering != CmpOrdering::Equal {
            return ordering;
        }
    }
    CmpOrdering::Equal
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> CmpOrdering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(CmpOrdering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(_), None) => CmpOrdering::Less,
        (None, Some(_)) => CmpOrdering::Greater,
        _ => CmpOrdering::Equal,
    }
}

fn field_text(doc: &Value, field: &str) -> String {
    match doc.get(field) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

/// Lowercased alphanumeric tokens, roughly what the standard analyzer produces.
fn tokens(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}
