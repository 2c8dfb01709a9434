//! Public response shapes

use serde::{Deserialize, Serialize};

/// One product as exposed by the gateway. Field order is part of the wire contract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub title: String,
    pub brand: String,
    pub price: i64,
    pub stock: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// Successful search envelope. `results` is always present, even when empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub status: ResponseStatus,
    pub results: Vec<ProductRecord>,
}

impl SearchResponse {
    pub fn success(results: Vec<ProductRecord>) -> Self {
        Self {
            status: ResponseStatus::Success,
            results,
        }
    }
}
