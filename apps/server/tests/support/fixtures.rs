//! Seed documents shaped like the `_source` of the products index.

use serde_json::{json, Value};

pub fn product(title: &str, brand: &str, price: i64, stock: i64) -> Value {
    json!({ "title": title, "brand": brand, "price": price, "stock": stock })
}

/// AirMax by Nike and SuperStar by Adidas.
pub fn two_brands() -> Vec<Value> {
    vec![
        product("AirMax", "Nike", 1000, 10),
        product("SuperStar", "Adidas", 999, 5),
    ]
}

/// Two Nike "Pegasus Shield" listings at different prices.
pub fn pegasus_pair() -> Vec<Value> {
    vec![
        product("Pegasus Shield", "Nike", 1500, 3),
        product("Pegasus Shield", "Nike", 2000, 7),
    ]
}

/// A larger mixed catalog for ordering and paging checks.
pub fn catalog() -> Vec<Value> {
    vec![
        product("AirMax", "Nike", 1000, 10),
        product("SuperStar", "Adidas", 999, 5),
        product("Pegasus Shield", "Nike", 1500, 3),
        product("Pegasus Shield", "Nike", 2000, 7),
        product("Suede Classic", "Puma", 650, 0),
        product("Gel Kayano", "Asics", 1600, 4),
        product("Ultraboost", "Adidas", 1800, 2),
        product("Air Force", "Nike", 1100, 12),
    ]
}

/// `count` Nike listings titled `Runner 000`, `Runner 001`, ... in seed order.
pub fn numbered_nike_line(count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| product(&format!("Runner {i:03}"), "Nike", 1000 + i as i64, 1))
        .collect()
}
