//! Route tables

pub mod products;
