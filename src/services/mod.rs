// src/services/mod.rs
pub mod chowder;
pub mod market_data;
pub mod polygon;
