// src/handlers/mod.rs
pub mod chowder;
pub mod error;
pub mod health;
