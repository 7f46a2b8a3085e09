// src/handlers/health.rs
use serde_json::json;
use warp::reply::Json;
use warp::Rejection;

pub async fn get_health() -> Result<Json, Rejection> {
    Ok(warp::reply::json(&json!({ "status": "UP" })))
}
