// src/handlers/chowder.rs
use chrono::Utc;
use log::{error, info};
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use super::error::ApiError;
use crate::services::market_data;
use crate::services::polygon::{MarketDataError, PolygonClient};

/// Handles `GET /api/market/chowder/{symbol}`.
///
/// Invalid-but-successful results (sparse data) come back as 200 with the
/// explanatory message in the body; only vendor failures map to error
/// statuses (400 unsupported symbol, 503 rate limit, 502 otherwise).
pub async fn get_chowder_analysis(
    symbol: String,
    client: Arc<PolygonClient>,
) -> Result<Json, Rejection> {
    let symbol = symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(warp::reject::custom(ApiError::bad_request(
            "Symbol cannot be blank",
        )));
    }

    info!("Handling Chowder analysis request for {}", symbol);
    let as_of = Utc::now().date_naive();

    match market_data::compute_chowder_score(&client, &symbol, as_of).await {
        Ok(result) => {
            info!(
                "Chowder analysis for {} complete (valid: {})",
                symbol, result.is_valid
            );
            Ok(warp::reply::json(&result))
        }
        Err(err @ MarketDataError::SymbolNotSupported(_)) => {
            error!("Chowder analysis failed for {}: {}", symbol, err);
            Err(warp::reject::custom(ApiError::bad_request(err.to_string())))
        }
        Err(err @ MarketDataError::RateLimited) => {
            error!("Chowder analysis failed for {}: {}", symbol, err);
            Err(warp::reject::custom(ApiError::rate_limited(
                err.to_string(),
            )))
        }
        Err(err) => {
            error!("Chowder analysis failed for {}: {}", symbol, err);
            Err(warp::reject::custom(ApiError::upstream(err.to_string())))
        }
    }
}
