// src/routes.rs
use log::info;
use std::convert::Infallible;
use std::sync::Arc;
use warp::{Filter, Rejection, Reply};

use crate::handlers::error::ApiError;
use crate::handlers::{chowder::get_chowder_analysis, health::get_health};
use crate::services::polygon::PolygonClient;

// Recovery handling for our custom errors
async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let code;
    let message;

    if err.is_not_found() {
        code = warp::http::StatusCode::NOT_FOUND;
        message = "Not Found".to_string();
    } else if let Some(api_error) = err.find::<ApiError>() {
        code = api_error.status;
        message = api_error.message.clone();
    } else {
        code = warp::http::StatusCode::INTERNAL_SERVER_ERROR;
        message = "Internal Server Error".to_string();
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "error": message,
        })),
        code,
    ))
}

pub fn routes(
    client: Arc<PolygonClient>,
) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    info!("Configuring routes...");

    let client_filter = warp::any().map(move || client.clone());

    let chowder_route = warp::path!("api" / "market" / "chowder" / String)
        .and(warp::get())
        .and(client_filter.clone())
        .and_then(get_chowder_analysis);

    let health_route = warp::path!("api" / "health")
        .and(warp::get())
        .and_then(get_health);

    info!("All routes configured successfully.");

    chowder_route.or(health_route).recover(handle_rejection)
}
