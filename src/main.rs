use dotenv::dotenv;
use log::info;
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use warp::Filter;

use chowder_backend::routes;
use chowder_backend::services::polygon::PolygonClient;

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();
    info!("Logger initialized. Starting the application...");

    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "3030".to_string())
        .parse()
        .expect("PORT must be a number");
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    info!("Will bind to: {}", addr);

    let client = Arc::new(PolygonClient::from_env().expect("Polygon client configuration failed"));

    // CORS for the frontend
    let cors = warp::cors()
        .allow_any_origin()
        .allow_header("content-type")
        .allow_methods(vec!["GET"]);

    let api = routes::routes(client).with(cors);
    info!("Routes configured successfully with CORS.");

    info!("Starting server on {}", addr);
    warp::serve(api).run(addr).await;
}
