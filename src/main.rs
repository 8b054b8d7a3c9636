use anyhow::Result;
use axum::{
    extract::{Path, State},
    middleware,
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{compression::CompressionLayer, cors::CorsLayer};
use tracing::info;

mod auth;
mod cache;
mod cities;
mod comfort;
mod config;
mod error;
mod report;
mod weather;

use cache::TtlCache;
use config::Config;
use error::WeatherError;
use report::{ComfortReportResponse, ComfortService, ForecastView};
use weather::{FetchResult, OpenWeatherClient};

#[derive(Clone)]
pub struct AppState {
    service: Arc<ComfortService>,
    weather: Arc<OpenWeatherClient>,
    cache: Arc<TtlCache>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Arc::new(Config::load()?);

    // Shared cache, injected into both cache layers' writers
    let cache = Arc::new(TtlCache::new(Duration::from_secs(config.cache_ttl_seconds)));

    let weather = Arc::new(OpenWeatherClient::new(
        config.openweather_api_key.clone(),
        cache.clone(),
    )?);

    let service = Arc::new(ComfortService::new(
        weather.clone(),
        cache.clone(),
        cities::CITIES,
    ));

    let state = AppState {
        service,
        weather,
        cache,
    };

    // Aggregate endpoints sit behind the access gate
    let gated = Router::new()
        .route("/api/weather/comfort", get(comfort_report))
        .route("/api/weather/forecast/:city_id", get(forecast_view))
        .layer(middleware::from_fn_with_state(
            config.clone(),
            auth::require_auth,
        ));

    let app = Router::new()
        .route("/health", get(health))
        .route("/cities", get(list_cities))
        .route("/weather/:city_id", get(weather_by_city))
        .route("/debug/cache", get(cache_debug))
        .merge(gated)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::very_permissive())
        .with_state(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("🦀 Comfort ranking server starting on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn list_cities() -> Json<Vec<u32>> {
    Json(cities::city_ids())
}

async fn weather_by_city(
    Path(city_id): Path<u32>,
    State(state): State<AppState>,
) -> Result<Json<FetchResult>, WeatherError> {
    let fetched = state.weather.fetch_current(city_id).await?;
    Ok(Json(fetched))
}

async fn cache_debug(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "keys": state.cache.keys().await,
        "stats": state.cache.stats().await,
    }))
}

async fn comfort_report(
    State(state): State<AppState>,
) -> Result<Json<ComfortReportResponse>, WeatherError> {
    Ok(Json(state.service.comfort_report().await?))
}

async fn forecast_view(
    Path(city_id): Path<u32>,
    State(state): State<AppState>,
) -> Result<Json<ForecastView>, WeatherError> {
    Ok(Json(state.service.forecast_view(city_id).await?))
}
