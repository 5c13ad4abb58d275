use std::error::Error;

use axum::{
    body::Bytes,
    extract::{Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use clap::Parser;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;

use common::config::{BackendConfig, Config};

use crate::{
    model::{IdResponse, PointsResponse, Receipt, ReceiptId},
    service::ReceiptService,
};

pub const INVALID_RECEIPT_MESSAGE: &str = "The receipt is invalid.";
pub const RECEIPT_NOT_FOUND_MESSAGE: &str = "No receipt found for that ID.";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to config file
    #[arg(short, long, env = "RECEIPTS_CONFIG", default_value = "receipts/config/dev.yaml")]
    pub config: String,
}

pub fn initialize_executable() -> Result<Config, Box<dyn Error + Send + Sync>> {
    if let Ok(path) = dotenvy::dotenv() {
        println!("Loaded environment from {:?}", path);
    }

    let args = Args::parse();
    println!("Loading config from: {}", args.config);
    let config = Config::load_or_default(&args.config)?;
    println!("Loaded config: {:#?}", config);

    Ok(config)
}

/// `RUST_LOG` wins over the configured level when set.
pub fn initialize_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[derive(Clone)]
pub struct AppState {
    service: ReceiptService,
    metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(service: ReceiptService, metrics: Option<PrometheusHandle>) -> Self {
        Self { service, metrics }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/receipts/process", post(process_receipt))
        .route("/receipts/{id}", get(get_receipt))
        .route("/receipts/{id}/points", get(get_points))
        .route("/receipts/{id}/points/", get(get_points))
        .route("/health", get(health_check))
        .route("/metrics", get(render_metrics))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}

pub async fn run_backend(
    config: BackendConfig,
    service: ReceiptService,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let metrics = if config.metrics_enabled {
        Some(PrometheusBuilder::new().install_recorder()?)
    } else {
        None
    };
    let app = create_router(AppState::new(service, metrics));

    tracing::info!("Starting backend service at {}", config.server_address);
    let listener = tokio::net::TcpListener::bind(&config.server_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// The body is decoded as JSON whatever the `Content-Type` says.
pub async fn process_receipt(
    State(state): State<AppState>,
    body: Bytes,
) -> Response {
    let receipt = match serde_json::from_slice::<Receipt>(&body) {
        Ok(receipt) => receipt,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected undecodable receipt");
            return (StatusCode::BAD_REQUEST, INVALID_RECEIPT_MESSAGE).into_response();
        }
    };

    match state.service.ingest(receipt).await {
        Ok(id) => (StatusCode::OK, Json(IdResponse { id })).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to process receipt");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

pub async fn get_points(
    State(state): State<AppState>,
    Path(id): Path<ReceiptId>,
) -> Response {
    match state.service.get_points(&id).await {
        Ok(Some(points)) => (StatusCode::OK, Json(PointsResponse::from(points))).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, RECEIPT_NOT_FOUND_MESSAGE).into_response(),
        Err(e) => {
            tracing::error!(error = %e, receipt_id = %id, "Failed to look up receipt points");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

pub async fn get_receipt(
    State(state): State<AppState>,
    Path(id): Path<ReceiptId>,
) -> Response {
    match state.service.get_receipt(&id).await {
        Ok(Some(receipt)) => (StatusCode::OK, Json(receipt)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, RECEIPT_NOT_FOUND_MESSAGE).into_response(),
        Err(e) => {
            tracing::error!(error = %e, receipt_id = %id, "Failed to look up receipt");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK").into_response()
}

async fn render_metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
