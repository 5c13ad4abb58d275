use std::error::Error;

use processing::executable_utils::{initialize_executable, initialize_tracing, run_backend};
use receipts::build_in_memory_service;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    println!("Starting backend...");
    let config = initialize_executable()?;
    initialize_tracing(&config.backend.log_level);
    tracing::info!("Starting {}", config.common.project_name);

    let service = build_in_memory_service();
    run_backend(config.backend, service).await
}
