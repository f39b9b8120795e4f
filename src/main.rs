mod config;
mod models;
mod server;
mod services;

use anyhow::Result;
use dotenv::dotenv;
use std::sync::Arc;

use config::Config;
use services::{CalorieEstimator, WatsonxService};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger
    env_logger::init();

    // Load environment variables
    dotenv().ok();

    log::info!("🚀 Starting calorie estimation service...");

    let config = Config::from_env()?;
    let bind_addr = config.bind_addr.clone();
    log::info!("✅ Configuration loaded, model: {}", config.model_id);

    let estimator = Arc::new(WatsonxService::new(config)) as Arc<dyn CalorieEstimator>;
    log::info!("✅ watsonx.ai client initialized");

    let app = server::create_router(estimator);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    log::info!("🌐 Listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
