use axum_helpers::server::{create_production_app, health_router, with_common_layers};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_embedding::{EmbeddingService, build_provider, handlers};
use tracing::info;

mod config;

use config::Config;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    // A missing .env file is not an error
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    // Model load failures are fatal
    let provider = build_provider(&config.embedding)
        .await
        .map_err(|e| eyre::eyre!("Failed to load embedding model: {}", e))?;
    let service = EmbeddingService::new(provider);

    let model = service.model_info();
    info!(
        model = %model.model_id,
        dimension = model.dimension,
        max_seq_length = model.max_seq_length,
        "Embedding model ready"
    );

    let app = with_common_layers(
        handlers::router(service).merge(health_router(config.app.clone())),
        &config.cors,
    );

    info!("Starting {} v{}", config.app.name, config.app.version);

    create_production_app(app, &config.server, async {
        info!("Embedding service holds no external connections");
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Embedding service shutdown complete");
    Ok(())
}
