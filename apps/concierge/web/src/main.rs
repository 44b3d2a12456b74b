use axum_helpers::server::{create_production_app, health_router, with_common_layers};
use concierge_web::{Config, WebState, build_router, ready::ready_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::postgres::{connect_from_config, ensure_vector_extension};
use domain_dashboard::Dashboard;
use domain_questions::{DataExplorer, PgQuestionRepository, QuestionRepository};
use domain_users::{PgUserRepository, UserService};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    // No retry: the process cannot serve anything without the database
    let db = connect_from_config(config.database.clone())
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;
    ensure_vector_extension(&db).await?;

    let users = PgUserRepository::new(db.clone());
    users.ensure_schema().await?;

    let export = PgQuestionRepository::new(db.clone())
        .export_all()
        .await
        .map_err(|e| eyre::eyre!("Question export failed: {}", e))?;
    info!(rows = export.len(), "Exported questions");

    let dashboard = Dashboard::build(&db, &config.dashboard)
        .await
        .map_err(|e| eyre::eyre!("Dashboard build failed: {}", e))?;

    let state = WebState {
        users: UserService::new(users),
        explorer: Arc::new(DataExplorer::default()),
        export: Arc::new(export),
        dashboard: Arc::new(dashboard),
    };

    let app = with_common_layers(
        build_router(state, &config.environment)?
            .merge(health_router(config.app.clone()))
            .merge(ready_router(db.clone())),
        &config.cors,
    );

    info!("Starting {} v{}", config.app.name, config.app.version);

    create_production_app(app, &config.server, async move {
        info!("Shutting down: closing database connection");
        match db.close().await {
            Ok(_) => info!("PostgreSQL connection closed successfully"),
            Err(e) => tracing::error!("Error closing PostgreSQL: {}", e),
        }
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Web front end shutdown complete");
    Ok(())
}
