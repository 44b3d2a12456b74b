use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr};
use tracing::info;

use super::PostgresConfig;

/// Open the process-wide connection pool.
pub async fn connect_from_config(config: PostgresConfig) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(config.into_connect_options()).await?;
    info!("Successfully connected to PostgreSQL database");
    Ok(db)
}

/// Make sure the pgvector extension is installed. Idempotent.
pub async fn ensure_vector_extension<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    db.execute_unprepared("CREATE EXTENSION IF NOT EXISTS vector")
        .await?;
    info!("pgvector extension available");
    Ok(())
}
