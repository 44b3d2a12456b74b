use axum_helpers::CorsPolicy;
use core_config::{AppInfo, Environment, FromEnv, app_info, server::ServerConfig};
use database::postgres::PostgresConfig;
use domain_dashboard::DashboardConfig;

/// Web front end configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub database: PostgresConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    pub dashboard: DashboardConfig,
    pub cors: CorsPolicy,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        Ok(Self {
            app: app_info!(),
            database: PostgresConfig::from_env()?, // Required - will fail if not set
            server: ServerConfig::from_env()?,
            environment: Environment::from_env(),
            dashboard: DashboardConfig::from_env()?,
            cors: CorsPolicy::from_env()?,
        })
    }
}
