use axum::{Router, middleware, response::Html, routing::get};
use core_config::Environment;
use domain_dashboard::Dashboard;
use domain_questions::{DataExplorer, QuestionRecord};
use domain_users::{UserRepository, UserService, require_login};
use std::sync::Arc;

pub const INDEX_HTML: &str = r#"Hi there, load data using <a href="/create-df">create-df</a>"#;

/// Everything the routes need, prepared once at startup
pub struct WebState<R: UserRepository> {
    pub users: UserService<R>,
    pub explorer: Arc<DataExplorer>,
    pub export: Arc<Vec<QuestionRecord>>,
    pub dashboard: Arc<Dashboard>,
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Public routes are the index and the auth forms; the explorer and the
/// dashboards sit behind the login gate. Sessions wrap the whole tree.
pub fn build_router<R: UserRepository + 'static>(
    state: WebState<R>,
    environment: &Environment,
) -> eyre::Result<Router> {
    let auth = domain_users::handlers::router(state.users)
        .map_err(|e| eyre::eyre!("Failed to build auth routes: {}", e))?;

    let explorer = domain_questions::handlers::router(state.explorer, state.export)
        .map_err(|e| eyre::eyre!("Failed to build explorer routes: {}", e))?;

    let gated = explorer
        .merge(domain_dashboard::handlers::router(state.dashboard))
        .route_layer(middleware::from_fn(require_login));

    Ok(Router::new()
        .route("/", get(index))
        .merge(auth)
        .merge(gated)
        .layer(axum_helpers::create_session_layer(environment)))
}
