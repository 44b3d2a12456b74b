use axum::{
    Form, Router,
    extract::{Query, State},
    middleware,
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use axum_helpers::{AppError, HtmlTemplates, Session};
use serde::Deserialize;
use std::sync::Arc;

use crate::auth::{self, require_login, safe_next};
use crate::error::{UserError, UserResult};
use crate::models::{LoginForm, RegisterForm};
use crate::repository::UserRepository;
use crate::service::UserService;
use crate::templates::{LOGIN_TEMPLATE, LoginPage, REGISTER_TEMPLATE, RegisterPage, auth_templates};

/// Application state for the auth pages
pub struct AuthState<R: UserRepository> {
    pub service: UserService<R>,
    pub templates: HtmlTemplates,
}

#[derive(Debug, Default, Deserialize)]
struct NextQuery {
    next: Option<String>,
}

/// Login, logout and registration pages.
///
/// The caller must install the session layer (`axum_helpers::create_session_layer`)
/// around the returned router.
pub fn router<R: UserRepository + 'static>(service: UserService<R>) -> UserResult<Router> {
    let templates =
        auth_templates().map_err(|e| UserError::Internal(format!("auth templates: {}", e)))?;
    let state = Arc::new(AuthState { service, templates });

    Ok(Router::new()
        .route("/login/", get(login_page).post(login))
        .route(
            "/logout/",
            get(logout).route_layer(middleware::from_fn(require_login)),
        )
        .route("/register/", get(register_page).post(register))
        .with_state(state))
}

fn render_login(
    templates: &HtmlTemplates,
    error: Option<&str>,
    next: &str,
    username: &str,
) -> Result<Response, AppError> {
    let page = LoginPage {
        error,
        next,
        username,
    };
    Ok(templates.render(LOGIN_TEMPLATE, &page)?.into_response())
}

async fn login_page<R: UserRepository>(
    State(state): State<Arc<AuthState<R>>>,
    session: Session,
    Query(query): Query<NextQuery>,
) -> Result<Response, AppError> {
    if auth::current_user(&session).await?.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    let next = query.next.as_deref().unwrap_or("");
    render_login(&state.templates, None, next, "")
}

/// `next` comes from the hidden form field, or from the query string when
/// the form was posted to `/login/?next=...`.
async fn login<R: UserRepository>(
    State(state): State<Arc<AuthState<R>>>,
    session: Session,
    Query(query): Query<NextQuery>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    if auth::current_user(&session).await?.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    let next = form
        .next
        .as_deref()
        .filter(|n| !n.is_empty())
        .or(query.next.as_deref())
        .unwrap_or("");

    match state
        .service
        .verify_credentials(&form.username, &form.password)
        .await
    {
        Ok(user) => {
            auth::log_in(&session, &user, form.remember_me()).await?;
            Ok(Redirect::to(safe_next(Some(next))).into_response())
        }
        Err(e @ UserError::InvalidCredentials) => {
            render_login(&state.templates, Some(&e.to_string()), next, &form.username)
        }
        Err(e) => Err(e.into()),
    }
}

async fn logout(session: Session) -> Result<Redirect, AppError> {
    auth::log_out(&session).await?;
    Ok(Redirect::to("/"))
}

async fn register_page<R: UserRepository>(
    State(state): State<Arc<AuthState<R>>>,
    session: Session,
) -> Result<Response, AppError> {
    if auth::current_user(&session).await?.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    let page = RegisterPage {
        errors: vec![],
        username: "",
    };
    Ok(state.templates.render(REGISTER_TEMPLATE, &page)?.into_response())
}

async fn register<R: UserRepository>(
    State(state): State<Arc<AuthState<R>>>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    if auth::current_user(&session).await?.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    let username = form.username.clone();

    let errors = match state.service.register(form).await {
        Ok(_) => return Ok(Redirect::to(auth::LOGIN_PATH).into_response()),
        Err(UserError::InvalidForm(messages)) => messages,
        Err(e @ UserError::DuplicateUsername(_)) => vec![e.to_string()],
        Err(e) => return Err(e.into()),
    };

    let page = RegisterPage {
        errors,
        username: &username,
    };
    Ok(state.templates.render(REGISTER_TEMPLATE, &page)?.into_response())
}
