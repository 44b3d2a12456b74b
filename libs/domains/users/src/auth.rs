//! Session-backed login state and the login gate.

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_helpers::{Session, remember_me_expiry};
use tracing::{debug, info};

use crate::error::{UserError, UserResult};
use crate::models::{SessionUser, User};

const SESSION_USER_KEY: &str = "user";

pub const LOGIN_PATH: &str = "/login/";

/// The logged-in user, if any
pub async fn current_user(session: &Session) -> UserResult<Option<SessionUser>> {
    session
        .get::<SessionUser>(SESSION_USER_KEY)
        .await
        .map_err(|e| UserError::Session(e.to_string()))
}

/// Move the session to the authenticated state.
///
/// The session id is rotated first. With `remember_me` the session survives
/// browser restarts for [`axum_helpers::REMEMBER_ME_TTL`] of inactivity.
pub async fn log_in(session: &Session, user: &User, remember_me: bool) -> UserResult<()> {
    session
        .cycle_id()
        .await
        .map_err(|e| UserError::Session(e.to_string()))?;
    session
        .insert(SESSION_USER_KEY, SessionUser::from(user))
        .await
        .map_err(|e| UserError::Session(e.to_string()))?;

    if remember_me {
        session.set_expiry(Some(remember_me_expiry()));
    }

    info!(user_id = %user.id, remember_me, "User logged in");
    Ok(())
}

/// Drop all session data and the session itself
pub async fn log_out(session: &Session) -> UserResult<()> {
    session
        .flush()
        .await
        .map_err(|e| UserError::Session(e.to_string()))
}

/// Accepts only same-site relative paths; anything else falls back to `/`.
pub fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.contains('\\')
                && !path.chars().any(char::is_control) =>
        {
            path
        }
        _ => "/",
    }
}

/// `/login/?next=<path>` for the given target
pub fn login_redirect(next: &str) -> Redirect {
    Redirect::to(&format!("{}?next={}", LOGIN_PATH, urlencoding::encode(next)))
}

/// Middleware that sends anonymous visitors to the login form.
///
/// Use with `axum::middleware::from_fn`; requires the session layer to be
/// installed outside of it.
pub async fn require_login(session: Session, request: Request, next: Next) -> Response {
    match current_user(&session).await {
        Ok(Some(_)) => next.run(request).await,
        Ok(None) => {
            let target = request
                .uri()
                .path_and_query()
                .map(|pq| pq.as_str())
                .unwrap_or("/");
            debug!(path = %target, "Anonymous request to gated route");
            login_redirect(target).into_response()
        }
        Err(e) => e.into_response(),
    }
}
