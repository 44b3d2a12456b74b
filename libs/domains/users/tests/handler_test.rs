//! Handler tests for the login flow
//!
//! The auth router runs behind the real session layer with an in-memory
//! repository; cookies are carried between requests by hand.

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::{Router, middleware, routing::get};
use axum_helpers::create_session_layer;
use core_config::Environment;
use domain_users::*;
use http_body_util::BodyExt;
use tower::ServiceExt; // For oneshot()

fn app() -> Router {
    let service = UserService::new(InMemoryUserRepository::new());
    let gated = Router::new()
        .route("/create-df", get(|| async { "exported" }))
        .route_layer(middleware::from_fn(require_login));

    handlers::router(service)
        .unwrap()
        .merge(gated)
        .layer(create_session_layer(&Environment::Development))
}

fn form_post(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_req(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn session_cookie(response: &axum::response::Response) -> String {
    response.headers()[header::SET_COOKIE]
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

fn location(response: &axum::response::Response) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}

async fn text_body(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn register_alice(app: &Router) {
    let response = app
        .clone()
        .oneshot(form_post(
            "/register/",
            "username=alice&password=correct-horse&password2=correct-horse",
            None,
        ))
        .await
        .unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/login/");
}

#[tokio::test]
async fn test_anonymous_request_redirects_to_login() {
    let response = app().oneshot(get_req("/create-df", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login/?next=%2Fcreate-df");
}

#[tokio::test]
async fn test_login_then_reach_gated_route() {
    let app = app();
    register_alice(&app).await;

    let response = app
        .clone()
        .oneshot(form_post(
            "/login/",
            "username=alice&password=correct-horse&next=%2Fcreate-df",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/create-df");
    let cookie = session_cookie(&response);

    let response = app
        .clone()
        .oneshot(get_req("/create-df", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(text_body(response).await, "exported");
}

#[tokio::test]
async fn test_bad_credentials_rerender_form() {
    let app = app();
    register_alice(&app).await;

    let response = app
        .clone()
        .oneshot(form_post("/login/", "username=alice&password=nope", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    assert!(text_body(response).await.contains("Invalid username or password"));
}

#[tokio::test]
async fn test_offsite_next_is_ignored() {
    let app = app();
    register_alice(&app).await;

    let response = app
        .oneshot(form_post(
            "/login/",
            "username=alice&password=correct-horse&next=https%3A%2F%2Fevil.example",
            None,
        ))
        .await
        .unwrap();

    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn test_logout_returns_to_anonymous() {
    let app = app();
    register_alice(&app).await;

    let login = app
        .clone()
        .oneshot(form_post(
            "/login/",
            "username=alice&password=correct-horse",
            None,
        ))
        .await
        .unwrap();
    let cookie = session_cookie(&login);

    let response = app
        .clone()
        .oneshot(get_req("/logout/", Some(&cookie)))
        .await
        .unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/");

    let response = app
        .oneshot(get_req("/create-df", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_remember_me_sets_persistent_cookie() {
    let app = app();
    register_alice(&app).await;

    let response = app
        .oneshot(form_post(
            "/login/",
            "username=alice&password=correct-horse&remember_me=on",
            None,
        ))
        .await
        .unwrap();

    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(set_cookie.contains("Max-Age"));
}

#[tokio::test]
async fn test_register_errors_are_inline() {
    let app = app();
    register_alice(&app).await;

    let response = app
        .clone()
        .oneshot(form_post(
            "/register/",
            "username=ALICE&password=correct-horse&password2=correct-horse",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(text_body(response).await.contains("already exists"));

    let response = app
        .oneshot(form_post(
            "/register/",
            "username=bob&password=correct-horse&password2=other-horse",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(text_body(response).await.contains("didn&#x27;t match"));
}

#[tokio::test]
async fn test_login_page_redirects_when_authenticated() {
    let app = app();
    register_alice(&app).await;

    let login = app
        .clone()
        .oneshot(form_post(
            "/login/",
            "username=alice&password=correct-horse",
            None,
        ))
        .await
        .unwrap();
    let cookie = session_cookie(&login);

    let response = app
        .oneshot(get_req("/login/", Some(&cookie)))
        .await
        .unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn test_next_from_query_string() {
    let app = app();
    register_alice(&app).await;

    let response = app
        .oneshot(form_post(
            "/login/?next=%2Fcreate-df",
            "username=alice&password=correct-horse",
            None,
        ))
        .await
        .unwrap();

    assert_eq!(location(&response), "/create-df");
}
