//! End-to-end tests for the demo routes, driven through `Router::dispatch`
//! with synthetic requests.

use http::{Method, StatusCode};
use serde_json::Value;
use wren::{app, middleware, Request, Response, Router};

async fn get(path: &str) -> Response {
    app::router()
        .dispatch(Request::builder(Method::GET, path).build())
        .await
}

fn json_body(res: &Response) -> Value {
    serde_json::from_slice(res.body()).expect("response body is not JSON")
}

#[tokio::test]
async fn root_returns_welcome_json() {
    let res = get("/").await;
    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(res.header("content-type"), Some("application/json"));
    assert_eq!(json_body(&res)["message"], "Welcome to fiber in golang");
}

#[tokio::test]
async fn api_group_routes_answer() {
    let res = get("/api/one").await;
    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(json_body(&res)["message"], "Hello form api one");

    let res = get("/api/two").await;
    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(json_body(&res)["message"], "Hello form api two");
}

#[tokio::test]
async fn names_route_extracts_params() {
    let res = get("/names/alice/age/30").await;
    assert_eq!(res.status_code(), StatusCode::ACCEPTED);

    let body = json_body(&res);
    assert_eq!(body["status"], "success");
    assert_eq!(body["name"], "alice");
    assert_eq!(body["age"], 30);
}

#[tokio::test]
async fn non_numeric_age_defaults_to_zero() {
    let res = get("/names/alice/age/not-a-number").await;
    assert_eq!(res.status_code(), StatusCode::ACCEPTED);
    assert_eq!(json_body(&res)["age"], 0);
}

#[tokio::test]
async fn template_page_renders_john_doe() {
    let res = get("/template").await;
    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(res.header("content-type"), Some("text/html; charset=utf-8"));

    let html = String::from_utf8(res.body().to_vec()).unwrap();
    assert!(html.contains("John Doe"));
}

#[tokio::test]
async fn template_post_renders_the_message() {
    let req = Request::builder(Method::POST, "/template")
        .header("content-type", "application/json")
        .body(r#"{"Message":"hi"}"#)
        .build();
    let res = app::router().dispatch(req).await;
    assert_eq!(res.status_code(), StatusCode::OK);

    let html = String::from_utf8(res.body().to_vec()).unwrap();
    assert!(html.contains("John Snow"));
    assert!(html.contains("hi"));
}

#[tokio::test]
async fn template_post_accepts_form_bodies() {
    let req = Request::builder(Method::POST, "/template")
        .header("content-type", "application/x-www-form-urlencoded")
        .body("Message=from+a+form")
        .build();
    let res = app::router().dispatch(req).await;
    assert_eq!(res.status_code(), StatusCode::OK);

    let html = String::from_utf8(res.body().to_vec()).unwrap();
    assert!(html.contains("from a form"));
}

#[tokio::test]
async fn unparseable_template_body_is_surfaced() {
    let req = Request::builder(Method::POST, "/template")
        .header("content-type", "application/json")
        .body("{definitely not json")
        .build();
    let res = app::router().dispatch(req).await;

    assert!(!res.status_code().is_success());
    let text = String::from_utf8(res.body().to_vec()).unwrap();
    assert!(text.contains("invalid request body"));
}

#[tokio::test]
async fn static_assets_come_from_the_public_dir() {
    let res = get("/index.html").await;
    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(res.header("content-type"), Some("text/html; charset=utf-8"));
    assert_eq!(res.body(), std::fs::read("public/index.html").unwrap().as_slice());
}

#[tokio::test]
async fn unknown_paths_miss_with_404() {
    let res = get("/definitely/not/registered").await;
    assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn panicking_handler_yields_500_and_the_server_lives_on() {
    async fn boom(_req: Request) -> Response {
        panic!("deliberate test panic");
    }
    async fn fine(_req: Request) -> Response {
        Response::text("still here")
    }

    let app = Router::new()
        .layer(middleware::recover)
        .get("/boom", boom)
        .get("/fine", fine);

    let res = app.dispatch(Request::builder(Method::GET, "/boom").build()).await;
    assert_eq!(res.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

    // The panic was contained; unrelated requests keep working.
    let res = app.dispatch(Request::builder(Method::GET, "/fine").build()).await;
    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(res.body(), b"still here");
}
