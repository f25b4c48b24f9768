//! The demo application: endpoint wiring and handlers.
//!
//! Everything the server exposes lives here — JSON routes, the `/api`
//! group, template pages, the parameterized `/names/…` route, and the
//! static asset fallback. `main` only builds [`router`] and serves it.

use askama::Template;
use http::StatusCode;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::files::ServeDir;
use crate::middleware::{self, Next};
use crate::request::Request;
use crate::response::Response;
use crate::router::{Group, Router};

/// An access-control decision for one request.
pub type Policy = fn(&Request) -> bool;

/// The installed policy: everyone gets in. Swap in a real predicate via
/// [`access_check`] when the app grows actual access rules.
pub fn allow_all(_req: &Request) -> bool {
    true
}

/// Gate middleware: consults `policy` and either lets the request through
/// or answers `403` with a JSON refusal.
pub fn access_check(policy: Policy) -> impl middleware::Middleware {
    move |req: Request, next: Next| async move {
        if policy(&req) {
            next.run(req).await
        } else {
            Response::builder()
                .status(StatusCode::FORBIDDEN)
                .json(json!({"message": "You have been denied!"}).to_string())
        }
    }
}

/// Builds the full demo router.
pub fn router() -> Router {
    let api = Group::new("/api")
        .layer(access_check(allow_all))
        .get("/one", api_one)
        .get("/two", api_two);

    Router::new()
        .layer(middleware::trace)
        .layer(middleware::recover)
        .get("/", middleware::wrap(access_check(allow_all), index))
        .merge(api)
        .get("/template", show_template)
        .post("/template", submit_template)
        .get("/names/{name}/age/{age}", names)
        .fallback(ServeDir::new("public").into_handler())
}

async fn index(_req: Request) -> Response {
    Response::json(json!({"message": "Welcome to fiber in golang"}).to_string())
}

async fn api_one(_req: Request) -> Response {
    Response::json(json!({"message": "Hello form api one"}).to_string())
}

async fn api_two(_req: Request) -> Response {
    Response::json(json!({"message": "Hello form api two"}).to_string())
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    name: &'static str,
    message: Option<String>,
}

async fn show_template(_req: Request) -> Response {
    render(IndexTemplate { name: "John Doe", message: None })
}

#[derive(Deserialize)]
struct TemplateForm {
    #[serde(rename = "Message", alias = "message")]
    message: String,
}

async fn submit_template(req: Request) -> Response {
    let form: TemplateForm = match req.parse_body() {
        Ok(form) => form,
        // Parse failures go straight back to the caller.
        Err(e) => {
            return Response::builder()
                .status(StatusCode::BAD_REQUEST)
                .text(e.to_string());
        }
    };
    render(IndexTemplate { name: "John Snow", message: Some(form.message) })
}

async fn names(req: Request) -> Response {
    let name = req.param("name").unwrap_or_default();
    // Non-numeric ages silently become zero.
    let age: i64 = req.param("age").and_then(|a| a.parse().ok()).unwrap_or(0);

    Response::builder()
        .status(StatusCode::ACCEPTED)
        .json(json!({"status": "success", "name": name, "age": age}).to_string())
}

fn render(template: IndexTemplate) -> Response {
    match template.render() {
        Ok(html) => Response::html(html),
        Err(e) => {
            error!("template render failed: {e}");
            Response::status(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    fn deny_all(_req: &Request) -> bool {
        false
    }

    #[tokio::test]
    async fn deny_policy_answers_403_with_refusal() {
        let app = Router::new().get("/", middleware::wrap(access_check(deny_all), index));
        let res = app.dispatch(Request::builder(Method::GET, "/").build()).await;

        assert_eq!(res.status_code(), StatusCode::FORBIDDEN);
        let v: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(v["message"], "You have been denied!");
    }

    #[tokio::test]
    async fn allow_policy_is_a_pass_through() {
        let app = Router::new().get("/", middleware::wrap(access_check(allow_all), index));
        let res = app.dispatch(Request::builder(Method::GET, "/").build()).await;
        assert_eq!(res.status_code(), StatusCode::OK);
    }
}
