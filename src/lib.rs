//! # wren
//!
//! A small async HTTP toolkit and the demo server built on it.
//!
//! The library half covers the pieces every little web app needs:
//!
//! - Radix-tree routing — O(path-length) lookup via [`matchit`], with
//!   `{name}` path parameters and prefix [`Group`]s
//! - A composable [`middleware`] chain; each stage may short-circuit with a
//!   response or hand the request to [`middleware::Next`]
//! - Built-in request tracing and panic recovery middleware
//! - Static file serving via [`ServeDir`]
//! - Graceful shutdown — SIGTERM / Ctrl-C, drains in-flight requests
//!
//! The binary half ([`app`] + `main.rs`) wires those pieces into the demo
//! endpoints: JSON routes, a route group, templated pages, parameterized
//! paths, and a static asset fallback.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use wren::{middleware, Request, Response, Router, Server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let app = Router::new()
//!         .layer(middleware::trace)
//!         .layer(middleware::recover)
//!         .get("/greet/{name}", greet);
//!
//!     Server::bind("0.0.0.0:4000").serve(app).await.unwrap();
//! }
//!
//! async fn greet(req: Request) -> Response {
//!     let name = req.param("name").unwrap_or("stranger");
//!     Response::text(format!("hello, {name}"))
//! }
//! ```

pub mod app;
mod error;
mod files;
mod handler;
pub mod middleware;
mod request;
mod response;
mod router;
mod server;

pub use error::Error;
pub use files::ServeDir;
pub use handler::Handler;
pub use http::{Method, StatusCode};
pub use middleware::{Middleware, Next};
pub use request::{BodyError, Request, RequestBuilder};
pub use response::{IntoResponse, Response, ResponseBuilder};
pub use router::{Group, Router};
pub use server::Server;
