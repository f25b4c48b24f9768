//! Middleware layer.
//!
//! Middleware intercepts requests on their way to a handler. A stage either
//! short-circuits by returning a [`Response`] itself, or calls
//! [`Next::run`] to hand the request to the rest of the chain:
//!
//! ```rust
//! use wren::{Next, Request, Response, Router, StatusCode};
//!
//! async fn require_token(req: Request, next: Next) -> Response {
//!     if req.header("x-token").is_none() {
//!         return Response::status(StatusCode::UNAUTHORIZED);
//!     }
//!     next.run(req).await
//! }
//!
//! # async fn handler(_: Request) -> Response { Response::text("") }
//! let app = Router::new().layer(require_token).get("/", handler);
//! ```
//!
//! Built-ins:
//! - [`trace`] — per-request log line with method, path, status, latency
//! - [`recover`] — converts a panic anywhere downstream into a 500

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures_util::FutureExt;
use http::StatusCode;
use tracing::{error, info};

use crate::handler::{BoxFuture, BoxedHandler, Handler};
use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// A request-processing stage.
///
/// You rarely implement this directly — any
/// `async fn(Request, Next) -> impl IntoResponse` qualifies through the
/// blanket impl.
pub trait Middleware: Send + Sync + 'static {
    fn handle(&self, req: Request, next: Next) -> BoxFuture;
}

pub(crate) type BoxedMiddleware = Arc<dyn Middleware>;

impl<F, Fut, R> Middleware for F
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn handle(&self, req: Request, next: Next) -> BoxFuture {
        let fut = self(req, next);
        Box::pin(async move { fut.await.into_response() })
    }
}

/// The remainder of the chain: the middleware not yet run, then the endpoint
/// handler. Consumed by [`Next::run`].
pub struct Next {
    // Innermost stage first; `run` pops from the back.
    pub(crate) chain: Vec<BoxedMiddleware>,
    pub(crate) endpoint: BoxedHandler,
}

impl Next {
    /// Runs the rest of the chain to completion.
    pub async fn run(mut self, req: Request) -> Response {
        match self.chain.pop() {
            Some(stage) => stage.handle(req, self).await,
            None => self.endpoint.call(req).await,
        }
    }
}

/// Attaches a single middleware stage to one handler, producing a new
/// handler. Useful for per-route middleware:
///
/// ```rust
/// # use wren::{middleware, Next, Request, Response, Router};
/// # async fn gate(req: Request, next: Next) -> Response { next.run(req).await }
/// # async fn home(_: Request) -> Response { Response::text("") }
/// let app = Router::new().get("/", middleware::wrap(gate, home));
/// ```
pub fn wrap(stage: impl Middleware, handler: impl Handler) -> impl Handler {
    let stage: BoxedMiddleware = Arc::new(stage);
    let endpoint = handler.into_boxed_handler();
    move |req: Request| {
        let stage = Arc::clone(&stage);
        let next = Next { chain: Vec::new(), endpoint: Arc::clone(&endpoint) };
        async move { stage.handle(req, next).await }
    }
}

/// Request logging middleware: one `info!` line per request with method,
/// path, status, and latency.
pub async fn trace(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.path().to_owned();
    let start = Instant::now();

    let res = next.run(req).await;

    info!(
        method = %method,
        path = %path,
        status = res.status_code().as_u16(),
        elapsed_us = start.elapsed().as_micros() as u64,
        "request"
    );
    res
}

/// Panic recovery middleware: a panic anywhere downstream becomes a plain
/// `500 Internal Server Error` and the server keeps running.
pub async fn recover(req: Request, next: Next) -> Response {
    match AssertUnwindSafe(next.run(req)).catch_unwind().await {
        Ok(res) => res,
        Err(panic) => {
            error!("handler panicked: {}", panic_message(&panic));
            Response::status(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("opaque panic payload")
}
