//! Radix-tree request router.
//!
//! One tree per HTTP method, O(path-length) lookup. On top of the trees sit
//! the pieces the demo app needs: an ordered global middleware chain
//! ([`Router::layer`]), prefix groups with their own chain ([`Group`]), and
//! a fallback handler for unmatched paths ([`Router::fallback`], used for
//! static files).

use std::collections::HashMap;
use std::sync::Arc;

use http::{Method, StatusCode};
use matchit::Router as MatchitRouter;

use crate::handler::{BoxedHandler, Handler};
use crate::middleware::{BoxedMiddleware, Middleware, Next};
use crate::request::Request;
use crate::response::Response;

/// The application router.
///
/// Build it once at startup; registration methods consume and return `self`
/// so calls chain naturally. Path parameters use `{name}` syntax —
/// `req.param("name")` retrieves them.
///
/// ```rust
/// # use wren::{Request, Response, Router};
/// # async fn home(_: Request) -> Response { Response::text("") }
/// # async fn get_user(_: Request) -> Response { Response::text("") }
/// let app = Router::new()
///     .get("/", home)
///     .get("/users/{id}", get_user);
/// ```
pub struct Router {
    routes: HashMap<Method, MatchitRouter<Endpoint>>,
    layers: Vec<BoxedMiddleware>,
    fallback: Option<BoxedHandler>,
}

/// A registered route: the handler plus any route- or group-level middleware.
#[derive(Clone)]
struct Endpoint {
    handler: BoxedHandler,
    layers: Vec<BoxedMiddleware>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new(), layers: Vec::new(), fallback: None }
    }

    /// Appends a global middleware stage. Stages run in registration order
    /// around every route, the fallback included.
    pub fn layer(mut self, stage: impl Middleware) -> Self {
        self.layers.push(Arc::new(stage));
        self
    }

    /// Registers a handler for a method + path pair.
    pub fn on(self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.add(method, path, Endpoint {
            handler: handler.into_boxed_handler(),
            layers: Vec::new(),
        })
    }

    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::GET, path, handler)
    }

    pub fn post(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::POST, path, handler)
    }

    /// Registers every route of `group`, prefixed with the group's path and
    /// wrapped in the group's middleware chain.
    pub fn merge(mut self, group: Group) -> Self {
        let prefix = group.prefix.trim_end_matches('/').to_owned();
        for (method, path, handler) in group.routes {
            let full = format!("{prefix}{path}");
            self = self.add(method, &full, Endpoint {
                handler,
                layers: group.layers.clone(),
            });
        }
        self
    }

    /// Sets the handler for requests no route matches. Without one, misses
    /// get a bare 404.
    pub fn fallback(mut self, handler: impl Handler) -> Self {
        self.fallback = Some(handler.into_boxed_handler());
        self
    }

    fn add(mut self, method: Method, path: &str, endpoint: Endpoint) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, endpoint)
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    /// Routes one request through the middleware chain to its handler and
    /// produces the response.
    ///
    /// Public so tests (and other embeddings) can drive a router without a
    /// listener.
    pub async fn dispatch(&self, mut req: Request) -> Response {
        let endpoint = match self.lookup(&mut req) {
            Some(endpoint) => endpoint,
            None => Endpoint {
                handler: self
                    .fallback
                    .clone()
                    .unwrap_or_else(|| not_found.into_boxed_handler()),
                layers: Vec::new(),
            },
        };

        // Global stages run first, then the route's own. `Next::run` pops
        // from the back, so the chain is stored innermost-first.
        let mut chain: Vec<BoxedMiddleware> = self
            .layers
            .iter()
            .chain(endpoint.layers.iter())
            .cloned()
            .collect();
        chain.reverse();

        Next { chain, endpoint: endpoint.handler }.run(req).await
    }

    fn lookup(&self, req: &mut Request) -> Option<Endpoint> {
        let tree = self.routes.get(req.method())?;
        let matched = tree.at(req.path()).ok()?;
        let endpoint = matched.value.clone();
        let params = matched
            .params
            .iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        req.set_params(params);
        Some(endpoint)
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

async fn not_found(_req: Request) -> Response {
    Response::status(StatusCode::NOT_FOUND)
}

/// A set of routes sharing a path prefix and a middleware chain.
///
/// ```rust
/// # use wren::{Group, Request, Response, Router};
/// # async fn one(_: Request) -> Response { Response::text("") }
/// # async fn two(_: Request) -> Response { Response::text("") }
/// let api = Group::new("/api").get("/one", one).get("/two", two);
/// let app = Router::new().merge(api);
/// ```
pub struct Group {
    prefix: String,
    layers: Vec<BoxedMiddleware>,
    routes: Vec<(Method, String, BoxedHandler)>,
}

impl Group {
    pub fn new(prefix: &str) -> Self {
        Self { prefix: prefix.to_owned(), layers: Vec::new(), routes: Vec::new() }
    }

    /// Appends a middleware stage shared by every route in the group.
    pub fn layer(mut self, stage: impl Middleware) -> Self {
        self.layers.push(Arc::new(stage));
        self
    }

    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes.push((method, path.to_owned(), handler.into_boxed_handler()));
        self
    }

    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::GET, path, handler)
    }

    pub fn post(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::POST, path, handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    async fn hello(_req: Request) -> Response {
        Response::text("hello")
    }

    #[tokio::test]
    async fn matches_path_params() {
        let app = Router::new().get("/users/{id}", |req: Request| async move {
            Response::text(req.param("id").unwrap_or("none").to_owned())
        });
        let res = app.dispatch(Request::builder(Method::GET, "/users/42").build()).await;
        assert_eq!(res.body(), b"42");
    }

    #[tokio::test]
    async fn unmatched_path_is_404_without_fallback() {
        let app = Router::new().get("/", hello);
        let res = app.dispatch(Request::builder(Method::GET, "/nope").build()).await;
        assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn fallback_catches_unmatched_paths() {
        let app = Router::new().get("/", hello).fallback(|req: Request| async move {
            Response::text(format!("fell back: {}", req.path()))
        });
        let res = app.dispatch(Request::builder(Method::GET, "/anything").build()).await;
        assert_eq!(res.body(), b"fell back: /anything");
    }

    #[tokio::test]
    async fn group_routes_get_the_prefix_and_layers() {
        let hits = Arc::new(Mutex::new(0));
        let counted = Arc::clone(&hits);
        let count = move |req: Request, next: Next| {
            let counted = Arc::clone(&counted);
            async move {
                *counted.lock().unwrap() += 1;
                next.run(req).await
            }
        };

        let api = Group::new("/api").layer(count).get("/one", hello);
        let app = Router::new().merge(api);

        let res = app.dispatch(Request::builder(Method::GET, "/api/one").build()).await;
        assert_eq!(res.body(), b"hello");
        assert_eq!(*hits.lock().unwrap(), 1);

        // The group's middleware does not leak onto other routes.
        let app = app.get("/plain", hello);
        app.dispatch(Request::builder(Method::GET, "/plain").build()).await;
        assert_eq!(*hits.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn global_layers_run_in_registration_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let tag = |label: &'static str, log: Arc<Mutex<Vec<&'static str>>>| {
            move |req: Request, next: Next| {
                let log = Arc::clone(&log);
                async move {
                    log.lock().unwrap().push(label);
                    next.run(req).await
                }
            }
        };

        let app = Router::new()
            .layer(tag("outer", Arc::clone(&order)))
            .layer(tag("inner", Arc::clone(&order)))
            .get("/", hello);

        app.dispatch(Request::builder(Method::GET, "/").build()).await;
        assert_eq!(*order.lock().unwrap(), vec!["outer", "inner"]);
    }

    #[tokio::test]
    async fn wrong_method_is_a_miss() {
        let app = Router::new().get("/", hello);
        let res = app.dispatch(Request::builder(Method::POST, "/").build()).await;
        assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
    }
}
