//! Static file serving.
//!
//! [`ServeDir`] resolves request paths against a local directory and serves
//! whatever it finds. Directory requests fall through to `index.html`.
//! Anything that escapes the root (dot-dot segments, symlinks pointing
//! outside) is treated as a miss, never an error.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use http::{Method, StatusCode};
use tokio::fs;

use crate::handler::Handler;
use crate::request::Request;
use crate::response::Response;

/// Serves files from a directory, typically as a router fallback:
///
/// ```rust
/// # use wren::{Router, ServeDir};
/// let app = Router::new().fallback(ServeDir::new("public").into_handler());
/// ```
pub struct ServeDir {
    root: PathBuf,
}

impl ServeDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Turns the directory into a route handler.
    pub fn into_handler(self) -> impl Handler {
        let root = Arc::new(self.root);
        move |req: Request| {
            let root = Arc::clone(&root);
            async move { serve(&root, &req).await }
        }
    }
}

async fn serve(root: &Path, req: &Request) -> Response {
    if *req.method() != Method::GET && *req.method() != Method::HEAD {
        return Response::status(StatusCode::NOT_FOUND);
    }

    let rel = req.path().trim_start_matches('/');
    if rel.split('/').any(|seg| seg == "..") {
        return Response::status(StatusCode::NOT_FOUND);
    }

    let mut path = root.join(rel);
    if rel.is_empty() || path.is_dir() {
        path = path.join("index.html");
    }

    // Canonicalise and prefix-check so a symlink inside the root cannot
    // point the lookup outside it.
    let Ok(root_canonical) = root.canonicalize() else {
        return Response::status(StatusCode::NOT_FOUND);
    };
    let Ok(path_canonical) = path.canonicalize() else {
        return Response::status(StatusCode::NOT_FOUND);
    };
    if !path_canonical.starts_with(&root_canonical) {
        return Response::status(StatusCode::NOT_FOUND);
    }

    match fs::read(&path_canonical).await {
        Ok(content) => {
            let content_type =
                content_type_for(path_canonical.extension().and_then(|e| e.to_str()));
            let body = if *req.method() == Method::HEAD { Vec::new() } else { content };
            Response::builder().bytes(content_type, body)
        }
        Err(_) => Response::status(StatusCode::NOT_FOUND),
    }
}

/// Content type from a file extension; unknown extensions are served as
/// opaque bytes.
fn content_type_for(ext: Option<&str>) -> &'static str {
    match ext {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("js") => "text/javascript",
        Some("json") => "application/json",
        Some("txt") => "text/plain; charset=utf-8",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("ico") => "image/x-icon",
        Some("woff2") => "font/woff2",
        Some("pdf") => "application/pdf",
        Some("xml") => "application/xml",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The crate ships `public/index.html` for the demo; unit tests run with
    // the crate root as working directory, so it doubles as a fixture.
    const ROOT: &str = "public";

    fn get(path: &str) -> Request {
        Request::builder(Method::GET, path).build()
    }

    #[tokio::test]
    async fn serves_an_existing_file() {
        let res = serve(Path::new(ROOT), &get("/index.html")).await;
        assert_eq!(res.status_code(), StatusCode::OK);
        assert_eq!(res.header("content-type"), Some("text/html; charset=utf-8"));
        assert!(!res.body().is_empty());
    }

    #[tokio::test]
    async fn directory_request_falls_through_to_index() {
        let res = serve(Path::new(ROOT), &get("/")).await;
        assert_eq!(res.status_code(), StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_file_is_404() {
        let res = serve(Path::new(ROOT), &get("/no-such-file.css")).await;
        assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn dot_dot_segments_are_rejected() {
        let res = serve(Path::new(ROOT), &get("/../Cargo.toml")).await;
        assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn non_get_methods_are_a_miss() {
        let req = Request::builder(Method::POST, "/index.html").build();
        let res = serve(Path::new(ROOT), &req).await;
        assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn content_types_cover_the_common_extensions() {
        assert_eq!(content_type_for(Some("html")), "text/html; charset=utf-8");
        assert_eq!(content_type_for(Some("png")), "image/png");
        assert_eq!(content_type_for(Some("weird")), "application/octet-stream");
        assert_eq!(content_type_for(None), "application/octet-stream");
    }
}
