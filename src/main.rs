//! Demo server entry point.
//!
//! Run with:
//!   RUST_LOG=info cargo run
//!
//! Try:
//!   curl http://localhost:4000/
//!   curl http://localhost:4000/api/one
//!   curl http://localhost:4000/names/alice/age/30
//!   curl http://localhost:4000/template
//!   curl -X POST http://localhost:4000/template \
//!        -H 'content-type: application/json' \
//!        -d '{"Message":"hi"}'
//!   curl http://localhost:4000/index.html

use tracing::error;
use wren::{app, Server};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    if let Err(e) = Server::bind("0.0.0.0:4000").serve(app::router()).await {
        error!("server error: {e}");
        std::process::exit(1);
    }
}
