//! main.rs
#![forbid(unsafe_code)]

mod api;
mod configuration;
mod market_status;
mod utils;
mod web_server;

use common_lib::init::init;

use crate::web_server::WebServer;

/// main
fn main() {
    init(env!("CARGO_MANIFEST_DIR"));

    let tokio_runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("web_api")
        .enable_all()
        .build()
        .expect("Tokio runtime didn't start");

    tokio_runtime.block_on(async {
        if let Err(e) = WebServer::run().await {
            tracing::error!("[main] web server stopped: {:?}", &e);
            std::process::exit(1);
        }
    });
}
