//! init.rs
//!
//! load .env and start logging; call once at the top of main

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// `env_dir` is normally `env!("CARGO_MANIFEST_DIR")` of the calling crate
pub fn init(env_dir: &str) {
    let env_path = format!("{}/.env", env_dir);
    // a missing .env is normal in docker; everything comes from the environment then
    let env_loaded = dotenvy::from_path(&env_path).is_ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // try_init so a second call (tests) doesn't panic
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    tracing::debug!("[init] .env at {} loaded: {}", &env_path, env_loaded);
}
