//! Tracing subscriber setup for embedding binaries.
//!
//! The library itself only emits `tracing` events; an embedder calls one of
//! these once at startup. Filtering comes from `RUST_LOG` with an `info`
//! default.

use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::EnvFilter;

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs a human-readable subscriber.
pub fn init_tracing() -> Result<(), TryInitError> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .finish()
        .try_init()
}

/// Installs a JSON-lines subscriber for log aggregation.
pub fn init_tracing_json() -> Result<(), TryInitError> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(env_filter())
        .finish()
        .try_init()
}
