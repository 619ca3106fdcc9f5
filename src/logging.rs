//! # Logging
//! src/logging.rs
//!
//! Inicializa `tracing` con un filtro tomado de `RUST_LOG`
//! (por defecto `info`).

use tracing_subscriber::EnvFilter;

/// Instala el subscriber global. Llamar una sola vez desde `main`.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_thread_names(true)
        .init();
}
