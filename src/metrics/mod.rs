//! # Contadores del Servidor
//! src/metrics/mod.rs
//!
//! Contadores globales del proceso (requests, bytes recibidos, bytes
//! enviados). Se crean una vez en el arranque y se inyectan a cada worker.

pub mod counters;

pub use counters::{CountersSnapshot, ServerCounters};
