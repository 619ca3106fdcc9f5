//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! Este módulo implementa el servidor TCP que:
//! 1. Escucha en un puerto
//! 2. Acepta conexiones entrantes (con un límite de conexiones vivas)
//! 3. Lanza un worker por conexión
//! 4. El worker enmarca, parsea, despacha, responde y cierra

pub mod limiter;
pub mod tcp;
pub mod worker;

// Re-exportar para facilitar el uso
pub use limiter::{ConnectionLimiter, Permit};
pub use tcp::Server;
pub use worker::{ConnectionWorker, Outcome};
