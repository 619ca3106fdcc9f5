//! # Webserver
//! src/lib.rs
//!
//! Servidor HTTP/1.1 minimalista: acepta conexiones TCP, lee bytes hasta
//! enmarcar un request completo, parsea la request line y el body, despacha
//! por prefijo de path y escribe una respuesta HTTP cruda.
//!
//! ## Arquitectura
//!
//! ```text
//! Listener → ConnectionWorker → FrameReader → Request::parse → Dispatcher → socket
//! ```
//!
//! - `http`: framing, parsing y construcción de respuestas
//! - `router`: dispatcher y reglas de ruteo
//! - `handlers`: archivos estáticos, estadísticas y calculadora
//! - `metrics`: contadores atómicos del proceso
//! - `server`: accept loop, límite de conexiones y worker por conexión
//! - `config`: línea de comandos (`-p <port>`) y parámetros por defecto
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use webserver::config::Config;
//! use webserver::server::Server;
//!
//! let config = Config { port: 8080, ..Config::default() };
//! let server = Server::bind(config).expect("bind");
//! server.run().expect("accept loop");
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod http;
pub mod logging;
pub mod metrics;
pub mod router;
pub mod server;

pub use error::{Result, ServerError};
