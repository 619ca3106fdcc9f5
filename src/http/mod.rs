//! # Módulo HTTP
//!
//! Este módulo implementa la parte del protocolo HTTP/1.1 que necesita el
//! servidor, sin librerías de alto nivel:
//!
//! - Framing incremental del request (detección de `\r\n\r\n`)
//! - Parsing de la request line y extracción del body
//! - Construcción de responses byte-exactas
//! - Códigos de estado
//!
//! Fuera de alcance: chunked transfer encoding, keep-alive, pipelining y
//! validación de headers.
//!
//! ### Formato de Request
//!
//! ```text
//! GET /calc?a=3&b=4 HTTP/1.1\r\n
//! Host: localhost\r\n
//! \r\n
//! ```

pub mod frame;     // Lectura incremental desde el socket
pub mod request;   // Parsing de HTTP requests
pub mod response;  // Construcción de HTTP responses
pub mod status;    // Códigos de estado HTTP

// Re-exportamos los tipos principales para facilitar su uso
pub use frame::{FrameError, FrameReader, FrameResult};
pub use request::{ParseError, Request};
pub use response::{Body, CountingWriter, Response};
pub use status::StatusCode;
