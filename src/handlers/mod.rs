//! # Handlers del Servidor
//!
//! Handlers enchufables que invoca el dispatcher:
//!
//! - **static_files**: `/static/...` transmite archivos bajo la raíz estática
//! - **stats**: `/stats` muestra los contadores del servidor
//! - **calc**: `/calc?a=N&b=M` suma dos enteros
//!
//! Cada handler es una función que recibe el contexto compartido y el resto
//! del path después del prefijo que hizo match, y retorna una Response.
//! Ninguno falla: los errores se resuelven en un documento alternativo.

pub mod calc;
pub mod static_files;
pub mod stats;

pub use calc::calc_handler;
pub use static_files::static_handler;
pub use stats::stats_handler;
