//! # Errores del Servidor
//! src/error.rs
//!
//! Errores fatales de arranque. Los errores por conexión (framing y parsing)
//! viven junto a su módulo: `http::frame::FrameError` y
//! `http::request::ParseError`.

use thiserror::Error;

/// Errores que detienen el proceso
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuración inválida (ver `Config::validate`)
    #[error("invalid configuration: {0}")]
    Config(String),

    /// No se pudo hacer bind al puerto
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;
