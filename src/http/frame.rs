//! # Framing de Requests
//! src/http/frame.rs
//!
//! Lee bytes del socket de forma incremental hasta detectar el fin de los
//! headers (`\r\n\r\n`). El buffer crece bajo demanda pero nunca supera la
//! capacidad configurada: llegar al límite sin terminador es un request
//! malformado, no una señal para seguir creciendo.
//!
//! ## Resultado
//!
//! ```text
//! Ok(bytes)                      -> Framed
//! Err(FrameError::ConnectionClosed) -> el peer cerró antes de completar
//! Err(FrameError::Overflow)      -> Malformed (buffer agotado)
//! Err(FrameError::Io)            -> Malformed (error o timeout de lectura)
//! ```
//!
//! Si los headers traen `Content-Length`, se sigue leyendo hasta completar
//! el body dentro de la misma capacidad. Sin ese header, el body es lo que
//! haya llegado junto con el terminador.

use std::io::{self, Read};
use thiserror::Error;

/// Fin del bloque de headers
pub const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Tamaño máximo de cada `read` individual
const READ_CHUNK: usize = 512;

/// Errores del framing
#[derive(Debug, Error)]
pub enum FrameError {
    /// El peer cerró la conexión antes de un request completo
    #[error("connection closed by peer before a full request")]
    ConnectionClosed,

    /// Se llenó el buffer sin completar el request
    #[error("request exceeds {limit} bytes")]
    Overflow { limit: usize },

    /// Error de lectura (incluye timeouts)
    #[error("read failed: {0}")]
    Io(#[from] io::Error),
}

impl FrameError {
    /// `Overflow` e `Io` cuentan como request malformado
    pub fn is_malformed(&self) -> bool {
        !matches!(self, FrameError::ConnectionClosed)
    }
}

/// Resultado terminal del framing: se consume una sola vez
pub type FrameResult = Result<Vec<u8>, FrameError>;

/// Lector incremental con capacidad fija
#[derive(Debug, Clone, Copy)]
pub struct FrameReader {
    capacity: usize,
}

impl FrameReader {
    /// Crea un lector que acepta hasta `capacity` bytes por request
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Lee un request completo desde `reader`
    ///
    /// # Ejemplo
    /// ```
    /// use webserver::http::FrameReader;
    ///
    /// let mut input: &[u8] = b"GET / HTTP/1.1\r\nHost: a\r\n\r\n";
    /// let frame = FrameReader::new(1024).read_frame(&mut input).unwrap();
    /// assert!(frame.ends_with(b"\r\n\r\n"));
    /// ```
    pub fn read_frame<R: Read>(&self, reader: &mut R) -> FrameResult {
        let mut buffer = Vec::with_capacity(self.capacity.min(READ_CHUNK));
        let mut chunk = [0u8; READ_CHUNK];

        // 1. Headers: solo se re-escanea la cola de la ventana anterior
        let mut scanned = 0;
        let head_end = loop {
            if buffer.len() >= self.capacity {
                return Err(FrameError::Overflow { limit: self.capacity });
            }

            self.fill(reader, &mut buffer, &mut chunk)?;

            if let Some(pos) = find_terminator(&buffer[scanned..]) {
                break scanned + pos + HEADER_TERMINATOR.len();
            }
            scanned = buffer.len().saturating_sub(HEADER_TERMINATOR.len() - 1);
        };

        // 2. Body declarado
        if let Some(length) = content_length(&buffer[..head_end]) {
            let total = head_end
                .checked_add(length)
                .filter(|total| *total <= self.capacity)
                .ok_or(FrameError::Overflow { limit: self.capacity })?;

            while buffer.len() < total {
                self.fill(reader, &mut buffer, &mut chunk)?;
            }
        }

        Ok(buffer)
    }

    /// Un `read` sin pasarse de la capacidad restante
    fn fill<R: Read>(
        &self,
        reader: &mut R,
        buffer: &mut Vec<u8>,
        chunk: &mut [u8],
    ) -> Result<usize, FrameError> {
        let room = (self.capacity - buffer.len()).min(chunk.len());

        loop {
            match reader.read(&mut chunk[..room]) {
                Ok(0) => return Err(FrameError::ConnectionClosed),
                Ok(n) => {
                    buffer.extend_from_slice(&chunk[..n]);
                    return Ok(n);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(FrameError::Io(e)),
            }
        }
    }
}

/// Posición del primer `\r\n\r\n` en `bytes`
pub fn find_terminator(bytes: &[u8]) -> Option<usize> {
    bytes
        .windows(HEADER_TERMINATOR.len())
        .position(|window| window == HEADER_TERMINATOR)
}

/// Busca `Content-Length` en el bloque de headers
///
/// Es la única inspección de headers que hace el servidor. Un valor que no
/// es un entero se ignora.
fn content_length(head: &[u8]) -> Option<usize> {
    let head = std::str::from_utf8(head).ok()?;

    head.split("\r\n")
        .skip(1)
        .take_while(|line| !line.is_empty())
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse().ok())
}
