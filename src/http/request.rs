//! # Parsing de Requests HTTP/1.1
//! src/http/request.rs
//!
//! Extrae método, path, versión y body de un request ya enmarcado por
//! `FrameReader`. Los headers no se interpretan.
//!
//! ## Gramática
//!
//! ```text
//! METHOD SP PATH SP VERSION CRLF
//! *(header CRLF)
//! CRLF
//! [BODY]
//! ```
//!
//! 1. **Method**: hasta el primer espacio de la request line
//! 2. **Path**: hasta el siguiente espacio (incluye `?query` si existe)
//! 3. **Version**: el resto de la línea, hasta `\r\n`
//! 4. **Body**: todo lo que sigue al primer `\r\n\r\n`
//!
//! El body no se recorta con `Content-Length`: son exactamente los bytes
//! restantes del frame. Un `\r\n\r\n` dentro del body queda como parte de él.

use super::frame::{find_terminator, HEADER_TERMINATOR};
use thiserror::Error;

/// Representa un request parseado
///
/// Todos los campos son copias independientes del buffer original.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Método HTTP tal cual llegó (ej: "GET")
    method: String,

    /// Path con query incluida (ej: "/calc?a=3&b=4")
    path: String,

    /// Versión HTTP (ej: "HTTP/1.1"), no se valida
    version: String,

    /// `None` si no hay bytes después del terminador
    body: Option<Vec<u8>>,
}

/// Errores que pueden ocurrir durante el parsing
///
/// Todos equivalen a un request malformado.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// No hay espacio después del método, o el método está vacío
    #[error("missing method in request line")]
    MissingMethod,

    /// No hay espacio después del path, o el path está vacío
    #[error("missing path in request line")]
    MissingPath,

    /// La request line no termina en `\r\n`, o la versión está vacía
    #[error("missing HTTP version in request line")]
    MissingVersion,

    /// La request line no es UTF-8 válido
    #[error("request line is not valid UTF-8")]
    InvalidEncoding,
}

impl Request {
    /// Parsea un request desde los bytes enmarcados
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use webserver::http::Request;
    ///
    /// let raw = b"GET /calc?a=3&b=4 HTTP/1.1\r\nHost: x\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.method(), "GET");
    /// assert_eq!(request.path(), "/calc?a=3&b=4");
    /// assert_eq!(request.version(), "HTTP/1.1");
    /// assert_eq!(request.body(), None);
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self, ParseError> {
        let line_end = buffer.windows(2).position(|w| w == b"\r\n");
        let line = &buffer[..line_end.unwrap_or(buffer.len())];
        let line = std::str::from_utf8(line).map_err(|_| ParseError::InvalidEncoding)?;

        // 1. Method
        let (method, rest) = line
            .split_once(' ')
            .filter(|(method, _)| !method.is_empty())
            .ok_or(ParseError::MissingMethod)?;

        // 2. Path
        let (path, version) = rest
            .split_once(' ')
            .filter(|(path, _)| !path.is_empty())
            .ok_or(ParseError::MissingPath)?;

        // 3. Version
        let line_end = line_end.ok_or(ParseError::MissingVersion)?;
        if version.is_empty() {
            return Err(ParseError::MissingVersion);
        }

        // 4. Body: la búsqueda arranca en el CRLF de la request line, así
        //    un request sin headers también encuentra su terminador
        let body = find_terminator(&buffer[line_end..])
            .map(|pos| &buffer[line_end + pos + HEADER_TERMINATOR.len()..])
            .filter(|body| !body.is_empty())
            .map(<[u8]>::to_vec);

        Ok(Request {
            method: method.to_string(),
            path: path.to_string(),
            version: version.to_string(),
            body,
        })
    }

    // === Métodos públicos para acceder a los campos ===

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn is_get(&self) -> bool {
        self.method == "GET"
    }

    /// Path crudo, con la query si la hay
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// Largo del body (0 si no hay)
    pub fn body_len(&self) -> usize {
        self.body.as_ref().map_or(0, Vec::len)
    }
}
