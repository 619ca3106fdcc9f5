//! # Construcción de Respuestas HTTP
//!
//! Este módulo proporciona una API para construir respuestas HTTP/1.1 y
//! escribirlas directamente al socket.
//!
//! ## Formato de una respuesta
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/html\r\n
//! Content-Length: 13\r\n
//! \r\n
//! Hello, World!
//! ```
//!
//! Los headers se emiten en el orden en que se agregaron, y `Content-Length`
//! solo aparece cuando se pide explícitamente: los documentos fijos del
//! servidor son byte-exactos y la mayoría no lo lleva.
//!
//! ## Ejemplo de uso
//!
//! ```
//! use webserver::http::{Response, StatusCode};
//!
//! let response = Response::new(StatusCode::Ok)
//!     .with_header("Content-Type", "text/html")
//!     .with_body("<h1>Hola</h1>");
//!
//! let mut socket = Vec::new();
//! let sent = response.write_to(&mut socket).unwrap();
//! assert_eq!(sent as usize, socket.len());
//! ```

use super::StatusCode;
use std::fs::File;
use std::io::{self, Write};

const HELLO_BODY: &str = "Hello, World!";
const BAD_REQUEST_BODY: &str = "<html><body><h1>Bad Request</h1></body></html>";
const NOT_FOUND_BODY: &str = "<html><body><h1>File Not Found</h1></body></html>";

/// Cuerpo de la respuesta
#[derive(Debug)]
pub enum Body {
    /// Bytes ya generados en memoria
    Bytes(Vec<u8>),

    /// Archivo abierto que se copia al socket por bloques
    File(File),
}

/// Representa una respuesta HTTP/1.1 completa
#[derive(Debug)]
pub struct Response {
    /// Código de estado HTTP (200, 400, 404)
    status: StatusCode,

    /// Headers HTTP en orden de inserción
    headers: Vec<(String, String)>,

    body: Body,
}

impl Response {
    /// Crea una nueva respuesta con el código de estado especificado
    ///
    /// Por defecto, la respuesta no tiene headers ni body.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Body::Bytes(Vec::new()),
        }
    }

    /// Agrega un header a la respuesta
    ///
    /// Si el header ya existe, se sobrescribe conservando su posición.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.add_header(name, value);
        self
    }

    /// Agrega un header a una respuesta existente (versión mutable)
    pub fn add_header(&mut self, name: &str, value: &str) {
        match self
            .headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.headers.push((name.to_string(), value.to_string())),
        }
    }

    /// Establece el cuerpo de la respuesta desde un string
    ///
    /// A diferencia de otros servidores, no agrega `Content-Length`;
    /// para eso está `with_content_length`.
    pub fn with_body(mut self, body: &str) -> Self {
        self.body = Body::Bytes(body.as_bytes().to_vec());
        self
    }

    /// Establece un archivo abierto como cuerpo
    pub fn with_file(mut self, file: File) -> Self {
        self.body = Body::File(file);
        self
    }

    /// Agrega `Content-Length` con el tamaño del body en memoria
    ///
    /// No tiene efecto si el body es un archivo.
    pub fn with_content_length(self) -> Self {
        match &self.body {
            Body::Bytes(bytes) => {
                let length = bytes.len().to_string();
                self.with_header("Content-Length", &length)
            }
            Body::File(_) => self,
        }
    }

    /// Documento HTML con status 200
    pub fn html(body: &str) -> Self {
        Self::new(StatusCode::Ok)
            .with_header("Content-Type", "text/html")
            .with_body(body)
    }

    /// Respuesta por defecto: `Hello, World!`
    ///
    /// # Ejemplo
    /// ```
    /// use webserver::http::Response;
    ///
    /// let bytes = Response::hello().to_bytes().unwrap();
    /// assert_eq!(
    ///     bytes,
    ///     b"HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 13\r\n\r\nHello, World!"
    /// );
    /// ```
    pub fn hello() -> Self {
        Self::html(HELLO_BODY).with_content_length()
    }

    /// Documento 400 para métodos distintos de GET y requests malformados
    pub fn bad_request() -> Self {
        Self::new(StatusCode::BadRequest)
            .with_header("Content-Type", "text/html")
            .with_body(BAD_REQUEST_BODY)
    }

    /// Documento 404 del handler de archivos estáticos
    pub fn not_found() -> Self {
        Self::new(StatusCode::NotFound)
            .with_header("Content-Type", "text/html")
            .with_body(NOT_FOUND_BODY)
    }

    /// Respuesta 200 que transmite un archivo como `application/octet-stream`
    pub fn file(file: File) -> Self {
        Self::new(StatusCode::Ok)
            .with_header("Content-Type", "application/octet-stream")
            .with_file(file)
    }

    /// Escribe la respuesta completa y retorna los bytes escritos
    ///
    /// Genera:
    /// - Status line: `HTTP/1.1 200 OK\r\n`
    /// - Headers: `Header-Name: Value\r\n`
    /// - Línea vacía: `\r\n`
    /// - Body: contenido binario (los archivos se copian por bloques)
    ///
    /// El total retornado es exactamente lo que se entregó al writer, y es
    /// lo que el worker suma a `bytes_sent`.
    pub fn write_to<W: Write>(self, writer: &mut W) -> io::Result<u64> {
        let mut head = format!("HTTP/1.1 {}\r\n", self.status);
        for (name, value) in &self.headers {
            head.push_str(name);
            head.push_str(": ");
            head.push_str(value);
            head.push_str("\r\n");
        }
        head.push_str("\r\n");

        writer.write_all(head.as_bytes())?;
        let mut written = head.len() as u64;

        match self.body {
            Body::Bytes(bytes) => {
                writer.write_all(&bytes)?;
                written += bytes.len() as u64;
            }
            Body::File(mut file) => {
                written += io::copy(&mut file, writer)?;
            }
        }

        writer.flush()?;
        Ok(written)
    }

    /// Serializa la respuesta a un `Vec<u8>`
    pub fn to_bytes(self) -> io::Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(buffer)
    }

    /// Obtiene el código de estado de la respuesta
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Obtiene un header por nombre (sin distinguir mayúsculas)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn body(&self) -> &Body {
        &self.body
    }
}

/// Writer que cuenta los bytes que aceptó el writer interno
///
/// Si una escritura falla a mitad de la respuesta, `written()` sigue
/// reportando lo que sí se entregó al socket.
#[derive(Debug)]
pub struct CountingWriter<W> {
    inner: W,
    written: u64,
}

impl<W: Write> CountingWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, written: 0 }
    }

    pub fn written(&self) -> u64 {
        self.written
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
