//! # Configuración del Servidor
//! src/config.rs
//!
//! La única superficie de línea de comandos es el puerto. El resto de los
//! parámetros (capacidad del buffer, timeouts, límite de conexiones, raíz de
//! archivos estáticos) tienen valores por defecto documentados y se ajustan
//! desde código, por ejemplo en los tests.
//!
//! ## Ejemplos de uso
//!
//! ```bash
//! ./webserver              # puerto 80
//! ./webserver -p 8080
//! HTTP_PORT=8080 ./webserver
//! ```

use clap::Parser;
use std::path::PathBuf;

/// Puerto HTTP bien conocido
pub const DEFAULT_PORT: u16 = 80;

/// Capacidad del buffer de framing (bytes)
pub const DEFAULT_MAX_REQUEST_BYTES: usize = 1024;

pub const DEFAULT_READ_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_WRITE_TIMEOUT_MS: u64 = 30_000;

/// Máximo de workers vivos al mismo tiempo
pub const DEFAULT_MAX_CONNECTIONS: usize = 256;

pub const DEFAULT_STATIC_ROOT: &str = "static";

/// Request más corto que el parser acepta: `"A / B\r\n\r\n"`
const MIN_REQUEST_BYTES: usize = 10;

/// Configuración del servidor HTTP/1.1
#[derive(Debug, Clone, Parser)]
#[command(name = "webserver")]
#[command(about = "Servidor HTTP/1.1 minimalista con un worker por conexión")]
#[command(disable_version_flag = true)]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha (todas las interfaces por defecto)
    #[arg(skip = String::from("0.0.0.0"))]
    pub host: String,

    // === Framing ===
    /// Capacidad máxima del buffer de un request (headers + body)
    #[arg(skip = DEFAULT_MAX_REQUEST_BYTES)]
    pub max_request_bytes: usize,

    // === Timeouts ===
    /// Timeout de lectura del socket en milisegundos
    #[arg(skip = DEFAULT_READ_TIMEOUT_MS)]
    pub read_timeout_ms: u64,

    /// Timeout de escritura del socket en milisegundos
    #[arg(skip = DEFAULT_WRITE_TIMEOUT_MS)]
    pub write_timeout_ms: u64,

    // === Concurrencia ===
    #[arg(skip = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: usize,

    /// Directorio servido bajo `/static`
    #[arg(skip = PathBuf::from(DEFAULT_STATIC_ROOT))]
    pub static_root: PathBuf,
}

impl Config {
    /// Crea una configuración parseando los argumentos de la línea de comandos
    ///
    /// Cualquier argumento distinto de `-p <port>` termina el proceso con
    /// un mensaje de uso y status de error.
    pub fn new() -> Self {
        Config::parse()
    }

    /// Dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use webserver::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "0.0.0.0:80");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Valida la configuración
    ///
    /// Retorna errores si hay valores inválidos
    pub fn validate(&self) -> Result<(), String> {
        if self.max_request_bytes < MIN_REQUEST_BYTES {
            return Err(format!(
                "Max request bytes must be >= {}",
                MIN_REQUEST_BYTES
            ));
        }

        if self.read_timeout_ms == 0 {
            return Err("Read timeout must be > 0".to_string());
        }
        if self.write_timeout_ms == 0 {
            return Err("Write timeout must be > 0".to_string());
        }

        if self.max_connections == 0 {
            return Err("Max connections must be >= 1".to_string());
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            host: "0.0.0.0".to_string(),
            max_request_bytes: DEFAULT_MAX_REQUEST_BYTES,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
            write_timeout_ms: DEFAULT_WRITE_TIMEOUT_MS,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            static_root: PathBuf::from(DEFAULT_STATIC_ROOT),
        }
    }
}
