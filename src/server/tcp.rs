//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Acepta conexiones y lanza un thread por conexión. La cantidad de threads
//! vivos está acotada por `ConnectionLimiter`, y cada socket tiene timeouts
//! de lectura y escritura para que un peer lento no retenga su worker para
//! siempre.

use crate::config::Config;
use crate::error::{Result, ServerError};
use crate::http::FrameReader;
use crate::metrics::ServerCounters;
use crate::router::{Dispatcher, Router};
use crate::server::limiter::{ConnectionLimiter, Permit};
use crate::server::worker::ConnectionWorker;
use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Servidor HTTP/1.1 concurrente
pub struct Server {
    config: Config,
    listener: TcpListener,
    dispatcher: Arc<Dispatcher>,
    limiter: Arc<ConnectionLimiter>,
}

impl Server {
    /// Valida la configuración y hace bind al puerto
    pub fn bind(config: Config) -> Result<Self> {
        config.validate().map_err(ServerError::Config)?;

        let address = config.address();
        let listener = TcpListener::bind(&address).map_err(|source| ServerError::Bind {
            address: address.clone(),
            source,
        })?;

        let counters = Arc::new(ServerCounters::new());
        let dispatcher = Dispatcher::new(Router::standard(), counters, config.static_root.clone());
        let limiter = ConnectionLimiter::new(config.max_connections);

        Ok(Self {
            config,
            listener,
            dispatcher: Arc::new(dispatcher),
            limiter,
        })
    }

    /// Dirección real del listener (útil con puerto 0)
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Contadores compartidos por todos los workers
    pub fn counters(&self) -> Arc<ServerCounters> {
        Arc::clone(self.dispatcher.counters())
    }

    /// Loop de accept; no retorna mientras el listener siga vivo
    pub fn run(self) -> Result<()> {
        let local_addr = self.local_addr()?;
        tracing::info!(
            address = %local_addr,
            max_connections = self.config.max_connections,
            max_request_bytes = self.config.max_request_bytes,
            "Servidor escuchando"
        );

        let mut next_id: u64 = 0;
        loop {
            // El permiso se pide antes del accept: sin cupo, las conexiones
            // esperan en la cola del sistema operativo
            let permit = self.limiter.acquire();

            match self.listener.accept() {
                Ok((stream, peer)) => {
                    next_id += 1;
                    self.spawn_worker(next_id, stream, peer, permit);
                }
                Err(e) => {
                    tracing::error!(error = %e, "Error al aceptar conexión");
                }
            }
        }
    }

    fn spawn_worker(&self, id: u64, stream: TcpStream, peer: SocketAddr, permit: Permit) {
        if let Err(e) = self.configure(&stream) {
            tracing::error!(%peer, error = %e, "No se pudieron configurar los timeouts");
            return;
        }

        tracing::debug!(%peer, id, permits = self.limiter.in_use(), "Nueva conexión");

        let worker = ConnectionWorker::new(
            stream,
            peer.to_string(),
            FrameReader::new(self.config.max_request_bytes),
            Arc::clone(&self.dispatcher),
        );

        let spawned = thread::Builder::new()
            .name(format!("conn-{}", id))
            .spawn(move || {
                let _permit = permit;
                worker.run();
            });

        // Si el thread no se creó, el closure (socket y permiso) ya se liberó
        if let Err(e) = spawned {
            tracing::error!(%peer, error = %e, "No se pudo crear el thread");
        }
    }

    fn configure(&self, stream: &TcpStream) -> io::Result<()> {
        stream.set_read_timeout(Some(Duration::from_millis(self.config.read_timeout_ms)))?;
        stream.set_write_timeout(Some(Duration::from_millis(self.config.write_timeout_ms)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::Shutdown;

    fn local_config() -> Config {
        Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            ..Config::default()
        }
    }

    #[test]
    fn test_bind_rejects_invalid_config() {
        let mut config = local_config();
        config.max_connections = 0;
        assert!(matches!(Server::bind(config), Err(ServerError::Config(_))));
    }

    #[test]
    fn test_bind_reports_address_in_use() {
        let first = Server::bind(local_config()).unwrap();
        let port = first.local_addr().unwrap().port();

        let config = Config {
            port,
            ..local_config()
        };
        match Server::bind(config) {
            Err(ServerError::Bind { address, .. }) => {
                assert_eq!(address, format!("127.0.0.1:{}", port))
            }
            other => panic!("expected bind error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_idle_peer_times_out() {
        let config = Config {
            read_timeout_ms: 200,
            ..local_config()
        };
        let server = Server::bind(config).unwrap();
        let addr = server.local_addr().unwrap();
        let counters = server.counters();
        thread::spawn(move || server.run());

        // Conecta y no envía nada: el worker debe rendirse y cerrar
        let mut client = TcpStream::connect(addr).unwrap();
        client.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
        let mut buf = Vec::new();
        client.read_to_end(&mut buf).unwrap();

        assert!(buf.is_empty());
        assert_eq!(counters.snapshot().request_count, 0);
    }

    #[test]
    fn test_connection_limit_serializes_workers() {
        let config = Config {
            max_connections: 1,
            ..local_config()
        };
        let server = Server::bind(config).unwrap();
        let addr = server.local_addr().unwrap();
        thread::spawn(move || server.run());

        // La primera conexión ocupa el único cupo sin enviar nada completo
        let mut first = TcpStream::connect(addr).unwrap();
        first.write_all(b"GET / HTTP/1.1\r\n").unwrap();

        // La segunda queda en la cola hasta que la primera termine
        let mut second = TcpStream::connect(addr).unwrap();
        second.write_all(b"GET / HTTP/1.1\r\n\r\n").unwrap();
        second.set_read_timeout(Some(Duration::from_millis(200))).unwrap();
        let mut probe = [0u8; 1];
        assert!(second.read(&mut probe).is_err());

        first.write_all(b"\r\n").unwrap();
        first.shutdown(Shutdown::Write).unwrap();
        let mut buf = Vec::new();
        first.read_to_end(&mut buf).unwrap();
        assert!(buf.ends_with(b"Hello, World!"));

        second.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
        let mut buf = Vec::new();
        second.read_to_end(&mut buf).unwrap();
        assert!(buf.ends_with(b"Hello, World!"));
    }
}
