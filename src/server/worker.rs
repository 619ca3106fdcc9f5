//! # Worker por Conexión
//! src/server/worker.rs
//!
//! Cada conexión aceptada la atiende un worker que es dueño exclusivo del
//! socket y recorre, en orden:
//!
//! ```text
//! Accepted → Framing → Parsed | Closed | Malformed → Dispatched → Closed
//! ```
//!
//! - `ConnectionClosed` y errores de lectura (incluye timeouts): se cierra
//!   sin responder.
//! - Buffer agotado o request line inválida: se responde el documento 400
//!   y se cierra. Si el buffer se agotó, antes de cerrar se descarta lo que
//!   el peer siga enviando (hasta `DRAIN_LIMIT` bytes o el timeout de
//!   lectura): cerrar con datos sin leer haría que el kernel mande un RST y
//!   el cliente podría perder el 400.
//! - Request válido: se despacha, se escribe la respuesta y se suma a
//!   `bytes_sent` exactamente lo escrito.
//!
//! El socket se cierra una única vez, al consumir el worker.

use crate::http::{CountingWriter, FrameError, FrameReader, Request, Response, StatusCode};
use crate::metrics::ServerCounters;
use crate::router::Dispatcher;
use std::io::{self, Read, Write};
use std::sync::Arc;

/// Máximo de bytes que se descartan tras un request demasiado grande
pub const DRAIN_LIMIT: u64 = 64 * 1024;

/// Cómo terminó una conexión
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Se despachó un request y se respondió con este status
    Dispatched(StatusCode),

    /// El peer cerró antes de un request completo
    ConnectionClosed,

    /// Request malformado o error de lectura
    Malformed,
}

/// Worker de una conexión
pub struct ConnectionWorker<S> {
    stream: S,
    peer: String,
    frame_reader: FrameReader,
    dispatcher: Arc<Dispatcher>,
}

impl<S: Read + Write> ConnectionWorker<S> {
    pub fn new(
        stream: S,
        peer: String,
        frame_reader: FrameReader,
        dispatcher: Arc<Dispatcher>,
    ) -> Self {
        Self {
            stream,
            peer,
            frame_reader,
            dispatcher,
        }
    }

    /// Atiende la conexión completa y cierra el socket
    pub fn run(mut self) -> Outcome {
        let counters = Arc::clone(self.dispatcher.counters());
        counters.connection_opened();
        tracing::debug!(
            peer = %self.peer,
            active = counters.active_connections(),
            "Conexión abierta"
        );

        let outcome = self.serve(&counters);

        counters.connection_closed();
        tracing::debug!(
            peer = %self.peer,
            ?outcome,
            active = counters.active_connections(),
            "Conexión cerrada"
        );
        outcome
        // `self.stream` se libera aquí: único cierre del socket
    }

    fn serve(&mut self, counters: &ServerCounters) -> Outcome {
        // 1. Framing
        let frame = match self.frame_reader.read_frame(&mut self.stream) {
            Ok(frame) => frame,
            Err(FrameError::ConnectionClosed) => {
                tracing::debug!(peer = %self.peer, "Peer cerró sin enviar un request");
                return Outcome::ConnectionClosed;
            }
            Err(e @ FrameError::Overflow { .. }) => {
                tracing::warn!(peer = %self.peer, error = %e, "Request malformado");
                self.respond(Response::bad_request(), counters);
                self.drain();
                return Outcome::Malformed;
            }
            Err(e @ FrameError::Io(_)) => {
                tracing::warn!(peer = %self.peer, error = %e, "Error leyendo el request");
                return Outcome::Malformed;
            }
        };

        // 2. Parsing
        let request = match Request::parse(&frame) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(peer = %self.peer, error = %e, "Request malformado");
                self.respond(Response::bad_request(), counters);
                return Outcome::Malformed;
            }
        };

        tracing::info!(
            peer = %self.peer,
            method = request.method(),
            path = request.path(),
            version = request.version(),
            body_len = request.body_len(),
            "Request recibido"
        );

        // 3. Dispatch + escritura
        let response = self.dispatcher.dispatch(&request);
        let status = response.status();
        self.respond(response, counters);

        Outcome::Dispatched(status)
    }

    /// Escribe la respuesta y suma los bytes enviados
    ///
    /// Si la escritura falla a medias, se suma lo que alcanzó a salir.
    fn respond(&mut self, response: Response, counters: &ServerCounters) {
        let status = response.status();
        let mut writer = CountingWriter::new(&mut self.stream);
        let result = response.write_to(&mut writer);
        let sent = writer.written();
        counters.record_sent(sent);

        match result {
            Ok(_) => {
                tracing::debug!(peer = %self.peer, %status, bytes = sent, "Respuesta enviada");
            }
            Err(e) => tracing::warn!(
                peer = %self.peer,
                %status,
                bytes = sent,
                error = %e,
                "Error escribiendo la respuesta"
            ),
        }
    }

    /// Descarta el resto del request hasta EOF, error o `DRAIN_LIMIT`
    fn drain(&mut self) {
        let mut rest = (&mut self.stream).take(DRAIN_LIMIT);
        match io::copy(&mut rest, &mut io::sink()) {
            Ok(discarded) => {
                tracing::debug!(peer = %self.peer, bytes = discarded, "Request descartado");
            }
            Err(e) => {
                tracing::debug!(peer = %self.peer, error = %e, "Fin del descarte");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::Router;
    use std::io::Cursor;
    use std::net::{Shutdown, TcpListener, TcpStream};
    use std::thread;

    /// Socket en memoria: lee de `input`, escribe en `output`
    ///
    /// Con `write_limit`, el peer "se desconecta" después de ese total.
    struct MemoryStream {
        input: Cursor<Vec<u8>>,
        output: Vec<u8>,
        write_limit: Option<usize>,
    }

    impl Read for MemoryStream {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.input.read(buf)
        }
    }

    impl Write for MemoryStream {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let room = match self.write_limit {
                Some(limit) => limit - self.output.len(),
                None => buf.len(),
            };
            if room == 0 && !buf.is_empty() {
                return Err(io::Error::new(io::ErrorKind::ConnectionReset, "peer gone"));
            }
            let n = room.min(buf.len());
            self.output.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn dispatcher() -> Arc<Dispatcher> {
        let root = std::env::temp_dir().join(format!("webserver-worker-{}", std::process::id()));
        Arc::new(Dispatcher::new(
            Router::standard(),
            Arc::new(ServerCounters::new()),
            root,
        ))
    }

    /// Corre un worker sobre un socket TCP real y retorna lo que recibió el cliente
    fn roundtrip(
        dispatcher: Arc<Dispatcher>,
        capacity: usize,
        input: &[u8],
    ) -> (Outcome, Vec<u8>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().unwrap();

        let server = thread::spawn(move || {
            let (stream, peer) = listener.accept().unwrap();
            let frame_reader = FrameReader::new(capacity);
            ConnectionWorker::new(stream, peer.to_string(), frame_reader, dispatcher).run()
        });

        let mut client = TcpStream::connect(addr).unwrap();
        client.write_all(input).unwrap();
        client.shutdown(Shutdown::Write).unwrap();

        let mut received = Vec::new();
        client.read_to_end(&mut received).unwrap();

        (server.join().unwrap(), received)
    }

    #[test]
    fn test_worker_hello() {
        let dispatcher = dispatcher();
        let input = b"GET / HTTP/1.1\r\n\r\n";
        let (outcome, received) = roundtrip(Arc::clone(&dispatcher), 1024, input);

        assert_eq!(outcome, Outcome::Dispatched(StatusCode::Ok));
        assert_eq!(
            received,
            b"HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 13\r\n\r\nHello, World!"
        );

        let snapshot = dispatcher.counters().snapshot();
        assert_eq!(snapshot.request_count, 1);
        assert_eq!(snapshot.bytes_sent, received.len() as u64);
    }

    #[test]
    fn test_worker_peer_closed_immediately() {
        let dispatcher = dispatcher();
        let (outcome, received) = roundtrip(Arc::clone(&dispatcher), 1024, b"");

        assert_eq!(outcome, Outcome::ConnectionClosed);
        assert!(received.is_empty());
        assert_eq!(dispatcher.counters().snapshot().request_count, 0);
    }

    #[test]
    fn test_worker_overflow_gets_bad_request() {
        let dispatcher = dispatcher();
        let (outcome, received) = roundtrip(Arc::clone(&dispatcher), 64, &[b'x'; 64]);

        assert_eq!(outcome, Outcome::Malformed);
        assert!(received.starts_with(b"HTTP/1.1 400 Bad Request\r\n"));

        // No cuenta como request, pero los bytes sí se enviaron
        let snapshot = dispatcher.counters().snapshot();
        assert_eq!(snapshot.request_count, 0);
        assert_eq!(snapshot.bytes_sent, received.len() as u64);
    }

    #[test]
    fn test_worker_oversized_request_closes_cleanly() {
        let dispatcher = dispatcher();
        let mut input = b"GET /".to_vec();
        input.extend_from_slice(&[b'a'; 4000]);
        input.extend_from_slice(b" HTTP/1.1\r\nHost: x\r\n\r\n");

        // `roundtrip` hace `read_to_end(..).unwrap()`: un RST lo haría fallar
        let (outcome, received) = roundtrip(Arc::clone(&dispatcher), 64, &input);

        assert_eq!(outcome, Outcome::Malformed);
        assert_eq!(received, Response::bad_request().to_bytes().unwrap());
        assert_eq!(dispatcher.counters().snapshot().bytes_sent, received.len() as u64);
    }

    #[test]
    fn test_worker_counts_partial_write() {
        let dispatcher = dispatcher();
        let stream = MemoryStream {
            input: Cursor::new(b"GET / HTTP/1.1\r\n\r\n".to_vec()),
            output: Vec::new(),
            write_limit: Some(20),
        };

        let mut worker = ConnectionWorker::new(
            stream,
            "memory".to_string(),
            FrameReader::new(1024),
            Arc::clone(&dispatcher),
        );
        let outcome = worker.serve(&dispatcher.counters().clone());

        assert_eq!(outcome, Outcome::Dispatched(StatusCode::Ok));
        assert_eq!(worker.stream.output.len(), 20);
        assert_eq!(dispatcher.counters().snapshot().bytes_sent, 20);
    }

    #[test]
    fn test_worker_bad_request_line() {
        let dispatcher = dispatcher();
        let (outcome, received) = roundtrip(dispatcher, 1024, b"GARBAGE\r\n\r\n");

        assert_eq!(outcome, Outcome::Malformed);
        assert!(received.starts_with(b"HTTP/1.1 400 Bad Request\r\n"));
    }

    #[test]
    fn test_worker_counts_body_bytes() {
        let dispatcher = dispatcher();
        let input = b"GET / HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello";
        let (outcome, _) = roundtrip(Arc::clone(&dispatcher), 1024, input);

        assert_eq!(outcome, Outcome::Dispatched(StatusCode::Ok));
        assert_eq!(dispatcher.counters().snapshot().bytes_received, 5);
    }

    #[test]
    fn test_worker_in_memory_stream() {
        let dispatcher = dispatcher();
        let stream = MemoryStream {
            input: Cursor::new(b"DELETE /x HTTP/1.1\r\n\r\n".to_vec()),
            output: Vec::new(),
            write_limit: None,
        };

        let mut worker = ConnectionWorker::new(
            stream,
            "memory".to_string(),
            FrameReader::new(1024),
            Arc::clone(&dispatcher),
        );
        let outcome = worker.serve(&dispatcher.counters().clone());

        assert_eq!(outcome, Outcome::Dispatched(StatusCode::BadRequest));
        assert!(worker.stream.output.starts_with(b"HTTP/1.1 400 Bad Request\r\n"));
    }
}
