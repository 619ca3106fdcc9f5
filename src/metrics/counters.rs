//! # Contadores Atómicos
//! src/metrics/counters.rs
//!
//! Cada incremento es una operación atómica independiente: no hay orden
//! garantizado entre contadores ni entre workers, pero nunca se pierde una
//! actualización.

use std::sync::atomic::{AtomicU64, Ordering};

/// Contadores thread-safe compartidos vía `Arc`
#[derive(Debug, Default)]
pub struct ServerCounters {
    /// Requests despachados
    request_count: AtomicU64,

    /// Suma de los largos de body recibidos
    bytes_received: AtomicU64,

    /// Bytes escritos a los sockets
    bytes_sent: AtomicU64,

    /// Workers vivos en este momento
    active_connections: AtomicU64,
}

impl ServerCounters {
    /// Crea los contadores en cero
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra un request al entrar al dispatcher
    pub fn record_request(&self, body_len: usize) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
        self.bytes_received
            .fetch_add(body_len as u64, Ordering::Relaxed);
    }

    /// Registra una respuesta ya escrita
    pub fn record_sent(&self, bytes: u64) {
        self.bytes_sent.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Incrementa el contador de conexiones activas
    pub fn connection_opened(&self) {
        self.active_connections.fetch_add(1, Ordering::Relaxed);
    }

    /// Decrementa el contador de conexiones activas (nunca baja de 0)
    pub fn connection_closed(&self) {
        let _ = self.active_connections.fetch_update(
            Ordering::Relaxed,
            Ordering::Relaxed,
            |current| current.checked_sub(1),
        );
    }

    pub fn active_connections(&self) -> u64 {
        self.active_connections.load(Ordering::Relaxed)
    }

    /// Obtiene un snapshot de los contadores
    pub fn snapshot(&self) -> CountersSnapshot {
        CountersSnapshot {
            request_count: self.request_count.load(Ordering::Relaxed),
            bytes_received: self.bytes_received.load(Ordering::Relaxed),
            bytes_sent: self.bytes_sent.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot de los contadores (para la página de estadísticas)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountersSnapshot {
    pub request_count: u64,
    pub bytes_received: u64,
    pub bytes_sent: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_counters_start_at_zero() {
        let counters = ServerCounters::new();
        assert_eq!(counters.snapshot(), CountersSnapshot::default());
        assert_eq!(counters.active_connections(), 0);
    }

    #[test]
    fn test_record_request_and_sent() {
        let counters = ServerCounters::new();

        counters.record_request(0);
        counters.record_request(11);
        counters.record_sent(70);
        counters.record_sent(30);

        let snapshot = counters.snapshot();
        assert_eq!(snapshot.request_count, 2);
        assert_eq!(snapshot.bytes_received, 11);
        assert_eq!(snapshot.bytes_sent, 100);
    }

    #[test]
    fn test_active_connections_tracking() {
        let counters = ServerCounters::new();

        counters.connection_opened();
        counters.connection_opened();
        assert_eq!(counters.active_connections(), 2);

        counters.connection_closed();
        counters.connection_closed();
        counters.connection_closed();
        assert_eq!(counters.active_connections(), 0);
    }

    #[test]
    fn test_no_lost_updates_under_contention() {
        let counters = Arc::new(ServerCounters::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let counters = Arc::clone(&counters);
                thread::spawn(move || {
                    for _ in 0..10_000 {
                        counters.record_request(3);
                        counters.record_sent(5);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = counters.snapshot();
        assert_eq!(snapshot.request_count, 80_000);
        assert_eq!(snapshot.bytes_received, 240_000);
        assert_eq!(snapshot.bytes_sent, 400_000);
    }
}
