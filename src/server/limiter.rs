//! # Límite de Conexiones
//! src/server/limiter.rs
//!
//! Semáforo contador (Mutex + Condvar) que acota cuántos workers viven al
//! mismo tiempo. El accept loop pide un permiso antes de aceptar; si no hay,
//! espera y las conexiones nuevas quedan en la cola del sistema operativo.

use std::sync::{Arc, Condvar, Mutex, PoisonError};

/// Semáforo de conexiones
pub struct ConnectionLimiter {
    /// Permisos entregados y no devueltos
    in_use: Mutex<usize>,

    /// Notifica cuando se libera un permiso
    released: Condvar,

    max: usize,
}

impl ConnectionLimiter {
    pub fn new(max: usize) -> Arc<Self> {
        Arc::new(Self {
            in_use: Mutex::new(0),
            released: Condvar::new(),
            max,
        })
    }

    /// Obtiene un permiso, bloqueando hasta que haya uno libre
    pub fn acquire(self: &Arc<Self>) -> Permit {
        let mut in_use = self.in_use.lock().unwrap_or_else(PoisonError::into_inner);

        while *in_use >= self.max {
            in_use = self
                .released
                .wait(in_use)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *in_use += 1;

        Permit {
            limiter: Arc::clone(self),
        }
    }

    pub fn in_use(&self) -> usize {
        *self.in_use.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn release(&self) {
        let mut in_use = self.in_use.lock().unwrap_or_else(PoisonError::into_inner);
        *in_use = in_use.saturating_sub(1);
        self.released.notify_one();
    }
}

/// Permiso de un worker; se devuelve al hacer drop
pub struct Permit {
    limiter: Arc<ConnectionLimiter>,
}

impl Drop for Permit {
    fn drop(&mut self) {
        self.limiter.release();
    }
}
