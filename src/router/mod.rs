//! # Sistema de Routing
//! src/router/mod.rs
//!
//! Este módulo implementa el dispatcher que convierte un request parseado en
//! una respuesta.
//!
//! ## Arquitectura
//!
//! ```text
//! Request → Dispatcher → (contadores) → Router → Handler → Response
//! ```
//!
//! Orden de efectos:
//! 1. Se incrementa `request_count` y se suma el body a `bytes_received`
//! 2. Si el método no es GET, se responde 400 sin rutear
//! 3. Se recorren las reglas en orden; la primera que coincide gana
//! 4. Sin coincidencia, se responde `Hello, World!`
//!
//! La escritura al socket y `bytes_sent` quedan a cargo del worker.

use crate::handlers;
use crate::http::{Request, Response};
use crate::metrics::ServerCounters;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Estado compartido que ven los handlers
pub struct HandlerContext<'a> {
    pub counters: &'a ServerCounters,
    pub static_root: &'a Path,
}

/// Tipo de función handler
///
/// Recibe el contexto y el resto del path después del prefijo que hizo
/// match, y retorna una Response.
pub type Handler = fn(&HandlerContext<'_>, &str) -> Response;

/// Criterio de coincidencia de una ruta
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// El path empieza con el prefijo
    Prefix(&'static str),

    /// El path es exactamente este
    Exact(&'static str),
}

impl Rule {
    /// Si coincide, retorna el resto del path
    fn matches<'p>(&self, path: &'p str) -> Option<&'p str> {
        match self {
            Rule::Prefix(prefix) => path.strip_prefix(*prefix),
            Rule::Exact(exact) => (path == *exact).then_some(""),
        }
    }
}

/// Router con reglas ordenadas
pub struct Router {
    routes: Vec<(Rule, Handler)>,
}

impl Router {
    /// Crea un nuevo router vacío
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Router con las rutas del servidor: `/static`, `/stats`, `/calc`
    pub fn standard() -> Self {
        let mut router = Router::new();
        router.register(Rule::Prefix("/static"), handlers::static_handler);
        router.register(Rule::Exact("/stats"), handlers::stats_handler);
        router.register(Rule::Prefix("/calc"), handlers::calc_handler);
        router
    }

    /// Registra una ruta al final de la lista
    ///
    /// # Ejemplo
    /// ```
    /// use webserver::router::{HandlerContext, Router, Rule};
    /// use webserver::http::Response;
    ///
    /// fn ping(_ctx: &HandlerContext<'_>, _rest: &str) -> Response {
    ///     Response::html("pong")
    /// }
    ///
    /// let mut router = Router::new();
    /// router.register(Rule::Exact("/ping"), ping);
    /// ```
    pub fn register(&mut self, rule: Rule, handler: Handler) {
        self.routes.push((rule, handler));
    }

    /// Ejecuta el primer handler cuya regla coincide con `path`
    ///
    /// Retorna `None` si ninguna regla coincide.
    pub fn route(&self, ctx: &HandlerContext<'_>, path: &str) -> Option<Response> {
        self.routes
            .iter()
            .find_map(|(rule, handler)| rule.matches(path).map(|rest| handler(ctx, rest)))
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::standard()
    }
}

/// Dispatcher: contadores + chequeo de método + routing
pub struct Dispatcher {
    router: Router,
    counters: Arc<ServerCounters>,
    static_root: PathBuf,
}

impl Dispatcher {
    pub fn new(router: Router, counters: Arc<ServerCounters>, static_root: PathBuf) -> Self {
        Self {
            router,
            counters,
            static_root,
        }
    }

    /// Produce la respuesta para `request`
    pub fn dispatch(&self, request: &Request) -> Response {
        self.counters.record_request(request.body_len());

        if !request.is_get() {
            return Response::bad_request();
        }

        let ctx = HandlerContext {
            counters: &self.counters,
            static_root: &self.static_root,
        };

        self.router
            .route(&ctx, request.path())
            .unwrap_or_else(Response::hello)
    }

    pub fn counters(&self) -> &Arc<ServerCounters> {
        &self.counters
    }
}
