//! # Página de Estadísticas
//! src/handlers/stats.rs

use crate::http::Response;
use crate::router::HandlerContext;

/// Handler para /stats
///
/// Renderiza los contadores del proceso. El request actual ya está
/// incluido en `Requests received`; los bytes de esta misma respuesta
/// todavía no cuentan en `Bytes sent`.
pub fn stats_handler(ctx: &HandlerContext<'_>, _remainder: &str) -> Response {
    let snapshot = ctx.counters.snapshot();

    let body = format!(
        "<html><body>\
         <h1>Server Statistics</h1>\
         <p>Requests received: {}</p>\
         <p>Bytes received: {}</p>\
         <p>Bytes sent: {}</p>\
         </body></html>",
        snapshot.request_count, snapshot.bytes_received, snapshot.bytes_sent
    );

    Response::html(&body)
}
