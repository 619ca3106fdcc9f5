//! # Webserver - Entry Point
//! src/main.rs
//!
//! Uso: `webserver [-p <port>]`

use webserver::config::Config;
use webserver::logging;
use webserver::server::Server;

fn main() {
    // Argumentos inválidos: clap imprime el uso y sale con status de error
    let config = Config::new();

    logging::init();

    let server = match Server::bind(config) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, "No se pudo iniciar el servidor");
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!(error = %e, "Error fatal");
        std::process::exit(1);
    }
}
