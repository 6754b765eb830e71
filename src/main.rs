//! # HTTP File Server - Entry Point
//! src/main.rs
//!
//! Lee la configuración, instala el logging y corre el loop de accept
//! hasta que el proceso muere o el listener falla.

use http_file_server::config::Config;
use http_file_server::server::Server;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "http_file_server=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Crear configuración (CLI o variables de entorno)
    let config = Config::new();
    config.log_summary();

    // Configuración inválida o bind fallido: no arrancar
    let server = match Server::bind(config) {
        Ok(server) => server,
        Err(e) => {
            error!(error = %e, "failed to start server");
            std::process::exit(1);
        }
    };

    // Esto bloquea el thread; solo retorna si el listener falla
    if let Err(e) = server.run() {
        error!(error = %e, "fatal listener error");
        std::process::exit(1);
    }
}
