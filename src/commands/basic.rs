//! # Comandos Básicos
//! src/commands/basic.rs
//!
//! - `/`: respuesta vacía 200
//! - `/echo/{texto}`: devuelve el texto como `text/plain`
//! - `/user-agent`: devuelve el header `User-Agent`
//! - catch-all: 404 vacío

use crate::http::encoding;
use crate::http::{Request, Response, StatusCode};
use tracing::warn;

/// Status para `/user-agent` sin header `User-Agent`.
///
/// Las variantes conocidas del servidor no coinciden (400 o 404); aquí se
/// usa 400. Los clientes solo deberían contar con un 4xx de body vacío.
pub const MISSING_USER_AGENT_STATUS: StatusCode = StatusCode::BadRequest;

/// Handler para `/`
pub fn root_handler(_req: &Request) -> Response {
    Response::new(StatusCode::Ok)
}

/// Handler para `/echo/{texto}`
///
/// `text` es el sufijo del path después de `/echo/`. Si el cliente manda
/// `Accept-Encoding: gzip` el body va comprimido.
///
/// # Ejemplo de response
/// ```text
/// HTTP/1.1 200 OK
/// Content-Type: text/plain
/// Content-Length: 5
///
/// hello
/// ```
pub fn echo_handler(req: &Request, text: &str) -> Response {
    if !encoding::accepts_gzip(req) {
        return Response::text(StatusCode::Ok, text);
    }

    match encoding::gzip(text.as_bytes()) {
        Ok(compressed) => Response::new(StatusCode::Ok)
            .with_header("Content-Type", "text/plain")
            .with_header("Content-Encoding", encoding::GZIP)
            .with_body(compressed),
        Err(e) => {
            warn!(error = %e, "gzip failed, sending identity body");
            Response::text(StatusCode::Ok, text)
        }
    }
}

/// Handler para `/user-agent`
pub fn user_agent_handler(req: &Request) -> Response {
    match req.header("User-Agent") {
        Some(agent) => Response::text(StatusCode::Ok, agent),
        None => Response::new(MISSING_USER_AGENT_STATUS),
    }
}

/// Handler para cualquier ruta sin match
pub fn not_found_handler(_req: &Request) -> Response {
    Response::new(StatusCode::NotFound)
}
