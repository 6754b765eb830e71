//! # Codificación del Body
//!
//! Compresión gzip opcional de respuestas, negociada con el header
//! `Accept-Encoding` del request.

use super::Request;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;

/// Valor de `Content-Encoding` / `Accept-Encoding` soportado
pub const GZIP: &str = "gzip";

/// Indica si el cliente pidió gzip
///
/// Solo reconoce el valor de un token (`Accept-Encoding: gzip`); las
/// listas con espacios nunca llegan al mapa de headers.
pub fn accepts_gzip(request: &Request) -> bool {
    request
        .header("Accept-Encoding")
        .map(|value| value.split(',').any(|token| token.trim() == GZIP))
        .unwrap_or(false)
}

/// Comprime `data` en formato gzip
pub fn gzip(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}
