//! # Construcción de Respuestas HTTP
//!
//! API para construir respuestas HTTP/1.1 y serializarlas a los bytes
//! exactos que se escriben en el socket.
//!
//! ## Formato de una respuesta
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/plain\r\n
//! Content-Length: 5\r\n
//! \r\n
//! hello
//! ```
//!
//! ## Ejemplo de uso
//!
//! ```
//! use http_file_server::http::{Response, StatusCode};
//!
//! let response = Response::new(StatusCode::Ok)
//!     .with_header("Content-Type", "text/plain")
//!     .with_body(b"hello".to_vec());
//!
//! let bytes = response.to_bytes();
//! assert!(bytes.ends_with(b"\r\n\r\nhello"));
//! ```

use super::StatusCode;
use std::io::Write;

/// Versión del protocolo en la status line
pub const PROTOCOL: &str = "HTTP/1.1";

/// Respuesta HTTP. Se crea por request, la muta el handler elegido y se
/// consume una sola vez al enviarla.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,

    /// Headers en orden de inserción; ese orden es el de serialización
    headers: Vec<(String, String)>,

    /// Cuerpo de la respuesta (puede ser vacío)
    body: Vec<u8>,
}

impl Response {
    /// Crea una respuesta sin headers ni body
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Agrega un header a la respuesta
    ///
    /// Si el header ya existe, se sobrescribe su valor manteniendo la
    /// posición original.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.set_header(name, value);
        self
    }

    /// Versión mutable de `with_header`
    pub fn set_header(&mut self, name: &str, value: &str) {
        match self.headers.iter_mut().find(|(existing, _)| existing == name) {
            Some((_, existing_value)) => *existing_value = value.to_string(),
            None => self.headers.push((name.to_string(), value.to_string())),
        }
    }

    /// Establece el body y su `Content-Length`
    ///
    /// El `Content-Length` siempre es la longitud exacta en bytes del body.
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        let length = self.body.len().to_string();
        self.set_header("Content-Length", &length);
        self
    }

    /// Respuesta `text/plain` con body
    pub fn text(status: StatusCode, body: &str) -> Self {
        Self::new(status)
            .with_header("Content-Type", "text/plain")
            .with_body(body.as_bytes().to_vec())
    }

    /// Serializa la respuesta
    ///
    /// - Status line: `HTTP/1.1 200 OK\r\n`
    /// - Headers en orden de inserción: `Name: Value\r\n`
    /// - Línea vacía: `\r\n`
    /// - Body tal cual, sin `\r\n` final
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = Vec::with_capacity(64 + self.body.len());

        let status_line = format!("{} {}\r\n", PROTOCOL, self.status);
        result.extend_from_slice(status_line.as_bytes());

        for (name, value) in &self.headers {
            let header_line = format!("{}: {}\r\n", name, value);
            result.extend_from_slice(header_line.as_bytes());
        }

        result.extend_from_slice(b"\r\n");
        result.extend_from_slice(&self.body);

        result
    }

    /// Escribe la respuesta completa y la consume
    pub fn send<W: Write>(self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&self.to_bytes())?;
        writer.flush()
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Obtiene un header por nombre exacto
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_response() {
        let response = Response::new(StatusCode::Ok);
        assert_eq!(response.status(), StatusCode::Ok);
        assert!(response.headers().is_empty());
        assert!(response.body().is_empty());
    }

    #[test]
    fn test_empty_response_bytes() {
        let bytes = Response::new(StatusCode::Ok).to_bytes();
        assert_eq!(bytes, b"HTTP/1.1 200 OK\r\n\r\n");
    }

    #[test]
    fn test_with_body_sets_content_length() {
        let response = Response::new(StatusCode::Ok).with_body(b"Hello World".to_vec());

        assert_eq!(response.body(), b"Hello World");
        assert_eq!(response.header("Content-Length"), Some("11"));
    }

    #[test]
    fn test_content_length_counts_bytes_not_chars() {
        let response = Response::text(StatusCode::Ok, "ñandú");
        assert_eq!(response.header("Content-Length"), Some("7"));
    }

    #[test]
    fn test_headers_keep_insertion_order() {
        let bytes = Response::new(StatusCode::Ok)
            .with_header("Content-Type", "text/plain")
            .with_header("X-First", "1")
            .with_body(b"Test".to_vec())
            .to_bytes();
        let text = String::from_utf8(bytes).unwrap();

        assert_eq!(
            text,
            "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nX-First: 1\r\nContent-Length: 4\r\n\r\nTest"
        );
    }

    #[test]
    fn test_set_header_overwrites_in_place() {
        let mut response = Response::new(StatusCode::Ok)
            .with_header("A", "1")
            .with_header("B", "2");
        response.set_header("A", "3");

        assert_eq!(
            response.headers(),
            &[
                ("A".to_string(), "3".to_string()),
                ("B".to_string(), "2".to_string())
            ]
        );
    }

    #[test]
    fn test_unknown_status_serializes() {
        let bytes = Response::new(StatusCode::Other(299)).to_bytes();
        assert_eq!(bytes, b"HTTP/1.1 299 \r\n\r\n");
    }

    #[test]
    fn test_send_writes_all_bytes() {
        let mut sink = Vec::new();
        Response::text(StatusCode::Ok, "hello").send(&mut sink).unwrap();

        assert_eq!(
            sink,
            b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 5\r\n\r\nhello"
        );
    }

    #[test]
    fn test_binary_body() {
        let data = vec![0x00, 0x01, 0xFF];
        let response = Response::new(StatusCode::Ok).with_body(data.clone());

        assert!(response.to_bytes().ends_with(&data));
        assert_eq!(response.header("Content-Length"), Some("3"));
    }
}
