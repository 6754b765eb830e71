//! # Parsing de Requests HTTP/1.1
//! src/http/request.rs
//!
//! Parser que trabaja directamente sobre la ventana de bytes leída del
//! socket (ver `server::wire`). Los bytes no usados de la ventana valen
//! cero, y el primer NUL marca el final del contenido recibido.
//!
//! ## Formato de un Request
//!
//! ```text
//! POST /files/notes.txt HTTP/1.1\r\n
//! Host: localhost:4221\r\n
//! User-Agent: curl/8.4.0\r\n
//! \r\n
//! abc\0\0\0...
//! ```
//!
//! ## Reglas
//!
//! 1. La ventana se separa en líneas por `\r\n`.
//! 2. **Start line**: exactamente tres tokens separados por un espacio
//!    (`METHOD PATH VERSION`). Cualquier otra forma es `MalformedStartLine`.
//! 3. **Headers**: de las líneas siguientes, hasta la primera línea vacía,
//!    solo se aceptan las que tienen exactamente dos tokens. El primero
//!    (sin el `:` final) es el nombre y el segundo el valor. Las líneas
//!    con espacios dentro del valor se descartan en silencio; es una
//!    limitación conocida del formato aceptado.
//! 4. **Body**: desde justo después del primer `\r\n\r\n` hasta el primer
//!    NUL. Sin separador o sin NUL (ventana llena) es `BodyBounds`.

use std::collections::HashMap;
use thiserror::Error;

/// Terminador de línea del protocolo
pub const CRLF: &[u8] = b"\r\n";

/// Separador entre el bloque de headers y el body
const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Método HTTP tal como llegó en la start line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Leer un recurso
    Get,

    /// POST - Escribir un recurso
    Post,

    /// Cualquier otro token; para `/files/` se trata como escritura
    Other(String),
}

impl Method {
    /// Construye el método desde el token de la start line
    pub fn from_token(token: &str) -> Self {
        match token {
            "GET" => Method::Get,
            "POST" => Method::Post,
            other => Method::Other(other.to_string()),
        }
    }

    /// Convierte el método a string
    pub fn as_str(&self) -> &str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Other(token) => token,
        }
    }
}

/// Request HTTP parseado. Es de solo lectura una vez construido.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,

    /// Siempre comienza con `/`
    path: String,

    /// Versión tal como llegó (ej: "HTTP/1.1")
    version: String,

    /// Nombre (sensible a mayúsculas) → valor; el último duplicado gana
    headers: HashMap<String, String>,

    /// Solo presente cuando el mensaje trae bytes después de los headers
    body: Option<Vec<u8>>,
}

/// Errores que pueden ocurrir durante el parsing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// La start line no tiene exactamente tres tokens válidos
    #[error("malformed start line: {0:?}")]
    MalformedStartLine(String),

    /// No se encontró el separador de headers o el final del contenido
    #[error("could not locate request body bounds")]
    BodyBounds,
}

impl Request {
    /// Parsea un request desde la ventana de lectura completa
    ///
    /// # Argumentos
    ///
    /// * `window` - Buffer de capacidad fija; la cola no usada vale cero
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use http_file_server::http::Request;
    ///
    /// let mut window = vec![0u8; 64];
    /// let raw = b"GET /echo/hi HTTP/1.1\r\nUser-Agent: demo\r\n\r\n";
    /// window[..raw.len()].copy_from_slice(raw);
    ///
    /// let request = Request::parse(&window).unwrap();
    /// assert_eq!(request.path(), "/echo/hi");
    /// assert_eq!(request.header("User-Agent"), Some("demo"));
    /// assert!(request.body().is_none());
    /// ```
    pub fn parse(window: &[u8]) -> Result<Self, ParseError> {
        let lines = split_lines(window);

        // 1. Start line
        let (method, path, version) = Self::parse_start_line(lines[0])?;

        // 2. Headers (solo el bloque antes de la línea vacía)
        let headers = Self::parse_headers(&lines[1..]);

        // 3. Body
        let body = Self::parse_body(window)?;

        Ok(Request {
            method,
            path,
            version,
            headers,
            body,
        })
    }

    /// Formato: `GET /path HTTP/1.1`, separado por espacios simples
    fn parse_start_line(line: &[u8]) -> Result<(Method, String, String), ParseError> {
        let line = String::from_utf8_lossy(trim_padding(line));
        let parts: Vec<&str> = line.split(' ').collect();

        let well_formed = parts.len() == 3
            && parts.iter().all(|part| !part.is_empty())
            && parts[1].starts_with('/');
        if !well_formed {
            return Err(ParseError::MalformedStartLine(line.into_owned()));
        }

        Ok((
            Method::from_token(parts[0]),
            parts[1].to_string(),
            parts[2].to_string(),
        ))
    }

    /// Headers `Nombre: valor` desde la línea siguiente a la start line
    ///
    /// Se detiene en la primera línea vacía: las líneas del body nunca se
    /// interpretan como headers, aunque tengan forma de `Nombre: valor`.
    /// Es más estricto que leer todas las líneas restantes del request.
    fn parse_headers(lines: &[&[u8]]) -> HashMap<String, String> {
        let mut headers = HashMap::new();

        for line in lines {
            let line = trim_padding(line);
            // La línea vacía marca el fin de los headers
            if line.is_empty() {
                break;
            }

            let text = String::from_utf8_lossy(line);
            let tokens: Vec<&str> = text.split(' ').collect();
            if tokens.len() != 2 {
                continue;
            }

            let name = tokens[0].trim_end_matches(':');
            if name.is_empty() {
                continue;
            }
            headers.insert(name.to_string(), tokens[1].to_string());
        }

        headers
    }

    fn parse_body(window: &[u8]) -> Result<Option<Vec<u8>>, ParseError> {
        let start = find(window, HEADER_TERMINATOR).ok_or(ParseError::BodyBounds)?
            + HEADER_TERMINATOR.len();
        let len = window[start..]
            .iter()
            .position(|&byte| byte == 0)
            .ok_or(ParseError::BodyBounds)?;

        if len == 0 {
            Ok(None)
        } else {
            Ok(Some(window[start..start + len].to_vec()))
        }
    }

    // === Accesores ===

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Obtiene un header por nombre exacto
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(|s| s.as_str())
    }

    /// Obtiene el body, si el request trajo uno
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}

/// Separa el buffer en líneas por `\r\n`; siempre retorna al menos una
fn split_lines(buffer: &[u8]) -> Vec<&[u8]> {
    let mut lines = Vec::new();
    let mut rest = buffer;

    while let Some(pos) = find(rest, CRLF) {
        lines.push(&rest[..pos]);
        rest = &rest[pos + CRLF.len()..];
    }
    lines.push(rest);

    lines
}

/// Quita los NUL de relleno al final de una línea
fn trim_padding(line: &[u8]) -> &[u8] {
    let end = line.iter().position(|&byte| byte == 0).unwrap_or(line.len());
    &line[..end]
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
