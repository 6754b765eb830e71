//! # Comandos de Archivos
//! src/commands/files.rs
//!
//! - `GET /files/{nombre}`: contenido del archivo como
//!   `application/octet-stream`, o 404
//! - `POST /files/{nombre}` (o cualquier método distinto de GET): escribe
//!   el body del request al final del archivo y responde 201
//!
//! Los fallos de I/O al escribir se reportan al cliente como 500; nunca
//! salen de la conexión que los produjo.

use crate::http::{Method, Request, Response, StatusCode};
use crate::storage::{FileStore, StoreError};
use tracing::{debug, error};

/// Handler para `/files/{nombre}`, despacha según el método
pub fn files_handler(req: &Request, store: &FileStore, name: &str) -> Response {
    match req.method() {
        Method::Get => read_file(store, name),
        _ => write_file(req, store, name),
    }
}

fn read_file(store: &FileStore, name: &str) -> Response {
    match store.read(name) {
        Ok(contents) => Response::new(StatusCode::Ok)
            .with_header("Content-Type", "application/octet-stream")
            .with_body(contents),
        Err(e) => error_response(e),
    }
}

fn write_file(req: &Request, store: &FileStore, name: &str) -> Response {
    let body = req.body().unwrap_or_default();

    match store.write(name, body) {
        Ok(()) => {
            debug!(file = name, bytes = body.len(), "file written");
            Response::new(StatusCode::Created)
        }
        Err(e) => error_response(e),
    }
}

fn error_response(err: StoreError) -> Response {
    match err {
        StoreError::NotFound(_) => Response::new(StatusCode::NotFound),
        StoreError::InvalidName(name) => {
            debug!(file = %name, "rejected file name");
            Response::new(StatusCode::BadRequest)
        }
        other => {
            error!(error = %other, "file store failure");
            Response::new(StatusCode::InternalServerError)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn parse(raw: &[u8]) -> Request {
        let mut window = vec![0u8; 256];
        window[..raw.len()].copy_from_slice(raw);
        Request::parse(&window).unwrap()
    }

    fn store() -> (TempDir, FileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_get_missing_file() {
        let (_dir, store) = store();
        let req = parse(b"GET /files/missing.txt HTTP/1.1\r\n\r\n");

        let response = files_handler(&req, &store, "missing.txt");

        assert_eq!(response.status(), StatusCode::NotFound);
        assert!(response.body().is_empty());
    }

    #[test]
    fn test_get_existing_file() {
        let (dir, store) = store();
        fs::write(dir.path().join("hello.bin"), b"\x00\x01data").unwrap();
        let req = parse(b"GET /files/hello.bin HTTP/1.1\r\n\r\n");

        let response = files_handler(&req, &store, "hello.bin");

        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(response.header("Content-Type"), Some("application/octet-stream"));
        assert_eq!(response.header("Content-Length"), Some("6"));
        assert_eq!(response.body(), b"\x00\x01data");
    }

    #[test]
    fn test_post_then_get() {
        let (_dir, store) = store();

        let post = parse(b"POST /files/new.txt HTTP/1.1\r\nContent-Length: 3\r\n\r\nabc");
        let created = files_handler(&post, &store, "new.txt");
        assert_eq!(created.status(), StatusCode::Created);
        assert!(created.body().is_empty());

        let get = parse(b"GET /files/new.txt HTTP/1.1\r\n\r\n");
        let response = files_handler(&get, &store, "new.txt");
        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(response.body(), b"abc");
    }

    #[test]
    fn test_non_get_method_writes() {
        let (dir, store) = store();
        let req = parse(b"PUT /files/put.txt HTTP/1.1\r\n\r\nxyz");

        let response = files_handler(&req, &store, "put.txt");

        assert_eq!(response.status(), StatusCode::Created);
        assert_eq!(fs::read(dir.path().join("put.txt")).unwrap(), b"xyz");
    }

    #[test]
    fn test_post_without_body_creates_empty_file() {
        let (dir, store) = store();
        let req = parse(b"POST /files/empty.txt HTTP/1.1\r\n\r\n");

        let response = files_handler(&req, &store, "empty.txt");

        assert_eq!(response.status(), StatusCode::Created);
        assert!(fs::read(dir.path().join("empty.txt")).unwrap().is_empty());
    }

    #[test]
    fn test_traversal_is_bad_request() {
        let (_dir, store) = store();
        let req = parse(b"GET /files/../etc/passwd HTTP/1.1\r\n\r\n");

        let response = files_handler(&req, &store, "../etc/passwd");

        assert_eq!(response.status(), StatusCode::BadRequest);
    }

    #[test]
    fn test_post_to_directory_name_is_bad_request() {
        let (dir, store) = store();
        fs::create_dir(dir.path().join("a")).unwrap();
        let req = parse(b"POST /files/a/ HTTP/1.1\r\n\r\nabc");

        let response = files_handler(&req, &store, "a/");

        assert_eq!(response.status(), StatusCode::BadRequest);
    }

    #[test]
    fn test_write_failure_is_server_error() {
        let (_dir, store) = store();
        let req = parse(b"POST /files/missing-dir/a.txt HTTP/1.1\r\n\r\nabc");

        let response = files_handler(&req, &store, "missing-dir/a.txt");

        assert_eq!(response.status(), StatusCode::InternalServerError);
        assert!(response.body().is_empty());
    }
}
