//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Servidor que maneja múltiples conexiones simultáneas usando threads.
//! El loop de `accept` corre en un solo thread y nunca espera a que un
//! request termine: cada conexión aceptada se procesa en su propio
//! thread (`conn-N`), que hace exactamente un ciclo request/response y
//! cierra el socket.
//!
//! Ciclo de vida de una conexión:
//!
//! ```text
//! Accepted → Reading → Parsed | ParseFailed → Dispatched → ResponseSent → Draining → Closed
//! ```
//!
//! Cualquier fallo dentro de una conexión (lectura, parseo, escritura)
//! termina solo esa conexión. Los errores de `accept` que afectan a una
//! sola conexión (abortada, reseteada, interrumpida) o que son temporales
//! (sin file descriptors) se registran y el loop sigue. El único error
//! fatal para el proceso es que el listener mismo falle.
//!
//! Después de enviar la response se cierra la escritura y se descarta lo
//! que el peer todavía esté mandando (lingering close). Si el socket se
//! cerrara con bytes sin leer, el kernel mandaría un RST y el cliente
//! podría perder la response.

use crate::config::{Config, ConfigError};
use crate::http::{Request, Response, StatusCode};
use crate::router::Router;
use crate::server::wire::WireBuffer;
use crate::storage::{FileStore, StoreError};
use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, error, info, info_span, warn};

/// Pausa del loop de accept cuando el proceso se queda sin descriptores
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Tiempo total que se espera al peer durante el lingering close
const LINGER_TIMEOUT: Duration = Duration::from_millis(500);

/// Máximo de bytes que se descartan antes de cerrar
const LINGER_LIMIT: usize = 64 * 1024;

// errno de Linux y BSD/macOS
const ENFILE: i32 = 23;
const EMFILE: i32 = 24;

/// Errores que detienen el servidor
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Storage(#[from] StoreError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error("listener failed: {0}")]
    Accept(#[source] io::Error),
}

/// Parámetros que necesita cada conexión
#[derive(Debug, Clone, Copy)]
pub struct ConnectionOptions {
    pub buffer_size: usize,
    pub read_timeout: Option<Duration>,
    pub write_timeout: Option<Duration>,
}

impl From<&Config> for ConnectionOptions {
    fn from(config: &Config) -> Self {
        Self {
            buffer_size: config.buffer_size,
            read_timeout: config.read_timeout(),
            write_timeout: config.write_timeout(),
        }
    }
}

/// Servidor HTTP/1.1 concurrente
pub struct Server {
    options: ConnectionOptions,
    router: Arc<Router>,
    listener: TcpListener,
}

impl Server {
    /// Valida la configuración, abre el directorio servido y hace bind
    ///
    /// Un directorio inválido impide arrancar: ningún handler llega a ver
    /// un directorio ausente.
    pub fn bind(config: Config) -> Result<Self, ServerError> {
        config.validate()?;

        let store = config.directory.as_ref().map(FileStore::new).transpose()?;
        if let Some(store) = &store {
            info!(directory = %store.root().display(), "serving files");
        }
        let router = Router::new(store);

        let address = config.address();
        let listener = TcpListener::bind(&address).map_err(|source| ServerError::Bind {
            address: address.clone(),
            source,
        })?;
        info!(address = %address, "listening");

        Ok(Self {
            options: ConnectionOptions::from(&config),
            router: Arc::new(router),
            listener,
        })
    }

    /// Dirección real del listener (útil con puerto 0)
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Loop de accept; solo retorna si el listener falla
    pub fn run(self) -> Result<(), ServerError> {
        info!("accepting connections, one thread per connection");
        accept_loop(self.listener.incoming(), &self.router, self.options)
    }
}

/// Despacha cada conexión aceptada a su propio thread
///
/// Retorna `Ok` solo cuando `incoming` se agota.
fn accept_loop<I>(
    incoming: I,
    router: &Arc<Router>,
    options: ConnectionOptions,
) -> Result<(), ServerError>
where
    I: IntoIterator<Item = io::Result<TcpStream>>,
{
    for (id, stream) in incoming.into_iter().enumerate() {
        let stream = match stream {
            Ok(stream) => stream,
            Err(e) if is_transient_accept_error(&e) => {
                warn!(connection = id, error = %e, "accept failed, still listening");
                if is_fd_exhaustion(&e) {
                    thread::sleep(ACCEPT_BACKOFF);
                }
                continue;
            }
            Err(e) => return Err(ServerError::Accept(e)),
        };

        let router = Arc::clone(router);

        let spawned = thread::Builder::new()
            .name(format!("conn-{}", id))
            .spawn(move || {
                if let Err(e) = handle_connection(stream, &router, options) {
                    warn!(connection = id, error = %e, "connection abandoned");
                }
            });

        // Si no se pudo crear el thread, el stream se descarta y se cierra
        if let Err(e) = spawned {
            error!(connection = id, error = %e, "failed to spawn connection thread");
        }
    }

    Ok(())
}

/// El proceso o el sistema se quedó sin file descriptors
fn is_fd_exhaustion(err: &io::Error) -> bool {
    matches!(err.raw_os_error(), Some(EMFILE | ENFILE))
}

/// Errores de `accept` que no invalidan el listener
fn is_transient_accept_error(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::ConnectionAborted
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::Interrupted
            | io::ErrorKind::WouldBlock
    ) || is_fd_exhaustion(err)
}

/// Procesa una conexión aceptada: un request, una response, cierre
pub fn handle_connection(
    mut stream: TcpStream,
    router: &Router,
    options: ConnectionOptions,
) -> io::Result<Option<StatusCode>> {
    let peer = stream
        .peer_addr()
        .map(|addr| addr.to_string())
        .unwrap_or_else(|_| "unknown".to_string());
    let span = info_span!("conn", peer = %peer);
    let _guard = span.enter();

    stream.set_read_timeout(options.read_timeout)?;
    stream.set_write_timeout(options.write_timeout)?;

    let status = serve(&mut stream, router, options.buffer_size)?;
    if status.is_some() {
        linger_close(&mut stream);
    }
    debug!("connection closed");
    Ok(status)
}

/// Cierra la escritura y descarta lo que quede del request
///
/// La espera está acotada por `LINGER_TIMEOUT` y `LINGER_LIMIT`; los
/// errores solo se registran, la response ya fue enviada.
fn linger_close(stream: &mut TcpStream) {
    if let Err(e) = stream.shutdown(Shutdown::Write) {
        debug!(error = %e, "shutdown failed");
        return;
    }

    let deadline = Instant::now() + LINGER_TIMEOUT;
    let mut scratch = [0u8; 1024];
    let mut discarded = 0;

    while discarded < LINGER_LIMIT {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() || stream.set_read_timeout(Some(remaining)).is_err() {
            break;
        }
        match stream.read(&mut scratch) {
            Ok(0) | Err(_) => break,
            Ok(n) => discarded += n,
        }
    }

    if discarded > 0 {
        debug!(bytes = discarded, "discarded unread request bytes");
    }
}

/// Un ciclo request/response sobre cualquier stream
///
/// Retorna el status enviado, o `None` si el peer cerró sin mandar bytes.
pub fn serve<S: Read + Write>(
    stream: &mut S,
    router: &Router,
    buffer_size: usize,
) -> io::Result<Option<StatusCode>> {
    let start = Instant::now();

    let buffer = WireBuffer::read_from(stream, buffer_size)?;
    if buffer.is_empty() {
        debug!("peer closed before sending a request");
        return Ok(None);
    }
    if buffer.is_full() {
        debug!(capacity = buffer.capacity(), "read window filled, request may be truncated");
    }

    let response = match Request::parse(buffer.window()) {
        Ok(request) => {
            debug!(
                method = request.method().as_str(),
                path = request.path(),
                version = request.version(),
                headers = request.headers().len(),
                "parsed"
            );
            router.route(&request)
        }
        Err(e) => {
            debug!(error = %e, bytes = buffer.len(), "parse failed");
            Response::new(StatusCode::BadRequest)
        }
    };

    let status = response.status();
    debug!(
        headers = response.headers().len(),
        body_bytes = response.body().len(),
        "sending response"
    );
    response.send(stream)?;

    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    if status.is_server_error() {
        warn!(status = status.as_u16(), elapsed_ms, "response sent");
    } else {
        info!(status = status.as_u16(), elapsed_ms, "response sent");
    }

    Ok(Some(status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Stream en memoria: lee de `input`, escribe en `output`
    struct MockStream {
        input: Cursor<Vec<u8>>,
        output: Vec<u8>,
    }

    impl MockStream {
        fn new(request: &[u8]) -> Self {
            Self {
                input: Cursor::new(request.to_vec()),
                output: Vec::new(),
            }
        }

        fn output_text(&self) -> String {
            String::from_utf8_lossy(&self.output).into_owned()
        }
    }

    impl Read for MockStream {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.input.read(buf)
        }
    }

    impl Write for MockStream {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.output.write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Stream cuya escritura siempre falla
    struct BrokenPipe(Cursor<Vec<u8>>);

    impl Read for BrokenPipe {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.0.read(buf)
        }
    }

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_serve_echo() {
        let router = Router::new(None);
        let mut stream = MockStream::new(b"GET /echo/hello HTTP/1.1\r\n\r\n");

        let status = serve(&mut stream, &router, 1024).unwrap();

        assert_eq!(status, Some(StatusCode::Ok));
        assert_eq!(
            stream.output_text(),
            "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 5\r\n\r\nhello"
        );
    }

    #[test]
    fn test_serve_garbage_is_bad_request() {
        let router = Router::new(None);
        let mut stream = MockStream::new(b"garbage\r\n");

        let status = serve(&mut stream, &router, 1024).unwrap();

        assert_eq!(status, Some(StatusCode::BadRequest));
        assert_eq!(stream.output_text(), "HTTP/1.1 400 Bad Request\r\n\r\n");
    }

    #[test]
    fn test_serve_request_filling_window_is_bad_request() {
        let router = Router::new(None);
        let request = b"POST /files/a HTTP/1.1\r\n\r\nabcdef";
        let mut stream = MockStream::new(request);

        let status = serve(&mut stream, &router, request.len()).unwrap();

        assert_eq!(status, Some(StatusCode::BadRequest));
    }

    #[test]
    fn test_serve_empty_read_sends_nothing() {
        let router = Router::new(None);
        let mut stream = MockStream::new(b"");

        let status = serve(&mut stream, &router, 1024).unwrap();

        assert_eq!(status, None);
        assert!(stream.output.is_empty());
    }

    #[test]
    fn test_serve_write_failure_is_returned() {
        let router = Router::new(None);
        let mut stream = BrokenPipe(Cursor::new(b"GET / HTTP/1.1\r\n\r\n".to_vec()));

        let err = serve(&mut stream, &router, 1024).unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    /// Par de sockets conectados: (lado del cliente, lado del servidor)
    fn connected_pair() -> (TcpStream, TcpStream) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let client = TcpStream::connect(listener.local_addr().unwrap()).unwrap();
        let (server, _) = listener.accept().unwrap();
        (client, server)
    }

    fn test_options() -> ConnectionOptions {
        ConnectionOptions {
            buffer_size: 1024,
            read_timeout: Some(Duration::from_secs(2)),
            write_timeout: Some(Duration::from_secs(2)),
        }
    }

    #[test]
    fn test_transient_accept_errors() {
        assert!(is_transient_accept_error(&io::Error::from_raw_os_error(EMFILE)));
        assert!(is_transient_accept_error(&io::Error::from_raw_os_error(ENFILE)));
        assert!(is_transient_accept_error(&io::Error::new(
            io::ErrorKind::ConnectionAborted,
            "aborted"
        )));
        assert!(is_transient_accept_error(&io::Error::new(
            io::ErrorKind::Interrupted,
            "signal"
        )));
        assert!(!is_transient_accept_error(&io::Error::new(
            io::ErrorKind::InvalidInput,
            "bad socket"
        )));
    }

    #[test]
    fn test_accept_loop_survives_transient_errors() {
        let router = Arc::new(Router::new(None));
        let (mut client, server_side) = connected_pair();
        client.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
        client.write_all(b"GET / HTTP/1.1\r\n\r\n").unwrap();

        let incoming = vec![
            Err(io::Error::from_raw_os_error(EMFILE)),
            Err(io::Error::new(io::ErrorKind::ConnectionAborted, "aborted")),
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset")),
            Ok(server_side),
        ];

        assert!(accept_loop(incoming, &router, test_options()).is_ok());

        let mut response = String::new();
        client.read_to_string(&mut response).unwrap();
        assert_eq!(response, "HTTP/1.1 200 OK\r\n\r\n");
    }

    #[test]
    fn test_accept_loop_stops_on_listener_failure() {
        let router = Arc::new(Router::new(None));
        let incoming = vec![Err(io::Error::new(io::ErrorKind::InvalidInput, "bad socket"))];

        let result = accept_loop(incoming, &router, test_options());

        assert!(matches!(result, Err(ServerError::Accept(_))));
    }

    #[test]
    fn test_oversized_request_gets_clean_close() {
        let router = Router::new(None);
        let (mut client, server_side) = connected_pair();
        client.set_read_timeout(Some(Duration::from_secs(5))).unwrap();

        let mut request = b"POST /echo/big HTTP/1.1\r\n\r\n".to_vec();
        request.extend(vec![b'x'; 8000]);
        client.write_all(&request).unwrap();

        let handle = thread::spawn(move || handle_connection(server_side, &router, test_options()));

        let mut response = Vec::new();
        client.read_to_end(&mut response).unwrap();
        drop(client);

        assert_eq!(response, b"HTTP/1.1 400 Bad Request\r\n\r\n");
        assert_eq!(handle.join().unwrap().unwrap(), Some(StatusCode::BadRequest));
    }

    #[test]
    fn test_bind_rejects_invalid_config() {
        let mut config = Config::default();
        config.host = "127.0.0.1".to_string();
        config.port = 0;
        config.buffer_size = 1;

        assert!(matches!(Server::bind(config), Err(ServerError::Config(_))));
    }

    #[test]
    fn test_bind_ephemeral_port() {
        let mut config = Config::default();
        config.host = "127.0.0.1".to_string();
        config.port = 0;

        let server = Server::bind(config).unwrap();
        assert_ne!(server.local_addr().unwrap().port(), 0);
    }

    #[test]
    fn test_connection_options_from_config() {
        let mut config = Config::default();
        config.buffer_size = 2048;
        config.write_timeout_ms = 0;

        let options = ConnectionOptions::from(&config);

        assert_eq!(options.buffer_size, 2048);
        assert_eq!(options.read_timeout, Some(Duration::from_secs(30)));
        assert_eq!(options.write_timeout, None);
    }
}
