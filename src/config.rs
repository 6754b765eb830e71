//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración del servidor con soporte para argumentos CLI y
//! variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./http_file_server --directory /tmp/files --port 4221
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=4221 SERVE_DIR=/tmp/files ./http_file_server
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// Tamaño mínimo de la ventana de lectura (debe caber una start line)
pub const MIN_BUFFER_SIZE: usize = 16;

/// Errores de configuración; impiden arrancar el servidor
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("buffer size must be >= {min} bytes, got {0}", min = MIN_BUFFER_SIZE)]
    BufferTooSmall(usize),

    #[error("serving directory does not exist: {0}")]
    DirectoryMissing(PathBuf),

    #[error("serving directory is not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Configuración del servidor HTTP
#[derive(Debug, Clone, Parser)]
#[command(name = "http_file_server")]
#[command(about = "Servidor HTTP/1.1 concurrente con rutas de echo, user-agent y archivos")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Host/IP en el que escucha
    #[arg(long, default_value = "0.0.0.0", env = "HTTP_HOST")]
    pub host: String,

    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "4221", env = "HTTP_PORT")]
    pub port: u16,

    /// Directorio servido por `/files/`; sin él la ruta no existe
    #[arg(short, long, env = "SERVE_DIR")]
    pub directory: Option<PathBuf>,

    /// Capacidad de la ventana de lectura de cada conexión (bytes)
    #[arg(long = "buffer-size", default_value = "1024", env = "BUFFER_SIZE")]
    pub buffer_size: usize,

    // === Timeouts ===
    /// Timeout de lectura del socket en milisegundos (0 = sin límite)
    #[arg(long = "read-timeout-ms", default_value = "30000", env = "READ_TIMEOUT_MS")]
    pub read_timeout_ms: u64,

    /// Timeout de escritura del socket en milisegundos (0 = sin límite)
    #[arg(long = "write-timeout-ms", default_value = "30000", env = "WRITE_TIMEOUT_MS")]
    pub write_timeout_ms: u64,
}

impl Config {
    /// Crea la configuración parseando argumentos CLI y entorno
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use http_file_server::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "0.0.0.0:4221");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        millis(self.read_timeout_ms)
    }

    pub fn write_timeout(&self) -> Option<Duration> {
        millis(self.write_timeout_ms)
    }

    /// Valida la configuración antes de arrancar
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.buffer_size < MIN_BUFFER_SIZE {
            return Err(ConfigError::BufferTooSmall(self.buffer_size));
        }

        if let Some(dir) = &self.directory {
            if !dir.exists() {
                return Err(ConfigError::DirectoryMissing(dir.clone()));
            }
            if !dir.is_dir() {
                return Err(ConfigError::NotADirectory(dir.clone()));
            }
        }

        Ok(())
    }

    /// Registra un resumen de la configuración
    pub fn log_summary(&self) {
        let directory = self
            .directory
            .as_ref()
            .map(|dir| dir.display().to_string())
            .unwrap_or_else(|| "(none, /files/ disabled)".to_string());

        info!(
            address = %self.address(),
            directory = %directory,
            buffer_size = self.buffer_size,
            read_timeout_ms = self.read_timeout_ms,
            write_timeout_ms = self.write_timeout_ms,
            "configuration loaded"
        );
    }
}

fn millis(value: u64) -> Option<Duration> {
    (value > 0).then(|| Duration::from_millis(value))
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4221,
            directory: None,
            buffer_size: 1024,
            read_timeout_ms: 30_000,
            write_timeout_ms: 30_000,
        }
    }
}
