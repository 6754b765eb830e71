//! # HTTP File Server
//! src/lib.rs
//!
//! Servidor HTTP/1.1 concurrente implementado directamente sobre sockets
//! TCP: lee un request por conexión, lo enruta a uno de pocos comandos y
//! escribe la response byte a byte.
//!
//! ## Arquitectura
//!
//! El servidor está dividido en módulos especializados:
//! - `http`: Parsing de requests, construcción de responses, status codes
//! - `router`: Tabla ordenada de rutas y despacho a comandos
//! - `commands`: Comportamientos de cada ruta (echo, user-agent, archivos)
//! - `storage`: Lectura/escritura en el directorio servido
//! - `server`: Lectura del socket y loop de accept concurrente
//! - `config`: Argumentos CLI y variables de entorno
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use http_file_server::config::Config;
//! use http_file_server::server::Server;
//!
//! let config = Config::default();
//! let server = Server::bind(config).expect("Error al iniciar servidor");
//! server.run().expect("El listener falló");
//! ```

pub mod commands;
pub mod config;
pub mod http;
pub mod router;
pub mod server;
pub mod storage;
