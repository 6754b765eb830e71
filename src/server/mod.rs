//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! Este módulo implementa el servidor TCP que:
//! 1. Escucha en un puerto
//! 2. Acepta conexiones entrantes, cada una en su propio thread
//! 3. Lee la ventana de bytes del request (`wire`)
//! 4. Parsea, enruta y envía la response, y cierra la conexión

pub mod tcp;
pub mod wire;

// Re-exportar para facilitar el uso
pub use tcp::{ConnectionOptions, Server, ServerError};
pub use wire::WireBuffer;
