//! # Comandos del Servidor
//!
//! Comportamientos que el router asocia a cada ruta.
//!
//! ## Categorías de comandos
//!
//! - **basic**: `/`, `/echo/*`, `/user-agent` y el catch-all
//! - **files**: lectura y escritura en el directorio servido (`/files/*`)
//!
//! Cada comando recibe el Request (y lo que necesite de la ruta) y
//! retorna una Response.

pub mod basic;
pub mod files;

// Re-exportar funciones útiles
pub use basic::*;
pub use files::*;
