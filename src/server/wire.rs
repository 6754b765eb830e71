//! # Lectura del Socket
//! src/server/wire.rs
//!
//! Una conexión se lee con una sola llamada a `read` sobre una ventana de
//! capacidad fija. No hay loop para drenar más bytes: un request más
//! grande que la ventana llega truncado y el parser lo rechaza o lo
//! tolera. La cola no usada queda en cero, y ese NUL es lo que el
//! parser usa para encontrar el final del body.

use std::io::Read;

/// Ventana de bytes acotada, llenada con una sola lectura
#[derive(Debug, Clone)]
pub struct WireBuffer {
    bytes: Vec<u8>,
    filled: usize,
}

impl WireBuffer {
    /// Lee hasta `capacity` bytes de `reader` en una sola llamada
    ///
    /// Los errores de I/O se propagan; el llamador abandona la conexión.
    pub fn read_from<R: Read>(reader: &mut R, capacity: usize) -> std::io::Result<Self> {
        let mut bytes = vec![0u8; capacity];
        let filled = reader.read(&mut bytes)?;
        Ok(Self { bytes, filled })
    }

    /// Ventana completa, incluyendo la cola en cero
    pub fn window(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.filled
    }

    /// El peer cerró sin mandar nada
    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    /// La lectura llenó la ventana; el request pudo quedar truncado
    pub fn is_full(&self) -> bool {
        self.filled == self.bytes.len()
    }
}
