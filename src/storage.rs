//! # Almacenamiento de Archivos
//! src/storage.rs
//!
//! Adaptador sobre el directorio servido para la ruta `/files/`.
//! Los nombres se resuelven siempre dentro del directorio raíz: solo se
//! aceptan rutas relativas formadas por componentes normales, así que
//! `..`, rutas absolutas y prefijos de unidad se rechazan antes de tocar
//! el sistema de archivos.
//!
//! No hay locking: escrituras concurrentes al mismo nombre pueden
//! intercalarse.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Errores del almacenamiento de archivos
#[derive(Debug, Error)]
pub enum StoreError {
    /// El archivo no existe en el directorio servido
    #[error("file not found: {0}")]
    NotFound(String),

    /// El nombre escaparía del directorio servido o está vacío
    #[error("invalid file name: {0:?}")]
    InvalidName(String),

    /// Cualquier otro fallo de I/O
    #[error("I/O error on {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },

    /// El directorio raíz no es utilizable
    #[error("serving directory {path} is not usable: {source}")]
    Root {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Directorio servido, compartido por todos los handlers
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Abre el directorio servido
    ///
    /// Falla si la ruta no existe o no es un directorio.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref();
        let root_error = |source| StoreError::Root {
            path: root.to_path_buf(),
            source,
        };

        let metadata = fs::metadata(root).map_err(root_error)?;
        if !metadata.is_dir() {
            return Err(root_error(io::Error::new(
                io::ErrorKind::InvalidInput,
                "not a directory",
            )));
        }

        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lee el contenido completo de `name`
    pub fn read(&self, name: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.resolve(name)?;

        if !path.is_file() {
            return Err(StoreError::NotFound(name.to_string()));
        }

        fs::read(&path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound(name.to_string()),
            _ => StoreError::Io {
                name: name.to_string(),
                source,
            },
        })
    }

    /// Escribe `data` en `name`, creando el archivo o agregando al final
    pub fn write(&self, name: &str, data: &[u8]) -> Result<(), StoreError> {
        let path = self.resolve(name)?;
        let io_error = |source| StoreError::Io {
            name: name.to_string(),
            source,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(io_error)?;
        file.write_all(data).map_err(io_error)?;
        file.flush().map_err(io_error)
    }

    /// Une `name` al directorio raíz, rechazando escapes
    fn resolve(&self, name: &str) -> Result<PathBuf, StoreError> {
        // `components` ignora el `/` final: "a/" se vería igual que "a"
        if name.ends_with('/') {
            return Err(StoreError::InvalidName(name.to_string()));
        }

        let relative = Path::new(name);
        let mut parts = relative.components().peekable();

        if parts.peek().is_none() {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        if !parts.all(|part| matches!(part, Component::Normal(_))) {
            return Err(StoreError::InvalidName(name.to_string()));
        }

        Ok(self.root.join(relative))
    }
}
