//! # Sistema de Routing
//! src/router/mod.rs
//!
//! Mapea el path de cada request a un comportamiento usando una tabla
//! ordenada de pares (matcher, ruta).
//!
//! ## Arquitectura
//!
//! ```text
//! Request → RouteTable::resolve → Route → comando → Response
//! ```
//!
//! La tabla estándar se evalúa en este orden:
//!
//! | Matcher            | Ruta          |
//! |--------------------|---------------|
//! | exacto `/`         | `Root`        |
//! | prefijo `/echo/`   | `EchoPrefix`  |
//! | exacto `/user-agent` | `UserAgent` |
//! | prefijo `/files/`  | `FilesPrefix` (solo con directorio servido) |
//! | cualquiera         | `CatchAll`    |

use crate::commands;
use crate::http::{Request, Response};
use crate::storage::FileStore;
use tracing::debug;

/// Cómo se compara un path contra una entrada de la tabla
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matcher {
    /// El path debe ser exactamente este
    Exact(&'static str),

    /// El path debe empezar con este prefijo
    Prefix(&'static str),

    /// Cualquier path
    Any,
}

impl Matcher {
    /// Retorna el resto del path después del match, o `None`
    ///
    /// # Ejemplo
    /// ```
    /// use http_file_server::router::Matcher;
    ///
    /// assert_eq!(Matcher::Prefix("/echo/").matches("/echo/hi"), Some("hi"));
    /// assert_eq!(Matcher::Exact("/").matches("/"), Some(""));
    /// assert_eq!(Matcher::Exact("/").matches("/x"), None);
    /// ```
    pub fn matches<'a>(&self, path: &'a str) -> Option<&'a str> {
        match self {
            Matcher::Exact(expected) => (path == *expected).then_some(""),
            Matcher::Prefix(prefix) => path.strip_prefix(*prefix),
            Matcher::Any => Some(path),
        }
    }
}

/// Comportamientos disponibles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Root,
    EchoPrefix,
    UserAgent,
    FilesPrefix,
    CatchAll,
}

/// Tabla ordenada de rutas; la primera entrada que hace match gana
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    entries: Vec<(Matcher, Route)>,
}

impl RouteTable {
    /// Crea una tabla vacía (todo cae en `CatchAll`)
    pub fn new() -> Self {
        Self::default()
    }

    /// Tabla estándar del servidor
    ///
    /// `with_files` controla si se registra `/files/`; sin directorio
    /// servido esos paths caen en el catch-all.
    pub fn standard(with_files: bool) -> Self {
        let mut table = Self::new();
        table.register(Matcher::Exact("/"), Route::Root);
        table.register(Matcher::Prefix("/echo/"), Route::EchoPrefix);
        table.register(Matcher::Exact("/user-agent"), Route::UserAgent);
        if with_files {
            table.register(Matcher::Prefix("/files/"), Route::FilesPrefix);
        }
        table.register(Matcher::Any, Route::CatchAll);
        table
    }

    /// Agrega una entrada al final de la tabla
    pub fn register(&mut self, matcher: Matcher, route: Route) {
        self.entries.push((matcher, route));
    }

    /// Encuentra la ruta para `path` junto con el sufijo después del match
    pub fn resolve<'a>(&self, path: &'a str) -> (Route, &'a str) {
        self.entries
            .iter()
            .find_map(|(matcher, route)| matcher.matches(path).map(|rest| (*route, rest)))
            .unwrap_or((Route::CatchAll, path))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Router: tabla de rutas + directorio servido opcional
#[derive(Debug, Clone)]
pub struct Router {
    table: RouteTable,
    store: Option<FileStore>,
}

impl Router {
    /// Router con la tabla estándar
    pub fn new(store: Option<FileStore>) -> Self {
        let table = RouteTable::standard(store.is_some());
        debug!(routes = table.len(), files = store.is_some(), "route table ready");
        Self { table, store }
    }

    /// Ejecuta el comando que corresponde al request
    pub fn route(&self, request: &Request) -> Response {
        let (route, rest) = self.table.resolve(request.path());

        match (route, &self.store) {
            (Route::Root, _) => commands::root_handler(request),
            (Route::EchoPrefix, _) => commands::echo_handler(request, rest),
            (Route::UserAgent, _) => commands::user_agent_handler(request),
            (Route::FilesPrefix, Some(store)) => commands::files_handler(request, store, rest),
            (Route::FilesPrefix, None) | (Route::CatchAll, _) => {
                commands::not_found_handler(request)
            }
        }
    }
}
