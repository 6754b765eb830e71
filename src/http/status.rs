//! # Códigos de Estado HTTP
//!
//! Tabla fija de códigos que emite el servidor y sus reason phrases:
//!
//! - **2xx**: Éxito (200 OK, 201 Created)
//! - **4xx**: Error del cliente (400, 404)
//! - **5xx**: Error del servidor (500)
//!
//! Cualquier otro código se representa con `StatusCode::Other` y se
//! serializa con reason phrase vacío, sin corromper la status line.

/// Códigos de estado HTTP que soporta el servidor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK - La petición fue exitosa
    Ok,

    /// 201 Created - Archivo escrito en el directorio servido
    Created,

    /// 400 Bad Request - Start line malformada o request truncado
    BadRequest,

    /// 404 Not Found - Ruta o archivo no encontrado
    NotFound,

    /// 500 Internal Server Error - Fallo de I/O al escribir un archivo
    InternalServerError,

    /// Código fuera de la tabla conocida
    Other(u16),
}

impl StatusCode {
    /// Convierte el código a su valor numérico
    ///
    /// # Ejemplo
    /// ```
    /// use http_file_server::http::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::Created => 201,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
            StatusCode::InternalServerError => 500,
            StatusCode::Other(code) => *code,
        }
    }

    /// Retorna el reason phrase asociado al código
    ///
    /// Los códigos desconocidos retornan un string vacío.
    ///
    /// # Ejemplo
    /// ```
    /// use http_file_server::http::StatusCode;
    /// assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    /// assert_eq!(StatusCode::Other(299).reason_phrase(), "");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Created => "Created",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::InternalServerError => "Internal Server Error",
            StatusCode::Other(_) => "",
        }
    }

    /// Verifica si el código indica error del servidor (5xx)
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.as_u16())
    }
}

impl std::fmt::Display for StatusCode {
    /// Formato: "200 OK" (o "299 " para códigos desconocidos)
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason_phrase())
    }
}
