//! # Errores del cliente del servicio de invitados
//!
//! Jerarquía de errores construida con thiserror. Ningún error de este módulo es fatal:
//! los controladores los capturan en el punto de llamada, los registran y degradan la
//! interfaz a su estado previo o vacío.

use std::error::Error;
use thiserror::Error;

/// Tipos de error de la aplicación con contexto
#[derive(Error, Debug)]
pub enum AppError {
    /// Fallo de red al hablar con el servicio externo
    ///
    /// Conserva el `reqwest::Error` original como `source` para poder registrar la
    /// cadena completa, y el `trace_id` enviado en la cabecera `x-request-id`.
    #[error("Error de transporte en operación '{operation}' (trace: {trace_id}): {source}")]
    Transport {
        operation: String,
        trace_id: String,
        #[source]
        source: reqwest::Error,
    },

    /// El servicio respondió con un estado HTTP no esperado
    #[error("Respuesta inesperada en operación '{operation}': HTTP {status}")]
    UnexpectedStatus {
        operation: String,
        status: u16,
        body: String,
    },

    /// El cuerpo de la respuesta no se pudo interpretar
    #[error("Respuesta inválida en operación '{operation}': {source}")]
    Decode {
        operation: String,
        #[source]
        source: serde_json::Error,
    },

    /// Recurso no encontrado
    #[error("No encontrado: {0}")]
    NotFound(String),

    /// Error de configuración con campo específico
    #[error("Configuración inválida en '{field}': {message}")]
    ConfigWithField {
        field: String,
        message: String,
    },

    /// Error interno simple
    #[error("Error interno: {0}")]
    Internal(String),
}

// Métodos helper para crear errores con contexto
impl AppError {
    /// Crea un error de transporte con contexto de operación
    pub fn transport(operation: &str, trace_id: &str, source: reqwest::Error) -> Self {
        Self::Transport {
            operation: operation.to_string(),
            trace_id: trace_id.to_string(),
            source,
        }
    }

    pub fn unexpected_status(operation: &str, status: u16, body: &str) -> Self {
        Self::UnexpectedStatus {
            operation: operation.to_string(),
            status,
            body: body.to_string(),
        }
    }

    pub fn decode(operation: &str, source: serde_json::Error) -> Self {
        Self::Decode {
            operation: operation.to_string(),
            source,
        }
    }

    /// Crea un error de configuración para una variable concreta
    pub fn config_field(field: &str, message: &str) -> Self {
        Self::ConfigWithField {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    /// Indica si el error proviene de la red o del formato de la respuesta
    /// (TransportFailure), por oposición a una búsqueda sin coincidencias.
    pub fn is_transport_failure(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::UnexpectedStatus { .. } | Self::Decode { .. }
        )
    }

    /// Mensaje corto apto para mostrar en la interfaz
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport { .. } => "No se pudo contactar con el servidor".to_string(),
            Self::UnexpectedStatus { status, .. } => {
                format!("El servidor respondió con un error ({})", status)
            }
            Self::Decode { .. } => "Respuesta del servidor no válida".to_string(),
            Self::NotFound(what) => format!("No encontrado: {}", what),
            Self::ConfigWithField { field, .. } => format!("Configuración inválida: {}", field),
            Self::Internal(message) => message.clone(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

// Conversión automática desde serde_json::Error
impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::Decode {
            operation: "decode_response".to_string(),
            source: error,
        }
    }
}

pub trait ResultExt<T> {
    fn map_err_config(self, field: &str) -> AppResult<T>;
    fn map_err_internal(self, message: &str) -> AppResult<T>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Error + Send + 'static,
{
    fn map_err_config(self, field: &str) -> AppResult<T> {
        self.map_err(|e| AppError::config_field(field, &e.to_string()))
    }

    fn map_err_internal(self, message: &str) -> AppResult<T> {
        self.map_err(|e| AppError::Internal(format!("{}: {}", message, e)))
    }
}
