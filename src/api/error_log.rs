//! # Utilidades de logging para errores
//!
//! Los fallos de red nunca llegan a la interfaz: se registran aquí con la cadena
//! completa de `source()` y el llamador sigue con el estado previo.

use std::error::Error as StdError;

fn collect_chain<E>(error: &E) -> Vec<String>
where
    E: StdError + 'static,
{
    let mut error_chain = Vec::new();
    let mut current_error: Option<&dyn StdError> = Some(error);

    while let Some(err) = current_error {
        error_chain.push(err.to_string());
        current_error = err.source();
    }

    error_chain
}

/// Registra la cadena completa de errores con un contexto de operación
///
/// # Ejemplo
/// ```rust,ignore
/// if let Err(e) = service.update_position(&update).await {
///     log_error_chain(&e, "persistiendo posición de mesa");
/// }
/// ```
pub fn log_error_chain<E>(error: &E, context: &str)
where
    E: StdError + 'static,
{
    let error_chain = collect_chain(error);

    tracing::error!(
        context = %context,
        error_chain = ?error_chain,
        "Error with full chain (with context)"
    );
}

/// Extension trait para Results que añade logging automático de error chains
///
/// # Ejemplo de uso
/// ```rust,ignore
/// let ack = service
///     .mark_attendance(guest_id)
///     .await
///     .log_error_context("marcando asistencia");
/// ```
pub trait ErrorLogExt<T, E> {
    /// Loggea la cadena de errores con contexto adicional
    fn log_error_context(self, context: &str) -> Result<T, E>;

    /// Loggea la cadena de errores con un nivel específico
    fn log_error_level(self, context: &str, level: tracing::Level) -> Result<T, E>;
}

impl<T, E> ErrorLogExt<T, E> for Result<T, E>
where
    E: StdError + 'static,
{
    fn log_error_context(self, context: &str) -> Result<T, E> {
        if let Err(ref error) = self {
            log_error_chain(error, context);
        }
        self
    }

    fn log_error_level(self, context: &str, level: tracing::Level) -> Result<T, E> {
        if let Err(ref error) = self {
            match level {
                tracing::Level::ERROR => log_error_chain(error, context),
                tracing::Level::WARN => {
                    let error_chain = collect_chain(error);

                    tracing::warn!(
                        context = %context,
                        error_chain = ?error_chain,
                        "Warning with error chain"
                    );
                }
                _ => {
                    tracing::debug!(context = %context, "Error occurred: {}", error);
                }
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::AppError;

    #[test]
    fn chain_includes_every_source() {
        let source = serde_json::from_str::<u32>("{").unwrap_err();
        let error = AppError::decode("tables", source);

        let chain = collect_chain(&error);

        assert_eq!(chain.len(), 2);
        assert!(chain[0].contains("tables"));
    }

    #[test]
    fn logging_passes_the_result_through() {
        let ok: Result<u8, AppError> = Ok(3);
        assert_eq!(ok.log_error_context("noop").unwrap(), 3);

        let err: Result<u8, AppError> = Err(AppError::Internal("boom".to_string()));
        let err = err.log_error_level("noop", tracing::Level::WARN);
        assert!(err.is_err());
    }
}
