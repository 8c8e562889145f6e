//! # Módulo API
//!
//! Capa de acceso al servicio externo de invitados y mesas.
//!
//! ## Módulos principales
//!
//! - [`client`] - Trait [`GuestService`] y su implementación HTTP
//! - [`errors`] - Manejo de errores de la aplicación
//! - [`error_log`] - Registro de cadenas de errores en el punto de llamada

pub mod client;
pub mod error_log;
pub mod errors;

// Re-exportar tipos comunes para facilitar su uso
pub use client::{GuestService, HttpGuestService};
pub use error_log::ErrorLogExt;
pub use errors::{AppError, AppResult, ResultExt};
