//! # Seating Board
//!
//! Controladores del plano de mesas y del buscador de invitados para el control de
//! asistencia de un evento: se busca a un invitado por nombre, se marca su
//! asistencia y se resalta su mesa en un plano arrastrable.
//!
//! ## Arquitectura
//!
//! ```text
//! Página (eventos de teclado, ratón y táctil)
//!     ↓ UiInput
//! Host (tokio, un evento a la vez)
//!     ├── SearchController → debounce de sugerencias, búsqueda confirmada, asistencia
//!     └── SeatingBoard → DragEngine + HighlightScheduler sobre las mesas
//!     ↓ HTTP/JSON (reqwest)
//! Servicio de invitados
//! ```
//!
//! Los controladores son máquinas de estado síncronas y sin E/S; el [`host`] ejecuta
//! sus efectos (temporizadores y llamadas de red) y les devuelve los resultados.

pub mod api;
pub mod board;
pub mod config;
pub mod host;
pub mod models;
pub mod search;
pub mod timer;

pub use api::{AppError, AppResult, GuestService, HttpGuestService};
pub use board::SeatingBoard;
pub use config::Config;
pub use host::{Host, HostHandle, HostView, Notification, UiInput};
pub use search::SearchController;
