//! Eventos que entran y salen del host.

use serde::{Deserialize, Serialize};

use crate::api::AppResult;
use crate::board::highlight::HighlightPhase;
use crate::board::BoardView;
use crate::models::{AttendanceAck, GuestId, GuestRecord, Suggestion, TableId, TableRecord};
use crate::search::{AttendanceOutcome, SearchView};
use crate::timer::TimerToken;

/// Entrada de la página. Las coordenadas son píxeles relativos al origen del contenedor.
///
/// Ratón y táctil se reducen a las mismas tres operaciones del arrastre; salir del
/// área de seguimiento o cancelar el toque equivale a soltar.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiInput {
    Resize { width: f64, height: f64 },
    Text { value: String },
    Submit,
    PickSuggestion { name: String },
    MarkAttendance,
    SetLocked { locked: bool },
    MouseDown { x: f64, y: f64, table_id: TableId },
    MouseMove { x: f64, y: f64 },
    MouseUp,
    MouseLeave,
    TouchStart { x: f64, y: f64, table_id: TableId },
    TouchMove { x: f64, y: f64 },
    TouchEnd,
    TouchCancel,
}

/// Notificaciones para la página
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    /// Tras cada búsqueda confirmada, con o sin mesa
    SelectTable { table_id: Option<TableId> },
    /// Tras cada búsqueda confirmada, sea cual sea el resultado
    RequestScroll,
    AttendanceMarked {
        outcome: AttendanceOutcome,
        message: String,
    },
}

/// Instantánea completa de la interfaz
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HostView {
    pub board: BoardView,
    pub search: SearchView,
}

/// Todo lo que el bucle del host procesa, de uno en uno
#[derive(Debug)]
pub(crate) enum HostEvent {
    Input(UiInput),
    SuggestionDebounce(TimerToken),
    Highlight(TimerToken, HighlightPhase),
    TablesLoaded(AppResult<Vec<TableRecord>>),
    SuggestionsLoaded(AppResult<Vec<Suggestion>>),
    LookupFinished {
        ticket: u64,
        result: AppResult<Option<GuestRecord>>,
    },
    AttendanceFinished {
        guest_id: GuestId,
        result: AppResult<AttendanceAck>,
    },
}
