//! # Buscador de invitados
//!
//! Dos flujos comparten el mismo campo de texto:
//!
//! - **Sugerencias**: cada pulsación reinicia un debounce de [`SUGGESTION_DEBOUNCE`];
//!   sólo la última pulsación de la ventana provoca una consulta.
//! - **Búsqueda confirmada**: por envío explícito o al elegir una sugerencia; busca
//!   el nombre exacto y notifica al host la mesa asignada.
//!
//! El controlador no hace E/S: devuelve [`SearchEffect`]s que el host ejecuta y
//! recibe los resultados con los métodos `on_*`.

use std::time::Duration;

use serde::Serialize;

use crate::api::AppResult;
use crate::models::{AttendanceAck, GuestId, GuestRecord, Suggestion, TableId};
use crate::timer::{TimerRequest, TimerSlot, TimerToken};

pub const SUGGESTION_DEBOUNCE: Duration = Duration::from_millis(300);

/// Longitud mínima del texto (en caracteres) para pedir sugerencias
pub const MIN_QUERY_CHARS: usize = 2;

/// Categoría de menú especial del invitado
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DietaryCategory {
    Celiac,
    Vegan,
    Vegetarian,
    KidsMenu,
    AfterDinner,
}

impl DietaryCategory {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Celiac),
            2 => Some(Self::Vegan),
            3 => Some(Self::Vegetarian),
            4 => Some(Self::KidsMenu),
            5 => Some(Self::AfterDinner),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Celiac => "🌾 Celíaco",
            Self::Vegan => "🥦 Vegano",
            Self::Vegetarian => "🥗 Vegetariano",
            Self::KidsMenu => "🥗 Menu de niños de 9 años",
            Self::AfterDinner => "🍽️ Después de cena",
        }
    }
}

/// Invitado encontrado actualmente mostrado
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub id: GuestId,
    pub name: String,
    pub table_id: Option<TableId>,
    pub party_size: u32,
    pub category: Option<DietaryCategory>,
    pub attended: bool,
}

impl From<GuestRecord> for SearchResult {
    fn from(record: GuestRecord) -> Self {
        Self {
            id: record.id,
            table_id: record.assigned_table(),
            category: record.category_id.and_then(DietaryCategory::from_code),
            name: record.name,
            party_size: record.quantity,
            attended: record.attendance,
        }
    }
}

/// Efectos que el host debe ejecutar
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEffect {
    /// Programar el debounce de sugerencias (sustituye al anterior)
    ScheduleSuggestions(TimerRequest<()>),
    FetchSuggestions { query: String },
    Lookup { ticket: u64, name: String },
    MarkAttendance { guest_id: GuestId },
}

/// Resultado de una búsqueda confirmada, a reenviar al plano
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub table_id: Option<TableId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceOutcome {
    AlreadyAttended,
    NewlyMarked,
}

impl AttendanceOutcome {
    pub fn message(self) -> &'static str {
        match self {
            Self::AlreadyAttended => "Esta persona ya había asistido.",
            Self::NewlyMarked => "Asistencia marcada.",
        }
    }
}

#[derive(Debug, Default)]
pub struct SearchController {
    query: String,
    suggestions: Vec<Suggestion>,
    result: Option<SearchResult>,
    debounce: TimerSlot,
    last_ticket: u64,
    attendance_pending: Option<GuestId>,
}

impl SearchController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn result(&self) -> Option<&SearchResult> {
        self.result.as_ref()
    }

    pub fn is_debounce_pending(&self) -> bool {
        self.debounce.is_pending()
    }

    /// Pulsación de teclado: reinicia el debounce o limpia las sugerencias
    pub fn on_text_changed(&mut self, text: impl Into<String>) -> Option<SearchEffect> {
        self.query = text.into();

        if self.query.chars().count() < MIN_QUERY_CHARS {
            self.debounce.cancel();
            self.suggestions.clear();
            return None;
        }

        Some(SearchEffect::ScheduleSuggestions(TimerRequest {
            token: self.debounce.arm(),
            delay: SUGGESTION_DEBOUNCE,
            payload: (),
        }))
    }

    /// Vence el debounce: consulta con el texto vigente
    pub fn on_debounce_elapsed(&mut self, token: TimerToken) -> Option<SearchEffect> {
        if !self.debounce.fire(token) {
            return None;
        }

        tracing::debug!(query = %self.query, "Fetching suggestions");
        Some(SearchEffect::FetchSuggestions {
            query: self.query.clone(),
        })
    }

    /// Respuesta de sugerencias: sustituye la lista; un fallo conserva la anterior
    pub fn on_suggestions(&mut self, result: AppResult<Vec<Suggestion>>) {
        match result {
            Ok(suggestions) => self.suggestions = suggestions,
            Err(e) => tracing::debug!(error = %e, "Keeping previous suggestions"),
        }
    }

    /// Envío explícito con el texto del campo
    pub fn submit(&mut self) -> Option<SearchEffect> {
        if self.query.trim().is_empty() {
            return None;
        }
        let name = self.query.clone();
        Some(self.lookup(name))
    }

    /// Elección de una sugerencia: busca ese nombre literal, no el texto con debounce
    pub fn pick_suggestion(&mut self, name: impl Into<String>) -> Option<SearchEffect> {
        let name = name.into();
        self.query = name.clone();
        self.suggestions.clear();
        self.debounce.cancel();

        if name.trim().is_empty() {
            return None;
        }
        Some(self.lookup(name))
    }

    fn lookup(&mut self, name: String) -> SearchEffect {
        self.last_ticket += 1;
        tracing::debug!(ticket = self.last_ticket, name = %name, "Searching guest");
        SearchEffect::Lookup {
            ticket: self.last_ticket,
            name,
        }
    }

    /// Respuesta de la búsqueda exacta. `None` si una búsqueda posterior la ha sustituido.
    pub fn on_lookup(&mut self, ticket: u64, result: AppResult<Option<GuestRecord>>) -> Option<Selection> {
        if ticket != self.last_ticket {
            tracing::debug!(ticket, latest = self.last_ticket, "Superseded search response dropped");
            return None;
        }

        self.attendance_pending = None;
        match result {
            Ok(Some(record)) => {
                let found = SearchResult::from(record);
                let table_id = found.table_id;
                self.result = Some(found);
                Some(Selection { table_id })
            }
            Ok(None) => {
                tracing::info!("Búsqueda sin resultados");
                self.result = None;
                Some(Selection { table_id: None })
            }
            Err(e) => {
                // El host ya registró la cadena de los fallos de red
                if e.is_transport_failure() {
                    tracing::debug!(error = %e, "Search failed, clearing result");
                } else {
                    tracing::info!(error = %e, "Búsqueda sin resultados");
                }
                self.result = None;
                Some(Selection { table_id: None })
            }
        }
    }

    /// Sólo disponible con resultado sin asistencia marcada y sin petición en curso
    pub fn mark_attendance(&mut self) -> Option<SearchEffect> {
        let result = self.result.as_ref()?;
        if result.attended || self.attendance_pending.is_some() {
            return None;
        }

        self.attendance_pending = Some(result.id);
        Some(SearchEffect::MarkAttendance { guest_id: result.id })
    }

    /// Respuesta de `POST /attendance`. Un fallo deja el botón habilitado para reintentar.
    pub fn on_attendance(&mut self, guest_id: GuestId, result: AppResult<AttendanceAck>) -> Option<AttendanceOutcome> {
        if self.attendance_pending == Some(guest_id) {
            self.attendance_pending = None;
        }

        let ack = match result {
            Ok(ack) => ack,
            Err(e) => {
                tracing::debug!(guest_id = %guest_id, error = %e, "Attendance not marked");
                return None;
            }
        };

        let current = self.result.as_mut().filter(|result| result.id == guest_id)?;
        current.attended = true;

        Some(if ack.already {
            AttendanceOutcome::AlreadyAttended
        } else {
            AttendanceOutcome::NewlyMarked
        })
    }

    pub fn view(&self) -> SearchView {
        SearchView {
            query: self.query.clone(),
            suggestions: self.suggestions.clone(),
            result: self.result.as_ref().map(|result| ResultCard {
                name: result.name.clone(),
                table_id: result.table_id,
                party_size: result.party_size,
                category: result.category.map(|category| category.label().to_string()),
                attendance_button: AttendanceButton {
                    label: if result.attended {
                        "Ya asistió ✔️"
                    } else {
                        "Marcar asistencia"
                    }
                    .to_string(),
                    enabled: !result.attended && self.attendance_pending.is_none(),
                },
            }),
        }
    }
}

/// Instantánea del buscador lista para pintar
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SearchView {
    pub query: String,
    pub suggestions: Vec<Suggestion>,
    pub result: Option<ResultCard>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultCard {
    pub name: String,
    pub table_id: Option<TableId>,
    pub party_size: u32,
    pub category: Option<String>,
    pub attendance_button: AttendanceButton,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceButton {
    pub label: String,
    pub enabled: bool,
}
