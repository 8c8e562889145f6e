//! # Plano de mesas
//!
//! Controlador del plano arrastrable. Compone:
//!
//! - [`coords`] - Posiciones normalizadas y recorte al contenedor
//! - [`drag`] - Máquina de estados del arrastre (ratón y táctil)
//! - [`highlight`] - Resaltado temporal de la mesa buscada
//!
//! El dibujo es función pura de las posiciones, el bloqueo y el resaltado:
//! ver [`SeatingBoard::view`].

pub mod coords;
pub mod drag;
pub mod highlight;

use serde::Serialize;

use crate::api::AppResult;
use crate::models::{PositionUpdate, TableId, TableRecord, TableVariant};
use coords::{Container, NormalizedPoint, Point};
use drag::DragEngine;
use highlight::{HighlightPhase, HighlightScheduler, HighlightTimer};
use crate::timer::TimerToken;

/// Paleta asignada cíclicamente a las mesas al cargarlas
pub const TABLE_PALETTE: &[&str] = &["#4ECDC4"];
pub const SPECIAL_TABLE_COLOR: &str = "#FF6347";
pub const HIGHLIGHT_COLOR: &str = "yellow";

/// Mesa del plano
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub id: TableId,
    pub position: NormalizedPoint,
    pub label: String,
    pub variant: TableVariant,
    /// Pista de presentación, independiente del estado
    pub color: String,
}

impl Table {
    pub fn new(id: TableId, position: NormalizedPoint, label: impl Into<String>, variant: TableVariant) -> Self {
        Self {
            id,
            position,
            label: label.into(),
            variant,
            color: TABLE_PALETTE[0].to_string(),
        }
    }

    fn from_record(record: TableRecord, index: usize) -> Self {
        Self {
            id: record.id,
            position: NormalizedPoint::new(record.x, record.y),
            label: record.label,
            variant: record.variant,
            color: TABLE_PALETTE[index % TABLE_PALETTE.len()].to_string(),
        }
    }
}

/// Estado de la carga única de mesas
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BoardStatus {
    /// Aún no se ha pedido el listado
    #[default]
    Unmounted,
    Loading,
    Ready,
    /// Terminal: sin reintentos, el plano no se puede dibujar
    Failed(String),
}

#[derive(Debug)]
pub struct SeatingBoard {
    status: BoardStatus,
    tables: Vec<Table>,
    container: Container,
    drag: DragEngine,
    highlight: HighlightScheduler,
}

impl SeatingBoard {
    pub fn new(container: Container) -> Self {
        Self {
            status: BoardStatus::default(),
            tables: Vec::new(),
            container,
            drag: DragEngine::new(),
            highlight: HighlightScheduler::new(),
        }
    }

    pub fn status(&self) -> &BoardStatus {
        &self.status
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn is_locked(&self) -> bool {
        self.drag.is_locked()
    }

    pub fn highlighted(&self) -> Option<TableId> {
        self.highlight.active()
    }

    /// Marca el inicio de la carga; devuelve `false` si ya se pidió antes
    pub fn begin_load(&mut self) -> bool {
        if self.status != BoardStatus::Unmounted {
            return false;
        }
        self.status = BoardStatus::Loading;
        true
    }

    /// Resultado de `GET /tables`
    pub fn on_tables_loaded(&mut self, result: AppResult<Vec<TableRecord>>) {
        match result {
            Ok(records) => {
                tracing::info!(count = records.len(), "Mesas cargadas");
                self.tables = records
                    .into_iter()
                    .enumerate()
                    .map(|(index, record)| Table::from_record(record, index))
                    .collect();
                self.status = BoardStatus::Ready;
            }
            Err(e) => {
                tracing::debug!(error = %e, "Board failed to load");
                self.status = BoardStatus::Failed(e.user_message());
            }
        }
    }

    /// Cambia el tamaño del contenedor; un arrastre en curso conserva el punto de agarre
    pub fn resize(&mut self, container: Container) {
        if let Some(table_id) = self.drag.dragging() {
            tracing::debug!(table_id = %table_id, "Container resized mid-drag");
        }
        self.drag.rescale(self.container, container);
        self.container = container;
    }

    pub fn set_locked(&mut self, locked: bool) {
        if let Some(table_id) = self.drag.set_locked(locked) {
            tracing::debug!(table_id = %table_id, "Drag cancelled by lock, table frozen in place");
        }
        tracing::debug!(locked, "Board lock changed");
    }

    pub fn pointer_down(&mut self, pointer: Point, table_id: TableId) {
        match self.drag.begin(pointer, table_id, &self.tables, self.container) {
            Ok(()) => tracing::debug!(table_id = %table_id, "Drag started"),
            Err(rejection) => tracing::debug!(table_id = %table_id, %rejection, "Drag ignored"),
        }
    }

    pub fn pointer_move(&mut self, pointer: Point) {
        // Ruta caliente: los rechazos (sin arrastre, bloqueado) se ignoran sin registrar
        let _ = self.drag.move_to(pointer, &mut self.tables, self.container);
    }

    /// Fin del gesto. Devuelve la posición a persistir, si procede.
    pub fn pointer_up(&mut self) -> Option<PositionUpdate> {
        match self.drag.end(&self.tables) {
            Ok(update) => {
                tracing::debug!(table_id = %update.id, x = update.x, y = update.y, "Drag finished");
                Some(update)
            }
            Err(rejection) => {
                tracing::trace!(%rejection, "Pointer release without persistence");
                None
            }
        }
    }

    /// Resalta una mesa; `None` no limpia nada
    pub fn highlight(&mut self, table_id: Option<TableId>) -> Option<HighlightTimer> {
        let table_id = table_id?;
        if !self.tables.iter().any(|table| table.id == table_id) {
            tracing::debug!(table_id = %table_id, "Highlight requested for a table not on the board");
        }
        Some(self.highlight.request(table_id))
    }

    pub fn on_highlight_timer(&mut self, token: TimerToken, phase: HighlightPhase) -> Option<HighlightTimer> {
        self.highlight.on_timer(token, phase)
    }

    pub fn view(&self) -> BoardView {
        let locked = self.is_locked();
        let highlighted = self.highlighted();

        let tables = self
            .tables
            .iter()
            .map(|table| {
                let origin = self.container.to_absolute(table.position);
                let size = self.container.footprint(table.variant);
                let is_highlighted = highlighted == Some(table.id);
                let special = table.variant == TableVariant::Special;

                let color = if is_highlighted {
                    HIGHLIGHT_COLOR.to_string()
                } else if special {
                    SPECIAL_TABLE_COLOR.to_string()
                } else {
                    table.color.clone()
                };

                TableView {
                    id: table.id,
                    label: table.label.clone(),
                    x: origin.x,
                    y: origin.y,
                    width: size.width,
                    height: size.height,
                    color,
                    highlighted: is_highlighted,
                    special,
                    draggable: !locked,
                }
            })
            .collect();

        BoardView {
            status: match &self.status {
                BoardStatus::Unmounted | BoardStatus::Loading => BoardStatusView::Loading {
                    message: "Cargando mesas...".to_string(),
                },
                BoardStatus::Ready => BoardStatusView::Ready,
                BoardStatus::Failed(message) => BoardStatusView::Failed {
                    message: message.clone(),
                },
            },
            locked,
            lock_label: if locked { "Desbloquear mesas" } else { "Bloquear mesas" }.to_string(),
            tables,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum BoardStatusView {
    Loading { message: String },
    Ready,
    Failed { message: String },
}

/// Instantánea del plano lista para pintar
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardView {
    pub status: BoardStatusView,
    pub locked: bool,
    pub lock_label: String,
    pub tables: Vec<TableView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableView {
    pub id: TableId,
    pub label: String,
    /// Esquina superior izquierda en píxeles
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: String,
    pub highlighted: bool,
    pub special: bool,
    pub draggable: bool,
}
