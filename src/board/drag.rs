//! Motor de arrastre: máquina de estados `Idle` / `Dragging` compartida por ratón y táctil.
//!
//! Sólo puede existir una sesión de arrastre a la vez. Mientras el plano está
//! bloqueado no se inicia ninguna; si el bloqueo llega a mitad de un arrastre, la
//! sesión se descarta y la mesa se queda donde se dibujó por última vez, sin
//! persistir nada.

use thiserror::Error;

use super::coords::{Container, NormalizedPoint, Point};
use super::Table;
use crate::models::{PositionUpdate, TableId};

/// Sesión de arrastre en curso
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub table_id: TableId,
    /// Desplazamiento puntero → origen de la mesa en píxeles, capturado al empezar
    pub grab_offset: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

/// Gestos inválidos. Se ignoran en silencio; sólo se registran en `debug`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GestureRejection {
    #[error("el plano está bloqueado")]
    Locked,
    #[error("mesa desconocida: {0}")]
    UnknownTable(TableId),
    #[error("ya hay un arrastre en curso sobre la mesa {0}")]
    AlreadyDragging(TableId),
    #[error("no hay ningún arrastre en curso")]
    NotDragging,
    #[error("el contenedor no tiene área")]
    DegenerateContainer,
}

#[derive(Debug, Default)]
pub struct DragEngine {
    state: DragState,
    locked: bool,
}

impl DragEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn dragging(&self) -> Option<TableId> {
        match self.state {
            DragState::Dragging(session) => Some(session.table_id),
            DragState::Idle => None,
        }
    }

    /// `Idle → Dragging` si el plano no está bloqueado y la mesa existe
    pub fn begin(
        &mut self,
        pointer: Point,
        table_id: TableId,
        tables: &[Table],
        container: Container,
    ) -> Result<(), GestureRejection> {
        if self.locked {
            return Err(GestureRejection::Locked);
        }
        if let DragState::Dragging(session) = self.state {
            return Err(GestureRejection::AlreadyDragging(session.table_id));
        }

        let table = tables
            .iter()
            .find(|table| table.id == table_id)
            .ok_or(GestureRejection::UnknownTable(table_id))?;

        let origin = container.to_absolute(table.position);
        self.state = DragState::Dragging(DragSession {
            table_id,
            grab_offset: pointer - origin,
        });

        Ok(())
    }

    /// Mueve la mesa arrastrada bajo el puntero, recortada al contenedor.
    ///
    /// Ruta síncrona de alta frecuencia: no hace E/S ni registra nada.
    pub fn move_to(
        &mut self,
        pointer: Point,
        tables: &mut [Table],
        container: Container,
    ) -> Result<NormalizedPoint, GestureRejection> {
        if self.locked {
            return Err(GestureRejection::Locked);
        }
        let DragState::Dragging(session) = self.state else {
            return Err(GestureRejection::NotDragging);
        };
        if container.is_degenerate() {
            return Err(GestureRejection::DegenerateContainer);
        }

        let table = tables
            .iter_mut()
            .find(|table| table.id == session.table_id)
            .ok_or(GestureRejection::UnknownTable(session.table_id))?;

        let target = container.clamp(pointer - session.grab_offset, table.variant);
        table.position = container.to_normalized(target);

        Ok(table.position)
    }

    /// `Dragging → Idle`. Devuelve la petición de persistencia con la posición final.
    pub fn end(&mut self, tables: &[Table]) -> Result<PositionUpdate, GestureRejection> {
        let DragState::Dragging(session) = std::mem::take(&mut self.state) else {
            return Err(GestureRejection::NotDragging);
        };
        if self.locked {
            return Err(GestureRejection::Locked);
        }

        let table = tables
            .iter()
            .find(|table| table.id == session.table_id)
            .ok_or(GestureRejection::UnknownTable(session.table_id))?;

        Ok(PositionUpdate {
            id: table.id,
            x: table.position.x,
            y: table.position.y,
        })
    }

    /// Cambia el bloqueo. Si había un arrastre lo descarta sin tocar coordenadas;
    /// devuelve el id de la mesa que quedó congelada.
    pub fn set_locked(&mut self, locked: bool) -> Option<TableId> {
        self.locked = locked;
        if !locked {
            return None;
        }

        match std::mem::take(&mut self.state) {
            DragState::Dragging(session) => Some(session.table_id),
            DragState::Idle => None,
        }
    }

    /// Reescala el desplazamiento de agarre al nuevo tamaño del contenedor, para que
    /// la mesa no salte bajo el puntero si el plano cambia de tamaño a mitad de arrastre.
    pub fn rescale(&mut self, previous: Container, current: Container) {
        let DragState::Dragging(session) = &mut self.state else {
            return;
        };
        if previous.is_degenerate() {
            return;
        }

        session.grab_offset = Point::new(
            session.grab_offset.x * current.width / previous.width,
            session.grab_offset.y * current.height / previous.height,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TableVariant;

    fn container() -> Container {
        Container::new(1200.0, 700.0)
    }

    fn tables() -> Vec<Table> {
        vec![
            Table::new(1, NormalizedPoint::new(0.25, 0.5), "Mesa 1", TableVariant::Standard),
            Table::new(2, NormalizedPoint::new(0.5, 0.1), "Principal", TableVariant::Special),
        ]
    }

    fn position(tables: &[Table], id: TableId) -> NormalizedPoint {
        tables.iter().find(|t| t.id == id).unwrap().position
    }

    #[test]
    fn grabbing_keeps_the_table_under_the_pointer() {
        let mut tables = tables();
        let mut engine = DragEngine::new();

        // Mesa 1 está en (300, 350); se agarra 10px dentro
        engine.begin(Point::new(310.0, 360.0), 1, &tables, container()).unwrap();
        match engine.state() {
            DragState::Dragging(session) => assert_eq!(session.grab_offset, Point::new(10.0, 10.0)),
            DragState::Idle => panic!("expected a drag session"),
        }

        engine.move_to(Point::new(610.0, 80.0), &mut tables, container()).unwrap();

        assert_eq!(position(&tables, 1), NormalizedPoint::new(0.5, 0.1));
    }

    #[test]
    fn moves_are_clamped_even_far_outside() {
        let mut tables = tables();
        let mut engine = DragEngine::new();
        let container = container();

        engine.begin(Point::new(600.0, 70.0), 2, &tables, container).unwrap();
        for pointer in [
            Point::new(-9000.0, -9000.0),
            Point::new(9000.0, 9000.0),
            Point::new(1199.0, 1.0),
        ] {
            engine.move_to(pointer, &mut tables, container).unwrap();

            let absolute = container.to_absolute(position(&tables, 2));
            let footprint = container.footprint(TableVariant::Special);
            assert!(absolute.x >= 0.0 && absolute.y >= 0.0);
            assert!(absolute.x + footprint.width <= container.width + 1e-9);
            assert!(absolute.y + footprint.height <= container.height + 1e-9);
        }
    }

    #[test]
    fn end_emits_one_update_and_returns_to_idle() {
        let mut tables = tables();
        let mut engine = DragEngine::new();

        engine.begin(Point::new(300.0, 350.0), 1, &tables, container()).unwrap();
        engine.move_to(Point::new(120.0, 70.0), &mut tables, container()).unwrap();
        let update = engine.end(&tables).unwrap();

        assert_eq!(update, PositionUpdate { id: 1, x: 0.1, y: 0.1 });
        assert_eq!(engine.state(), DragState::Idle);
        assert_eq!(engine.end(&tables), Err(GestureRejection::NotDragging));
    }

    #[test]
    fn unknown_table_is_rejected() {
        let mut engine = DragEngine::new();

        let result = engine.begin(Point::default(), 99, &tables(), container());

        assert_eq!(result, Err(GestureRejection::UnknownTable(99)));
        assert_eq!(engine.state(), DragState::Idle);
    }

    #[test]
    fn second_begin_is_rejected_while_dragging() {
        let tables = tables();
        let mut engine = DragEngine::new();

        engine.begin(Point::new(300.0, 350.0), 1, &tables, container()).unwrap();
        let result = engine.begin(Point::new(600.0, 70.0), 2, &tables, container());

        assert_eq!(result, Err(GestureRejection::AlreadyDragging(1)));
        assert_eq!(engine.dragging(), Some(1));
    }

    #[test]
    fn locked_board_never_moves() {
        let mut tables = tables();
        let before = tables.clone();
        let mut engine = DragEngine::new();
        engine.set_locked(true);

        assert_eq!(
            engine.begin(Point::new(300.0, 350.0), 1, &tables, container()),
            Err(GestureRejection::Locked)
        );
        assert!(engine.move_to(Point::new(10.0, 10.0), &mut tables, container()).is_err());
        assert!(engine.end(&tables).is_err());

        assert_eq!(tables, before);
    }

    #[test]
    fn locking_mid_drag_freezes_the_last_rendered_position() {
        let mut tables = tables();
        let mut engine = DragEngine::new();

        engine.begin(Point::new(300.0, 350.0), 1, &tables, container()).unwrap();
        let rendered = engine.move_to(Point::new(900.0, 100.0), &mut tables, container()).unwrap();

        assert_eq!(engine.set_locked(true), Some(1));
        assert_eq!(position(&tables, 1), rendered);
        assert_eq!(engine.state(), DragState::Idle);

        assert!(engine.move_to(Point::new(50.0, 50.0), &mut tables, container()).is_err());
        assert!(engine.end(&tables).is_err());
        assert_eq!(position(&tables, 1), rendered);

        // Al desbloquear no se reanuda el arrastre anterior
        assert_eq!(engine.set_locked(false), None);
        assert_eq!(engine.end(&tables), Err(GestureRejection::NotDragging));
    }

    #[test]
    fn resize_mid_drag_keeps_the_grab_point_under_the_pointer() {
        let mut tables = tables();
        let mut engine = DragEngine::new();

        // Mesa 1 en (300, 350), agarrada 12x14 px dentro
        engine.begin(Point::new(312.0, 364.0), 1, &tables, container()).unwrap();

        let half = Container::new(600.0, 350.0);
        engine.rescale(container(), half);
        match engine.state() {
            DragState::Dragging(session) => assert_eq!(session.grab_offset, Point::new(6.0, 7.0)),
            DragState::Idle => panic!("expected a drag session"),
        }

        // Sin mover el puntero lógico la mesa sigue en su sitio relativo
        engine.move_to(Point::new(156.0, 182.0), &mut tables, half).unwrap();
        let moved = position(&tables, 1);
        assert!((moved.x - 0.25).abs() < 1e-9);
        assert!((moved.y - 0.5).abs() < 1e-9);
    }

    #[test]
    fn degenerate_container_makes_move_a_no_op() {
        let mut tables = tables();
        let mut engine = DragEngine::new();

        engine.begin(Point::new(0.0, 0.0), 1, &tables, Container::new(0.0, 0.0)).unwrap();
        let result = engine.move_to(Point::new(40.0, 40.0), &mut tables, Container::new(0.0, 0.0));

        assert_eq!(result, Err(GestureRejection::DegenerateContainer));
        assert_eq!(position(&tables, 1), NormalizedPoint::new(0.25, 0.5));
    }
}
