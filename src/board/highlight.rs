//! Programador del resaltado de una mesa.
//!
//! Secuencia de cada petición: limpiar ya, mostrar tras [`REVEAL_DELAY`] y limpiar
//! de nuevo tras [`DISPLAY_DURATION`]. La última petición siempre gana: los
//! temporizadores de peticiones anteriores llegan con un token obsoleto y se descartan.

use std::time::Duration;

use crate::models::TableId;
use crate::timer::{TimerRequest, TimerSlot, TimerToken};

/// Espera entre la limpieza y el nuevo resaltado, para que la limpieza llegue a pintarse
pub const REVEAL_DELAY: Duration = Duration::from_millis(50);

/// Tiempo que la mesa permanece resaltada
pub const DISPLAY_DURATION: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightPhase {
    /// Activar el resaltado de la mesa
    Reveal(TableId),
    /// Retirar el resaltado
    Expire,
}

pub type HighlightTimer = TimerRequest<HighlightPhase>;

#[derive(Debug, Default)]
pub struct HighlightScheduler {
    active: Option<TableId>,
    slot: TimerSlot,
}

impl HighlightScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<TableId> {
        self.active
    }

    /// Limpia el resaltado actual y programa el nuevo
    pub fn request(&mut self, table_id: TableId) -> HighlightTimer {
        self.active = None;
        let token = self.slot.arm();

        tracing::debug!(table_id = %table_id, generation = token.generation(), "Highlight requested");

        TimerRequest {
            token,
            delay: REVEAL_DELAY,
            payload: HighlightPhase::Reveal(table_id),
        }
    }

    /// Procesa el disparo de un temporizador; puede devolver el siguiente a programar
    pub fn on_timer(&mut self, token: TimerToken, phase: HighlightPhase) -> Option<HighlightTimer> {
        if !self.slot.fire(token) {
            tracing::trace!(generation = token.generation(), "Stale highlight timer ignored");
            return None;
        }

        match phase {
            HighlightPhase::Reveal(table_id) => {
                self.active = Some(table_id);
                Some(TimerRequest {
                    token: self.slot.arm(),
                    delay: DISPLAY_DURATION,
                    payload: HighlightPhase::Expire,
                })
            }
            HighlightPhase::Expire => {
                self.active = None;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fire(scheduler: &mut HighlightScheduler, timer: HighlightTimer) -> Option<HighlightTimer> {
        scheduler.on_timer(timer.token, timer.payload)
    }

    #[test]
    fn reveal_then_expire() {
        let mut scheduler = HighlightScheduler::new();

        let reveal = scheduler.request(3);
        assert_eq!(scheduler.active(), None);
        assert_eq!(reveal.delay, REVEAL_DELAY);

        let expire = fire(&mut scheduler, reveal).unwrap();
        assert_eq!(scheduler.active(), Some(3));
        assert_eq!(expire.delay, DISPLAY_DURATION);

        assert!(fire(&mut scheduler, expire).is_none());
        assert_eq!(scheduler.active(), None);
    }

    #[test]
    fn newer_request_supersedes_pending_reveal() {
        let mut scheduler = HighlightScheduler::new();

        let reveal_a = scheduler.request(1);
        let reveal_b = scheduler.request(2);

        assert!(fire(&mut scheduler, reveal_a).is_none());
        assert_eq!(scheduler.active(), None);

        let expire_b = fire(&mut scheduler, reveal_b).unwrap();
        assert_eq!(scheduler.active(), Some(2));
        fire(&mut scheduler, expire_b);
        assert_eq!(scheduler.active(), None);
    }

    #[test]
    fn newer_request_clears_a_visible_highlight() {
        let mut scheduler = HighlightScheduler::new();

        let reveal_a = scheduler.request(1);
        let expire_a = fire(&mut scheduler, reveal_a).unwrap();
        assert_eq!(scheduler.active(), Some(1));

        let reveal_again = scheduler.request(1);
        assert_eq!(scheduler.active(), None);

        // El vencimiento de la petición anterior ya no apaga la nueva
        assert!(fire(&mut scheduler, expire_a).is_none());
        fire(&mut scheduler, reveal_again).unwrap();
        assert_eq!(scheduler.active(), Some(1));
    }
}
