//! Temporizadores cancelables con token de generación.
//!
//! Cada flujo (debounce de sugerencias, secuencia de resaltado) tiene un único
//! [`TimerSlot`]. Armar el slot invalida cualquier token anterior, así que un
//! temporizador que dispare tarde se descarta sin importar cuándo llegue.

use std::time::Duration;

/// Identifica un armado concreto de un [`TimerSlot`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

impl TimerToken {
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// Petición de temporizador que el host debe programar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerRequest<P> {
    pub token: TimerToken,
    pub delay: Duration,
    pub payload: P,
}

#[derive(Debug, Default)]
pub struct TimerSlot {
    generation: u64,
    pending: bool,
}

impl TimerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arma el slot; el token anterior deja de ser válido
    pub fn arm(&mut self) -> TimerToken {
        self.generation += 1;
        self.pending = true;
        TimerToken(self.generation)
    }

    pub fn cancel(&mut self) {
        if self.pending {
            self.generation += 1;
            self.pending = false;
        }
    }

    /// Consume el disparo si el token es el vigente. Devuelve `false` para disparos obsoletos.
    pub fn fire(&mut self, token: TimerToken) -> bool {
        if self.pending && token.0 == self.generation {
            self.pending = false;
            true
        } else {
            false
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}
