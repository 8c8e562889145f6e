//! # Host
//!
//! Compone el buscador y el plano. Procesa los eventos estrictamente de uno en uno
//! en una única tarea de tokio, así que el estado nunca se comparte entre tareas:
//!
//! ```text
//! teclado → SearchController (debounce) → sugerencias
//! búsqueda confirmada → Selection → SelectTable + RequestScroll → SeatingBoard::highlight
//! puntero/táctil → SeatingBoard (DragEngine) → POST /position al soltar
//! ```
//!
//! Los temporizadores son tareas `sleep` que publican un evento con su token; las
//! llamadas de red son tareas que publican su resultado. Nada más suspende.

mod events;

pub use events::{HostView, Notification, UiInput};

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::api::{ErrorLogExt, GuestService};
use crate::board::coords::{Container, Point};
use crate::board::highlight::HighlightTimer;
use crate::board::SeatingBoard;
use crate::search::{SearchController, SearchEffect, Selection};
use events::HostEvent;

/// Extremos del host que usa la página
pub struct HostHandle {
    pub inputs: mpsc::UnboundedSender<UiInput>,
    pub notifications: mpsc::UnboundedReceiver<Notification>,
    pub views: watch::Receiver<HostView>,
}

pub struct Host {
    service: Arc<dyn GuestService>,
    board: SeatingBoard,
    search: SearchController,
    inputs: mpsc::UnboundedReceiver<UiInput>,
    events_tx: mpsc::UnboundedSender<HostEvent>,
    events_rx: mpsc::UnboundedReceiver<HostEvent>,
    notifications: mpsc::UnboundedSender<Notification>,
    views: watch::Sender<HostView>,
    suggestion_timer: Option<JoinHandle<()>>,
    highlight_timer: Option<JoinHandle<()>>,
}

impl Host {
    pub fn new(service: Arc<dyn GuestService>, container: Container) -> (Self, HostHandle) {
        let (inputs_tx, inputs) = mpsc::unbounded_channel();
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (notifications, notifications_rx) = mpsc::unbounded_channel();

        let board = SeatingBoard::new(container);
        let search = SearchController::new();
        let (views, views_rx) = watch::channel(HostView {
            board: board.view(),
            search: search.view(),
        });

        let host = Self {
            service,
            board,
            search,
            inputs,
            events_tx,
            events_rx,
            notifications,
            views,
            suggestion_timer: None,
            highlight_timer: None,
        };

        let handle = HostHandle {
            inputs: inputs_tx,
            notifications: notifications_rx,
            views: views_rx,
        };

        (host, handle)
    }

    pub fn view(&self) -> HostView {
        HostView {
            board: self.board.view(),
            search: self.search.view(),
        }
    }

    /// Monta el plano y procesa eventos hasta que la página cierra su canal de entrada
    pub async fn run(mut self) {
        self.mount();
        self.publish();

        loop {
            let next = tokio::select! {
                input = self.inputs.recv() => input.map(HostEvent::Input),
                Some(event) = self.events_rx.recv() => Some(event),
            };

            let Some(event) = next else {
                break;
            };

            self.dispatch(event);
            self.publish();
        }

        tracing::info!("Página cerrada, deteniendo host");
        for timer in [self.suggestion_timer.take(), self.highlight_timer.take()]
            .into_iter()
            .flatten()
        {
            timer.abort();
        }
    }

    fn mount(&mut self) {
        if !self.board.begin_load() {
            return;
        }

        let service = Arc::clone(&self.service);
        self.spawn_request(
            async move { service.tables().await.log_error_context("cargando mesas") },
            HostEvent::TablesLoaded,
        );
    }

    fn dispatch(&mut self, event: HostEvent) {
        match event {
            HostEvent::Input(input) => self.on_input(input),
            HostEvent::SuggestionDebounce(token) => {
                let effect = self.search.on_debounce_elapsed(token);
                self.apply(effect);
            }
            HostEvent::Highlight(token, phase) => {
                if let Some(next) = self.board.on_highlight_timer(token, phase) {
                    self.schedule_highlight(next);
                }
            }
            HostEvent::TablesLoaded(result) => self.board.on_tables_loaded(result),
            HostEvent::SuggestionsLoaded(result) => self.search.on_suggestions(result),
            HostEvent::LookupFinished { ticket, result } => {
                if let Some(selection) = self.search.on_lookup(ticket, result) {
                    self.forward_selection(selection);
                }
            }
            HostEvent::AttendanceFinished { guest_id, result } => {
                if let Some(outcome) = self.search.on_attendance(guest_id, result) {
                    self.notify(Notification::AttendanceMarked {
                        outcome,
                        message: outcome.message().to_string(),
                    });
                }
            }
        }
    }

    fn on_input(&mut self, input: UiInput) {
        match input {
            UiInput::Resize { width, height } => self.board.resize(Container::new(width, height)),
            UiInput::Text { value } => {
                let effect = self.search.on_text_changed(value);
                self.apply(effect);
            }
            UiInput::Submit => {
                let effect = self.search.submit();
                self.apply(effect);
            }
            UiInput::PickSuggestion { name } => {
                let effect = self.search.pick_suggestion(name);
                self.apply(effect);
            }
            UiInput::MarkAttendance => {
                let effect = self.search.mark_attendance();
                self.apply(effect);
            }
            UiInput::SetLocked { locked } => self.board.set_locked(locked),
            UiInput::MouseDown { x, y, table_id } | UiInput::TouchStart { x, y, table_id } => {
                self.board.pointer_down(Point::new(x, y), table_id)
            }
            UiInput::MouseMove { x, y } | UiInput::TouchMove { x, y } => {
                self.board.pointer_move(Point::new(x, y))
            }
            UiInput::MouseUp | UiInput::MouseLeave | UiInput::TouchEnd | UiInput::TouchCancel => {
                self.release_pointer()
            }
        }
    }

    /// Persistencia sin esperar respuesta: los fallos se registran y no se reintentan
    fn release_pointer(&mut self) {
        let Some(update) = self.board.pointer_up() else {
            return;
        };

        let service = Arc::clone(&self.service);
        tokio::spawn(async move {
            let _ = service
                .update_position(&update)
                .await
                .log_error_context("persistiendo posición de mesa");
        });
    }

    fn forward_selection(&mut self, selection: Selection) {
        self.notify(Notification::SelectTable {
            table_id: selection.table_id,
        });
        self.notify(Notification::RequestScroll);

        if let Some(timer) = self.board.highlight(selection.table_id) {
            self.schedule_highlight(timer);
        }
    }

    fn apply(&mut self, effect: Option<SearchEffect>) {
        match effect {
            Some(SearchEffect::ScheduleSuggestions(timer)) => {
                if let Some(previous) = self.suggestion_timer.take() {
                    previous.abort();
                }
                self.suggestion_timer =
                    Some(self.schedule(timer.delay, HostEvent::SuggestionDebounce(timer.token)));
            }
            Some(SearchEffect::FetchSuggestions { query }) => {
                let service = Arc::clone(&self.service);
                self.spawn_request(
                    async move {
                        service
                            .suggestions(&query)
                            .await
                            .log_error_level("obteniendo sugerencias", tracing::Level::WARN)
                    },
                    HostEvent::SuggestionsLoaded,
                );
            }
            Some(SearchEffect::Lookup { ticket, name }) => {
                let service = Arc::clone(&self.service);
                self.spawn_request(
                    async move { service.search(&name).await.log_error_context("buscando invitado") },
                    move |result| HostEvent::LookupFinished { ticket, result },
                );
            }
            Some(SearchEffect::MarkAttendance { guest_id }) => {
                let service = Arc::clone(&self.service);
                self.spawn_request(
                    async move {
                        service
                            .mark_attendance(guest_id)
                            .await
                            .log_error_context("marcando asistencia")
                    },
                    move |result| HostEvent::AttendanceFinished { guest_id, result },
                );
            }
            None => {}
        }

        // Un debounce cancelado no debe quedar durmiendo
        if !self.search.is_debounce_pending() {
            if let Some(timer) = self.suggestion_timer.take() {
                timer.abort();
            }
        }
    }

    fn schedule_highlight(&mut self, timer: HighlightTimer) {
        if let Some(previous) = self.highlight_timer.take() {
            previous.abort();
        }
        self.highlight_timer = Some(self.schedule(
            timer.delay,
            HostEvent::Highlight(timer.token, timer.payload),
        ));
    }

    fn schedule(&self, delay: Duration, event: HostEvent) -> JoinHandle<()> {
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(event);
        })
    }

    fn spawn_request<F, T, W>(&self, request: F, wrap: W)
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
        W: FnOnce(T) -> HostEvent + Send + 'static,
    {
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let output = request.await;
            let _ = events.send(wrap(output));
        });
    }

    fn notify(&self, notification: Notification) {
        if self.notifications.send(notification).is_err() {
            tracing::trace!("Notification dropped, page is gone");
        }
    }

    fn publish(&self) {
        let view = self.view();
        self.views.send_if_modified(|current| {
            if *current == view {
                false
            } else {
                *current = view;
                true
            }
        });
    }
}
