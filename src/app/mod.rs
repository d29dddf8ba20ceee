pub mod actions;
pub mod events;
pub mod services;
pub mod state;

use crate::config::Config;
use crate::input;
use crate::playback::{Coordinator, PlaybackEvent};
use crate::player::mpv::MpvHandle;
use crate::player::{NullTransport, Transport};
use crate::recommend::{Assistant, Suggestion};
use crate::service::api::ServiceClient;
use crate::tui::{self, TuiTerminal};
use actions::Action;
use events::{Event, NetworkEvent};
use services::Services;
use state::{AppState, Focus, Screen, Toast};
use std::sync::Arc;
use tokio::sync::mpsc;

const VOLUME_STEP: f64 = 0.05;
const SEEK_STEP: f64 = 10.0;
const PAGE: usize = 10;
/// Rows the list widgets scroll by when the real height isn't known yet.
const LIST_HEIGHT: usize = 20;

enum Incoming {
    App(Event),
    Playback(PlaybackEvent),
}

pub struct App {
    cfg: Config,
    config_path: std::path::PathBuf,
    state: AppState,
    service: ServiceClient,
    assistant: Assistant,
    coordinator: Coordinator,
    playback_rx: mpsc::Receiver<PlaybackEvent>,
}

impl App {
    pub async fn new(cfg: Config, config_path: std::path::PathBuf) -> anyhow::Result<Self> {
        let services = Services::from_config(&cfg)?;
        let mut state = AppState::new();

        let cache = services.lyrics_cache.clone();
        tokio::spawn(async move {
            match cache.prune().await {
                Ok(n) if n > 0 => tracing::info!(removed = n, "pruned cache"),
                Ok(_) => {}
                Err(e) => tracing::warn!("cache prune failed: {e:#}"),
            }
        });

        let (playback_tx, playback_rx) = mpsc::channel::<PlaybackEvent>(256);

        // Best-effort: without mpv the app still browses, chats and shows lyrics.
        let mpv_log = cfg.mpv_log_path();
        let transport: Arc<dyn Transport> = match MpvHandle::spawn(
            playback_tx.clone(),
            cfg.player.audio_device.as_deref(),
            Some(mpv_log.as_path()),
        )
        .await
        {
            Ok(h) => Arc::new(h),
            Err(e) => {
                tracing::warn!("mpv unavailable: {e:#}");
                state.toast = Some(Toast::error(format!("mpv disabled: {e:#}")));
                Arc::new(NullTransport)
            }
        };

        let coordinator = Coordinator::new(
            transport,
            services.resolver,
            services.lyrics,
            playback_tx,
            cfg.initial_volume(),
        );

        Ok(Self {
            cfg,
            config_path,
            state,
            service: services.service,
            assistant: services.assistant,
            coordinator,
            playback_rx,
        })
    }

    pub async fn run(&mut self, terminal: &mut TuiTerminal) -> anyhow::Result<()> {
        let (tx, mut rx) = mpsc::channel::<Event>(256);

        input::spawn_input_task(tx.clone(), self.cfg.input.mouse);
        // No ticker: redraws follow input, network and playback events.

        if let Ok(size) = terminal.size() {
            self.state.on_resize(size.width, self.cfg.ui.compact_width);
        }
        self.draw(terminal)?;

        loop {
            let next = tokio::select! {
                ev = rx.recv() => ev.map(Incoming::App),
                pe = self.playback_rx.recv() => pe.map(Incoming::Playback),
            };
            let Some(next) = next else { break };

            match next {
                Incoming::App(Event::Input(input_ev)) => {
                    if let Some(action) = input::map_input_to_action(&self.state, input_ev) {
                        self.handle_action(action, &tx).await;
                    }
                }
                Incoming::App(Event::Network(ne)) => self.handle_network(ne).await,
                Incoming::Playback(pe) => self.coordinator.handle_event(pe).await,
            }

            if self.state.should_quit {
                break;
            }

            self.state.tick = self.state.tick.wrapping_add(1);
            self.draw(terminal)?;
        }

        self.save_state_on_quit();
        Ok(())
    }

    fn draw(&mut self, terminal: &mut TuiTerminal) -> anyhow::Result<()> {
        tui::draw(
            terminal,
            &mut self.state,
            self.coordinator.state(),
            self.coordinator.queue(),
        )
    }

    fn save_state_on_quit(&mut self) {
        self.cfg.set_volume(self.coordinator.state().volume);
        if let Err(e) = crate::config::save(&self.cfg, Some(&self.config_path)) {
            tracing::warn!("saving config failed: {e:#}");
        }
    }

    async fn handle_action(&mut self, action: Action, tx: &mpsc::Sender<Event>) {
        match action {
            Action::Submit => match self.state.screen {
                Screen::Search => self.spawn_search(tx),
                Screen::Chat => self.spawn_chat(tx),
                _ => {}
            },
            Action::Activate => self.activate(tx).await,
            Action::EnqueueSelected => self.enqueue_selected(),
            Action::QueueClear => {
                self.coordinator.clear_queue();
                self.state.queue_cursor = Default::default();
                self.state.status = "Queue cleared".into();
            }
            Action::TogglePause => self.coordinator.toggle_playing().await,
            Action::SkipNext => self.coordinator.skip_next().await,
            Action::VolumeUp => {
                let v = self.coordinator.state().volume + VOLUME_STEP;
                self.coordinator.set_volume(v).await;
            }
            Action::VolumeDown => {
                let v = self.coordinator.state().volume - VOLUME_STEP;
                self.coordinator.set_volume(v).await;
            }
            Action::ToggleMute => self.coordinator.toggle_mute().await,
            Action::SeekForward => self.coordinator.seek_relative(SEEK_STEP).await,
            Action::SeekBack => self.coordinator.seek_relative(-SEEK_STEP).await,
            Action::Resize { width } => self.state.on_resize(width, self.cfg.ui.compact_width),
            _ => self.reduce(action),
        }
    }

    /// Enter: plays whatever the current screen has selected.
    async fn activate(&mut self, tx: &mpsc::Sender<Event>) {
        match self.state.screen {
            Screen::Search => {
                if let Some(track) = self.state.search.selected_track().cloned() {
                    self.state.status = format!("Loading {}", track.title);
                    self.coordinator.play_track(track).await;
                }
            }
            Screen::Chat => {
                if let Some(s) = self.state.chat.selected_suggestion().cloned() {
                    self.spawn_suggestion_lookup(s, tx);
                }
            }
            Screen::Queue => self.coordinator.skip_next().await,
            Screen::Player => self.coordinator.toggle_playing().await,
            Screen::Help => {}
        }
    }

    fn enqueue_selected(&mut self) {
        if self.state.screen != Screen::Search {
            return;
        }
        if let Some(track) = self.state.search.selected_track().cloned() {
            self.state.toast = Some(Toast::success(format!("Queued: {}", track.title)));
            self.coordinator.enqueue(track);
        }
    }

    fn spawn_search(&mut self, tx: &mpsc::Sender<Event>) {
        if self.state.search.loading {
            return;
        }
        let query = self.state.search.query.trim().to_string();
        if query.is_empty() {
            self.state.status = "Type a query first".into();
            return;
        }
        self.state.search.loading = true;
        self.state.status = format!("Searching: {query}");

        let service = self.service.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let ev = match service.search(&query).await {
                Ok(tracks) => NetworkEvent::SearchResults { query, tracks },
                Err(e) => NetworkEvent::Error(format!("Search failed: {e:#}")),
            };
            let _ = tx.send(Event::Network(ev)).await;
        });
    }

    fn spawn_chat(&mut self, tx: &mpsc::Sender<Event>) {
        if self.state.chat.pending {
            return;
        }
        let message = self.state.chat.input.trim().to_string();
        if message.is_empty() {
            return;
        }
        self.state.chat.input.clear();
        self.state.chat.push_user(message.clone());

        let assistant = self.assistant.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let reply = assistant.reply(&message).await;
            let _ = tx.send(Event::Network(NetworkEvent::ChatReply(reply))).await;
        });
    }

    fn spawn_suggestion_lookup(&mut self, suggestion: Suggestion, tx: &mpsc::Sender<Event>) {
        self.state.status = format!("Looking up {}", suggestion.label());
        let service = self.service.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let ev = match service.search(&suggestion.query()).await {
                Ok(tracks) => match tracks.into_iter().next() {
                    Some(track) => NetworkEvent::SuggestionFound { suggestion, track },
                    None => NetworkEvent::SuggestionMissing { suggestion },
                },
                Err(e) => NetworkEvent::Error(format!("Search failed: {e:#}")),
            };
            let _ = tx.send(Event::Network(ev)).await;
        });
    }

    async fn handle_network(&mut self, ne: NetworkEvent) {
        match ne {
            NetworkEvent::Error(e) => {
                tracing::warn!("{e}");
                self.state.search.loading = false;
                self.state.chat.pending = false;
                self.state.toast = Some(Toast::error(e.clone()));
                self.state.status = e;
            }
            NetworkEvent::SearchResults { query, tracks } => {
                let n = tracks.len();
                self.state.search.set_results(query, tracks);
                self.state.status = format!("Results: {n}");
                if n > 0 {
                    self.state.focus = Focus::List;
                }
            }
            NetworkEvent::ChatReply(reply) => {
                let has_suggestions = !reply.suggestions.is_empty();
                self.state.chat.push_bot(reply.text, reply.suggestions);
                if has_suggestions && self.state.screen == Screen::Chat {
                    self.state.focus = Focus::List;
                }
            }
            NetworkEvent::SuggestionFound { suggestion, track } => {
                tracing::info!(suggestion = %suggestion.label(), track_id = %track.id, "playing suggestion");
                self.state.status = format!("Loading {}", track.title);
                self.coordinator.play_track(track).await;
            }
            NetworkEvent::SuggestionMissing { suggestion } => {
                self.state.toast = Some(Toast::error(format!("No match for {}", suggestion.label())));
            }
        }
    }

    /// Pure UI state changes.
    fn reduce(&mut self, action: Action) {
        let st = &mut self.state;
        match action {
            Action::Quit => st.should_quit = true,
            Action::NextScreen => st.set_screen(st.screen.next()),
            Action::PrevScreen => st.set_screen(st.screen.prev()),
            Action::SetScreen(screen) => st.set_screen(screen),
            Action::SetFocus(f) => st.focus = f,
            Action::ToggleLyrics => st.show_lyrics = !st.show_lyrics,
            Action::ToggleMinimize => st.minimized = !st.minimized,
            Action::InputChar(c) => match st.screen {
                Screen::Search => st.search.query.push(c),
                Screen::Chat => st.chat.input.push(c),
                _ => {}
            },
            Action::Backspace => match st.screen {
                Screen::Search => {
                    st.search.query.pop();
                }
                Screen::Chat => {
                    st.chat.input.pop();
                }
                _ => {}
            },
            Action::ClearInput => match st.screen {
                Screen::Search => st.search.query.clear(),
                Screen::Chat => st.chat.input.clear(),
                _ => {}
            },
            Action::ListUp | Action::ListDown | Action::PageUp | Action::PageDown => {
                let (by, up) = match action {
                    Action::ListUp => (1, true),
                    Action::ListDown => (1, false),
                    Action::PageUp => (PAGE, true),
                    _ => (PAGE, false),
                };
                self.move_cursor(by, up);
            }
            Action::GoTop => {
                if let Some((cursor, _)) = self.active_cursor() {
                    cursor.top();
                } else {
                    self.state.lyrics_scroll = 0;
                }
            }
            Action::GoBottom => {
                if let Some((cursor, len)) = self.active_cursor() {
                    cursor.bottom(len);
                    cursor.update_scroll(LIST_HEIGHT);
                }
            }
            // Side-effecting actions are routed by handle_action.
            Action::Submit
            | Action::Activate
            | Action::EnqueueSelected
            | Action::QueueClear
            | Action::TogglePause
            | Action::SkipNext
            | Action::VolumeUp
            | Action::VolumeDown
            | Action::ToggleMute
            | Action::SeekForward
            | Action::SeekBack
            | Action::Resize { .. } => {}
        }
    }

    fn move_cursor(&mut self, by: usize, up: bool) {
        if let Some((cursor, len)) = self.active_cursor() {
            if up {
                cursor.up(by);
            } else {
                cursor.down(by, len);
            }
            cursor.update_scroll(LIST_HEIGHT);
        } else if self.state.screen == Screen::Player {
            let by = by as u16;
            self.state.lyrics_scroll = if up {
                self.state.lyrics_scroll.saturating_sub(by)
            } else {
                self.state.lyrics_scroll.saturating_add(by)
            };
        }
    }

    fn active_cursor(&mut self) -> Option<(&mut state::ListCursor, usize)> {
        match self.state.screen {
            Screen::Search => Some((&mut self.state.search.cursor, self.state.search.results.len())),
            Screen::Chat => {
                let len = self.state.chat.suggestions().len();
                Some((&mut self.state.chat.cursor, len))
            }
            Screen::Queue => Some((&mut self.state.queue_cursor, self.coordinator.queue().len())),
            Screen::Player | Screen::Help => None,
        }
    }
}
