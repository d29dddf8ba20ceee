use crate::app::actions::Action;
use crate::app::events::{Event, InputEvent};
use crate::app::state::{AppState, Focus, Screen};
use crossterm::event::{
    self, Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind,
};
use tokio::sync::mpsc;

pub fn spawn_input_task(tx: mpsc::Sender<Event>, mouse_enabled: bool) {
    tokio::task::spawn_blocking(move || {
        loop {
            if !event::poll(std::time::Duration::from_millis(250)).unwrap_or(false) {
                continue;
            }
            let ev = match event::read() {
                Ok(CtEvent::Key(k)) if k.kind == KeyEventKind::Press => InputEvent::Key(k),
                Ok(CtEvent::Mouse(m)) if mouse_enabled => InputEvent::Mouse(m),
                Ok(CtEvent::Resize(width, height)) => InputEvent::Resize { width, height },
                Ok(_) => continue,
                Err(e) => {
                    tracing::debug!("terminal read failed: {e}");
                    continue;
                }
            };
            if tx.blocking_send(Event::Input(ev)).is_err() {
                break;
            }
        }
    });
}

pub fn map_input_to_action(state: &AppState, ev: InputEvent) -> Option<Action> {
    match ev {
        InputEvent::Resize { width, .. } => Some(Action::Resize { width }),
        InputEvent::Mouse(m) => match m.kind {
            MouseEventKind::ScrollUp => Some(Action::ListUp),
            MouseEventKind::ScrollDown => Some(Action::ListDown),
            _ => None,
        },
        InputEvent::Key(k) if is_ctrl(k, 'c') => Some(Action::Quit),
        InputEvent::Key(k) if state.typing() => handle_text_input(state, k),
        InputEvent::Key(k) => handle_normal_mode(state, k),
    }
}

fn is_ctrl(k: KeyEvent, c: char) -> bool {
    k.code == KeyCode::Char(c) && k.modifiers.contains(KeyModifiers::CONTROL)
}

fn handle_text_input(state: &AppState, k: KeyEvent) -> Option<Action> {
    let has_list = match state.screen {
        Screen::Search => !state.search.results.is_empty(),
        Screen::Chat => !state.chat.suggestions().is_empty(),
        _ => false,
    };
    match k.code {
        KeyCode::Esc => Some(Action::SetFocus(Focus::List)),
        KeyCode::Down if has_list => Some(Action::SetFocus(Focus::List)),
        KeyCode::Tab => Some(Action::NextScreen),
        KeyCode::BackTab => Some(Action::PrevScreen),
        KeyCode::Enter => Some(Action::Submit),
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::Char('u') if k.modifiers.contains(KeyModifiers::CONTROL) => Some(Action::ClearInput),
        KeyCode::Char(c) => Some(Action::InputChar(c)),
        _ => None,
    }
}

fn handle_normal_mode(state: &AppState, k: KeyEvent) -> Option<Action> {
    match k.code {
        KeyCode::Char('q') => Some(Action::Quit),

        // Navigation - vim style
        KeyCode::Up | KeyCode::Char('k') => Some(Action::ListUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::ListDown),
        KeyCode::Char('g') => Some(Action::GoTop),
        KeyCode::Char('G') => Some(Action::GoBottom),
        KeyCode::Char('d') if k.modifiers.contains(KeyModifiers::CONTROL) => Some(Action::PageDown),
        KeyCode::Char('u') if k.modifiers.contains(KeyModifiers::CONTROL) => Some(Action::PageUp),
        KeyCode::PageDown => Some(Action::PageDown),
        KeyCode::PageUp => Some(Action::PageUp),

        // Screens
        KeyCode::Tab => Some(Action::NextScreen),
        KeyCode::BackTab => Some(Action::PrevScreen),
        KeyCode::Char(c @ '1'..='5') => {
            let idx = c as usize - '1' as usize;
            Some(Action::SetScreen(Screen::from_index(idx)))
        }
        KeyCode::Char('?') | KeyCode::F(1) => Some(Action::SetScreen(Screen::Help)),
        KeyCode::Char('/') | KeyCode::Char('i') | KeyCode::Esc if state.screen.has_input() => {
            Some(Action::SetFocus(Focus::Input))
        }
        KeyCode::Char('/') => Some(Action::SetScreen(Screen::Search)),

        // Playback
        KeyCode::Char(' ') => Some(Action::TogglePause),
        KeyCode::Char('n') => Some(Action::SkipNext),
        KeyCode::Char('=') | KeyCode::Char('+') => Some(Action::VolumeUp),
        KeyCode::Char('-') | KeyCode::Char('_') => Some(Action::VolumeDown),
        KeyCode::Char('M') => Some(Action::ToggleMute),
        KeyCode::Char(']') => Some(Action::SeekForward),
        KeyCode::Char('[') => Some(Action::SeekBack),

        // Layout
        KeyCode::Char('y') => Some(Action::ToggleLyrics),
        KeyCode::Char('m') => Some(Action::ToggleMinimize),

        // Selection
        KeyCode::Enter => Some(Action::Activate),
        KeyCode::Char('a') if state.screen == Screen::Search => Some(Action::EnqueueSelected),
        KeyCode::Char('c') if state.screen == Screen::Queue => Some(Action::QueueClear),

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::models::Track;

    fn key(c: KeyCode) -> InputEvent {
        InputEvent::Key(KeyEvent::new(c, KeyModifiers::NONE))
    }

    fn ch(c: char) -> InputEvent {
        key(KeyCode::Char(c))
    }

    fn on(screen: Screen, focus: Focus) -> AppState {
        let mut st = AppState::new();
        st.set_screen(screen);
        st.focus = focus;
        st
    }

    #[test]
    fn typing_captures_letters() {
        let st = on(Screen::Search, Focus::Input);
        assert_eq!(map_input_to_action(&st, ch('q')), Some(Action::InputChar('q')));
        assert_eq!(map_input_to_action(&st, ch(' ')), Some(Action::InputChar(' ')));
        assert_eq!(map_input_to_action(&st, key(KeyCode::Enter)), Some(Action::Submit));
        assert_eq!(
            map_input_to_action(&st, key(KeyCode::Esc)),
            Some(Action::SetFocus(Focus::List))
        );
    }

    #[test]
    fn down_leaves_input_only_with_results() {
        let mut st = on(Screen::Search, Focus::Input);
        assert_eq!(map_input_to_action(&st, key(KeyCode::Down)), None);
        st.search.results.push(Track::new("a", "A"));
        assert_eq!(
            map_input_to_action(&st, key(KeyCode::Down)),
            Some(Action::SetFocus(Focus::List))
        );
    }

    #[test]
    fn player_keys_outside_text_input() {
        let st = on(Screen::Queue, Focus::List);
        let cases = [
            (ch(' '), Action::TogglePause),
            (ch('n'), Action::SkipNext),
            (ch('+'), Action::VolumeUp),
            (ch('-'), Action::VolumeDown),
            (ch('M'), Action::ToggleMute),
            (ch(']'), Action::SeekForward),
            (ch('['), Action::SeekBack),
            (ch('y'), Action::ToggleLyrics),
            (ch('m'), Action::ToggleMinimize),
            (ch('c'), Action::QueueClear),
            (ch('q'), Action::Quit),
        ];
        for (ev, want) in cases {
            assert_eq!(map_input_to_action(&st, ev), Some(want));
        }
    }

    #[test]
    fn enqueue_only_from_search_results() {
        assert_eq!(
            map_input_to_action(&on(Screen::Search, Focus::List), ch('a')),
            Some(Action::EnqueueSelected)
        );
        assert_eq!(map_input_to_action(&on(Screen::Player, Focus::List), ch('a')), None);
    }

    #[test]
    fn slash_focuses_an_input() {
        assert_eq!(
            map_input_to_action(&on(Screen::Chat, Focus::List), ch('/')),
            Some(Action::SetFocus(Focus::Input))
        );
        assert_eq!(
            map_input_to_action(&on(Screen::Player, Focus::List), ch('/')),
            Some(Action::SetScreen(Screen::Search))
        );
    }

    #[test]
    fn number_keys_pick_screens() {
        let st = on(Screen::Player, Focus::List);
        assert_eq!(map_input_to_action(&st, ch('4')), Some(Action::SetScreen(Screen::Chat)));
        assert_eq!(map_input_to_action(&st, ch('9')), None);
    }

    #[test]
    fn ctrl_c_quits_even_while_typing() {
        let st = on(Screen::Chat, Focus::Input);
        let ev = InputEvent::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(map_input_to_action(&st, ev), Some(Action::Quit));
    }
}
