use crate::recommend::{GREETING, Suggestion};
use crate::service::models::Track;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Search,
    Player,
    Queue,
    Chat,
    Help,
}

impl Screen {
    pub const ALL: [Screen; 5] = [
        Screen::Search,
        Screen::Player,
        Screen::Queue,
        Screen::Chat,
        Screen::Help,
    ];

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }

    pub fn from_index(idx: usize) -> Self {
        Self::ALL[idx.min(Self::ALL.len() - 1)]
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            Screen::Search => "Search",
            Screen::Player => "Player",
            Screen::Queue => "Queue",
            Screen::Chat => "Chat",
            Screen::Help => "Help",
        }
    }

    /// Screens with a text input.
    pub fn has_input(self) -> bool {
        matches!(self, Screen::Search | Screen::Chat)
    }
}

/// Search and chat both have an input line above a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    List,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub created_at: std::time::Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ToastKind::Success,
            created_at: std::time::Instant::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ToastKind::Error,
            created_at: std::time::Instant::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() > std::time::Duration::from_secs(3)
    }
}

/// Cursor over a list rendered with virtual scrolling.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListCursor {
    pub selected: usize,
    pub scroll_offset: usize,
}

impl ListCursor {
    pub fn up(&mut self, by: usize) {
        self.selected = self.selected.saturating_sub(by);
    }

    pub fn down(&mut self, by: usize, len: usize) {
        if len > 0 {
            self.selected = (self.selected + by).min(len - 1);
        }
    }

    pub fn top(&mut self) {
        self.selected = 0;
        self.scroll_offset = 0;
    }

    pub fn bottom(&mut self, len: usize) {
        self.selected = len.saturating_sub(1);
    }

    /// Keeps `selected` within `len` after the list shrinks.
    pub fn clamp(&mut self, len: usize) {
        self.selected = self.selected.min(len.saturating_sub(1));
        self.scroll_offset = self.scroll_offset.min(self.selected);
    }

    pub fn update_scroll(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        } else if self.selected >= self.scroll_offset + visible_height {
            self.scroll_offset = self.selected - visible_height + 1;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub query: String,
    pub last_query: Option<String>,
    pub results: Vec<Track>,
    pub cursor: ListCursor,
    pub loading: bool,
}

impl SearchState {
    pub fn selected_track(&self) -> Option<&Track> {
        self.results.get(self.cursor.selected)
    }

    pub fn set_results(&mut self, query: String, results: Vec<Track>) {
        self.last_query = Some(query);
        self.results = results;
        self.cursor = ListCursor::default();
        self.loading = false;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Bot,
}

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub from: Speaker,
    pub text: String,
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Clone)]
pub struct ChatState {
    pub messages: Vec<ChatMessage>,
    pub input: String,
    pub cursor: ListCursor,
    pub pending: bool,
}

impl Default for ChatState {
    fn default() -> Self {
        Self {
            messages: vec![ChatMessage {
                from: Speaker::Bot,
                text: GREETING.to_string(),
                suggestions: Vec::new(),
            }],
            input: String::new(),
            cursor: ListCursor::default(),
            pending: false,
        }
    }
}

impl ChatState {
    /// Suggestions of the newest bot message; older ones are not selectable.
    pub fn suggestions(&self) -> &[Suggestion] {
        self.messages
            .iter()
            .rev()
            .find(|m| m.from == Speaker::Bot)
            .map(|m| m.suggestions.as_slice())
            .unwrap_or(&[])
    }

    pub fn selected_suggestion(&self) -> Option<&Suggestion> {
        self.suggestions().get(self.cursor.selected)
    }

    pub fn push_user(&mut self, text: String) {
        self.messages.push(ChatMessage {
            from: Speaker::User,
            text,
            suggestions: Vec::new(),
        });
        self.pending = true;
    }

    pub fn push_bot(&mut self, text: String, suggestions: Vec<Suggestion>) {
        self.messages.push(ChatMessage {
            from: Speaker::Bot,
            text,
            suggestions,
        });
        self.cursor = ListCursor::default();
        self.pending = false;
    }
}

/// UI-only state. Playback state lives in the coordinator.
pub struct AppState {
    pub should_quit: bool,
    pub tick: u64,

    pub screen: Screen,
    pub focus: Focus,

    pub search: SearchState,
    pub chat: ChatState,
    pub queue_cursor: ListCursor,
    pub lyrics_scroll: u16,

    pub show_lyrics: bool,
    pub minimized: bool,
    /// Set once the narrow-terminal auto-minimize has fired.
    pub auto_minimized: bool,

    pub toast: Option<Toast>,
    pub status: String,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            should_quit: false,
            tick: 0,
            screen: Screen::Search,
            focus: Focus::Input,
            search: SearchState::default(),
            chat: ChatState::default(),
            queue_cursor: ListCursor::default(),
            lyrics_scroll: 0,
            show_lyrics: false,
            minimized: false,
            auto_minimized: false,
            toast: None,
            status: String::new(),
        }
    }

    pub fn set_screen(&mut self, screen: Screen) {
        self.screen = screen;
        self.focus = if screen.has_input() { Focus::Input } else { Focus::List };
    }

    /// Text entry captures plain keys.
    pub fn typing(&self) -> bool {
        self.screen.has_input() && self.focus == Focus::Input
    }

    /// Minimizes the player the first time the terminal is narrower than
    /// `compact_width`. Later resizes leave the user's choice alone.
    pub fn on_resize(&mut self, width: u16, compact_width: u16) {
        if !self.auto_minimized && width < compact_width {
            self.minimized = true;
            self.auto_minimized = true;
        }
    }

    /// The sidebar is hidden while minimized.
    pub fn show_sidebar(&self) -> bool {
        !self.minimized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screens_cycle_both_ways() {
        assert_eq!(Screen::Help.next(), Screen::Search);
        assert_eq!(Screen::Search.prev(), Screen::Help);
        for s in Screen::ALL {
            assert_eq!(Screen::from_index(s.index()), s);
            assert_eq!(s.next().prev(), s);
        }
    }

    #[test]
    fn input_screens_start_in_input_focus() {
        let mut st = AppState::new();
        st.set_screen(Screen::Queue);
        assert!(!st.typing());
        st.set_screen(Screen::Chat);
        assert!(st.typing());
        st.focus = Focus::List;
        assert!(!st.typing());
    }

    #[test]
    fn auto_minimize_fires_once() {
        let mut st = AppState::new();
        st.on_resize(120, 60);
        assert!(!st.minimized);

        st.on_resize(40, 60);
        assert!(st.minimized);
        assert!(!st.show_sidebar());

        st.minimized = false;
        st.on_resize(30, 60);
        assert!(!st.minimized);
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut c = ListCursor::default();
        c.down(1, 0);
        assert_eq!(c.selected, 0);
        c.down(10, 3);
        assert_eq!(c.selected, 2);
        c.update_scroll(2);
        assert_eq!(c.scroll_offset, 1);
        c.clamp(1);
        assert_eq!((c.selected, c.scroll_offset), (0, 0));
    }

    #[test]
    fn chat_exposes_latest_bot_suggestions() {
        let mut chat = ChatState::default();
        assert!(chat.suggestions().is_empty());

        chat.push_user("happy".into());
        assert!(chat.pending);
        chat.push_bot("here".into(), vec![Suggestion::new("Happy", Some("Pharrell Williams"))]);
        chat.push_user("again".into());

        assert_eq!(chat.suggestions().len(), 1);
        assert_eq!(chat.selected_suggestion().map(|s| s.title.as_str()), Some("Happy"));
    }
}
