use crate::recommend::{Reply, Suggestion};
use crate::service::models::Track;

#[derive(Debug, Clone)]
pub enum Event {
    Input(InputEvent),
    Network(NetworkEvent),
}

#[derive(Debug, Clone)]
pub enum InputEvent {
    Key(crossterm::event::KeyEvent),
    Mouse(crossterm::event::MouseEvent),
    Resize { width: u16, height: u16 },
}

#[derive(Debug, Clone)]
pub enum NetworkEvent {
    Error(String),
    SearchResults { query: String, tracks: Vec<Track> },
    ChatReply(Reply),
    /// First search hit for a chosen suggestion.
    SuggestionFound { suggestion: Suggestion, track: Track },
    SuggestionMissing { suggestion: Suggestion },
}
