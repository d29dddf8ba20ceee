use super::state::{Focus, Screen};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    NextScreen,
    PrevScreen,
    SetScreen(Screen),
    SetFocus(Focus),

    ListUp,
    ListDown,
    GoTop,
    GoBottom,
    PageUp,
    PageDown,

    InputChar(char),
    Backspace,
    ClearInput,
    /// Run the search, or send the chat message.
    Submit,
    /// Play the selected search result, suggestion, or queue head.
    Activate,
    EnqueueSelected,
    QueueClear,

    TogglePause,
    SkipNext,
    VolumeUp,
    VolumeDown,
    ToggleMute,
    SeekForward,
    SeekBack,

    ToggleLyrics,
    ToggleMinimize,

    Resize { width: u16 },
}
