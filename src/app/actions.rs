use super::state::Screen;

/// Everything a key press or mouse event can ask the app to do.
/// Input mapping produces these; the app loop consumes them.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,

    NextScreen,
    PrevScreen,
    SetScreen(Screen),
    FocusQuery,
    FocusResults,

    CursorUp,
    CursorDown,
    CursorTop,
    CursorBottom,
    PageUp,
    PageDown,
    PlaySelected,

    QueryChar(char),
    QueryBackspace,
    QueryClear,
    SubmitSearch,
    Refetch,

    TogglePause,
    Stop,
    NextTrack,
    PrevTrack,
    VolumeUp,
    VolumeDown,
    ToggleMute,
    SeekForward,
    SeekBack,
    CycleRepeat,
    ToggleShuffle,

    EnqueueSelected,
    RemoveFromQueue,
    ClearQueue,
    MoveTrackUp,
    MoveTrackDown,

    Redraw,
}
