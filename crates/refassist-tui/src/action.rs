/// A user intent decoded from a terminal event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    Tick,
    Resize(u16, u16),

    // Navigation
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    GoTop,
    GoBottom,
    DrillIn,
    NavigateBack,
    ToggleHelp,
    /// Switch between the Paste and Upload tabs.
    ToggleView,

    // Text editing
    StartEditing,
    InsertChar(char),
    InsertNewline,
    Backspace,
    /// Bracketed paste from the terminal.
    Paste(String),

    // Check surface
    Check,
    Clear,
    CopyReport,
    DownloadReport,

    // Upload surface
    AddFiles,
    ToggleSelect,
    ProcessFiles,
    RemoveFile,
    ClearFiles,

    ToggleTheme,
    None,
}
