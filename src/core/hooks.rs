use super::mode::Mode;
use super::position::Range;

/// Status line contents reported after every processed key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub mode: Mode,
    pub line: usize,
    pub col: usize,
    /// Register name while a macro recording is active.
    pub recording: Option<char>,
    pub message: String,
}

/// Observer callbacks fired after committed mutations and mode transitions.
/// Consumed by the host's highlighting/plugin layer; every method has an
/// empty default body so hosts implement only what they need.
pub trait EditorHooks {
    fn on_mode_change(&mut self, _old: Mode, _new: Mode) {}

    /// `new_text` is empty for deletions; for insertions `range` is the
    /// zero-width range at the insertion point.
    fn on_text_change(&mut self, _range: Range, _new_text: &str) {}

    /// None when the visual selection is dismissed.
    fn on_selection_change(&mut self, _selection: Option<Range>) {}

    /// Cursor appearance (color/width) is keyed by mode; fired on every
    /// transition alongside `on_mode_change`.
    fn on_cursor_style(&mut self, _mode: Mode) {}

    fn on_status_change(&mut self, _status: &Status) {}

    /// A search landed on this span. Hosts should render it with a
    /// low-priority tag so syntax highlighting can layer over it.
    fn on_search_match(&mut self, _range: Range) {}
}

/// Hook sink that ignores everything.
pub struct NullHooks;

impl EditorHooks for NullHooks {}
