/// Blocking user-input collaborator. The engine suspends until a prompt
/// call returns; no other keystroke is processed in the meantime.
pub trait Prompt {
    /// Ask for a line of text. None means the dialog was cancelled.
    fn ask_string(&mut self, title: &str, label: &str) -> Option<String>;

    /// Ask a yes/no question (e.g. search wraparound confirmation).
    fn ask_yes_no(&mut self, title: &str, question: &str) -> bool;

    /// Blocking error notification.
    fn error(&mut self, title: &str, message: &str);
}

/// Prompt that cancels every dialog and swallows errors. Used when a host
/// supplies no prompt; search entry then simply does nothing.
pub struct NullPrompt;

impl Prompt for NullPrompt {
    fn ask_string(&mut self, _title: &str, _label: &str) -> Option<String> {
        None
    }

    fn ask_yes_no(&mut self, _title: &str, _question: &str) -> bool {
        false
    }

    fn error(&mut self, _title: &str, _message: &str) {}
}
