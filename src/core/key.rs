/// A single input event as delivered by the host: the printable character
/// (if any), the symbolic key name, and modifier state. Owned so that macro
/// recordings can store the raw event stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// Symbolic key name ("Escape", "Return", "BackSpace", "Left", ...).
    /// For printable keys this is the character itself.
    pub name: String,
    /// The printable character, if the key produces one.
    pub ch: Option<char>,
    pub ctrl: bool,
}

impl KeyEvent {
    pub fn from_char(ch: char) -> Self {
        Self {
            name: ch.to_string(),
            ch: Some(ch),
            ctrl: false,
        }
    }

    pub fn special(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ch: None,
            ctrl: false,
        }
    }

    pub fn ctrl(ch: char) -> Self {
        Self {
            name: ch.to_string(),
            ch: Some(ch),
            ctrl: true,
        }
    }

    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }
}
