/// The unnamed yank register: last yanked/deleted/changed text plus whether
/// it was taken linewise. A single live instance per engine, overwritten by
/// every yank, delete and change.
#[derive(Debug, Clone, Default)]
pub struct Register {
    text: String,
    linewise: bool,
}

impl Register {
    pub fn set(&mut self, text: String, linewise: bool) {
        self.text = text;
        self.linewise = linewise;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_linewise(&self) -> bool {
        self.linewise
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
