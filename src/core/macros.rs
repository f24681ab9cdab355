use std::collections::HashMap;

use super::key::KeyEvent;

/// Keystroke macros keyed by register letter. While recording, every
/// incoming key is pushed before dispatch, so the terminating `q` lands in
/// the buffer too and is popped off at stop time.
#[derive(Debug, Default)]
pub struct MacroRecorder {
    store: HashMap<char, Vec<KeyEvent>>,
    recording: Option<(char, Vec<KeyEvent>)>,
}

impl MacroRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_recording(&self) -> bool {
        self.recording.is_some()
    }

    pub fn recording_register(&self) -> Option<char> {
        self.recording.as_ref().map(|(reg, _)| *reg)
    }

    /// Begin recording into `register`, clearing any previous contents.
    pub fn start(&mut self, register: char) {
        self.recording = Some((register, Vec::new()));
    }

    pub fn push(&mut self, key: KeyEvent) {
        if let Some((_, keys)) = self.recording.as_mut() {
            keys.push(key);
        }
    }

    /// Finish recording. The trailing stop key was captured along with
    /// everything else and is dropped here.
    pub fn stop(&mut self) -> Option<char> {
        let (register, mut keys) = self.recording.take()?;
        keys.pop();
        self.store.insert(register, keys);
        Some(register)
    }

    pub fn get(&self, register: char) -> Option<&[KeyEvent]> {
        self.store.get(&register).map(|keys| keys.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_drops_trailing_key() {
        let mut rec = MacroRecorder::new();
        rec.start('a');
        rec.push(KeyEvent::from_char('x'));
        rec.push(KeyEvent::from_char('j'));
        rec.push(KeyEvent::from_char('q'));
        assert_eq!(rec.stop(), Some('a'));
        let keys = rec.get('a').unwrap();
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0].ch, Some('x'));
        assert_eq!(keys[1].ch, Some('j'));
    }

    #[test]
    fn test_restart_clears_register() {
        let mut rec = MacroRecorder::new();
        rec.start('a');
        rec.push(KeyEvent::from_char('x'));
        rec.push(KeyEvent::from_char('q'));
        rec.stop();
        rec.start('a');
        rec.push(KeyEvent::from_char('q'));
        rec.stop();
        assert!(rec.get('a').unwrap().is_empty());
    }

    #[test]
    fn test_push_ignored_when_idle() {
        let mut rec = MacroRecorder::new();
        rec.push(KeyEvent::from_char('x'));
        assert!(!rec.is_recording());
        assert!(rec.get('x').is_none());
    }
}
