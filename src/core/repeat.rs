use super::buffer::TextBuffer;
use super::engine::Engine;
use super::operator::{OpTarget, Operator};
use super::position::{Position, Range};

/// The last buffer-modifying command, in replayable form. Insert-flavored
/// variants carry the text that was typed before leaving insert mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Insert { text: String },
    Delete { target: OpTarget, count: usize },
    Change { target: OpTarget, count: usize, text: String },
    ReplaceChar { ch: char, count: usize },
    DeleteChar { before: bool, count: usize },
    Substitute { count: usize, text: String },
}

impl<B: TextBuffer> Engine<B> {
    /// `.`: replay the last change at the current cursor. Replay never
    /// enters insert mode; typed text is re-applied directly.
    pub(crate) fn repeat_last_change(&mut self) {
        let change = match self.last_change.clone() {
            Some(c) => c,
            None => return,
        };
        match change {
            Change::Insert { text } => {
                let cursor = self.buffer.cursor();
                self.edit_insert(cursor, &text);
                self.buffer.set_cursor(end_of_insert(cursor, &text));
            }
            Change::Delete { target, count } => {
                self.apply_operator(Operator::Delete, target, count, false);
            }
            Change::Change { target, count, text } => {
                if let Some((range, reg_text, linewise)) =
                    self.resolve_target(Operator::Change, target, count)
                {
                    self.register.set(reg_text, linewise);
                    self.edit_delete(range);
                    self.edit_insert(range.start, &text);
                    self.buffer.set_cursor(end_of_insert(range.start, &text));
                }
            }
            Change::ReplaceChar { ch, count } => self.replace_chars(ch, count),
            Change::DeleteChar { before, count } => self.delete_char(before, count),
            Change::Substitute { count, text } => {
                let cursor = self.buffer.cursor();
                let n = count
                    .max(1)
                    .min(self.buffer.line_len(cursor.line).saturating_sub(cursor.col));
                if n > 0 {
                    let range = Range::new(cursor, Position::new(cursor.line, cursor.col + n));
                    self.register.set(self.buffer.text(range), false);
                    self.edit_delete(range);
                }
                self.edit_insert(cursor, &text);
                self.buffer.set_cursor(end_of_insert(cursor, &text));
            }
        }
    }
}

/// Cursor position after typing `text` at `pos`: on the last inserted
/// character, the way leaving insert mode puts it.
fn end_of_insert(pos: Position, text: &str) -> Position {
    let newlines = text.matches('\n').count();
    if newlines == 0 {
        Position::new(pos.line, (pos.col + text.chars().count()).saturating_sub(1))
    } else {
        let tail = text.rsplit('\n').next().unwrap_or("");
        Position::new(pos.line + newlines, tail.chars().count().saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_of_insert() {
        assert_eq!(end_of_insert(Position::new(1, 2), "abc"), Position::new(1, 4));
        assert_eq!(end_of_insert(Position::new(1, 2), "a\nbc"), Position::new(2, 1));
    }
}
