use super::buffer::TextBuffer;
use super::engine::{Engine, PendingInsert};
use super::mode::Mode;
use super::motion::{self, Motion};
use super::position::{Position, Range};
use super::repeat::Change;
use super::text_object::{self, ObjectPrefix, TextObject};

/// The three verbs that take a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Delete,
    Change,
    Yank,
}

/// What an operator acts on: a motion (`dw`), the doubled form (`dd`), or
/// a text object (`di(`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpTarget {
    Motion(Motion),
    Line,
    Object(ObjectPrefix, TextObject),
}

impl<B: TextBuffer> Engine<B> {
    /// Run an operator against its target. `record` is false when the call
    /// comes from `.` replay, so the repeat state is not clobbered.
    pub(crate) fn apply_operator(
        &mut self,
        op: Operator,
        target: OpTarget,
        count: usize,
        record: bool,
    ) {
        let (range, reg_text, linewise) = match self.resolve_target(op, target, count) {
            Some(r) => r,
            None => return,
        };

        // An empty target deletes and yanks nothing, and must leave the
        // register and repeat state alone; change still opens insert there.
        if range.is_empty() {
            if op != Operator::Change {
                return;
            }
        } else {
            self.register.set(reg_text, linewise);
        }
        match op {
            Operator::Yank => {
                if !linewise {
                    self.buffer.set_cursor(range.start);
                }
            }
            Operator::Delete => {
                self.edit_delete(range);
                let pos = if linewise {
                    let line = range.start.line.min(self.buffer.line_count());
                    Position::new(line, motion::first_non_blank(&self.buffer, line))
                } else {
                    range.start
                };
                self.buffer.set_cursor(pos);
                if record {
                    self.last_change = Some(Change::Delete { target, count });
                }
            }
            Operator::Change => {
                self.edit_delete(range);
                self.buffer.set_cursor(range.start);
                self.set_mode_with(
                    Mode::Insert,
                    Some(PendingInsert::Change {
                        target,
                        count,
                        record,
                    }),
                );
            }
        }
    }

    /// Resolve an operator target to the char range it covers, the text
    /// that goes into the register, and whether the yank is linewise. For
    /// a linewise change the range covers line content only, so `cc`
    /// leaves a line to type on.
    pub(crate) fn resolve_target(
        &self,
        op: Operator,
        target: OpTarget,
        count: usize,
    ) -> Option<(Range, String, bool)> {
        let cursor = self.buffer.cursor();
        match target {
            OpTarget::Motion(m) => {
                let range = motion::operator_range(&self.buffer, cursor, m, count, op)?;
                Some((range, self.buffer.text(range), false))
            }
            OpTarget::Line => {
                let (range, text) = motion::linewise_range(&self.buffer, cursor.line, count);
                let range = if op == Operator::Change {
                    let end_line =
                        (cursor.line + count.max(1) - 1).min(self.buffer.line_count());
                    Range::new(
                        Position::new(cursor.line, 0),
                        Position::new(end_line, self.buffer.line_len(end_line)),
                    )
                } else {
                    range
                };
                Some((range, text, true))
            }
            OpTarget::Object(prefix, obj) => {
                let range = text_object::resolve(&self.buffer, cursor, prefix, obj)?;
                Some((range, self.buffer.text(range), false))
            }
        }
    }

    /// `p`/`P`. Charwise text goes in at the cursor index; `p` leaves the
    /// cursor at the start of the pasted text, `P` just past it. Linewise
    /// text opens below/above the current line.
    pub(crate) fn put(&mut self, before: bool, count: usize) {
        if self.register.is_empty() {
            return;
        }
        let text = self.register.text().repeat(count.max(1));
        let cursor = self.buffer.cursor();

        if self.register.is_linewise() {
            if before {
                let at = Position::new(cursor.line, 0);
                self.edit_insert(at, &text);
                self.buffer.set_cursor(Position::new(
                    cursor.line,
                    motion::first_non_blank(&self.buffer, cursor.line),
                ));
            } else if cursor.line < self.buffer.line_count() {
                let at = Position::new(cursor.line + 1, 0);
                self.edit_insert(at, &text);
                self.buffer.set_cursor(Position::new(
                    cursor.line + 1,
                    motion::first_non_blank(&self.buffer, cursor.line + 1),
                ));
            } else {
                // No line below the last one to insert before; append
                // instead, moving the register's trailing newline in front.
                let at = self.buffer.end_position();
                let appended = format!("\n{}", text.trim_end_matches('\n'));
                self.edit_insert(at, &appended);
                self.buffer.set_cursor(Position::new(
                    cursor.line + 1,
                    motion::first_non_blank(&self.buffer, cursor.line + 1),
                ));
            }
        } else {
            self.edit_insert(cursor, &text);
            if before {
                self.buffer.set_cursor(advance_over(cursor, &text));
            } else {
                self.buffer.set_cursor(cursor);
            }
        }
    }

    /// `x`/`X`: delete characters on the current line.
    pub(crate) fn delete_char(&mut self, before: bool, count: usize) {
        let cursor = self.buffer.cursor();
        let count = count.max(1);
        let range = if before {
            let n = count.min(cursor.col);
            if n == 0 {
                return;
            }
            Range::new(Position::new(cursor.line, cursor.col - n), cursor)
        } else {
            let n = count.min(self.buffer.line_len(cursor.line).saturating_sub(cursor.col));
            if n == 0 {
                return;
            }
            Range::new(cursor, Position::new(cursor.line, cursor.col + n))
        };
        self.register.set(self.buffer.text(range), false);
        self.edit_delete(range);
        self.buffer.set_cursor(range.start);
        self.last_change = Some(Change::DeleteChar { before, count });
    }

    /// `s`: delete characters and enter insert mode in their place.
    pub(crate) fn substitute(&mut self, count: usize) {
        let cursor = self.buffer.cursor();
        let count = count.max(1);
        let n = count.min(self.buffer.line_len(cursor.line).saturating_sub(cursor.col));
        if n > 0 {
            let range = Range::new(cursor, Position::new(cursor.line, cursor.col + n));
            self.register.set(self.buffer.text(range), false);
            self.edit_delete(range);
        }
        self.set_mode_with(Mode::Insert, Some(PendingInsert::Substitute { count }));
    }

    /// `r`: overwrite characters in place without leaving normal mode.
    /// A count larger than what the line holds does nothing at all.
    pub(crate) fn replace_chars(&mut self, ch: char, count: usize) {
        let cursor = self.buffer.cursor();
        let n = count.max(1);
        if n > self.buffer.line_len(cursor.line).saturating_sub(cursor.col) {
            return;
        }
        let range = Range::new(cursor, Position::new(cursor.line, cursor.col + n));
        self.edit_delete(range);
        let replacement: String = std::iter::repeat(ch).take(n).collect();
        self.edit_insert(cursor, &replacement);
        self.buffer.set_cursor(Position::new(cursor.line, cursor.col + n - 1));
        self.last_change = Some(Change::ReplaceChar { ch, count });
    }

    /// Visual `>`/`<`: shift lines by one indent width.
    pub(crate) fn shift_lines(&mut self, first: usize, last: usize, right: bool) {
        const INDENT: &str = "    ";
        let last = last.min(self.buffer.line_count());
        for line in first..=last {
            if right {
                if self.buffer.line_len(line) > 0 {
                    self.edit_insert(Position::new(line, 0), INDENT);
                }
            } else {
                let leading = self
                    .buffer
                    .line_text(line)
                    .chars()
                    .take(INDENT.len())
                    .take_while(|c| *c == ' ')
                    .count();
                if leading > 0 {
                    self.edit_delete(Range::new(
                        Position::new(line, 0),
                        Position::new(line, leading),
                    ));
                }
            }
        }
    }
}

/// Position just past `text` when it is inserted at `pos`.
fn advance_over(pos: Position, text: &str) -> Position {
    let newlines = text.matches('\n').count();
    if newlines == 0 {
        Position::new(pos.line, pos.col + text.chars().count())
    } else {
        let tail = text.rsplit('\n').next().unwrap_or("");
        Position::new(pos.line + newlines, tail.chars().count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_over_single_line() {
        let p = advance_over(Position::new(2, 3), "abc");
        assert_eq!(p, Position::new(2, 6));
    }

    #[test]
    fn test_advance_over_multi_line() {
        let p = advance_over(Position::new(2, 3), "ab\ncdef");
        assert_eq!(p, Position::new(3, 4));
    }
}
