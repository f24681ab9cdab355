use std::cmp::Ordering;
use std::fmt;

use regex::Regex;
use ropey::Rope;

use super::position::{Direction, Position, Range};

/// Relative addressing expressions, evaluated against a base position.
/// This replaces host-specific index arithmetic ("+1c", "lineend", ...)
/// with a typed contract the engine can rely on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexExpr {
    /// Move by N characters, crossing line boundaries. A newline counts as
    /// one character.
    Chars(isize),
    /// Move by N lines, keeping the column (clamped by the caller).
    Lines(isize),
    LineStart,
    /// The column just past the last character of the line.
    LineEnd,
    FirstNonBlank,
    /// Last character of the current (or next) word-character run.
    WordEnd,
    BufferStart,
    BufferEnd,
}

/// The text storage contract the engine operates against. The engine never
/// owns text directly; hosts provide an implementation (or use the bundled
/// [`RopeBuffer`]). The buffer also owns the single authoritative cursor and
/// the undo history.
pub trait TextBuffer {
    /// Number of addressable lines. A trailing newline does not start an
    /// extra empty line; an empty buffer has one line.
    fn line_count(&self) -> usize;

    /// Character length of a line, excluding its newline.
    fn line_len(&self, line: usize) -> usize;

    /// Line content without the trailing newline.
    fn line_text(&self, line: usize) -> String;

    fn insert(&mut self, pos: Position, text: &str);

    fn delete(&mut self, range: Range);

    /// Regex search from `start` in `dir`, bounded by `stop` (exclusive)
    /// when given. Returns the matched span.
    fn search(
        &self,
        re: &Regex,
        start: Position,
        dir: Direction,
        stop: Option<Position>,
    ) -> Option<Range>;

    fn cursor(&self) -> Position;

    /// Move the cursor, clamping to valid buffer bounds.
    fn set_cursor(&mut self, pos: Position);

    /// Undo the last mutation. Returns false (and does nothing) when the
    /// history is empty.
    fn undo(&mut self) -> bool;

    fn redo(&mut self) -> bool;

    /// Character at `pos`; the position at a line's length is the newline.
    /// None past the end of the buffer or line.
    fn char_at(&self, pos: Position) -> Option<char> {
        if pos.line == 0 || pos.line > self.line_count() {
            return None;
        }
        let len = self.line_len(pos.line);
        if pos.col < len {
            self.line_text(pos.line).chars().nth(pos.col)
        } else if pos.col == len && pos.line < self.line_count() {
            Some('\n')
        } else {
            None
        }
    }

    /// Text covered by a half-open range.
    fn text(&self, range: Range) -> String {
        if range.is_empty() {
            return String::new();
        }
        let mut out = String::new();
        let last = self.line_count();
        let mut line = range.start.line.max(1);
        while line <= range.end.line && line <= last {
            let chars: Vec<char> = self.line_text(line).chars().collect();
            let from = if line == range.start.line {
                range.start.col
            } else {
                0
            };
            let to = if line == range.end.line {
                range.end.col
            } else {
                chars.len() + 1
            };
            for i in from..to {
                if i < chars.len() {
                    out.push(chars[i]);
                } else if line < last {
                    out.push('\n');
                }
            }
            line += 1;
        }
        out
    }

    /// Position ordering; `Less` when `a` comes before `b`.
    fn compare(&self, a: Position, b: Position) -> Ordering {
        a.cmp(&b)
    }

    /// The position just past the last character of the buffer.
    fn end_position(&self) -> Position {
        let last = self.line_count();
        Position::new(last, self.line_len(last))
    }

    /// Evaluate a relative addressing expression against `pos`.
    fn resolve(&self, pos: Position, expr: IndexExpr) -> Position {
        match expr {
            IndexExpr::Chars(n) => {
                let mut p = pos;
                if n >= 0 {
                    for _ in 0..n {
                        if p.col < self.line_len(p.line) {
                            p.col += 1;
                        } else if p.line < self.line_count() {
                            p.line += 1;
                            p.col = 0;
                        } else {
                            break;
                        }
                    }
                } else {
                    for _ in 0..n.unsigned_abs() {
                        if p.col > 0 {
                            p.col -= 1;
                        } else if p.line > 1 {
                            p.line -= 1;
                            p.col = self.line_len(p.line);
                        } else {
                            break;
                        }
                    }
                }
                p
            }
            IndexExpr::Lines(n) => {
                let line = if n >= 0 {
                    (pos.line + n as usize).min(self.line_count())
                } else {
                    pos.line.saturating_sub(n.unsigned_abs()).max(1)
                };
                Position::new(line, pos.col)
            }
            IndexExpr::LineStart => Position::new(pos.line, 0),
            IndexExpr::LineEnd => Position::new(pos.line, self.line_len(pos.line)),
            IndexExpr::FirstNonBlank => {
                let col = self
                    .line_text(pos.line)
                    .chars()
                    .position(|c| !c.is_whitespace())
                    .unwrap_or(0);
                Position::new(pos.line, col)
            }
            IndexExpr::WordEnd => {
                let mut p = pos;
                // Step onto the next word character run, then to its end.
                while let Some(c) = self.char_at(p) {
                    if c.is_alphanumeric() || c == '_' {
                        break;
                    }
                    p = self.resolve(p, IndexExpr::Chars(1));
                    if p == self.end_position() {
                        return pos;
                    }
                }
                loop {
                    let next = self.resolve(p, IndexExpr::Chars(1));
                    match self.char_at(next) {
                        Some(c) if c.is_alphanumeric() || c == '_' => p = next,
                        _ => break,
                    }
                }
                p
            }
            IndexExpr::BufferStart => Position::origin(),
            IndexExpr::BufferEnd => self.end_position(),
        }
    }
}

/// Reference [`TextBuffer`] backed by a rope, with snapshot-based undo.
/// Hosts embedding the engine in a widget with its own storage implement
/// the trait themselves instead.
#[derive(Debug, Clone)]
pub struct RopeBuffer {
    content: Rope,
    cursor: Position,
    undo_stack: Vec<(Rope, Position)>,
    redo_stack: Vec<(Rope, Position)>,
}

impl RopeBuffer {
    pub fn new() -> Self {
        Self {
            content: Rope::new(),
            cursor: Position::origin(),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    pub fn from_text(text: &str) -> Self {
        Self {
            content: Rope::from_str(text),
            cursor: Position::origin(),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    /// Visible line count; a trailing newline does not open a new line.
    fn visible_lines(&self) -> usize {
        let n = self.content.len_lines();
        if n > 1
            && self.content.len_chars() > 0
            && self.content.char(self.content.len_chars() - 1) == '\n'
        {
            n - 1
        } else {
            n
        }
    }

    fn pos_to_char(&self, pos: Position) -> usize {
        let line = pos.line.clamp(1, self.visible_lines());
        let start = self.content.line_to_char(line - 1);
        start + pos.col.min(self.line_len(line) + usize::from(line < self.visible_lines()))
    }

    fn char_to_pos(&self, idx: usize) -> Position {
        let idx = idx.min(self.content.len_chars());
        let line0 = self.content.char_to_line(idx);
        let line0 = line0.min(self.visible_lines().saturating_sub(1));
        Position::new(line0 + 1, idx - self.content.line_to_char(line0))
    }

    fn snapshot(&mut self) {
        self.undo_stack.push((self.content.clone(), self.cursor));
        self.redo_stack.clear();
    }

    fn clamp(&self, pos: Position) -> Position {
        let line = pos.line.clamp(1, self.visible_lines());
        Position::new(line, pos.col.min(self.line_len(line)))
    }
}

impl Default for RopeBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBuffer for RopeBuffer {
    fn line_count(&self) -> usize {
        self.visible_lines()
    }

    fn line_len(&self, line: usize) -> usize {
        if line == 0 || line > self.visible_lines() {
            return 0;
        }
        let l = self.content.line(line - 1);
        let n = l.len_chars();
        if n > 0 && l.char(n - 1) == '\n' {
            n - 1
        } else {
            n
        }
    }

    fn line_text(&self, line: usize) -> String {
        if line == 0 || line > self.visible_lines() {
            return String::new();
        }
        let l = self.content.line(line - 1);
        let mut s = l.to_string();
        if s.ends_with('\n') {
            s.pop();
        }
        s
    }

    fn char_at(&self, pos: Position) -> Option<char> {
        if pos.line == 0 || pos.line > self.visible_lines() {
            return None;
        }
        let idx = self.content.line_to_char(pos.line - 1) + pos.col;
        let len = self.line_len(pos.line);
        if pos.col < len || (pos.col == len && pos.line < self.visible_lines()) {
            Some(self.content.char(idx))
        } else {
            None
        }
    }

    fn text(&self, range: Range) -> String {
        if range.is_empty() {
            return String::new();
        }
        let start = self.pos_to_char(range.start);
        let end = self.pos_to_char(range.end).max(start);
        self.content.slice(start..end).to_string()
    }

    fn insert(&mut self, pos: Position, text: &str) {
        if text.is_empty() {
            return;
        }
        self.snapshot();
        let idx = self.pos_to_char(pos);
        self.content.insert(idx, text);
    }

    fn delete(&mut self, range: Range) {
        if range.is_empty() {
            return;
        }
        let start = self.pos_to_char(range.start);
        let end = self.pos_to_char(range.end);
        if start < end {
            self.snapshot();
            self.content.remove(start..end);
            self.cursor = self.clamp(self.cursor);
        }
    }

    fn search(
        &self,
        re: &Regex,
        start: Position,
        dir: Direction,
        stop: Option<Position>,
    ) -> Option<Range> {
        let text = self.content.to_string();
        let start_byte = self.content.char_to_byte(self.pos_to_char(start));
        let span = |m: regex::Match<'_>, base: usize| {
            let s = self.char_to_pos(self.content.byte_to_char(base + m.start()));
            let e = self.char_to_pos(self.content.byte_to_char(base + m.end()));
            Range::new(s, e)
        };
        match dir {
            Direction::Forward => {
                let end_byte = stop
                    .map(|p| self.content.char_to_byte(self.pos_to_char(p)))
                    .unwrap_or(text.len());
                if start_byte > end_byte {
                    return None;
                }
                re.find(&text[start_byte..end_byte])
                    .map(|m| span(m, start_byte))
            }
            Direction::Backward => {
                let from_byte = stop
                    .map(|p| self.content.char_to_byte(self.pos_to_char(p)))
                    .unwrap_or(0);
                if from_byte > start_byte {
                    return None;
                }
                re.find_iter(&text[from_byte..start_byte])
                    .last()
                    .map(|m| span(m, from_byte))
            }
        }
    }

    fn cursor(&self) -> Position {
        self.cursor
    }

    fn set_cursor(&mut self, pos: Position) {
        self.cursor = self.clamp(pos);
    }

    fn undo(&mut self) -> bool {
        match self.undo_stack.pop() {
            Some((content, cursor)) => {
                self.redo_stack
                    .push((std::mem::replace(&mut self.content, content), self.cursor));
                self.cursor = cursor;
                true
            }
            None => false,
        }
    }

    fn redo(&mut self) -> bool {
        match self.redo_stack.pop() {
            Some((content, cursor)) => {
                self.undo_stack
                    .push((std::mem::replace(&mut self.content, content), self.cursor));
                self.cursor = cursor;
                true
            }
            None => false,
        }
    }
}

impl fmt::Display for RopeBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::RegexBuilder;

    #[test]
    fn test_buffer_editing() {
        let mut buffer = RopeBuffer::new();
        buffer.insert(Position::origin(), "Hello");
        assert_eq!(buffer.to_string(), "Hello");

        buffer.insert(Position::new(1, 5), " World");
        assert_eq!(buffer.to_string(), "Hello World");

        buffer.delete(Range::new(Position::new(1, 5), Position::new(1, 11)));
        assert_eq!(buffer.to_string(), "Hello");
    }

    #[test]
    fn test_line_accounting() {
        let buffer = RopeBuffer::from_text("one\ntwo\n");
        assert_eq!(buffer.line_count(), 2);
        assert_eq!(buffer.line_len(1), 3);
        assert_eq!(buffer.line_text(2), "two");
        assert_eq!(buffer.char_at(Position::new(1, 3)), Some('\n'));
        assert_eq!(buffer.char_at(Position::new(2, 3)), None);
    }

    #[test]
    fn test_text_spanning_lines() {
        let buffer = RopeBuffer::from_text("ab\ncd\nef");
        let r = Range::new(Position::new(1, 1), Position::new(3, 1));
        assert_eq!(buffer.text(r), "b\ncd\ne");
    }

    #[test]
    fn test_undo_redo() {
        let mut buffer = RopeBuffer::from_text("abc");
        assert!(!buffer.undo());

        buffer.delete(Range::new(Position::new(1, 0), Position::new(1, 1)));
        assert_eq!(buffer.to_string(), "bc");
        assert!(buffer.undo());
        assert_eq!(buffer.to_string(), "abc");
        assert!(buffer.redo());
        assert_eq!(buffer.to_string(), "bc");
        assert!(!buffer.redo());
    }

    #[test]
    fn test_search_both_directions() {
        let buffer = RopeBuffer::from_text("foo bar\nbaz foo\n");
        let re = RegexBuilder::new("foo").multi_line(true).build().unwrap();

        let m = buffer
            .search(&re, Position::new(1, 1), Direction::Forward, None)
            .unwrap();
        assert_eq!(m.start, Position::new(2, 4));

        let m = buffer
            .search(&re, Position::new(2, 4), Direction::Backward, None)
            .unwrap();
        assert_eq!(m.start, Position::new(1, 0));

        assert!(buffer
            .search(&re, Position::new(2, 5), Direction::Forward, None)
            .is_none());
    }

    #[test]
    fn test_resolve_expressions() {
        let buffer = RopeBuffer::from_text("  hi there\nnext\n");
        let p = Position::new(1, 4);
        assert_eq!(buffer.resolve(p, IndexExpr::LineStart), Position::new(1, 0));
        assert_eq!(buffer.resolve(p, IndexExpr::LineEnd), Position::new(1, 10));
        assert_eq!(
            buffer.resolve(p, IndexExpr::FirstNonBlank),
            Position::new(1, 2)
        );
        // Crossing a line boundary costs one character for the newline.
        assert_eq!(
            buffer.resolve(Position::new(1, 10), IndexExpr::Chars(1)),
            Position::new(2, 0)
        );
        assert_eq!(
            buffer.resolve(Position::new(2, 0), IndexExpr::Chars(-1)),
            Position::new(1, 10)
        );
        // "hi" ends at col 3; from inside the word.
        assert_eq!(
            buffer.resolve(Position::new(1, 2), IndexExpr::WordEnd),
            Position::new(1, 3)
        );
    }
}
