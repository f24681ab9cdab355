use super::buffer::TextBuffer;
use super::operator::Operator;
use super::position::{Position, Range};

/// A command token that computes a new cursor position without altering
/// text. `G`/`gg` and `%` are dispatched separately because they carry
/// their own argument shapes (line number, bracket family).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Left,
    Down,
    Up,
    Right,
    WordForward,
    WordBack,
    WordEnd,
    BigWordForward,
    BigWordBack,
    BigWordEnd,
    LineStart,
    LineEnd,
    FirstNonBlank,
    Find { kind: FindKind, ch: char },
}

/// The `f`/`F`/`t`/`T` family: jump to (or just before/after) a character
/// on the current line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindKind {
    Forward,
    Backward,
    Till,
    TillBackward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Whitespace,
    Word,
    Punct,
}

pub(crate) fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

fn class(ch: char) -> CharClass {
    if ch.is_whitespace() {
        CharClass::Whitespace
    } else if is_word_char(ch) {
        CharClass::Word
    } else {
        CharClass::Punct
    }
}

/// Whitespace/non-whitespace classification for the WORD motions.
fn big_class(ch: char) -> CharClass {
    if ch.is_whitespace() {
        CharClass::Whitespace
    } else {
        CharClass::Word
    }
}

pub(crate) fn step_forward(buf: &dyn TextBuffer, pos: Position) -> Option<Position> {
    if pos.col < buf.line_len(pos.line) {
        Some(Position::new(pos.line, pos.col + 1))
    } else if pos.line < buf.line_count() {
        Some(Position::new(pos.line + 1, 0))
    } else {
        None
    }
}

pub(crate) fn step_back(buf: &dyn TextBuffer, pos: Position) -> Option<Position> {
    if pos.col > 0 {
        Some(Position::new(pos.line, pos.col - 1))
    } else if pos.line > 1 {
        Some(Position::new(pos.line - 1, buf.line_len(pos.line - 1)))
    } else {
        None
    }
}

/// Resolve a motion to a destination. None means the motion found no
/// target (only the find family can fail); the caller treats that as a
/// no-op. Destinations are not clamped to the normal-mode column limit;
/// the engine does that after moving.
pub fn resolve(
    buf: &dyn TextBuffer,
    from: Position,
    motion: Motion,
    count: usize,
) -> Option<Position> {
    let count = count.max(1);
    let pos = match motion {
        Motion::Left => Position::new(from.line, from.col.saturating_sub(count)),
        Motion::Right => {
            let max = buf.line_len(from.line).saturating_sub(1);
            Position::new(from.line, (from.col + count).min(max))
        }
        Motion::Down => Position::new((from.line + count).min(buf.line_count()), from.col),
        Motion::Up => Position::new(from.line.saturating_sub(count).max(1), from.col),
        Motion::WordForward => apply_n(buf, from, count, |b, p| word_forward(b, p, class)),
        Motion::WordBack => apply_n(buf, from, count, |b, p| word_back(b, p, class)),
        Motion::WordEnd => apply_n(buf, from, count, |b, p| word_end(b, p, class)),
        Motion::BigWordForward => apply_n(buf, from, count, |b, p| word_forward(b, p, big_class)),
        Motion::BigWordBack => apply_n(buf, from, count, |b, p| word_back(b, p, big_class)),
        Motion::BigWordEnd => apply_n(buf, from, count, |b, p| word_end(b, p, big_class)),
        Motion::LineStart => Position::new(from.line, 0),
        Motion::LineEnd => {
            let len = buf.line_len(from.line);
            Position::new(from.line, len.saturating_sub(1))
        }
        Motion::FirstNonBlank => Position::new(from.line, first_non_blank(buf, from.line)),
        Motion::Find { kind, ch } => return find_char(buf, from, kind, ch, count),
    };
    Some(pos)
}

fn apply_n(
    buf: &dyn TextBuffer,
    from: Position,
    count: usize,
    f: impl Fn(&dyn TextBuffer, Position) -> Position,
) -> Position {
    let mut pos = from;
    for _ in 0..count {
        let next = f(buf, pos);
        if next == pos {
            break;
        }
        pos = next;
    }
    pos
}

/// Move to the start of the next word: step over the current run, then over
/// whitespace (crossing line boundaries).
fn word_forward(buf: &dyn TextBuffer, mut pos: Position, cls: fn(char) -> CharClass) -> Position {
    if let Some(c0) = buf.char_at(pos) {
        if cls(c0) != CharClass::Whitespace {
            let run = cls(c0);
            while let Some(c) = buf.char_at(pos) {
                if cls(c) != run {
                    break;
                }
                match step_forward(buf, pos) {
                    Some(n) => pos = n,
                    None => return pos,
                }
            }
        }
    }
    while let Some(c) = buf.char_at(pos) {
        if cls(c) != CharClass::Whitespace {
            break;
        }
        match step_forward(buf, pos) {
            Some(n) => pos = n,
            None => break,
        }
    }
    pos
}

/// Move to the start of the previous word: step back over whitespace, then
/// back to the start of the run.
fn word_back(buf: &dyn TextBuffer, pos: Position, cls: fn(char) -> CharClass) -> Position {
    let mut p = match step_back(buf, pos) {
        Some(p) => p,
        None => return pos,
    };
    while buf
        .char_at(p)
        .map_or(true, |c| cls(c) == CharClass::Whitespace)
    {
        match step_back(buf, p) {
            Some(n) => p = n,
            None => return p,
        }
    }
    let run = match buf.char_at(p) {
        Some(c) => cls(c),
        None => return p,
    };
    loop {
        match step_back(buf, p) {
            Some(prev) => match buf.char_at(prev) {
                Some(c) if cls(c) == run => p = prev,
                _ => break,
            },
            None => break,
        }
    }
    p
}

/// Move to the end of the current or next word.
fn word_end(buf: &dyn TextBuffer, pos: Position, cls: fn(char) -> CharClass) -> Position {
    let mut p = match step_forward(buf, pos) {
        Some(p) => p,
        None => return pos,
    };
    while buf
        .char_at(p)
        .map_or(false, |c| cls(c) == CharClass::Whitespace)
    {
        match step_forward(buf, p) {
            Some(n) => p = n,
            None => return p,
        }
    }
    let run = match buf.char_at(p) {
        Some(c) => cls(c),
        None => return p,
    };
    loop {
        match step_forward(buf, p) {
            Some(next) => match buf.char_at(next) {
                Some(c) if cls(c) == run => p = next,
                _ => break,
            },
            None => break,
        }
    }
    p
}

pub(crate) fn first_non_blank(buf: &dyn TextBuffer, line: usize) -> usize {
    buf.line_text(line)
        .chars()
        .position(|c| !c.is_whitespace())
        .unwrap_or(0)
}

/// Line-local character search. Returns None (caller no-ops) when the
/// target does not occur `count` times in the scan direction.
fn find_char(
    buf: &dyn TextBuffer,
    from: Position,
    kind: FindKind,
    target: char,
    count: usize,
) -> Option<Position> {
    let chars: Vec<char> = buf.line_text(from.line).chars().collect();
    let mut col = from.col;
    match kind {
        FindKind::Forward | FindKind::Till => {
            for _ in 0..count {
                col = (col + 1..chars.len()).find(|&i| chars[i] == target)?;
            }
            if kind == FindKind::Till {
                col -= 1;
            }
        }
        FindKind::Backward | FindKind::TillBackward => {
            for _ in 0..count {
                col = (0..col).rev().find(|&i| chars[i] == target)?;
            }
            if kind == FindKind::TillBackward {
                col += 1;
            }
        }
    }
    Some(Position::new(from.line, col))
}

/// Jump to the bracket matching the one under the cursor, tracking nesting
/// depth within the same bracket family. Not on a bracket, or unbalanced:
/// None.
pub fn match_bracket(buf: &dyn TextBuffer, pos: Position) -> Option<Position> {
    const PAIRS: [(char, char); 3] = [('(', ')'), ('[', ']'), ('{', '}')];
    let c = buf.char_at(pos)?;
    let (open, close, forward) = PAIRS
        .iter()
        .find_map(|&(o, cl)| {
            if c == o {
                Some((o, cl, true))
            } else if c == cl {
                Some((o, cl, false))
            } else {
                None
            }
        })?;

    let mut depth = 0i32;
    let mut p = pos;
    loop {
        match buf.char_at(p) {
            Some(x) if x == open => {
                depth += if forward { 1 } else { -1 };
                if depth == 0 {
                    return Some(p);
                }
            }
            Some(x) if x == close => {
                depth += if forward { -1 } else { 1 };
                if depth == 0 {
                    return Some(p);
                }
            }
            _ => {}
        }
        p = if forward {
            step_forward(buf, p)?
        } else {
            step_back(buf, p)?
        };
    }
}

/// Resolve the range an operator acts on. The supported operator motions
/// mirror the bare ones plus the delete/change word asymmetry: `dw` takes
/// the trailing whitespace up to (never past) the line end, while `cw`
/// stops at the word end like `ce`.
pub fn operator_range(
    buf: &dyn TextBuffer,
    from: Position,
    motion: Motion,
    count: usize,
    op: Operator,
) -> Option<Range> {
    let count = count.max(1);
    let range = match motion {
        Motion::WordForward | Motion::BigWordForward => {
            let cls: fn(char) -> CharClass = if motion == Motion::WordForward {
                class
            } else {
                big_class
            };
            if op == Operator::Change {
                let end = apply_n(buf, from, count, |b, p| word_end(b, p, cls));
                let end = step_forward(buf, end).unwrap_or_else(|| buf.end_position());
                Range::new(from, end)
            } else {
                let mut end = apply_n(buf, from, count, |b, p| word_forward(b, p, cls));
                if end.line != from.line {
                    end = Position::new(from.line, buf.line_len(from.line));
                }
                Range::new(from, end)
            }
        }
        Motion::WordEnd | Motion::BigWordEnd => {
            let cls: fn(char) -> CharClass = if motion == Motion::WordEnd {
                class
            } else {
                big_class
            };
            let end = apply_n(buf, from, count, |b, p| word_end(b, p, cls));
            let end = step_forward(buf, end).unwrap_or_else(|| buf.end_position());
            Range::new(from, end)
        }
        Motion::WordBack | Motion::BigWordBack => {
            let cls: fn(char) -> CharClass = if motion == Motion::WordBack {
                class
            } else {
                big_class
            };
            let start = apply_n(buf, from, count, |b, p| word_back(b, p, cls));
            Range::new(start, from)
        }
        Motion::Find { kind, .. } => {
            let to = resolve(buf, from, motion, count)?;
            match kind {
                // The target (or till-stop) character is included.
                FindKind::Forward | FindKind::Till => {
                    Range::new(from, Position::new(to.line, to.col + 1))
                }
                FindKind::Backward | FindKind::TillBackward => Range::new(to, from),
            }
        }
        Motion::LineEnd => Range::new(from, Position::new(from.line, buf.line_len(from.line))),
        Motion::LineStart => Range::new(Position::new(from.line, 0), from),
        Motion::FirstNonBlank => {
            Range::ordered(Position::new(from.line, first_non_blank(buf, from.line)), from)
        }
        _ => return None,
    };
    Some(range)
}

/// Char range covering `count` whole lines starting at `line`, plus the
/// register image of those lines (always newline-terminated). Deleting the
/// final line consumes the preceding newline instead of a trailing one.
pub fn linewise_range(buf: &dyn TextBuffer, line: usize, count: usize) -> (Range, String) {
    let last = buf.line_count();
    let line = line.clamp(1, last);
    let end_line = (line + count.max(1) - 1).min(last);

    let mut text = String::new();
    for l in line..=end_line {
        text.push_str(&buf.line_text(l));
        text.push('\n');
    }

    let range = if end_line < last {
        Range::new(Position::new(line, 0), Position::new(end_line + 1, 0))
    } else if line > 1 {
        Range::new(
            Position::new(line - 1, buf.line_len(line - 1)),
            Position::new(end_line, buf.line_len(end_line)),
        )
    } else {
        Range::new(
            Position::new(line, 0),
            Position::new(end_line, buf.line_len(end_line)),
        )
    };
    (range, text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::buffer::RopeBuffer;

    fn buf(text: &str) -> RopeBuffer {
        RopeBuffer::from_text(text)
    }

    #[test]
    fn test_word_forward_skips_to_next_word() {
        let b = buf("hello world\n");
        let p = resolve(&b, Position::new(1, 0), Motion::WordForward, 1).unwrap();
        assert_eq!(p, Position::new(1, 6));
    }

    #[test]
    fn test_word_forward_crosses_lines() {
        let b = buf("one\ntwo\n");
        let p = resolve(&b, Position::new(1, 0), Motion::WordForward, 1).unwrap();
        assert_eq!(p, Position::new(2, 0));
    }

    #[test]
    fn test_word_back_and_end() {
        let b = buf("foo bar baz\n");
        let p = resolve(&b, Position::new(1, 8), Motion::WordBack, 1).unwrap();
        assert_eq!(p, Position::new(1, 4));
        let p = resolve(&b, Position::new(1, 8), Motion::WordBack, 2).unwrap();
        assert_eq!(p, Position::new(1, 0));
        let p = resolve(&b, Position::new(1, 0), Motion::WordEnd, 1).unwrap();
        assert_eq!(p, Position::new(1, 2));
        let p = resolve(&b, Position::new(1, 2), Motion::WordEnd, 1).unwrap();
        assert_eq!(p, Position::new(1, 6));
    }

    #[test]
    fn test_punctuation_is_its_own_word() {
        let b = buf("foo(bar)\n");
        let p = resolve(&b, Position::new(1, 0), Motion::WordForward, 1).unwrap();
        assert_eq!(p, Position::new(1, 3));
        // WORD motion treats the whole thing as one run.
        let b2 = buf("foo(bar) baz\n");
        let p = resolve(&b2, Position::new(1, 0), Motion::BigWordForward, 1).unwrap();
        assert_eq!(p, Position::new(1, 9));
    }

    #[test]
    fn test_line_motions() {
        let b = buf("  indented line\n");
        let from = Position::new(1, 9);
        assert_eq!(
            resolve(&b, from, Motion::LineStart, 1).unwrap(),
            Position::new(1, 0)
        );
        assert_eq!(
            resolve(&b, from, Motion::FirstNonBlank, 1).unwrap(),
            Position::new(1, 2)
        );
        assert_eq!(
            resolve(&b, from, Motion::LineEnd, 1).unwrap(),
            Position::new(1, 14)
        );
    }

    #[test]
    fn test_find_char_family() {
        let b = buf("abcabc\n");
        let f = |kind, count| {
            resolve(
                &b,
                Position::new(1, 0),
                Motion::Find { kind, ch: 'c' },
                count,
            )
        };
        assert_eq!(f(FindKind::Forward, 1).unwrap(), Position::new(1, 2));
        assert_eq!(f(FindKind::Forward, 2).unwrap(), Position::new(1, 5));
        assert_eq!(f(FindKind::Till, 1).unwrap(), Position::new(1, 1));
        assert_eq!(f(FindKind::Forward, 3), None);

        let back = resolve(
            &b,
            Position::new(1, 5),
            Motion::Find {
                kind: FindKind::Backward,
                ch: 'a',
            },
            1,
        );
        assert_eq!(back.unwrap(), Position::new(1, 3));
    }

    #[test]
    fn test_find_stays_on_line() {
        let b = buf("abc\nxyz\n");
        let p = resolve(
            &b,
            Position::new(1, 0),
            Motion::Find {
                kind: FindKind::Forward,
                ch: 'x',
            },
            1,
        );
        assert_eq!(p, None);
    }

    #[test]
    fn test_match_bracket_nested() {
        let b = buf("a(b(c)d)e\n");
        assert_eq!(
            match_bracket(&b, Position::new(1, 1)),
            Some(Position::new(1, 7))
        );
        assert_eq!(
            match_bracket(&b, Position::new(1, 7)),
            Some(Position::new(1, 1))
        );
        assert_eq!(
            match_bracket(&b, Position::new(1, 3)),
            Some(Position::new(1, 5))
        );
        // Not on a bracket.
        assert_eq!(match_bracket(&b, Position::new(1, 0)), None);
    }

    #[test]
    fn test_match_bracket_unbalanced() {
        let b = buf("(((\n");
        assert_eq!(match_bracket(&b, Position::new(1, 0)), None);
    }

    #[test]
    fn test_dw_includes_trailing_whitespace() {
        let b = buf("hello world\n");
        let r = operator_range(
            &b,
            Position::new(1, 0),
            Motion::WordForward,
            1,
            Operator::Delete,
        )
        .unwrap();
        assert_eq!(b.text(r), "hello ");
    }

    #[test]
    fn test_dw_clamps_to_line_end() {
        let b = buf("hello\nworld\n");
        let r = operator_range(
            &b,
            Position::new(1, 0),
            Motion::WordForward,
            1,
            Operator::Delete,
        )
        .unwrap();
        assert_eq!(b.text(r), "hello");
    }

    #[test]
    fn test_cw_stops_at_word_end() {
        let b = buf("hello world\n");
        let r = operator_range(
            &b,
            Position::new(1, 0),
            Motion::WordForward,
            1,
            Operator::Change,
        )
        .unwrap();
        assert_eq!(b.text(r), "hello");
    }

    #[test]
    fn test_find_operator_ranges() {
        let b = buf("one;two\n");
        let df = operator_range(
            &b,
            Position::new(1, 0),
            Motion::Find { kind: FindKind::Forward, ch: ';' },
            1,
            Operator::Delete,
        )
        .unwrap();
        assert_eq!(b.text(df), "one;");
        let dt = operator_range(
            &b,
            Position::new(1, 0),
            Motion::Find { kind: FindKind::Till, ch: ';' },
            1,
            Operator::Delete,
        )
        .unwrap();
        assert_eq!(b.text(dt), "one");
    }

    #[test]
    fn test_linewise_range_middle_and_last() {
        let b = buf("one\ntwo\nthree\n");
        let (r, text) = linewise_range(&b, 2, 1);
        assert_eq!(b.text(r), "two\n");
        assert_eq!(text, "two\n");

        // Deleting the final line takes the newline before it.
        let (r, text) = linewise_range(&b, 3, 1);
        assert_eq!(b.text(r), "\nthree");
        assert_eq!(text, "three\n");
    }

    #[test]
    fn test_linewise_range_with_count() {
        let b = buf("one\ntwo\nthree\nfour\n");
        let (r, text) = linewise_range(&b, 1, 2);
        assert_eq!(b.text(r), "one\ntwo\n");
        assert_eq!(text, "one\ntwo\n");
    }
}
