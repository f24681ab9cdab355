use super::buffer::TextBuffer;
use super::motion::{is_word_char, step_back, step_forward};
use super::position::{Position, Range};

/// Targets for the `i`/`a` pending-object commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextObject {
    Word,
    Quote(char),
    Bracket(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectPrefix {
    Inside,
    Around,
}

impl TextObject {
    /// Map the key following `i`/`a` to an object. Both halves of a bracket
    /// pair select the same object.
    pub fn from_key(ch: char) -> Option<TextObject> {
        match ch {
            'w' => Some(TextObject::Word),
            '"' | '\'' | '`' => Some(TextObject::Quote(ch)),
            '(' | ')' | 'b' => Some(TextObject::Bracket('(')),
            '[' | ']' => Some(TextObject::Bracket('[')),
            '{' | '}' | 'B' => Some(TextObject::Bracket('{')),
            '<' | '>' => Some(TextObject::Bracket('<')),
            _ => None,
        }
    }
}

/// Resolve a text object at the cursor. None when the cursor is not inside
/// a matching construct; the caller treats that as a no-op.
pub fn resolve(
    buf: &dyn TextBuffer,
    pos: Position,
    prefix: ObjectPrefix,
    obj: TextObject,
) -> Option<Range> {
    match obj {
        TextObject::Word => word_object(buf, pos, prefix),
        TextObject::Quote(q) => quote_object(buf, pos, prefix, q),
        TextObject::Bracket(open) => bracket_object(buf, pos, prefix, open),
    }
}

/// `iw`: the run of word (or punctuation, or whitespace) characters under
/// the cursor. `aw` additionally takes the whitespace after the run, or
/// before it when none follows.
fn word_object(buf: &dyn TextBuffer, pos: Position, prefix: ObjectPrefix) -> Option<Range> {
    let line_len = buf.line_len(pos.line);
    if line_len == 0 {
        return None;
    }
    let pos = Position::new(pos.line, pos.col.min(line_len - 1));
    let chars: Vec<char> = buf.line_text(pos.line).chars().collect();
    let same_run = |a: char, b: char| {
        (a.is_whitespace() && b.is_whitespace())
            || (is_word_char(a) && is_word_char(b))
            || (!a.is_whitespace() && !is_word_char(a) && !b.is_whitespace() && !is_word_char(b))
    };

    let anchor = chars[pos.col];
    let mut start = pos.col;
    while start > 0 && same_run(chars[start - 1], anchor) {
        start -= 1;
    }
    let mut end = pos.col + 1;
    while end < chars.len() && same_run(chars[end], anchor) {
        end += 1;
    }

    if prefix == ObjectPrefix::Around && !anchor.is_whitespace() {
        let trailing_start = end;
        while end < chars.len() && chars[end].is_whitespace() {
            end += 1;
        }
        if end == trailing_start {
            while start > 0 && chars[start - 1].is_whitespace() {
                start -= 1;
            }
        }
    }

    Some(Range::new(
        Position::new(pos.line, start),
        Position::new(pos.line, end),
    ))
}

/// Quotes pair up left to right on the cursor's line; the object is the
/// pair whose span straddles the cursor column, quotes included.
fn quote_object(
    buf: &dyn TextBuffer,
    pos: Position,
    prefix: ObjectPrefix,
    quote: char,
) -> Option<Range> {
    let chars: Vec<char> = buf.line_text(pos.line).chars().collect();
    let marks: Vec<usize> = chars
        .iter()
        .enumerate()
        .filter(|(_, &c)| c == quote)
        .map(|(i, _)| i)
        .collect();

    for pair in marks.chunks_exact(2) {
        let (open, close) = (pair[0], pair[1]);
        if open <= pos.col && pos.col <= close {
            let range = match prefix {
                ObjectPrefix::Inside => Range::new(
                    Position::new(pos.line, open + 1),
                    Position::new(pos.line, close),
                ),
                ObjectPrefix::Around => Range::new(
                    Position::new(pos.line, open),
                    Position::new(pos.line, close + 1),
                ),
            };
            return Some(range);
        }
    }
    None
}

/// Scan backward for the nearest unmatched opener, then forward for its
/// closer. The cursor sitting on either bracket counts as inside the pair.
fn bracket_object(
    buf: &dyn TextBuffer,
    pos: Position,
    prefix: ObjectPrefix,
    open: char,
) -> Option<Range> {
    let close = match open {
        '(' => ')',
        '[' => ']',
        '{' => '}',
        '<' => '>',
        _ => return None,
    };

    // Backward walk. A closer at the cursor itself does not add depth, so
    // `di(` works with the cursor on the closing bracket.
    let open_pos = {
        let mut depth = 0i32;
        let mut p = pos;
        loop {
            match buf.char_at(p) {
                Some(c) if c == open => {
                    if depth == 0 {
                        break Some(p);
                    }
                    depth -= 1;
                }
                Some(c) if c == close && p != pos => depth += 1,
                _ => {}
            }
            match step_back(buf, p) {
                Some(prev) => p = prev,
                None => break None,
            }
        }
    }?;

    // Forward walk from just past the opener.
    let close_pos = {
        let mut depth = 0i32;
        let mut p = step_forward(buf, open_pos)?;
        loop {
            match buf.char_at(p) {
                Some(c) if c == close => {
                    if depth == 0 {
                        break Some(p);
                    }
                    depth -= 1;
                }
                Some(c) if c == open => depth += 1,
                _ => {}
            }
            match step_forward(buf, p) {
                Some(next) => p = next,
                None => break None,
            }
        }
    }?;

    let range = match prefix {
        ObjectPrefix::Inside => Range::new(step_forward(buf, open_pos)?, close_pos),
        ObjectPrefix::Around => Range::new(open_pos, step_forward(buf, close_pos)?),
    };
    Some(range)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::buffer::RopeBuffer;

    fn buf(text: &str) -> RopeBuffer {
        RopeBuffer::from_text(text)
    }

    fn txt(b: &RopeBuffer, r: Range) -> String {
        b.text(r)
    }

    #[test]
    fn test_inner_word() {
        let b = buf("foo bar baz\n");
        let r = resolve(&b, Position::new(1, 5), ObjectPrefix::Inside, TextObject::Word).unwrap();
        assert_eq!(txt(&b, r), "bar");
    }

    #[test]
    fn test_around_word_takes_trailing_space() {
        let b = buf("foo bar baz\n");
        let r = resolve(&b, Position::new(1, 5), ObjectPrefix::Around, TextObject::Word).unwrap();
        assert_eq!(txt(&b, r), "bar ");
    }

    #[test]
    fn test_around_word_takes_leading_space_at_line_end() {
        let b = buf("foo bar\n");
        let r = resolve(&b, Position::new(1, 5), ObjectPrefix::Around, TextObject::Word).unwrap();
        assert_eq!(txt(&b, r), " bar");
    }

    #[test]
    fn test_inner_word_on_whitespace() {
        let b = buf("a   b\n");
        let r = resolve(&b, Position::new(1, 2), ObjectPrefix::Inside, TextObject::Word).unwrap();
        assert_eq!(txt(&b, r), "   ");
    }

    #[test]
    fn test_inner_quote() {
        let b = buf("say \"hello there\" end\n");
        let r = resolve(
            &b,
            Position::new(1, 8),
            ObjectPrefix::Inside,
            TextObject::Quote('"'),
        )
        .unwrap();
        assert_eq!(txt(&b, r), "hello there");
    }

    #[test]
    fn test_around_quote_includes_quotes() {
        let b = buf("say \"hello\" end\n");
        let r = resolve(
            &b,
            Position::new(1, 6),
            ObjectPrefix::Around,
            TextObject::Quote('"'),
        )
        .unwrap();
        assert_eq!(txt(&b, r), "\"hello\"");
    }

    #[test]
    fn test_quote_before_pair_is_none() {
        // A pair lying wholly ahead of the cursor is not the cursor's pair.
        let b = buf("x \"a\" y \"b\"\n");
        let r = resolve(
            &b,
            Position::new(1, 0),
            ObjectPrefix::Inside,
            TextObject::Quote('"'),
        );
        assert!(r.is_none());
    }

    #[test]
    fn test_quote_picks_pair_under_cursor() {
        let b = buf("x \"a\" y \"b\"\n");
        let r = resolve(
            &b,
            Position::new(1, 9),
            ObjectPrefix::Inside,
            TextObject::Quote('"'),
        )
        .unwrap();
        assert_eq!(txt(&b, r), "b");
    }

    #[test]
    fn test_unpaired_quote_is_none() {
        let b = buf("no quotes here\n");
        let r = resolve(
            &b,
            Position::new(1, 0),
            ObjectPrefix::Inside,
            TextObject::Quote('"'),
        );
        assert!(r.is_none());
    }

    #[test]
    fn test_inner_bracket() {
        let b = buf("call(a, b)\n");
        let r = resolve(
            &b,
            Position::new(1, 6),
            ObjectPrefix::Inside,
            TextObject::Bracket('('),
        )
        .unwrap();
        assert_eq!(txt(&b, r), "a, b");
    }

    #[test]
    fn test_around_bracket_nested() {
        let b = buf("f(g(x), y)\n");
        let r = resolve(
            &b,
            Position::new(1, 4),
            ObjectPrefix::Around,
            TextObject::Bracket('('),
        )
        .unwrap();
        assert_eq!(txt(&b, r), "(x)");
    }

    #[test]
    fn test_inner_angle_bracket() {
        let b = buf("Vec<String>\n");
        let r = resolve(
            &b,
            Position::new(1, 6),
            ObjectPrefix::Inside,
            TextObject::Bracket('<'),
        )
        .unwrap();
        assert_eq!(txt(&b, r), "String");
    }

    #[test]
    fn test_bracket_object_spans_lines() {
        let b = buf("{\n  body\n}\n");
        let r = resolve(
            &b,
            Position::new(2, 3),
            ObjectPrefix::Inside,
            TextObject::Bracket('{'),
        )
        .unwrap();
        assert_eq!(txt(&b, r), "\n  body\n");
    }

    #[test]
    fn test_cursor_on_closing_bracket() {
        let b = buf("(abc)\n");
        let r = resolve(
            &b,
            Position::new(1, 4),
            ObjectPrefix::Inside,
            TextObject::Bracket('('),
        )
        .unwrap();
        assert_eq!(txt(&b, r), "abc");
    }

    #[test]
    fn test_no_enclosing_bracket_is_none() {
        let b = buf("plain text\n");
        let r = resolve(
            &b,
            Position::new(1, 2),
            ObjectPrefix::Inside,
            TextObject::Bracket('('),
        );
        assert!(r.is_none());
    }
}
