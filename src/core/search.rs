use std::fmt;

use regex::{Regex, RegexBuilder};

use super::buffer::{IndexExpr, TextBuffer};
use super::engine::Engine;
use super::position::Direction;

#[derive(Debug)]
pub struct SearchError(pub regex::Error);

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid search pattern: {}", self.0)
    }
}

impl std::error::Error for SearchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

/// The active search pattern and the direction it was entered with. `n`
/// continues in that direction, `N` against it.
#[derive(Debug, Default)]
pub struct SearchState {
    pattern: String,
    direction: Option<Direction>,
}

impl SearchState {
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    pub fn set(&mut self, pattern: &str, direction: Direction) -> Result<Regex, SearchError> {
        let re = compile(pattern)?;
        self.pattern = pattern.to_string();
        self.direction = Some(direction);
        Ok(re)
    }

    pub fn compiled(&self) -> Option<Result<Regex, SearchError>> {
        if self.pattern.is_empty() {
            None
        } else {
            Some(compile(&self.pattern))
        }
    }
}

fn compile(pattern: &str) -> Result<Regex, SearchError> {
    RegexBuilder::new(pattern)
        .multi_line(true)
        .build()
        .map_err(SearchError)
}

impl<B: TextBuffer> Engine<B> {
    /// `/` and `?`: read a pattern from the prompt and jump to its first
    /// match. A cancelled prompt leaves everything untouched.
    pub(crate) fn prompt_search(&mut self, backward: bool) {
        let title = if backward { "Search Backward" } else { "Search" };
        let pattern = match self.prompt.ask_string(title, "Enter search term (regex):") {
            Some(p) if !p.is_empty() => p,
            _ => return,
        };
        let direction = if backward {
            Direction::Backward
        } else {
            Direction::Forward
        };
        let re = match self.search.set(&pattern, direction) {
            Ok(re) => re,
            Err(err) => {
                self.prompt.error("Search Error", &err.to_string());
                return;
            }
        };
        self.find_match(&re, direction, 1);
    }

    /// `n`/`N`: continue the active search. `reverse` flips the stored
    /// direction.
    pub(crate) fn search_again(&mut self, reverse: bool, count: usize) {
        let direction = match self.search.direction() {
            Some(d) => {
                if reverse {
                    d.reversed()
                } else {
                    d
                }
            }
            None => {
                self.message = "No previous search".to_string();
                return;
            }
        };
        let re = match self.search.compiled() {
            Some(Ok(re)) => re,
            _ => return,
        };
        self.find_match(&re, direction, count);
    }

    /// `*`/`#`: search for the word under the cursor as a whole word.
    pub(crate) fn search_word(&mut self, backward: bool) {
        let word = match self.word_under_cursor() {
            Some(w) => w,
            None => return,
        };
        let pattern = format!(r"\b{}\b", regex::escape(&word));
        let direction = if backward {
            Direction::Backward
        } else {
            Direction::Forward
        };
        // Escaped literal, cannot fail to compile.
        if let Ok(re) = self.search.set(&pattern, direction) {
            self.find_match(&re, direction, 1);
        }
    }

    /// Find the `count`-th match from the cursor, asking the user whether
    /// to wrap when an end of the buffer is hit.
    fn find_match(&mut self, re: &Regex, direction: Direction, count: usize) {
        let mut pos = self.buffer.cursor();
        for _ in 0..count.max(1) {
            let offset = match direction {
                Direction::Forward => IndexExpr::Chars(1),
                Direction::Backward => IndexExpr::Chars(0),
            };
            let start = self.buffer.resolve(pos, offset);
            let hit = match self.buffer.search(re, start, direction, None) {
                Some(hit) => Some(hit),
                None => {
                    let question = match direction {
                        Direction::Forward => "Reached end. Continue from beginning?",
                        Direction::Backward => "Reached beginning. Continue from end?",
                    };
                    if self.prompt.ask_yes_no("Search", question) {
                        let wrap_start = match direction {
                            Direction::Forward => super::position::Position::origin(),
                            Direction::Backward => self.buffer.end_position(),
                        };
                        self.buffer.search(re, wrap_start, direction, None)
                    } else {
                        return;
                    }
                }
            };
            match hit {
                Some(hit) => {
                    pos = hit.start;
                    self.buffer.set_cursor(hit.start);
                    self.hooks.on_search_match(hit);
                }
                None => {
                    self.message = format!("Pattern not found: {}", self.search.pattern());
                    return;
                }
            }
        }
    }

    fn word_under_cursor(&self) -> Option<String> {
        let cursor = self.buffer.cursor();
        let chars: Vec<char> = self.buffer.line_text(cursor.line).chars().collect();
        let col = cursor.col.min(chars.len().saturating_sub(1));
        if chars.is_empty() || !super::motion::is_word_char(chars[col]) {
            return None;
        }
        let mut start = col;
        while start > 0 && super::motion::is_word_char(chars[start - 1]) {
            start -= 1;
        }
        let mut end = col + 1;
        while end < chars.len() && super::motion::is_word_char(chars[end]) {
            end += 1;
        }
        Some(chars[start..end].iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_rejects_bad_pattern() {
        let mut state = SearchState::default();
        assert!(state.set("(unclosed", Direction::Forward).is_err());
        assert!(state.pattern().is_empty());
        assert!(state.direction().is_none());
    }

    #[test]
    fn test_set_remembers_direction() {
        let mut state = SearchState::default();
        state.set("foo", Direction::Backward).unwrap();
        assert_eq!(state.pattern(), "foo");
        assert_eq!(state.direction(), Some(Direction::Backward));
    }
}
