use serde::{Deserialize, Serialize};

/// A cursor location: 1-indexed line, 0-indexed column. A column equal to
/// the line length addresses the newline (insert point past the last
/// character); normal mode clamps one short of that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }

    /// Start of the buffer.
    pub fn origin() -> Self {
        Self { line: 1, col: 0 }
    }
}

/// Half-open span of buffer positions: `start` inclusive, `end` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Build a range from two endpoints in either order.
    pub fn ordered(a: Position, b: Position) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn reversed(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_ordering() {
        assert!(Position::new(1, 5) < Position::new(2, 0));
        assert!(Position::new(2, 0) < Position::new(2, 3));
        assert_eq!(Position::new(2, 3), Position::new(2, 3));
    }

    #[test]
    fn test_range_ordered_swaps() {
        let a = Position::new(3, 1);
        let b = Position::new(1, 4);
        let r = Range::ordered(a, b);
        assert_eq!(r.start, b);
        assert_eq!(r.end, a);
    }

    #[test]
    fn test_empty_range() {
        let p = Position::new(2, 2);
        assert!(Range::new(p, p).is_empty());
        assert!(!Range::new(p, Position::new(2, 3)).is_empty());
    }

    #[test]
    fn test_serde_round_trip() {
        let r = Range::new(Position::new(1, 0), Position::new(2, 5));
        let json = serde_json::to_string(&r).unwrap();
        let back: Range = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }
}
