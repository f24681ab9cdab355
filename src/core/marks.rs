use std::collections::HashMap;

use super::position::Position;

/// Named cursor positions, session-scoped. Persists until overwritten or
/// the buffer is discarded; marks are not adjusted when text above them
/// moves.
#[derive(Debug, Default)]
pub struct MarkStore {
    marks: HashMap<char, Position>,
}

impl MarkStore {
    pub fn set(&mut self, name: char, pos: Position) {
        self.marks.insert(name, pos);
    }

    pub fn get(&self, name: char) -> Option<Position> {
        self.marks.get(&name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_overwrite() {
        let mut marks = MarkStore::default();
        assert_eq!(marks.get('a'), None);
        marks.set('a', Position::new(3, 1));
        marks.set('a', Position::new(5, 0));
        assert_eq!(marks.get('a'), Some(Position::new(5, 0)));
    }
}
