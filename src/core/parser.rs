use super::key::KeyEvent;
use super::motion::{FindKind, Motion};
use super::operator::{OpTarget, Operator};
use super::text_object::{ObjectPrefix, TextObject};

/// A fully parsed normal-mode command, ready to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalCommand {
    Move { motion: Motion, count: usize },
    GotoLine { line: Option<usize> },
    MatchBracket,
    Operate { op: Operator, target: OpTarget, count: usize },
    InsertHere,
    InsertLineStart,
    Append,
    AppendLineEnd,
    OpenBelow,
    OpenAbove,
    DeleteChar { before: bool, count: usize },
    Substitute { count: usize },
    ReplaceChar { ch: char, count: usize },
    PutAfter { count: usize },
    PutBefore { count: usize },
    Undo { count: usize },
    Redo { count: usize },
    Repeat,
    SetMark(char),
    JumpToMark(char),
    StartRecording(char),
    StopRecording,
    PlayMacro { register: char, count: usize },
    SearchPrompt { backward: bool },
    SearchNext { count: usize },
    SearchPrev { count: usize },
    SearchWord { backward: bool },
    EnterVisual { linewise: bool },
    EnterReplace,
    EnterCommandLine,
}

/// Outcome of feeding one key to the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parse {
    /// More keys needed.
    Pending,
    /// The sequence was not a command; pending state has been dropped.
    Discard,
    Run(NormalCommand),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Awaiting {
    ReplaceChar,
    Find(FindKind),
    Mark,
    MarkJump,
    Record,
    Play,
    TextObject(ObjectPrefix),
    GotoPrefix,
}

/// Accumulator for a multi-key normal-mode command: an optional count, an
/// optional operator, and whatever single key a previous one promised.
#[derive(Debug, Default)]
pub struct PendingCommand {
    count: String,
    count_after_op: bool,
    operator: Option<Operator>,
    awaiting: Option<Awaiting>,
}

impl PendingCommand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.count.clear();
        self.count_after_op = false;
        self.operator = None;
        self.awaiting = None;
    }

    pub fn is_idle(&self) -> bool {
        self.count.is_empty() && self.operator.is_none() && self.awaiting.is_none()
    }

    /// 0 when no count was typed; commands treat 0 and 1 alike.
    fn count(&self) -> usize {
        self.count.parse().unwrap_or(0)
    }

    fn run(&mut self, cmd: NormalCommand) -> Parse {
        self.reset();
        Parse::Run(cmd)
    }

    fn discard(&mut self) -> Parse {
        self.reset();
        Parse::Discard
    }

    /// Advance the parse with one key. `recording` distinguishes `q` as
    /// stop-recording from `q{reg}` as start-recording.
    pub fn feed(&mut self, key: &KeyEvent, recording: bool) -> Parse {
        if key.is("Escape") {
            return self.discard();
        }

        if let Some(awaiting) = self.awaiting.take() {
            let ch = match key.ch {
                Some(ch) if !key.ctrl => ch,
                _ => return self.discard(),
            };
            return self.finish_awaiting(awaiting, ch);
        }

        if key.ctrl {
            return match key.ch {
                Some('r') => {
                    let count = self.count().max(1);
                    self.run(NormalCommand::Redo { count })
                }
                _ => self.discard(),
            };
        }

        let ch = match key.ch {
            Some(ch) => ch,
            None => {
                let motion = match key.name.as_str() {
                    "Left" => Motion::Left,
                    "Down" => Motion::Down,
                    "Up" => Motion::Up,
                    "Right" => Motion::Right,
                    _ => return self.discard(),
                };
                if self.operator.is_some() {
                    return self.discard();
                }
                let count = self.count().max(1);
                return self.run(NormalCommand::Move { motion, count });
            }
        };

        // A leading zero is the line-start motion; otherwise digits extend
        // the count. A count started after the operator replaces one typed
        // before it, so `2d3w` deletes three words.
        if ch.is_ascii_digit() {
            let fresh = self.count.is_empty()
                || (self.operator.is_some() && !self.count_after_op);
            if !(ch == '0' && fresh) {
                if self.operator.is_some() && !self.count_after_op {
                    self.count.clear();
                    self.count_after_op = true;
                }
                self.count.push(ch);
                return Parse::Pending;
            }
        }

        if let Some(op) = self.operator {
            return self.feed_operator_target(op, ch);
        }

        let count = self.count().max(1);
        match ch {
            'h' => self.run(NormalCommand::Move { motion: Motion::Left, count }),
            'j' => self.run(NormalCommand::Move { motion: Motion::Down, count }),
            'k' => self.run(NormalCommand::Move { motion: Motion::Up, count }),
            'l' => self.run(NormalCommand::Move { motion: Motion::Right, count }),
            'w' => self.run(NormalCommand::Move { motion: Motion::WordForward, count }),
            'b' => self.run(NormalCommand::Move { motion: Motion::WordBack, count }),
            'e' => self.run(NormalCommand::Move { motion: Motion::WordEnd, count }),
            'W' => self.run(NormalCommand::Move { motion: Motion::BigWordForward, count }),
            'B' => self.run(NormalCommand::Move { motion: Motion::BigWordBack, count }),
            'E' => self.run(NormalCommand::Move { motion: Motion::BigWordEnd, count }),
            '0' => self.run(NormalCommand::Move { motion: Motion::LineStart, count: 1 }),
            '$' => self.run(NormalCommand::Move { motion: Motion::LineEnd, count: 1 }),
            '^' => self.run(NormalCommand::Move { motion: Motion::FirstNonBlank, count: 1 }),
            'f' => self.await_key(Awaiting::Find(FindKind::Forward)),
            'F' => self.await_key(Awaiting::Find(FindKind::Backward)),
            't' => self.await_key(Awaiting::Find(FindKind::Till)),
            'T' => self.await_key(Awaiting::Find(FindKind::TillBackward)),
            'g' => self.await_key(Awaiting::GotoPrefix),
            'G' => {
                let line = if self.count.is_empty() {
                    None
                } else {
                    Some(count)
                };
                self.run(NormalCommand::GotoLine { line })
            }
            '%' => self.run(NormalCommand::MatchBracket),
            'd' => self.start_operator(Operator::Delete),
            'c' => self.start_operator(Operator::Change),
            'y' => self.start_operator(Operator::Yank),
            'i' => self.run(NormalCommand::InsertHere),
            'I' => self.run(NormalCommand::InsertLineStart),
            'a' => self.run(NormalCommand::Append),
            'A' => self.run(NormalCommand::AppendLineEnd),
            'o' => self.run(NormalCommand::OpenBelow),
            'O' => self.run(NormalCommand::OpenAbove),
            'x' => self.run(NormalCommand::DeleteChar { before: false, count }),
            'X' => self.run(NormalCommand::DeleteChar { before: true, count }),
            's' => self.run(NormalCommand::Substitute { count }),
            'S' => self.run(NormalCommand::Operate {
                op: Operator::Change,
                target: OpTarget::Line,
                count,
            }),
            'C' => self.run(NormalCommand::Operate {
                op: Operator::Change,
                target: OpTarget::Motion(Motion::LineEnd),
                count: 1,
            }),
            'D' => self.run(NormalCommand::Operate {
                op: Operator::Delete,
                target: OpTarget::Motion(Motion::LineEnd),
                count: 1,
            }),
            'Y' => self.run(NormalCommand::Operate {
                op: Operator::Yank,
                target: OpTarget::Line,
                count,
            }),
            'r' => self.await_key(Awaiting::ReplaceChar),
            'R' => self.run(NormalCommand::EnterReplace),
            'p' => self.run(NormalCommand::PutAfter { count }),
            'P' => self.run(NormalCommand::PutBefore { count }),
            'u' => self.run(NormalCommand::Undo { count }),
            '.' => self.run(NormalCommand::Repeat),
            'm' => self.await_key(Awaiting::Mark),
            '\'' | '`' => self.await_key(Awaiting::MarkJump),
            'q' => {
                if recording {
                    self.run(NormalCommand::StopRecording)
                } else {
                    self.await_key(Awaiting::Record)
                }
            }
            '@' => self.await_key(Awaiting::Play),
            '/' => self.run(NormalCommand::SearchPrompt { backward: false }),
            '?' => self.run(NormalCommand::SearchPrompt { backward: true }),
            'n' => self.run(NormalCommand::SearchNext { count }),
            'N' => self.run(NormalCommand::SearchPrev { count }),
            '*' => self.run(NormalCommand::SearchWord { backward: false }),
            '#' => self.run(NormalCommand::SearchWord { backward: true }),
            'v' => self.run(NormalCommand::EnterVisual { linewise: false }),
            'V' => self.run(NormalCommand::EnterVisual { linewise: true }),
            ':' => self.run(NormalCommand::EnterCommandLine),
            _ => self.discard(),
        }
    }

    fn await_key(&mut self, awaiting: Awaiting) -> Parse {
        self.awaiting = Some(awaiting);
        Parse::Pending
    }

    fn start_operator(&mut self, op: Operator) -> Parse {
        self.operator = Some(op);
        Parse::Pending
    }

    /// Key after a pending operator: the doubled form, a motion from the
    /// narrow set operators understand, or an `i`/`a` object prefix.
    fn feed_operator_target(&mut self, op: Operator, ch: char) -> Parse {
        let count = self.count().max(1);
        let doubled = match op {
            Operator::Delete => 'd',
            Operator::Change => 'c',
            Operator::Yank => 'y',
        };
        if ch == doubled {
            return self.run(NormalCommand::Operate {
                op,
                target: OpTarget::Line,
                count,
            });
        }
        let motion = match ch {
            'w' => Some(Motion::WordForward),
            'e' => Some(Motion::WordEnd),
            'b' => Some(Motion::WordBack),
            '$' => Some(Motion::LineEnd),
            '0' => Some(Motion::LineStart),
            '^' => Some(Motion::FirstNonBlank),
            _ => None,
        };
        if let Some(motion) = motion {
            return self.run(NormalCommand::Operate {
                op,
                target: OpTarget::Motion(motion),
                count,
            });
        }
        match ch {
            'f' => self.await_key(Awaiting::Find(FindKind::Forward)),
            'F' => self.await_key(Awaiting::Find(FindKind::Backward)),
            't' => self.await_key(Awaiting::Find(FindKind::Till)),
            'T' => self.await_key(Awaiting::Find(FindKind::TillBackward)),
            'i' => self.await_key(Awaiting::TextObject(ObjectPrefix::Inside)),
            'a' => self.await_key(Awaiting::TextObject(ObjectPrefix::Around)),
            _ => self.discard(),
        }
    }

    fn finish_awaiting(&mut self, awaiting: Awaiting, ch: char) -> Parse {
        let count = self.count().max(1);
        match awaiting {
            Awaiting::ReplaceChar => self.run(NormalCommand::ReplaceChar { ch, count }),
            Awaiting::Find(kind) => {
                let motion = Motion::Find { kind, ch };
                match self.operator {
                    Some(op) => self.run(NormalCommand::Operate {
                        op,
                        target: OpTarget::Motion(motion),
                        count,
                    }),
                    None => self.run(NormalCommand::Move { motion, count }),
                }
            }
            Awaiting::Mark => {
                if ch.is_ascii_alphanumeric() {
                    self.run(NormalCommand::SetMark(ch))
                } else {
                    self.discard()
                }
            }
            Awaiting::MarkJump => self.run(NormalCommand::JumpToMark(ch)),
            Awaiting::Record => {
                if ch.is_ascii_alphanumeric() {
                    self.run(NormalCommand::StartRecording(ch))
                } else {
                    self.discard()
                }
            }
            Awaiting::Play => self.run(NormalCommand::PlayMacro { register: ch, count }),
            Awaiting::TextObject(prefix) => {
                let op = match self.operator {
                    Some(op) => op,
                    None => return self.discard(),
                };
                match TextObject::from_key(ch) {
                    Some(obj) => self.run(NormalCommand::Operate {
                        op,
                        target: OpTarget::Object(prefix, obj),
                        count,
                    }),
                    None => self.discard(),
                }
            }
            Awaiting::GotoPrefix => {
                if ch == 'g' {
                    self.run(NormalCommand::GotoLine {
                        line: Some(count),
                    })
                } else {
                    self.discard()
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_str(p: &mut PendingCommand, keys: &str) -> Parse {
        let mut last = Parse::Pending;
        for ch in keys.chars() {
            last = p.feed(&KeyEvent::from_char(ch), false);
        }
        last
    }

    #[test]
    fn test_simple_motion() {
        let mut p = PendingCommand::new();
        assert_eq!(
            feed_str(&mut p, "j"),
            Parse::Run(NormalCommand::Move { motion: Motion::Down, count: 1 })
        );
    }

    #[test]
    fn test_count_prefix() {
        let mut p = PendingCommand::new();
        assert_eq!(
            feed_str(&mut p, "12w"),
            Parse::Run(NormalCommand::Move { motion: Motion::WordForward, count: 12 })
        );
    }

    #[test]
    fn test_leading_zero_is_line_start() {
        let mut p = PendingCommand::new();
        assert_eq!(
            feed_str(&mut p, "0"),
            Parse::Run(NormalCommand::Move { motion: Motion::LineStart, count: 1 })
        );
        // After a digit, 0 extends the count.
        assert_eq!(feed_str(&mut p, "10j"), Parse::Run(NormalCommand::Move {
            motion: Motion::Down,
            count: 10,
        }));
    }

    #[test]
    fn test_operator_doubled() {
        let mut p = PendingCommand::new();
        assert_eq!(
            feed_str(&mut p, "2dd"),
            Parse::Run(NormalCommand::Operate {
                op: Operator::Delete,
                target: OpTarget::Line,
                count: 2,
            })
        );
    }

    #[test]
    fn test_count_after_operator_replaces_prefix() {
        let mut p = PendingCommand::new();
        assert_eq!(
            feed_str(&mut p, "2d3w"),
            Parse::Run(NormalCommand::Operate {
                op: Operator::Delete,
                target: OpTarget::Motion(Motion::WordForward),
                count: 3,
            })
        );
        // Digits after the first post-operator one still accumulate.
        assert_eq!(
            feed_str(&mut p, "d12w"),
            Parse::Run(NormalCommand::Operate {
                op: Operator::Delete,
                target: OpTarget::Motion(Motion::WordForward),
                count: 12,
            })
        );
    }

    #[test]
    fn test_operator_motion() {
        let mut p = PendingCommand::new();
        assert_eq!(
            feed_str(&mut p, "cw"),
            Parse::Run(NormalCommand::Operate {
                op: Operator::Change,
                target: OpTarget::Motion(Motion::WordForward),
                count: 1,
            })
        );
    }

    #[test]
    fn test_operator_text_object() {
        let mut p = PendingCommand::new();
        assert_eq!(
            feed_str(&mut p, "di("),
            Parse::Run(NormalCommand::Operate {
                op: Operator::Delete,
                target: OpTarget::Object(ObjectPrefix::Inside, TextObject::Bracket('(')),
                count: 1,
            })
        );
    }

    #[test]
    fn test_operator_unknown_key_discards() {
        let mut p = PendingCommand::new();
        assert_eq!(feed_str(&mut p, "dz"), Parse::Discard);
        assert!(p.is_idle());
        // Parser is clean afterwards.
        assert_eq!(
            feed_str(&mut p, "x"),
            Parse::Run(NormalCommand::DeleteChar { before: false, count: 1 })
        );
    }

    #[test]
    fn test_escape_clears_pending() {
        let mut p = PendingCommand::new();
        feed_str(&mut p, "2d");
        assert_eq!(p.feed(&KeyEvent::special("Escape"), false), Parse::Discard);
        assert!(p.is_idle());
    }

    #[test]
    fn test_find_char() {
        let mut p = PendingCommand::new();
        assert_eq!(
            feed_str(&mut p, "fx"),
            Parse::Run(NormalCommand::Move {
                motion: Motion::Find { kind: FindKind::Forward, ch: 'x' },
                count: 1,
            })
        );
        assert_eq!(
            feed_str(&mut p, "dt;"),
            Parse::Run(NormalCommand::Operate {
                op: Operator::Delete,
                target: OpTarget::Motion(Motion::Find { kind: FindKind::Till, ch: ';' }),
                count: 1,
            })
        );
    }

    #[test]
    fn test_goto_line() {
        let mut p = PendingCommand::new();
        assert_eq!(feed_str(&mut p, "G"), Parse::Run(NormalCommand::GotoLine { line: None }));
        assert_eq!(
            feed_str(&mut p, "5G"),
            Parse::Run(NormalCommand::GotoLine { line: Some(5) })
        );
        assert_eq!(
            feed_str(&mut p, "gg"),
            Parse::Run(NormalCommand::GotoLine { line: Some(1) })
        );
        assert_eq!(
            feed_str(&mut p, "3gg"),
            Parse::Run(NormalCommand::GotoLine { line: Some(3) })
        );
    }

    #[test]
    fn test_record_keys() {
        let mut p = PendingCommand::new();
        assert_eq!(
            feed_str(&mut p, "qa"),
            Parse::Run(NormalCommand::StartRecording('a'))
        );
        assert_eq!(
            p.feed(&KeyEvent::from_char('q'), true),
            Parse::Run(NormalCommand::StopRecording)
        );
        assert_eq!(
            feed_str(&mut p, "3@a"),
            Parse::Run(NormalCommand::PlayMacro { register: 'a', count: 3 })
        );
    }

    #[test]
    fn test_ctrl_r_is_redo() {
        let mut p = PendingCommand::new();
        assert_eq!(
            p.feed(&KeyEvent::ctrl('r'), false),
            Parse::Run(NormalCommand::Redo { count: 1 })
        );
    }

    #[test]
    fn test_marks() {
        let mut p = PendingCommand::new();
        assert_eq!(feed_str(&mut p, "ma"), Parse::Run(NormalCommand::SetMark('a')));
        assert_eq!(feed_str(&mut p, "'a"), Parse::Run(NormalCommand::JumpToMark('a')));
        assert_eq!(feed_str(&mut p, "`a"), Parse::Run(NormalCommand::JumpToMark('a')));
    }
}
