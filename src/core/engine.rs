use std::path::PathBuf;

use super::buffer::{RopeBuffer, TextBuffer};
use super::hooks::{EditorHooks, NullHooks, Status};
use super::key::KeyEvent;
use super::macros::MacroRecorder;
use super::marks::MarkStore;
use super::mode::Mode;
use super::motion::{self, Motion};
use super::operator::{OpTarget, Operator};
use super::parser::{NormalCommand, Parse, PendingCommand};
use super::position::{Position, Range};
use super::prompt::{NullPrompt, Prompt};
use super::register::Register;
use super::repeat::Change;
use super::search::SearchState;
use super::text_object::{self, ObjectPrefix, TextObject};

/// Self-referential macros cut off here instead of recursing forever.
const MAX_REPLAY_DEPTH: usize = 16;

/// What the host has to do after a key was processed. Everything except
/// `Pass` means the key was consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineAction {
    None,
    /// Not handled; the host should apply its default behavior.
    Pass,
    Quit,
    ForceQuit,
    Write,
    WriteQuit,
    OpenFile(PathBuf),
    Syntax(SyntaxRequest),
    /// A command line failed; the message field says why.
    Error,
}

impl EngineAction {
    pub fn consumed(&self) -> bool {
        !matches!(self, EngineAction::Pass)
    }
}

/// Host-side syntax highlighting requests from `:syntax` / `:set syntax=`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxRequest {
    /// Pick a language from the file name.
    Auto,
    Language(String),
    Off,
}

/// Active visual selection: the fixed end plus granularity. The moving end
/// is the cursor.
#[derive(Debug, Clone, Copy)]
struct Selection {
    anchor: Position,
    linewise: bool,
}

/// Why insert mode was entered, carried until the mode is left so the
/// typed text can be folded into the right repeatable change.
#[derive(Debug, Clone, Copy)]
pub(crate) enum PendingInsert {
    Change {
        target: OpTarget,
        count: usize,
        record: bool,
    },
    Substitute {
        count: usize,
    },
}

/// The modal command engine. One instance per buffer; the host feeds it
/// every key event and carries out the returned [`EngineAction`].
pub struct Engine<B: TextBuffer> {
    pub buffer: B,
    pub mode: Mode,
    /// Status-line message from the last processed key.
    pub message: String,
    /// Partial `:` command line while in Command mode.
    pub command_buffer: String,
    parser: PendingCommand,
    selection: Option<Selection>,
    visual_pending: Option<char>,
    pub(crate) register: Register,
    marks: MarkStore,
    pub(crate) last_change: Option<Change>,
    macros: MacroRecorder,
    pub(crate) search: SearchState,
    insert_start: Option<Position>,
    pending_insert: Option<PendingInsert>,
    replay_depth: usize,
    pub(crate) prompt: Box<dyn Prompt>,
    pub(crate) hooks: Box<dyn EditorHooks>,
}

impl Engine<RopeBuffer> {
    pub fn from_text(text: &str) -> Self {
        Self::new(RopeBuffer::from_text(text))
    }
}

impl<B: TextBuffer> Engine<B> {
    pub fn new(buffer: B) -> Self {
        Self {
            buffer,
            mode: Mode::Normal,
            message: String::new(),
            command_buffer: String::new(),
            parser: PendingCommand::new(),
            selection: None,
            visual_pending: None,
            register: Register::default(),
            marks: MarkStore::default(),
            last_change: None,
            macros: MacroRecorder::new(),
            search: SearchState::default(),
            insert_start: None,
            pending_insert: None,
            replay_depth: 0,
            prompt: Box::new(NullPrompt),
            hooks: Box::new(NullHooks),
        }
    }

    pub fn with_prompt(mut self, prompt: Box<dyn Prompt>) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn with_hooks(mut self, hooks: Box<dyn EditorHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn is_recording(&self) -> bool {
        self.macros.is_recording()
    }

    /// Feed one key event. Live keys are captured into an active macro
    /// recording before dispatch; replayed keys are not re-captured, so a
    /// nested `@x` is recorded as the invocation, not its expansion.
    pub fn handle_key(&mut self, key: KeyEvent) -> EngineAction {
        if self.macros.is_recording() && self.replay_depth == 0 {
            self.macros.push(key.clone());
        }
        if self.mode != Mode::Command {
            self.message.clear();
        }

        let action = match self.mode {
            Mode::Normal => self.handle_normal_key(&key),
            Mode::Insert => self.handle_insert_key(&key),
            Mode::Visual | Mode::VisualLine => self.handle_visual_key(&key),
            Mode::Command => self.handle_command_key(&key),
            Mode::Replace => self.handle_replace_key(&key),
        };

        self.clamp_cursor();
        self.emit_status();
        action
    }

    // ==== mode transitions ====

    pub(crate) fn set_mode(&mut self, mode: Mode) {
        self.set_mode_with(mode, None);
    }

    pub(crate) fn set_mode_with(&mut self, mode: Mode, pending: Option<PendingInsert>) {
        let old = self.mode;
        if old == mode {
            return;
        }
        if old == Mode::Insert {
            self.finish_insert();
        }
        if old.is_visual() {
            self.selection = None;
            self.visual_pending = None;
            self.hooks.on_selection_change(None);
        }
        if mode == Mode::Insert {
            self.insert_start = Some(self.buffer.cursor());
            self.pending_insert = pending;
        }
        if old == Mode::Command || mode == Mode::Command {
            self.command_buffer.clear();
        }
        self.mode = mode;
        self.hooks.on_mode_change(old, mode);
        self.hooks.on_cursor_style(mode);
    }

    /// Leaving insert mode: fold the text typed since entry into the
    /// repeatable change this insert belongs to. Entering and immediately
    /// leaving records nothing.
    fn finish_insert(&mut self) {
        let start = match self.insert_start.take() {
            Some(s) => s,
            None => return,
        };
        let typed = self.buffer.text(Range::new(start, self.buffer.cursor()));
        match self.pending_insert.take() {
            Some(PendingInsert::Change {
                target,
                count,
                record,
            }) => {
                if record {
                    self.last_change = Some(Change::Change {
                        target,
                        count,
                        text: typed,
                    });
                }
            }
            Some(PendingInsert::Substitute { count }) => {
                self.last_change = Some(Change::Substitute { count, text: typed });
            }
            None => {
                if !typed.is_empty() {
                    self.last_change = Some(Change::Insert { text: typed });
                }
            }
        }
    }

    // ==== normal mode ====

    fn handle_normal_key(&mut self, key: &KeyEvent) -> EngineAction {
        let was_idle = self.parser.is_idle();
        match self.parser.feed(key, self.macros.is_recording()) {
            Parse::Pending => EngineAction::None,
            Parse::Discard => {
                // Unrecognized special keys with nothing pending fall
                // through to the host; everything else is swallowed.
                if was_idle && key.ch.is_none() && !key.is("Escape") {
                    EngineAction::Pass
                } else {
                    EngineAction::None
                }
            }
            Parse::Run(cmd) => self.run_normal_command(cmd),
        }
    }

    fn run_normal_command(&mut self, cmd: NormalCommand) -> EngineAction {
        match cmd {
            NormalCommand::Move { motion, count } => {
                if let Some(pos) = motion::resolve(&self.buffer, self.buffer.cursor(), motion, count)
                {
                    self.buffer.set_cursor(pos);
                }
            }
            NormalCommand::GotoLine { line } => {
                let line = line
                    .unwrap_or_else(|| self.buffer.line_count())
                    .clamp(1, self.buffer.line_count());
                self.buffer.set_cursor(Position::new(line, 0));
            }
            NormalCommand::MatchBracket => {
                if let Some(pos) = motion::match_bracket(&self.buffer, self.buffer.cursor()) {
                    self.buffer.set_cursor(pos);
                }
            }
            NormalCommand::Operate { op, target, count } => {
                self.apply_operator(op, target, count, true);
            }
            NormalCommand::InsertHere => self.set_mode(Mode::Insert),
            NormalCommand::InsertLineStart => {
                let line = self.buffer.cursor().line;
                self.buffer
                    .set_cursor(Position::new(line, motion::first_non_blank(&self.buffer, line)));
                self.set_mode(Mode::Insert);
            }
            NormalCommand::Append => {
                let cursor = self.buffer.cursor();
                let col = (cursor.col + 1).min(self.buffer.line_len(cursor.line));
                self.buffer.set_cursor(Position::new(cursor.line, col));
                self.set_mode(Mode::Insert);
            }
            NormalCommand::AppendLineEnd => {
                let line = self.buffer.cursor().line;
                self.buffer
                    .set_cursor(Position::new(line, self.buffer.line_len(line)));
                self.set_mode(Mode::Insert);
            }
            NormalCommand::OpenBelow => {
                let line = self.buffer.cursor().line;
                self.edit_insert(Position::new(line, self.buffer.line_len(line)), "\n");
                self.buffer.set_cursor(Position::new(line + 1, 0));
                self.set_mode(Mode::Insert);
            }
            NormalCommand::OpenAbove => {
                let line = self.buffer.cursor().line;
                self.edit_insert(Position::new(line, 0), "\n");
                self.buffer.set_cursor(Position::new(line, 0));
                self.set_mode(Mode::Insert);
            }
            NormalCommand::DeleteChar { before, count } => self.delete_char(before, count),
            NormalCommand::Substitute { count } => self.substitute(count),
            NormalCommand::ReplaceChar { ch, count } => self.replace_chars(ch, count),
            NormalCommand::PutAfter { count } => self.put(false, count),
            NormalCommand::PutBefore { count } => self.put(true, count),
            NormalCommand::Undo { count } => {
                for _ in 0..count.max(1) {
                    if !self.buffer.undo() {
                        self.message = "Already at oldest change".to_string();
                        break;
                    }
                }
            }
            NormalCommand::Redo { count } => {
                for _ in 0..count.max(1) {
                    if !self.buffer.redo() {
                        self.message = "Already at newest change".to_string();
                        break;
                    }
                }
            }
            NormalCommand::Repeat => self.repeat_last_change(),
            NormalCommand::SetMark(name) => {
                self.marks.set(name, self.buffer.cursor());
            }
            NormalCommand::JumpToMark(name) => {
                if let Some(pos) = self.marks.get(name) {
                    self.buffer.set_cursor(pos);
                }
            }
            NormalCommand::StartRecording(register) => {
                self.macros.start(register);
                self.message = format!("recording @{}", register);
            }
            NormalCommand::StopRecording => {
                if let Some(register) = self.macros.stop() {
                    self.message = format!("recorded @{}", register);
                }
            }
            NormalCommand::PlayMacro { register, count } => {
                self.play_macro(register, count);
            }
            NormalCommand::SearchPrompt { backward } => self.prompt_search(backward),
            NormalCommand::SearchNext { count } => self.search_again(false, count),
            NormalCommand::SearchPrev { count } => self.search_again(true, count),
            NormalCommand::SearchWord { backward } => self.search_word(backward),
            NormalCommand::EnterVisual { linewise } => {
                self.set_mode(if linewise {
                    Mode::VisualLine
                } else {
                    Mode::Visual
                });
                self.selection = Some(Selection {
                    anchor: self.buffer.cursor(),
                    linewise,
                });
                let range = self.selection_range();
                self.hooks.on_selection_change(range);
            }
            NormalCommand::EnterReplace => self.set_mode(Mode::Replace),
            NormalCommand::EnterCommandLine => self.set_mode(Mode::Command),
        }
        EngineAction::None
    }

    fn play_macro(&mut self, register: char, count: usize) {
        if self.replay_depth >= MAX_REPLAY_DEPTH {
            self.message = "Macro replay too deep".to_string();
            return;
        }
        let keys = match self.macros.get(register) {
            Some(keys) => keys.to_vec(),
            None => return,
        };
        self.replay_depth += 1;
        for _ in 0..count.max(1) {
            for key in &keys {
                self.handle_key(key.clone());
            }
        }
        self.replay_depth -= 1;
    }

    // ==== insert mode ====

    fn handle_insert_key(&mut self, key: &KeyEvent) -> EngineAction {
        if key.is("Escape") {
            self.set_mode(Mode::Normal);
            let cursor = self.buffer.cursor();
            if cursor.col > 0 {
                self.buffer.set_cursor(Position::new(cursor.line, cursor.col - 1));
            }
            return EngineAction::None;
        }
        let cursor = self.buffer.cursor();
        match key.name.as_str() {
            "BackSpace" => {
                if cursor.col > 0 {
                    self.edit_delete(Range::new(
                        Position::new(cursor.line, cursor.col - 1),
                        cursor,
                    ));
                    self.buffer
                        .set_cursor(Position::new(cursor.line, cursor.col - 1));
                } else if cursor.line > 1 {
                    let prev_len = self.buffer.line_len(cursor.line - 1);
                    self.edit_delete(Range::new(
                        Position::new(cursor.line - 1, prev_len),
                        Position::new(cursor.line, 0),
                    ));
                    self.buffer.set_cursor(Position::new(cursor.line - 1, prev_len));
                }
            }
            "Delete" => {
                if cursor.col < self.buffer.line_len(cursor.line) {
                    self.edit_delete(Range::new(
                        cursor,
                        Position::new(cursor.line, cursor.col + 1),
                    ));
                } else if cursor.line < self.buffer.line_count() {
                    self.edit_delete(Range::new(cursor, Position::new(cursor.line + 1, 0)));
                }
            }
            "Return" => {
                self.edit_insert(cursor, "\n");
                self.buffer.set_cursor(Position::new(cursor.line + 1, 0));
            }
            "Tab" => {
                self.edit_insert(cursor, "    ");
                self.buffer.set_cursor(Position::new(cursor.line, cursor.col + 4));
            }
            "Left" => {
                self.buffer
                    .set_cursor(Position::new(cursor.line, cursor.col.saturating_sub(1)));
            }
            "Right" => {
                let col = (cursor.col + 1).min(self.buffer.line_len(cursor.line));
                self.buffer.set_cursor(Position::new(cursor.line, col));
            }
            "Up" => {
                self.buffer
                    .set_cursor(Position::new(cursor.line.saturating_sub(1).max(1), cursor.col));
            }
            "Down" => {
                self.buffer.set_cursor(Position::new(
                    (cursor.line + 1).min(self.buffer.line_count()),
                    cursor.col,
                ));
            }
            _ => match key.ch {
                Some(ch) if !key.ctrl => {
                    let mut s = String::new();
                    s.push(ch);
                    self.edit_insert(cursor, &s);
                    self.buffer.set_cursor(Position::new(cursor.line, cursor.col + 1));
                }
                _ => return EngineAction::Pass,
            },
        }
        EngineAction::None
    }

    // ==== replace mode ====

    fn handle_replace_key(&mut self, key: &KeyEvent) -> EngineAction {
        if key.is("Escape") {
            self.set_mode(Mode::Normal);
            let cursor = self.buffer.cursor();
            if cursor.col > 0 {
                self.buffer.set_cursor(Position::new(cursor.line, cursor.col - 1));
            }
            return EngineAction::None;
        }
        let cursor = self.buffer.cursor();
        match key.name.as_str() {
            "BackSpace" => {
                self.buffer
                    .set_cursor(Position::new(cursor.line, cursor.col.saturating_sub(1)));
            }
            _ => match key.ch {
                Some(ch) if !key.ctrl => {
                    if cursor.col < self.buffer.line_len(cursor.line) {
                        self.edit_delete(Range::new(
                            cursor,
                            Position::new(cursor.line, cursor.col + 1),
                        ));
                    }
                    let mut s = String::new();
                    s.push(ch);
                    self.edit_insert(cursor, &s);
                    self.buffer.set_cursor(Position::new(cursor.line, cursor.col + 1));
                }
                _ => return EngineAction::Pass,
            },
        }
        EngineAction::None
    }

    // ==== visual modes ====

    fn handle_visual_key(&mut self, key: &KeyEvent) -> EngineAction {
        if key.is("Escape") {
            self.set_mode(Mode::Normal);
            return EngineAction::None;
        }

        if let Some(pending) = self.visual_pending.take() {
            if let (Some(ch), false) = (key.ch, key.ctrl) {
                match pending {
                    'g' => {
                        if ch == 'g' {
                            self.buffer.set_cursor(Position::new(1, 0));
                        }
                    }
                    'i' | 'a' => {
                        let prefix = if pending == 'i' {
                            ObjectPrefix::Inside
                        } else {
                            ObjectPrefix::Around
                        };
                        if let Some(obj) = TextObject::from_key(ch) {
                            self.snap_selection_to_object(prefix, obj);
                        }
                    }
                    _ => {}
                }
            }
            let range = self.selection_range();
            self.hooks.on_selection_change(range);
            return EngineAction::None;
        }

        let motion = match key.name.as_str() {
            "Left" => Some(Motion::Left),
            "Down" => Some(Motion::Down),
            "Up" => Some(Motion::Up),
            "Right" => Some(Motion::Right),
            _ => match key.ch {
                Some('h') => Some(Motion::Left),
                Some('j') => Some(Motion::Down),
                Some('k') => Some(Motion::Up),
                Some('l') => Some(Motion::Right),
                Some('w') => Some(Motion::WordForward),
                Some('b') => Some(Motion::WordBack),
                Some('e') => Some(Motion::WordEnd),
                Some('W') => Some(Motion::BigWordForward),
                Some('B') => Some(Motion::BigWordBack),
                Some('E') => Some(Motion::BigWordEnd),
                Some('0') => Some(Motion::LineStart),
                Some('$') => Some(Motion::LineEnd),
                Some('^') => Some(Motion::FirstNonBlank),
                _ => None,
            },
        };
        if let Some(motion) = motion {
            if let Some(pos) = motion::resolve(&self.buffer, self.buffer.cursor(), motion, 1) {
                self.buffer.set_cursor(pos);
            }
            let range = self.selection_range();
            self.hooks.on_selection_change(range);
            return EngineAction::None;
        }

        match key.ch {
            Some('g') | Some('i') | Some('a') => {
                self.visual_pending = key.ch;
            }
            Some('G') => {
                let line = self.buffer.line_count();
                self.buffer.set_cursor(Position::new(line, 0));
                let range = self.selection_range();
                self.hooks.on_selection_change(range);
            }
            Some('v') => {
                if self.mode == Mode::Visual {
                    self.set_mode(Mode::Normal);
                } else {
                    self.set_granularity(false);
                }
            }
            Some('V') => {
                if self.mode == Mode::VisualLine {
                    self.set_mode(Mode::Normal);
                } else {
                    self.set_granularity(true);
                }
            }
            Some('d') | Some('x') => self.visual_operate(Operator::Delete),
            Some('y') => self.visual_operate(Operator::Yank),
            Some('c') => self.visual_operate(Operator::Change),
            Some('>') => self.visual_shift(true),
            Some('<') => self.visual_shift(false),
            _ => {}
        }
        EngineAction::None
    }

    /// `v`/`V` inside a visual mode switch granularity, keeping the anchor.
    fn set_granularity(&mut self, linewise: bool) {
        if let Some(sel) = self.selection.as_mut() {
            sel.linewise = linewise;
        }
        let old = self.mode;
        let new = if linewise { Mode::VisualLine } else { Mode::Visual };
        // Direct assignment keeps the selection alive across the switch.
        self.mode = new;
        self.hooks.on_mode_change(old, new);
        self.hooks.on_cursor_style(new);
        let range = self.selection_range();
        self.hooks.on_selection_change(range);
    }

    fn snap_selection_to_object(&mut self, prefix: ObjectPrefix, obj: TextObject) {
        let range = match text_object::resolve(&self.buffer, self.buffer.cursor(), prefix, obj) {
            Some(r) if !r.is_empty() => r,
            _ => return,
        };
        if self.mode == Mode::VisualLine {
            self.mode = Mode::Visual;
            self.hooks.on_mode_change(Mode::VisualLine, Mode::Visual);
            self.hooks.on_cursor_style(Mode::Visual);
        }
        self.selection = Some(Selection {
            anchor: range.start,
            linewise: false,
        });
        // Cursor on the last character of the object.
        let last = motion::step_back(&self.buffer, range.end).unwrap_or(range.start);
        self.buffer.set_cursor(last);
    }

    fn visual_operate(&mut self, op: Operator) {
        let sel = match self.selection {
            Some(sel) => sel,
            None => return,
        };
        let cursor = self.buffer.cursor();

        if sel.linewise {
            let first = sel.anchor.line.min(cursor.line);
            let last = sel.anchor.line.max(cursor.line);
            let count = last - first + 1;
            self.buffer.set_cursor(Position::new(first, 0));
            self.set_mode(Mode::Normal);
            match op {
                Operator::Yank => {
                    let (_, text) = motion::linewise_range(&self.buffer, first, count);
                    self.register.set(text, true);
                }
                Operator::Delete | Operator::Change => {
                    self.apply_operator(op, OpTarget::Line, count, false);
                }
            }
            return;
        }

        let range = match self.charwise_selection(sel.anchor, cursor) {
            Some(r) => r,
            None => return,
        };
        self.set_mode(Mode::Normal);
        self.register.set(self.buffer.text(range), false);
        match op {
            Operator::Yank => {
                self.buffer.set_cursor(range.start);
            }
            Operator::Delete => {
                self.edit_delete(range);
                self.buffer.set_cursor(range.start);
            }
            Operator::Change => {
                self.edit_delete(range);
                self.buffer.set_cursor(range.start);
                self.set_mode(Mode::Insert);
            }
        }
    }

    fn visual_shift(&mut self, right: bool) {
        let sel = match self.selection {
            Some(sel) => sel,
            None => return,
        };
        let cursor = self.buffer.cursor();
        let first = sel.anchor.line.min(cursor.line);
        let last = sel.anchor.line.max(cursor.line);
        self.set_mode(Mode::Normal);
        self.shift_lines(first, last, right);
        self.buffer
            .set_cursor(Position::new(first, motion::first_non_blank(&self.buffer, first)));
    }

    /// Selection endpoints are inclusive of the character under the cursor.
    fn charwise_selection(&self, anchor: Position, cursor: Position) -> Option<Range> {
        let r = Range::ordered(anchor, cursor);
        let end = motion::step_forward(&self.buffer, r.end).unwrap_or_else(|| self.buffer.end_position());
        let r = Range::new(r.start, end);
        if r.is_empty() {
            None
        } else {
            Some(r)
        }
    }

    fn selection_range(&self) -> Option<Range> {
        let sel = self.selection?;
        let cursor = self.buffer.cursor();
        if sel.linewise {
            let first = sel.anchor.line.min(cursor.line);
            let last = sel.anchor.line.max(cursor.line);
            Some(Range::new(
                Position::new(first, 0),
                Position::new(last, self.buffer.line_len(last)),
            ))
        } else {
            self.charwise_selection(sel.anchor, cursor)
        }
    }

    // ==== command mode ====

    fn handle_command_key(&mut self, key: &KeyEvent) -> EngineAction {
        if key.is("Escape") {
            self.set_mode(Mode::Normal);
            return EngineAction::None;
        }
        match key.name.as_str() {
            "Return" => {
                let cmd = std::mem::take(&mut self.command_buffer);
                self.set_mode(Mode::Normal);
                self.execute_command(&cmd)
            }
            "BackSpace" => {
                if self.command_buffer.is_empty() {
                    self.set_mode(Mode::Normal);
                } else {
                    self.command_buffer.pop();
                }
                EngineAction::None
            }
            _ => {
                if let (Some(ch), false) = (key.ch, key.ctrl) {
                    self.command_buffer.push(ch);
                }
                EngineAction::None
            }
        }
    }

    // ==== shared editing plumbing ====

    pub(crate) fn edit_insert(&mut self, pos: Position, text: &str) {
        if text.is_empty() {
            return;
        }
        self.buffer.insert(pos, text);
        self.hooks.on_text_change(Range::new(pos, pos), text);
    }

    pub(crate) fn edit_delete(&mut self, range: Range) {
        if range.is_empty() {
            return;
        }
        self.buffer.delete(range);
        self.hooks.on_text_change(range, "");
    }

    /// Normal and visual modes keep the cursor on a character; insert-like
    /// modes may sit one past the end of the line.
    fn clamp_cursor(&mut self) {
        let cursor = self.buffer.cursor();
        let line = cursor.line.clamp(1, self.buffer.line_count());
        let len = self.buffer.line_len(line);
        let max_col = match self.mode {
            Mode::Insert | Mode::Replace | Mode::Command => len,
            _ => len.saturating_sub(1),
        };
        let clamped = Position::new(line, cursor.col.min(max_col));
        if clamped != cursor {
            self.buffer.set_cursor(clamped);
        }
    }

    fn emit_status(&mut self) {
        let cursor = self.buffer.cursor();
        let status = Status {
            mode: self.mode,
            line: cursor.line,
            col: cursor.col,
            recording: self.macros.recording_register(),
            message: self.message.clone(),
        };
        self.hooks.on_status_change(&status);
    }
}
