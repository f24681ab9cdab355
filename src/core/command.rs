use std::path::PathBuf;

use regex::RegexBuilder;

use super::buffer::TextBuffer;
use super::engine::{Engine, EngineAction, SyntaxRequest};
use super::position::{Position, Range};

impl<B: TextBuffer> Engine<B> {
    /// Run a `:` command line. Returns the request the host has to carry
    /// out; edits the engine performs itself come back as `None`.
    pub(crate) fn execute_command(&mut self, cmd: &str) -> EngineAction {
        let cmd = cmd.trim();
        match cmd {
            "" => return EngineAction::None,
            "q" => return EngineAction::Quit,
            "q!" => return EngineAction::ForceQuit,
            "w" => return EngineAction::Write,
            "wq" | "x" => return EngineAction::WriteQuit,
            "syntax on" => return EngineAction::Syntax(SyntaxRequest::Auto),
            "syntax off" => return EngineAction::Syntax(SyntaxRequest::Off),
            _ => {}
        }

        if cmd == "e" || cmd.starts_with("e ") {
            let path = cmd[1..].trim();
            if path.is_empty() {
                self.message = "No file name".to_string();
                return EngineAction::Error;
            }
            return EngineAction::OpenFile(PathBuf::from(path));
        }

        if let Some(lang) = cmd.strip_prefix("set syntax=") {
            return EngineAction::Syntax(SyntaxRequest::Language(lang.trim().to_string()));
        }

        if cmd.starts_with("s/") {
            return self.run_substitute(cmd);
        }

        self.message = format!("Not an editor command: {}", cmd);
        EngineAction::Error
    }

    /// `:s/pattern/replacement/flags` over the whole buffer. Flags: `g`
    /// replaces every match (one, otherwise), `i` ignores case.
    fn run_substitute(&mut self, cmd: &str) -> EngineAction {
        let parts: Vec<&str> = cmd.split('/').collect();
        if parts.len() < 3 {
            self.message = format!("Malformed substitute: {}", cmd);
            return EngineAction::Error;
        }
        let pattern = parts[1];
        let replacement = parts[2];
        let flags = parts.get(3).copied().unwrap_or("");

        let re = match RegexBuilder::new(pattern)
            .multi_line(true)
            .case_insensitive(flags.contains('i'))
            .build()
        {
            Ok(re) => re,
            Err(err) => {
                self.prompt
                    .error("Substitution Error", &format!("invalid pattern: {}", err));
                return EngineAction::Error;
            }
        };

        let whole = Range::new(Position::origin(), self.buffer.end_position());
        let text = self.buffer.text(whole);
        let limit = if flags.contains('g') { 0 } else { 1 };
        let hits = re.find_iter(&text).count();
        let replaced = if limit == 0 { hits } else { hits.min(limit) };
        if replaced == 0 {
            self.message = format!("Pattern not found: {}", pattern);
            return EngineAction::Error;
        }

        let new_text = re.replacen(&text, limit, replacement).into_owned();
        self.edit_delete(whole);
        self.edit_insert(Position::origin(), &new_text);
        self.message = if replaced == 1 {
            "1 substitution".to_string()
        } else {
            format!("{} substitutions", replaced)
        };
        EngineAction::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::buffer::RopeBuffer;

    fn engine(text: &str) -> Engine<RopeBuffer> {
        Engine::from_text(text)
    }

    #[test]
    fn test_quit_and_write_commands() {
        let mut e = engine("hi\n");
        assert_eq!(e.execute_command("q"), EngineAction::Quit);
        assert_eq!(e.execute_command("q!"), EngineAction::ForceQuit);
        assert_eq!(e.execute_command("w"), EngineAction::Write);
        assert_eq!(e.execute_command("wq"), EngineAction::WriteQuit);
        assert_eq!(e.execute_command("x"), EngineAction::WriteQuit);
    }

    #[test]
    fn test_edit_command() {
        let mut e = engine("hi\n");
        assert_eq!(
            e.execute_command("e src/main.rs"),
            EngineAction::OpenFile(PathBuf::from("src/main.rs"))
        );
        assert_eq!(e.execute_command("e"), EngineAction::Error);
        assert_eq!(e.message, "No file name");
    }

    #[test]
    fn test_syntax_commands() {
        let mut e = engine("hi\n");
        assert_eq!(
            e.execute_command("syntax on"),
            EngineAction::Syntax(SyntaxRequest::Auto)
        );
        assert_eq!(
            e.execute_command("syntax off"),
            EngineAction::Syntax(SyntaxRequest::Off)
        );
        assert_eq!(
            e.execute_command("set syntax=rust"),
            EngineAction::Syntax(SyntaxRequest::Language("rust".to_string()))
        );
    }

    #[test]
    fn test_substitute_first_match_only() {
        let mut e = engine("aaa bbb aaa\n");
        assert_eq!(e.execute_command("s/aaa/xxx"), EngineAction::None);
        assert_eq!(e.buffer.to_string(), "xxx bbb aaa\n");
        assert_eq!(e.message, "1 substitution");
    }

    #[test]
    fn test_substitute_global() {
        let mut e = engine("aaa bbb aaa\n");
        assert_eq!(e.execute_command("s/aaa/xxx/g"), EngineAction::None);
        assert_eq!(e.buffer.to_string(), "xxx bbb xxx\n");
        assert_eq!(e.message, "2 substitutions");
    }

    #[test]
    fn test_substitute_case_insensitive() {
        let mut e = engine("Foo foo\n");
        assert_eq!(e.execute_command("s/foo/bar/gi"), EngineAction::None);
        assert_eq!(e.buffer.to_string(), "bar bar\n");
    }

    #[test]
    fn test_substitute_spans_lines() {
        let mut e = engine("aaa\naaa\n");
        assert_eq!(e.execute_command("s/aaa/x/g"), EngineAction::None);
        assert_eq!(e.buffer.to_string(), "x\nx\n");
    }

    #[test]
    fn test_substitute_not_found() {
        let mut e = engine("hello\n");
        assert_eq!(e.execute_command("s/zzz/x"), EngineAction::Error);
        assert_eq!(e.buffer.to_string(), "hello\n");
        assert_eq!(e.message, "Pattern not found: zzz");
    }

    #[test]
    fn test_unknown_command() {
        let mut e = engine("hi\n");
        assert_eq!(e.execute_command("frobnicate"), EngineAction::Error);
        assert_eq!(e.message, "Not an editor command: frobnicate");
    }
}
