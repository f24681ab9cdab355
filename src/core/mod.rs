pub mod buffer;
pub mod command;
pub mod engine;
pub mod hooks;
pub mod key;
pub mod macros;
pub mod marks;
pub mod mode;
pub mod motion;
pub mod operator;
pub mod parser;
pub mod position;
pub mod prompt;
pub mod register;
pub mod repeat;
pub mod search;
pub mod text_object;

pub use buffer::{IndexExpr, RopeBuffer, TextBuffer};
pub use engine::{Engine, EngineAction, SyntaxRequest};
pub use hooks::{EditorHooks, NullHooks, Status};
pub use key::KeyEvent;
pub use mode::Mode;
pub use position::{Direction, Position, Range};
pub use prompt::{NullPrompt, Prompt};
