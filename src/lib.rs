//! A modal (vi-style) editing engine decoupled from any particular text
//! widget. Hosts implement [`TextBuffer`] (or use the bundled
//! [`RopeBuffer`]), feed every key event to [`Engine::handle_key`], and
//! carry out the returned [`EngineAction`]. Prompts and observer callbacks
//! are injected through the [`Prompt`] and [`EditorHooks`] traits.

pub mod core;

pub use crate::core::{
    Direction, EditorHooks, Engine, EngineAction, IndexExpr, KeyEvent, Mode, NullHooks,
    NullPrompt, Position, Prompt, Range, RopeBuffer, Status, SyntaxRequest, TextBuffer,
};
