//! Embeds the Monaco editor inside a native web view.
//!
//! The page is served from gzip-compressed assets over the `monacoeditor://`
//! scheme ([`scheme`]). Everything the host does to the editor is a script
//! evaluated in the page ([`scripts`], [`builder`], [`options`]); the page
//! reports edits back through the `updateText` message channel ([`message`]).
//! [`view::EditorView`] sequences the two directions and [`adapter`] binds it
//! to a host UI's mount/update cycle.

pub mod adapter;
pub mod assets;
pub mod builder;
pub mod command;
pub mod config;
pub mod context_key;
pub mod keybinding;
pub mod message;
pub mod navigation;
pub mod options;
pub mod scheme;
pub mod scripts;
pub mod view;

#[cfg(test)]
mod test_support;

pub use adapter::{Coordinator, MonacoEditor, MonacoEditorBuilder, TextBinding};
pub use command::{Action, Command};
pub use config::Configuration;
pub use keybinding::{KeyBinding, KeyCode};
pub use view::{EditorView, LoadState, WebSurface};
