//! WebKitGTK 6 host for the embedded Monaco editor.

pub mod editor_webview;
mod navigation_signals;

pub use editor_webview::{create_monaco_editor, HostOptions, WebKitSurface};
