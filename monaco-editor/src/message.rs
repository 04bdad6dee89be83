use std::rc::{Rc, Weak};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::Value;

use crate::view::{EditorView, WebSurface};

/// Channel the page posts base64 text to whenever the model changes.
pub const UPDATE_TEXT_HANDLER: &str = "updateText";
/// Channel name for the host's optional catch-all handler.
pub const OTHER_MESSAGE_HANDLER: &str = "OtherMessageHandler";

#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error("expected a string payload, got {0}")]
    NotAString(&'static str),
    #[error("payload is not base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("payload is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Decode an `updateText` payload: a string holding base64 of UTF-8 bytes.
pub fn decode_update_text(body: &Value) -> Result<String, MessageError> {
    let Value::String(encoded) = body else {
        return Err(MessageError::NotAString(kind_of(body)));
    };
    let bytes = STANDARD.decode(encoded.as_bytes())?;
    Ok(String::from_utf8(bytes)?)
}

/// A message posted by the page to a named handler.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptMessage {
    pub name: String,
    pub body: Value,
}

pub type ReplyResult = Result<Value, String>;

#[derive(Clone)]
pub enum MessageHandlerKind {
    /// `window.webkit.messageHandlers.<name>.postMessage(..)` with no reply.
    Plain(Rc<dyn Fn(&ScriptMessage)>),
    /// `postMessage` whose returned promise resolves with the reply.
    WithReply(Rc<dyn Fn(&ScriptMessage) -> ReplyResult>),
}

/// Extra page → host message handler supplied by the embedding application.
#[derive(Clone)]
pub struct ScriptMessageHandler {
    pub name: String,
    pub kind: MessageHandlerKind,
}

impl ScriptMessageHandler {
    pub fn new(name: impl Into<String>, handler: impl Fn(&ScriptMessage) + 'static) -> Self {
        Self {
            name: name.into(),
            kind: MessageHandlerKind::Plain(Rc::new(handler)),
        }
    }

    pub fn with_reply(
        name: impl Into<String>,
        handler: impl Fn(&ScriptMessage) -> ReplyResult + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            kind: MessageHandlerKind::WithReply(Rc::new(handler)),
        }
    }

    /// Dispatch a message. Plain handlers always reply `Ok(Value::Null)`.
    pub fn dispatch(&self, message: &ScriptMessage) -> ReplyResult {
        match &self.kind {
            MessageHandlerKind::Plain(handler) => {
                handler(message);
                Ok(Value::Null)
            }
            MessageHandlerKind::WithReply(handler) => handler(message),
        }
    }

    pub fn wants_reply(&self) -> bool {
        matches!(self.kind, MessageHandlerKind::WithReply(_))
    }
}

/// Receives `updateText` messages for one view.
pub struct UpdateTextHandler<S: WebSurface> {
    view: Weak<EditorView<S>>,
}

impl<S: WebSurface + 'static> UpdateTextHandler<S> {
    pub fn new(view: &Rc<EditorView<S>>) -> Self {
        Self {
            view: Rc::downgrade(view),
        }
    }

    /// Malformed payloads are logged and dropped.
    pub fn receive(&self, body: &Value) {
        let text = match decode_update_text(body) {
            Ok(text) => text,
            Err(e) => {
                log::warn!("Unexpected {} message body: {}", UPDATE_TEXT_HANDLER, e);
                return;
            }
        };
        if let Some(view) = self.view.upgrade() {
            view.content_changed(&text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Configuration;
    use crate::test_support::RecordingSurface;
    use serde_json::json;
    use std::cell::RefCell;

    #[test]
    fn decodes_utf8_text() {
        let body = json!(STANDARD.encode("naïve 🦀\n\"x\""));
        assert_eq!(decode_update_text(&body).unwrap(), "naïve 🦀\n\"x\"");
    }

    #[test]
    fn rejects_non_string() {
        assert!(matches!(
            decode_update_text(&json!({ "text": "aGk=" })),
            Err(MessageError::NotAString("object"))
        ));
        assert!(matches!(
            decode_update_text(&json!(42)),
            Err(MessageError::NotAString("number"))
        ));
    }

    #[test]
    fn rejects_invalid_base64() {
        assert!(matches!(
            decode_update_text(&json!("not base64!")),
            Err(MessageError::Base64(_))
        ));
    }

    #[test]
    fn rejects_valid_base64_of_invalid_utf8() {
        let body = json!(STANDARD.encode([0xffu8, 0xfe, 0x00]));
        assert!(matches!(
            decode_update_text(&body),
            Err(MessageError::Utf8(_))
        ));
    }

    fn handler_with_log() -> (
        Rc<EditorView<RecordingSurface>>,
        UpdateTextHandler<RecordingSurface>,
        Rc<RefCell<Vec<String>>>,
    ) {
        let view = EditorView::new(
            Rc::new(RecordingSurface::default()),
            "",
            Configuration::default(),
        );
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_in_callback = seen.clone();
        view.set_content_changed(Some(Rc::new(move |text: &str| {
            seen_in_callback.borrow_mut().push(text.to_string())
        })));
        let handler = UpdateTextHandler::new(&view);
        (view, handler, seen)
    }

    #[test]
    fn well_formed_payload_reaches_callback() {
        let (view, handler, seen) = handler_with_log();
        handler.receive(&json!(STANDARD.encode("héllo")));
        assert_eq!(*seen.borrow(), vec!["héllo".to_string()]);
        assert_eq!(view.text(), "héllo");
    }

    #[test]
    fn malformed_payloads_never_reach_callback() {
        let (_view, handler, seen) = handler_with_log();
        handler.receive(&json!(null));
        handler.receive(&json!(["aGk="]));
        handler.receive(&json!(STANDARD.encode([0xc3u8, 0x28])));
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn plain_handlers_reply_null() {
        let seen = Rc::new(RefCell::new(None));
        let seen_in_handler = seen.clone();
        let handler = ScriptMessageHandler::new("log", move |m: &ScriptMessage| {
            *seen_in_handler.borrow_mut() = Some(m.body.clone())
        });
        let message = ScriptMessage {
            name: "log".to_string(),
            body: json!("hi"),
        };
        assert!(!handler.wants_reply());
        assert_eq!(handler.dispatch(&message).unwrap(), Value::Null);
        assert_eq!(*seen.borrow(), Some(json!("hi")));
    }

    #[test]
    fn reply_handlers_return_their_result() {
        let handler = ScriptMessageHandler::with_reply("echo", |m: &ScriptMessage| {
            Ok(json!({ "echo": m.body }))
        });
        let message = ScriptMessage {
            name: "echo".to_string(),
            body: json!(1),
        };
        assert!(handler.wants_reply());
        assert_eq!(handler.dispatch(&message).unwrap(), json!({ "echo": 1 }));
    }
}
