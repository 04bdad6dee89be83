use std::marker::PhantomData;
use std::rc::Weak;

use crate::builder::quote_string;
use crate::scripts;
use crate::view::{EditorView, WebSurface};

/// A value that can be stored in a Monaco context key.
pub trait ContextKeyValue {
    fn to_script(&self) -> String;
}

impl ContextKeyValue for bool {
    fn to_script(&self) -> String {
        self.to_string()
    }
}

impl ContextKeyValue for i32 {
    fn to_script(&self) -> String {
        self.to_string()
    }
}

impl ContextKeyValue for i64 {
    fn to_script(&self) -> String {
        self.to_string()
    }
}

impl ContextKeyValue for u32 {
    fn to_script(&self) -> String {
        self.to_string()
    }
}

impl ContextKeyValue for f64 {
    fn to_script(&self) -> String {
        crate::builder::ScriptValue::Number(*self)
            .render()
            .unwrap_or_default()
    }
}

impl ContextKeyValue for String {
    fn to_script(&self) -> String {
        quote_string(self)
    }
}

/// Handle to a context key living in the page.
///
/// The value is not cached natively; `set` and `reset` write through while
/// the editor page is loaded and do nothing once the view is gone.
pub struct ContextKey<T, S: WebSurface> {
    view: Weak<EditorView<S>>,
    key: String,
    _value: PhantomData<T>,
}

impl<T: ContextKeyValue, S: WebSurface + 'static> ContextKey<T, S> {
    pub(crate) fn new(view: Weak<EditorView<S>>, key: &str) -> Self {
        Self {
            view,
            key: key.to_string(),
            _value: PhantomData,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn set(&self, value: T) {
        self.evaluate(&scripts::set_context_key(&self.key, &value.to_script()));
    }

    /// Restore the key to the default it was created with.
    pub fn reset(&self) {
        self.evaluate(&scripts::reset_context_key(&self.key));
    }

    fn evaluate(&self, script: &str) {
        match self.view.upgrade() {
            Some(view) => view.evaluate_when_loaded(&format!("context key {}", self.key), script),
            None => log::debug!("Context key {} outlived its view", self.key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Configuration;
    use crate::test_support::RecordingSurface;
    use std::rc::Rc;

    fn view() -> (Rc<RecordingSurface>, Rc<EditorView<RecordingSurface>>) {
        let surface = Rc::new(RecordingSurface::default());
        let view = EditorView::new(surface.clone(), "", Configuration::default());
        (surface, view)
    }

    #[test]
    fn set_and_reset_write_through() {
        let (surface, view) = view();
        view.navigation_finished();
        let key: ContextKey<String, _> = view.create_context_key("mode", String::new());
        key.set("insert".to_string());
        key.reset();

        assert_eq!(
            surface.count_containing(r#"editor.setContextKey("mode", "insert");"#),
            1
        );
        assert_eq!(surface.count_containing(r#"editor.resetContextKey("mode");"#), 1);
        assert_eq!(key.key(), "mode");
    }

    #[test]
    fn set_before_load_is_dropped() {
        let (surface, view) = view();
        let key = view.create_context_key("k", false);
        key.set(true);
        key.reset();
        assert!(surface.scripts().is_empty());
    }

    #[test]
    fn handle_outliving_view_is_inert() {
        let (surface, view) = view();
        view.navigation_finished();
        let key = view.create_context_key("k", false);
        let before = surface.scripts().len();

        drop(view);
        key.set(true);
        key.reset();
        assert_eq!(surface.scripts().len(), before);
    }

    #[test]
    fn value_rendering() {
        assert_eq!(true.to_script(), "true");
        assert_eq!(42i64.to_script(), "42");
        assert_eq!(0.25f64.to_script(), "0.25");
        assert_eq!("a\"b".to_string().to_script(), r#""a\"b""#);
    }
}
