use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::command::{Action, Command};
use crate::config::Configuration;
use crate::context_key::{ContextKey, ContextKeyValue};
use crate::options::{encode_text, ConstructionOptions};
use crate::scheme::EDITOR_URI;
use crate::scripts;

/// Invoked exactly once per evaluation with the outcome.
pub type ScriptCompletion = Box<dyn FnOnce(Result<(), String>) + 'static>;

/// The web content surface hosting the editor page.
///
/// Implementations run on the UI thread; completions are delivered later on
/// the same thread.
pub trait WebSurface {
    fn load_uri(&self, uri: &str);
    fn evaluate_script(&self, script: &str, completion: ScriptCompletion);
}

/// Evaluate and log failures. There is nothing else a caller could do with
/// them.
fn evaluate_logged<S: WebSurface + ?Sized>(surface: &S, script: &str) {
    surface.evaluate_script(
        script,
        Box::new(|result| {
            if let Err(e) = result {
                log::error!("Script evaluation failed: {}", e);
            }
        }),
    );
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Unloaded,
    Loading,
    Loaded,
}

pub type ContentChanged = Rc<dyn Fn(&str)>;
type Ready<S> = Rc<dyn Fn(&Rc<EditorView<S>>)>;

/// Native side of one embedded editor.
///
/// Owns the text and configuration, tracks the page load state and turns
/// every native operation into a script evaluation once the page is loaded.
pub struct EditorView<S: WebSurface> {
    surface: Rc<S>,
    this: Weak<EditorView<S>>,
    state: Cell<LoadState>,
    text: RefCell<String>,
    configuration: RefCell<Configuration>,
    content_changed: RefCell<Option<ContentChanged>>,
    ready: RefCell<Option<Ready<S>>>,
}

impl<S: WebSurface + 'static> EditorView<S> {
    pub fn new(surface: Rc<S>, text: &str, configuration: Configuration) -> Rc<Self> {
        Rc::new_cyclic(|this| EditorView {
            surface,
            this: this.clone(),
            state: Cell::new(LoadState::Unloaded),
            text: RefCell::new(text.to_string()),
            configuration: RefCell::new(configuration),
            content_changed: RefCell::new(None),
            ready: RefCell::new(None),
        })
    }

    pub fn surface(&self) -> &Rc<S> {
        &self.surface
    }

    pub fn load_state(&self) -> LoadState {
        self.state.get()
    }

    pub fn is_loaded(&self) -> bool {
        self.state.get() == LoadState::Loaded
    }

    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }

    pub fn configuration(&self) -> Configuration {
        self.configuration.borrow().clone()
    }

    pub fn set_configuration(&self, configuration: Configuration) {
        *self.configuration.borrow_mut() = configuration;
    }

    pub fn set_content_changed(&self, callback: Option<ContentChanged>) {
        *self.content_changed.borrow_mut() = callback;
    }

    /// Called after `editor.create` succeeds.
    pub fn set_ready(&self, callback: impl Fn(&Rc<EditorView<S>>) + 'static) {
        *self.ready.borrow_mut() = Some(Rc::new(callback));
    }

    /// Start loading the editor page.
    pub fn load_editor(&self) {
        self.state.set(LoadState::Loading);
        self.surface.load_uri(EDITOR_URI);
    }

    /// Page finished loading: patch base64 for UTF-8 and create the editor.
    pub fn navigation_finished(&self) {
        self.state.set(LoadState::Loaded);
        self.enable_utf8();
        self.create_editor();
    }

    pub fn enable_utf8(&self) {
        evaluate_logged(self.surface.as_ref(), scripts::ENABLE_UTF8);
    }

    pub fn create_editor(&self) {
        let script = {
            let text = self.text.borrow();
            let configuration = self.configuration.borrow();
            scripts::create_editor(
                &ConstructionOptions::new(Some(text.as_str()), &configuration).to_script(),
            )
        };
        let this = self.this.clone();
        self.surface.evaluate_script(
            &script,
            Box::new(move |result| match result {
                Ok(()) => {
                    // The view may be gone by the time the page answers.
                    let Some(view) = this.upgrade() else {
                        log::debug!("Editor created after its view was dropped");
                        return;
                    };
                    let ready = view.ready.borrow().clone();
                    if let Some(ready) = ready {
                        ready(&view);
                    }
                }
                Err(e) => log::error!("Failed to create editor: {}", e),
            }),
        );
    }

    /// Replace the text. Before the page has loaded only the stored value
    /// changes; it is used when the editor gets created.
    pub fn set_text(&self, text: &str) {
        *self.text.borrow_mut() = text.to_string();
        if !self.is_loaded() {
            return;
        }
        evaluate_logged(self.surface.as_ref(), &scripts::set_text(&encode_text(text)));
    }

    /// Push the current configuration (and optionally new text) to the page.
    pub fn update_configuration(&self, text: Option<&str>) {
        if !self.is_loaded() {
            return;
        }
        let script = {
            let configuration = self.configuration.borrow();
            scripts::update_options(&ConstructionOptions::new(text, &configuration).to_script())
        };
        evaluate_logged(self.surface.as_ref(), &script);
    }

    pub fn add_command(&self, command: &Command) {
        self.evaluate_when_loaded("command", &command.to_script());
    }

    pub fn add_action(&self, action: &Action) {
        self.evaluate_when_loaded(&format!("action {}", action.id), &action.to_script());
    }

    pub fn create_context_key<T: ContextKeyValue>(
        &self,
        key: &str,
        default_value: T,
    ) -> ContextKey<T, S> {
        self.evaluate_when_loaded(
            &format!("context key {}", key),
            &scripts::create_context_key(key, &default_value.to_script()),
        );
        ContextKey::new(self.this.clone(), key)
    }

    pub fn resize_layout(&self) {
        self.evaluate_when_loaded("layout", scripts::RESIZE_LAYOUT);
    }

    /// Text reported by the page. Stored without echoing it back, then
    /// handed to the host.
    pub fn content_changed(&self, text: &str) {
        *self.text.borrow_mut() = text.to_string();
        let callback = self.content_changed.borrow().clone();
        if let Some(callback) = callback {
            callback(text);
        }
    }

    pub(crate) fn evaluate_when_loaded(&self, what: &str, script: &str) {
        if !self.is_loaded() {
            log::warn!("Editor page not loaded yet, dropping {}", what);
            return;
        }
        evaluate_logged(self.surface.as_ref(), script);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keybinding::{KeyBinding, KeyCode};
    use crate::test_support::RecordingSurface;

    fn view(text: &str) -> (Rc<RecordingSurface>, Rc<EditorView<RecordingSurface>>) {
        let surface = Rc::new(RecordingSurface::default());
        let view = EditorView::new(surface.clone(), text, Configuration::default());
        (surface, view)
    }

    #[test]
    fn starts_unloaded_and_loads_editor_uri() {
        let (surface, view) = view("");
        assert_eq!(view.load_state(), LoadState::Unloaded);
        view.load_editor();
        assert_eq!(view.load_state(), LoadState::Loading);
        assert_eq!(surface.loads(), vec![EDITOR_URI.to_string()]);
        assert!(surface.scripts().is_empty());
    }

    #[test]
    fn text_before_load_is_only_stored() {
        let (surface, view) = view("a");
        view.set_text("b");
        view.load_editor();
        view.set_text("c");
        assert_eq!(view.text(), "c");
        assert!(surface.scripts().is_empty());
    }

    #[test]
    fn navigation_finished_patches_utf8_then_creates() {
        let (surface, view) = view("héllo");
        view.load_editor();
        view.navigation_finished();
        assert!(view.is_loaded());

        let scripts = surface.scripts();
        assert_eq!(scripts.len(), 2);
        assert_eq!(scripts[0], scripts::ENABLE_UTF8);
        assert!(scripts[1].contains("editor.create(options)"));
        assert!(scripts[1].contains(&format!("value: \"{}\"", encode_text("héllo"))));
    }

    #[test]
    fn ready_fires_only_after_create_succeeds() {
        let (surface, view) = view("");
        let fired = Rc::new(Cell::new(0));
        let fired_in_ready = fired.clone();
        view.set_ready(move |_| fired_in_ready.set(fired_in_ready.get() + 1));

        view.navigation_finished();
        assert_eq!(fired.get(), 0);
        surface.complete_all(Ok(()));
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn failed_create_does_not_fire_ready() {
        let (surface, view) = view("");
        let fired = Rc::new(Cell::new(false));
        let fired_in_ready = fired.clone();
        view.set_ready(move |_| fired_in_ready.set(true));

        view.navigation_finished();
        surface.complete_all(Err("ReferenceError: editor is not defined".to_string()));
        assert!(!fired.get());
    }

    #[test]
    fn late_completion_after_drop_is_noop() {
        let (surface, view) = view("");
        let fired = Rc::new(Cell::new(false));
        let fired_in_ready = fired.clone();
        view.set_ready(move |_| fired_in_ready.set(true));
        view.navigation_finished();
        drop(view);

        surface.complete_all(Ok(()));
        assert!(!fired.get());
    }

    #[test]
    fn text_after_load_is_pushed_base64() {
        let (surface, view) = view("");
        view.navigation_finished();
        view.set_text("it's \"quoted\"\n");
        let last = surface.scripts().pop().unwrap();
        assert!(last.contains(&format!("atob('{}')", encode_text("it's \"quoted\"\n"))));
        assert!(last.contains("editor.setText(text)"));
    }

    #[test]
    fn update_configuration_requires_load() {
        let (surface, view) = view("");
        view.update_configuration(None);
        assert!(surface.scripts().is_empty());

        view.navigation_finished();
        view.set_configuration(Configuration {
            read_only: Some(true),
            ..Default::default()
        });
        view.update_configuration(None);
        let last = surface.scripts().pop().unwrap();
        assert!(last.contains("let options = { readOnly: true };"));
        assert!(last.contains("editor.updateOptions(options)"));
    }

    #[test]
    fn commands_and_actions_are_not_deduplicated() {
        let (surface, view) = view("");
        view.navigation_finished();
        let before = surface.scripts().len();

        let command = Command::new(KeyBinding::Key(KeyCode::F5), "function() {}");
        view.add_command(&command);
        view.add_command(&command);
        let action = crate::command::Action::new("x", "X", "function() {}");
        view.add_action(&action);

        assert_eq!(surface.scripts().len(), before + 3);
        assert_eq!(surface.count_containing("editor.addCommand(monaco.KeyCode.F5"), 2);
    }

    #[test]
    fn registration_before_load_is_dropped() {
        let (surface, view) = view("");
        view.add_command(&Command::new(KeyBinding::Key(KeyCode::F5), "function() {}"));
        view.resize_layout();
        assert!(surface.scripts().is_empty());
    }

    #[test]
    fn context_key_handle_is_bound_to_name() {
        let (surface, view) = view("");
        view.navigation_finished();
        let key = view.create_context_key("hasSelection", false);
        assert_eq!(key.key(), "hasSelection");
        assert_eq!(
            surface.count_containing(r#"editor.createContextKey("hasSelection", false);"#),
            1
        );
        key.set(true);
        assert_eq!(
            surface.count_containing(r#"editor.setContextKey("hasSelection", true);"#),
            1
        );
    }

    #[test]
    fn resize_layout_calls_editor_layout() {
        let (surface, view) = view("");
        view.navigation_finished();
        view.resize_layout();
        assert_eq!(surface.count_containing("editor.editor.layout();"), 1);
    }

    #[test]
    fn content_changed_updates_text_without_echo() {
        let (surface, view) = view("old");
        view.navigation_finished();
        let before = surface.scripts().len();

        let seen = Rc::new(RefCell::new(String::new()));
        let seen_in_callback = seen.clone();
        view.set_content_changed(Some(Rc::new(move |text: &str| {
            *seen_in_callback.borrow_mut() = text.to_string()
        })));
        view.content_changed("new");

        assert_eq!(*seen.borrow(), "new");
        assert_eq!(view.text(), "new");
        assert_eq!(surface.scripts().len(), before);
    }
}
