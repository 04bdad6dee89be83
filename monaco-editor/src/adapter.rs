use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::command::{Action, Command};
use crate::config::Configuration;
use crate::view::{ContentChanged, EditorView, WebSurface};

/// Text shared between the host application and the editor.
pub type TextBinding = Rc<RefCell<String>>;

/// Registers the host's commands and actions once the editor exists.
#[derive(Debug, Clone, Default)]
pub struct Coordinator {
    commands: Vec<Command>,
    actions: Vec<Action>,
}

impl Coordinator {
    pub fn new(commands: Option<Vec<Command>>, actions: Option<Vec<Action>>) -> Self {
        Self {
            commands: commands.unwrap_or_default(),
            actions: actions.unwrap_or_default(),
        }
    }

    pub fn configure_editor<S: WebSurface + 'static>(&self, editor: &EditorView<S>) {
        for command in &self.commands {
            editor.add_command(command);
        }
        for action in &self.actions {
            editor.add_action(action);
        }
    }
}

/// Collects what the host supplies for one editor.
pub struct MonacoEditorBuilder {
    text: TextBinding,
    configuration: Configuration,
    commands: Option<Vec<Command>>,
    actions: Option<Vec<Action>>,
    content_changed: Option<ContentChanged>,
    is_reflush: Rc<dyn Fn() -> bool>,
}

impl MonacoEditorBuilder {
    pub fn new(text: TextBinding) -> Self {
        Self {
            text,
            configuration: Configuration::default(),
            commands: None,
            actions: None,
            content_changed: None,
            is_reflush: Rc::new(|| false),
        }
    }

    pub fn configuration(mut self, configuration: Configuration) -> Self {
        self.configuration = configuration;
        self
    }

    pub fn commands(mut self, commands: Vec<Command>) -> Self {
        self.commands = Some(commands);
        self
    }

    pub fn actions(mut self, actions: Vec<Action>) -> Self {
        self.actions = Some(actions);
        self
    }

    pub fn on_content_changed(mut self, callback: impl Fn(&str) + 'static) -> Self {
        self.content_changed = Some(Rc::new(callback));
        self
    }

    /// Whether host-side text changes should be pushed into the editor.
    pub fn reflush(mut self, predicate: impl Fn() -> bool + 'static) -> Self {
        self.is_reflush = Rc::new(predicate);
        self
    }

    pub fn build<S: WebSurface + 'static>(self, surface: Rc<S>) -> MonacoEditor<S> {
        let view = EditorView::new(surface, &self.text.borrow(), self.configuration);
        MonacoEditor {
            view,
            coordinator: Rc::new(Coordinator::new(self.commands, self.actions)),
            text: self.text,
            content_changed: self.content_changed,
            is_reflush: self.is_reflush,
            mounted: Cell::new(false),
        }
    }
}

/// Binds an [`EditorView`] to the host UI's mount/update cycle.
pub struct MonacoEditor<S: WebSurface> {
    view: Rc<EditorView<S>>,
    coordinator: Rc<Coordinator>,
    text: TextBinding,
    content_changed: Option<ContentChanged>,
    is_reflush: Rc<dyn Fn() -> bool>,
    mounted: Cell<bool>,
}

impl<S: WebSurface + 'static> MonacoEditor<S> {
    pub fn view(&self) -> &Rc<EditorView<S>> {
        &self.view
    }

    pub fn text_binding(&self) -> &TextBinding {
        &self.text
    }

    /// Mount: wire callbacks, re-apply changed text when asked to, and load
    /// the editor page the first time only.
    pub fn make_view(&self) -> Rc<EditorView<S>> {
        let coordinator = self.coordinator.clone();
        self.view
            .set_ready(move |view| coordinator.configure_editor(view));

        let binding = self.text.clone();
        let host_callback = self.content_changed.clone();
        self.view.set_content_changed(Some(Rc::new(move |text: &str| {
            *binding.borrow_mut() = text.to_string();
            if let Some(callback) = &host_callback {
                callback(text);
            }
        })));

        self.reflush_text();

        if !self.mounted.get() {
            self.mounted.set(true);
            self.view.load_editor();
        }
        self.view.clone()
    }

    /// Update cycle: always re-apply configuration; push the bound text only
    /// when the host asks for it and it differs from the editor's.
    pub fn update_view(&self, configuration: &Configuration) {
        self.view.set_configuration(configuration.clone());
        self.view.update_configuration(None);
        self.reflush_text();
    }

    fn reflush_text(&self) {
        let text = self.text.borrow().clone();
        if text != self.view.text() && (self.is_reflush)() {
            self.view.set_text(&text);
        }
    }
}
