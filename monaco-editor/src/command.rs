use crate::builder::ScriptObjectBuilder;
use crate::keybinding::KeyBinding;
use crate::scripts;

/// A key binding bound to a script handler via `editor.addCommand`.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub key_binding: KeyBinding,
    /// Script function expression invoked when the binding fires.
    pub command: String,
    /// Optional context key expression gating the binding.
    pub context: Option<String>,
}

impl Command {
    pub fn new(key_binding: KeyBinding, command: impl Into<String>) -> Self {
        Self {
            key_binding,
            command: command.into(),
            context: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn to_script(&self) -> String {
        scripts::add_command(
            &self.key_binding.to_script(),
            &self.command,
            self.context.as_deref(),
        )
    }
}

/// A Monaco editor action (command palette / context menu entry).
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub id: String,
    pub label: String,
    pub keybindings: Vec<KeyBinding>,
    pub precondition: Option<String>,
    pub keybinding_context: Option<String>,
    pub context_menu_group_id: Option<String>,
    pub context_menu_order: Option<f64>,
    /// Script function expression receiving the editor instance.
    pub run: String,
}

impl Action {
    pub fn new(id: impl Into<String>, label: impl Into<String>, run: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            keybindings: Vec::new(),
            precondition: None,
            keybinding_context: None,
            context_menu_group_id: None,
            context_menu_order: None,
            run: run.into(),
        }
    }

    pub fn keybinding(mut self, binding: KeyBinding) -> Self {
        self.keybindings.push(binding);
        self
    }

    pub fn precondition(mut self, expr: impl Into<String>) -> Self {
        self.precondition = Some(expr.into());
        self
    }

    pub fn keybinding_context(mut self, expr: impl Into<String>) -> Self {
        self.keybinding_context = Some(expr.into());
        self
    }

    pub fn context_menu(mut self, group_id: impl Into<String>, order: f64) -> Self {
        self.context_menu_group_id = Some(group_id.into());
        self.context_menu_order = Some(order);
        self
    }

    /// The `IActionDescriptor` literal passed to `editor.addAction`.
    pub fn descriptor(&self) -> String {
        let mut builder = ScriptObjectBuilder::new();
        builder.append("contextMenuGroupId", self.context_menu_group_id.as_deref());
        builder.append("contextMenuOrder", self.context_menu_order);
        builder.append("id", self.id.as_str());
        builder.append("keybindingContext", self.keybinding_context.as_deref());
        builder.append("keybindings", &self.keybindings);
        builder.append("label", self.label.as_str());
        builder.append("precondition", self.precondition.as_deref());
        builder.append_script("run", &self.run);
        builder.build()
    }

    pub fn to_script(&self) -> String {
        scripts::add_action(&self.descriptor())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keybinding::KeyCode;

    #[test]
    fn minimal_action_descriptor() {
        let action = Action::new("fmt", "Format", "function(ed) {}");
        assert_eq!(
            action.descriptor(),
            r#"{ id: "fmt", label: "Format", run: function(ed) {} }"#
        );
    }

    #[test]
    fn full_action_descriptor() {
        let action = Action::new("save", "Save \"file\"", "function(ed) { save(); }")
            .keybinding(KeyBinding::Cmd(KeyCode::KeyS))
            .precondition("!editorReadonly")
            .keybinding_context("editorTextFocus")
            .context_menu("navigation", 1.5);
        assert_eq!(
            action.descriptor(),
            "{ contextMenuGroupId: \"navigation\", contextMenuOrder: 1.5, id: \"save\", \
             keybindingContext: \"editorTextFocus\", \
             keybindings: [monaco.KeyMod.CtrlCmd | monaco.KeyCode.KeyS], \
             label: \"Save \\\"file\\\"\", precondition: \"!editorReadonly\", \
             run: function(ed) { save(); } }"
        );
    }

    #[test]
    fn action_script_registers_descriptor() {
        let action = Action::new("a", "A", "function() {}");
        let script = action.to_script();
        assert!(script.contains(&format!("editor.addAction({});", action.descriptor())));
    }

    #[test]
    fn command_script_uses_rendered_binding() {
        let command = Command::new(
            KeyBinding::chord(KeyBinding::Cmd(KeyCode::KeyK), KeyBinding::Key(KeyCode::KeyX)),
            "function() { window.hit = true; }",
        )
        .with_context("myKey");
        let script = command.to_script();
        assert!(script.contains(
            "editor.addCommand(monaco.KeyMod.chord(monaco.KeyMod.CtrlCmd | monaco.KeyCode.KeyK, \
             monaco.KeyCode.KeyX), function() { window.hit = true; },\n    myKey);"
        ));
    }
}
