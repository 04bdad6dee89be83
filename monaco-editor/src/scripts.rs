//! Script fragments evaluated in the embedded page.
//!
//! Every call is a self-invoking function returning `true` so the evaluation
//! result is always a plain boolean. The page-side `editor` object comes from
//! the bundled `editor.js`.

use crate::builder::quote_string;

/// Replace `atob`/`btoa` with versions that round-trip UTF-8 instead of
/// Latin-1.
pub const ENABLE_UTF8: &str = r#"window.atob = (function(originalAtob) {
    return function(input) {
        return decodeURIComponent(originalAtob(input).split('').map(function(c) {
            return '%' + ('00' + c.charCodeAt(0).toString(16)).slice(-2);
        }).join(''));
    };
})(window.atob);

window.btoa = (function(originalBtoa) {
    return function(str) {
        return originalBtoa(encodeURIComponent(str).replace(/%([0-9A-F]{2})/g, function(match, p1) {
            return String.fromCharCode('0x' + p1);
        }));
    };
})(window.btoa);
true;"#;

pub const RESIZE_LAYOUT: &str = r#"(function() {
  document.body.style.width = '100%';
  document.body.style.height = '100%';
  var editorElement = document.getElementById('editor');
  if (editorElement) {
    editorElement.style.width = '100%';
    editorElement.style.height = '100%';
  } else {
    console.log('Element with id "editor" not found');
  }
  editor.editor.layout();
  return true;
})();"#;

pub fn create_editor(options: &str) -> String {
    format!(
        r#"(function() {{
  let options = {options};
  if (options.value) {{
    options.value = atob(options.value);
  }}

  editor.create(options);
  return true;
}})();"#
    )
}

pub fn update_options(options: &str) -> String {
    format!(
        r#"(function() {{
  let options = {options};
  if (options.value) {{
    options.value = atob(options.value);
  }}

  editor.updateOptions(options);
  return true;
}})();"#
    )
}

/// `encoded` must be base64, which never needs escaping inside quotes.
pub fn set_text(encoded: &str) -> String {
    format!(
        r#"(function() {{
  let text = atob('{encoded}');
  editor.setText(text);
  return true;
}})();"#
    )
}

pub fn add_command(keybinding: &str, handler: &str, context: Option<&str>) -> String {
    let context = context
        .map(|c| format!(",\n    {}", c))
        .unwrap_or_default();
    format!(
        r#"(function() {{
  editor.addCommand(function(monaco, editor) {{
    editor.addCommand({keybinding}, {handler}{context});
  }});
  return true;
}})();"#
    )
}

pub fn add_action(descriptor: &str) -> String {
    format!(
        r#"(function() {{
  editor.addAction(function(monaco, editor) {{
    editor.addAction({descriptor});
  }});
  return true;
}})();"#
    )
}

pub fn create_context_key(key: &str, default_value: &str) -> String {
    format!(
        r#"(function() {{
  editor.createContextKey({}, {});
  return true;
}})();"#,
        quote_string(key),
        default_value
    )
}

pub fn set_context_key(key: &str, value: &str) -> String {
    format!(
        r#"(function() {{
  editor.setContextKey({}, {});
  return true;
}})();"#,
        quote_string(key),
        value
    )
}

pub fn reset_context_key(key: &str) -> String {
    format!(
        r#"(function() {{
  editor.resetContextKey({});
  return true;
}})();"#,
        quote_string(key)
    )
}
