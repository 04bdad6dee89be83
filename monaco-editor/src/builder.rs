use crate::keybinding::KeyBinding;

/// A value headed for a script object literal.
///
/// Values that only exist as code (callback bodies, key binding expressions,
/// nested literals) travel as `Raw` and are emitted verbatim. Everything a
/// user can type travels as `String` and goes through [`quote_string`].
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptValue {
    Absent,
    String(String),
    Integer(i64),
    Number(f64),
    Bool(bool),
    Raw(String),
}

impl ScriptValue {
    /// Render as a script fragment, or `None` for `Absent`.
    pub fn render(&self) -> Option<String> {
        match self {
            ScriptValue::Absent => None,
            ScriptValue::String(s) => Some(quote_string(s)),
            ScriptValue::Integer(i) => Some(i.to_string()),
            ScriptValue::Number(n) => Some(render_number(*n)),
            ScriptValue::Bool(b) => Some(b.to_string()),
            ScriptValue::Raw(code) => Some(code.clone()),
        }
    }
}

fn render_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n == f64::INFINITY {
        "Infinity".to_string()
    } else if n == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else {
        n.to_string()
    }
}

/// Quote `s` as a double-quoted script string literal.
///
/// The result can be pasted anywhere an expression is expected: backslashes,
/// quotes, control characters and the two JavaScript line terminators that
/// JSON leaves alone (U+2028, U+2029) are all escaped.
pub fn quote_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if (c as u32) < 0x20 || c == '\u{7f}' => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

impl From<&str> for ScriptValue {
    fn from(value: &str) -> Self {
        ScriptValue::String(value.to_string())
    }
}

impl From<String> for ScriptValue {
    fn from(value: String) -> Self {
        ScriptValue::String(value)
    }
}

impl From<&String> for ScriptValue {
    fn from(value: &String) -> Self {
        ScriptValue::String(value.clone())
    }
}

impl From<bool> for ScriptValue {
    fn from(value: bool) -> Self {
        ScriptValue::Bool(value)
    }
}

impl From<i32> for ScriptValue {
    fn from(value: i32) -> Self {
        ScriptValue::Integer(value.into())
    }
}

impl From<u32> for ScriptValue {
    fn from(value: u32) -> Self {
        ScriptValue::Integer(value.into())
    }
}

impl From<i64> for ScriptValue {
    fn from(value: i64) -> Self {
        ScriptValue::Integer(value)
    }
}

impl From<f64> for ScriptValue {
    fn from(value: f64) -> Self {
        ScriptValue::Number(value)
    }
}

impl From<&KeyBinding> for ScriptValue {
    fn from(value: &KeyBinding) -> Self {
        ScriptValue::Raw(value.to_script())
    }
}

/// An empty list is absent.
impl From<&[KeyBinding]> for ScriptValue {
    fn from(value: &[KeyBinding]) -> Self {
        if value.is_empty() {
            return ScriptValue::Absent;
        }
        let items: Vec<String> = value.iter().map(KeyBinding::to_script).collect();
        ScriptValue::Raw(format!("[{}]", items.join(", ")))
    }
}

impl From<&Vec<KeyBinding>> for ScriptValue {
    fn from(value: &Vec<KeyBinding>) -> Self {
        ScriptValue::from(value.as_slice())
    }
}

impl<T: Into<ScriptValue>> From<Option<T>> for ScriptValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(ScriptValue::Absent)
    }
}

/// Keys that are not plain identifiers are emitted as string literals.
fn render_key(key: &str) -> String {
    let mut chars = key.chars();
    let is_identifier = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_' || first == '$')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        None => false,
    };
    if is_identifier {
        key.to_string()
    } else {
        quote_string(key)
    }
}

/// Builds the text of a script object literal one key at a time.
#[derive(Debug, Clone, Default)]
pub struct ScriptObjectBuilder {
    entries: Vec<(String, String)>,
}

impl ScriptObjectBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `key` with a quoted/scalar value. Absent values are skipped; a
    /// repeated key replaces the earlier value in place.
    pub fn append(&mut self, key: &str, value: impl Into<ScriptValue>) -> &mut Self {
        if let Some(rendered) = value.into().render() {
            self.insert(key, rendered);
        }
        self
    }

    /// Add `key` with a raw script fragment emitted unquoted.
    pub fn append_script(&mut self, key: &str, script: &str) -> &mut Self {
        self.insert(key, script.to_string());
        self
    }

    fn insert(&mut self, key: &str, rendered: String) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = rendered,
            None => self.entries.push((key.to_string(), rendered)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn build(&self) -> String {
        if self.entries.is_empty() {
            return "{}".to_string();
        }
        let pairs: Vec<String> = self
            .entries
            .iter()
            .map(|(key, value)| format!("{}: {}", render_key(key), value))
            .collect();
        format!("{{ {} }}", pairs.join(", "))
    }
}
