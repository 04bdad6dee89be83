use std::fmt;

/// Monaco `KeyCode` constants that can appear in a key binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Backspace,
    Tab,
    Enter,
    Escape,
    Space,
    PageUp,
    PageDown,
    End,
    Home,
    LeftArrow,
    UpArrow,
    RightArrow,
    DownArrow,
    Insert,
    Delete,
    Digit0,
    Digit1,
    Digit2,
    Digit3,
    Digit4,
    Digit5,
    Digit6,
    Digit7,
    Digit8,
    Digit9,
    KeyA,
    KeyB,
    KeyC,
    KeyD,
    KeyE,
    KeyF,
    KeyG,
    KeyH,
    KeyI,
    KeyJ,
    KeyK,
    KeyL,
    KeyM,
    KeyN,
    KeyO,
    KeyP,
    KeyQ,
    KeyR,
    KeyS,
    KeyT,
    KeyU,
    KeyV,
    KeyW,
    KeyX,
    KeyY,
    KeyZ,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    F13,
    F14,
    F15,
    F16,
    F17,
    F18,
    F19,
    Semicolon,
    Equal,
    Comma,
    Minus,
    Period,
    Slash,
    Backquote,
    BracketLeft,
    Backslash,
    BracketRight,
    Quote,
    Numpad0,
    Numpad1,
    Numpad2,
    Numpad3,
    Numpad4,
    Numpad5,
    Numpad6,
    Numpad7,
    Numpad8,
    Numpad9,
    NumpadMultiply,
    NumpadAdd,
    NumpadSubtract,
    NumpadDecimal,
    NumpadDivide,
}

impl KeyCode {
    /// Name of the constant on `monaco.KeyCode`.
    pub fn name(self) -> &'static str {
        match self {
            KeyCode::Backspace => "Backspace",
            KeyCode::Tab => "Tab",
            KeyCode::Enter => "Enter",
            KeyCode::Escape => "Escape",
            KeyCode::Space => "Space",
            KeyCode::PageUp => "PageUp",
            KeyCode::PageDown => "PageDown",
            KeyCode::End => "End",
            KeyCode::Home => "Home",
            KeyCode::LeftArrow => "LeftArrow",
            KeyCode::UpArrow => "UpArrow",
            KeyCode::RightArrow => "RightArrow",
            KeyCode::DownArrow => "DownArrow",
            KeyCode::Insert => "Insert",
            KeyCode::Delete => "Delete",
            KeyCode::Digit0 => "Digit0",
            KeyCode::Digit1 => "Digit1",
            KeyCode::Digit2 => "Digit2",
            KeyCode::Digit3 => "Digit3",
            KeyCode::Digit4 => "Digit4",
            KeyCode::Digit5 => "Digit5",
            KeyCode::Digit6 => "Digit6",
            KeyCode::Digit7 => "Digit7",
            KeyCode::Digit8 => "Digit8",
            KeyCode::Digit9 => "Digit9",
            KeyCode::KeyA => "KeyA",
            KeyCode::KeyB => "KeyB",
            KeyCode::KeyC => "KeyC",
            KeyCode::KeyD => "KeyD",
            KeyCode::KeyE => "KeyE",
            KeyCode::KeyF => "KeyF",
            KeyCode::KeyG => "KeyG",
            KeyCode::KeyH => "KeyH",
            KeyCode::KeyI => "KeyI",
            KeyCode::KeyJ => "KeyJ",
            KeyCode::KeyK => "KeyK",
            KeyCode::KeyL => "KeyL",
            KeyCode::KeyM => "KeyM",
            KeyCode::KeyN => "KeyN",
            KeyCode::KeyO => "KeyO",
            KeyCode::KeyP => "KeyP",
            KeyCode::KeyQ => "KeyQ",
            KeyCode::KeyR => "KeyR",
            KeyCode::KeyS => "KeyS",
            KeyCode::KeyT => "KeyT",
            KeyCode::KeyU => "KeyU",
            KeyCode::KeyV => "KeyV",
            KeyCode::KeyW => "KeyW",
            KeyCode::KeyX => "KeyX",
            KeyCode::KeyY => "KeyY",
            KeyCode::KeyZ => "KeyZ",
            KeyCode::F1 => "F1",
            KeyCode::F2 => "F2",
            KeyCode::F3 => "F3",
            KeyCode::F4 => "F4",
            KeyCode::F5 => "F5",
            KeyCode::F6 => "F6",
            KeyCode::F7 => "F7",
            KeyCode::F8 => "F8",
            KeyCode::F9 => "F9",
            KeyCode::F10 => "F10",
            KeyCode::F11 => "F11",
            KeyCode::F12 => "F12",
            KeyCode::F13 => "F13",
            KeyCode::F14 => "F14",
            KeyCode::F15 => "F15",
            KeyCode::F16 => "F16",
            KeyCode::F17 => "F17",
            KeyCode::F18 => "F18",
            KeyCode::F19 => "F19",
            KeyCode::Semicolon => "Semicolon",
            KeyCode::Equal => "Equal",
            KeyCode::Comma => "Comma",
            KeyCode::Minus => "Minus",
            KeyCode::Period => "Period",
            KeyCode::Slash => "Slash",
            KeyCode::Backquote => "Backquote",
            KeyCode::BracketLeft => "BracketLeft",
            KeyCode::Backslash => "Backslash",
            KeyCode::BracketRight => "BracketRight",
            KeyCode::Quote => "Quote",
            KeyCode::Numpad0 => "Numpad0",
            KeyCode::Numpad1 => "Numpad1",
            KeyCode::Numpad2 => "Numpad2",
            KeyCode::Numpad3 => "Numpad3",
            KeyCode::Numpad4 => "Numpad4",
            KeyCode::Numpad5 => "Numpad5",
            KeyCode::Numpad6 => "Numpad6",
            KeyCode::Numpad7 => "Numpad7",
            KeyCode::Numpad8 => "Numpad8",
            KeyCode::Numpad9 => "Numpad9",
            KeyCode::NumpadMultiply => "NumpadMultiply",
            KeyCode::NumpadAdd => "NumpadAdd",
            KeyCode::NumpadSubtract => "NumpadSubtract",
            KeyCode::NumpadDecimal => "NumpadDecimal",
            KeyCode::NumpadDivide => "NumpadDivide",
        }
    }
}

const KEY_MOD_CTRL_CMD: &str = "monaco.KeyMod.CtrlCmd";
const KEY_MOD_WIN_CTRL: &str = "monaco.KeyMod.WinCtrl";
const KEY_MOD_SHIFT: &str = "monaco.KeyMod.Shift";
const KEY_MOD_ALT: &str = "monaco.KeyMod.Alt";

/// A keyboard shortcut, either a (possibly modified) key or a chord of two
/// shortcuts pressed one after the other.
///
/// `Cmd` is Monaco's `CtrlCmd` (Command on macOS, Ctrl elsewhere) and `Ctrl`
/// is `WinCtrl` (the physical Control key everywhere).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyBinding {
    Key(KeyCode),
    Alt(KeyCode),
    Ctrl(KeyCode),
    Cmd(KeyCode),
    Shift(KeyCode),
    CtrlCmd(KeyCode),
    CtrlShift(KeyCode),
    CmdShift(KeyCode),
    CtrlCmdShift(KeyCode),
    Chord(Box<KeyBinding>, Box<KeyBinding>),
}

impl KeyBinding {
    pub fn chord(first: KeyBinding, second: KeyBinding) -> Self {
        KeyBinding::Chord(Box::new(first), Box::new(second))
    }

    /// Render as a Monaco key expression, e.g.
    /// `monaco.KeyMod.CtrlCmd | monaco.KeyCode.KeyS`.
    pub fn to_script(&self) -> String {
        let (modifiers, code): (&[&str], KeyCode) = match self {
            KeyBinding::Chord(first, second) => {
                return format!(
                    "monaco.KeyMod.chord({}, {})",
                    first.to_script(),
                    second.to_script()
                );
            }
            KeyBinding::Key(code) => (&[], *code),
            KeyBinding::Alt(code) => (&[KEY_MOD_ALT], *code),
            KeyBinding::Ctrl(code) => (&[KEY_MOD_WIN_CTRL], *code),
            KeyBinding::Cmd(code) => (&[KEY_MOD_CTRL_CMD], *code),
            KeyBinding::Shift(code) => (&[KEY_MOD_SHIFT], *code),
            KeyBinding::CtrlCmd(code) => (&[KEY_MOD_CTRL_CMD, KEY_MOD_WIN_CTRL], *code),
            KeyBinding::CtrlShift(code) => (&[KEY_MOD_WIN_CTRL, KEY_MOD_SHIFT], *code),
            KeyBinding::CmdShift(code) => (&[KEY_MOD_CTRL_CMD, KEY_MOD_SHIFT], *code),
            KeyBinding::CtrlCmdShift(code) => {
                (&[KEY_MOD_CTRL_CMD, KEY_MOD_WIN_CTRL, KEY_MOD_SHIFT], *code)
            }
        };

        let mut parts: Vec<String> = modifiers.iter().map(|m| m.to_string()).collect();
        parts.push(format!("monaco.KeyCode.{}", code.name()));
        parts.join(" | ")
    }
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_script())
    }
}
