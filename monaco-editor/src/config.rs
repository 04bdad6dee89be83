use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Theme {
    #[serde(rename = "vs")]
    Light,
    #[serde(rename = "vs-dark")]
    Dark,
    #[serde(rename = "hc-black")]
    HighContrastDark,
    #[serde(rename = "hc-light")]
    HighContrastLight,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "vs",
            Theme::Dark => "vs-dark",
            Theme::HighContrastDark => "hc-black",
            Theme::HighContrastLight => "hc-light",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LineNumbers {
    On,
    Off,
    Relative,
    Interval,
}

impl LineNumbers {
    pub fn as_str(self) -> &'static str {
        match self {
            LineNumbers::On => "on",
            LineNumbers::Off => "off",
            LineNumbers::Relative => "relative",
            LineNumbers::Interval => "interval",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WordWrap {
    Off,
    On,
    WordWrapColumn,
    Bounded,
}

impl WordWrap {
    pub fn as_str(self) -> &'static str {
        match self {
            WordWrap::Off => "off",
            WordWrap::On => "on",
            WordWrap::WordWrapColumn => "wordWrapColumn",
            WordWrap::Bounded => "bounded",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MinimapSide {
    Left,
    Right,
}

impl MinimapSide {
    pub fn as_str(self) -> &'static str {
        match self {
            MinimapSide::Left => "left",
            MinimapSide::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MinimapOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<MinimapSide>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub render_characters: Option<bool>,
}

/// Editor settings pushed into Monaco at creation and on every update.
///
/// Every field is optional; unset fields are left to Monaco's defaults and
/// never appear in the generated options literal. The `#[serde(default)]`
/// makes older settings files load cleanly when fields are added.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Configuration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_numbers: Option<LineNumbers>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimap: Option<MinimapOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tab_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insert_spaces: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_wrap: Option<WordWrap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rulers: Option<Vec<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub automatic_layout: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scroll_beyond_last_line: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub render_whitespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor_blinking: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folding: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contextmenu: Option<bool>,
}

/// Default location of the settings file:
/// `<config dir>/monaco-editor/settings.json`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("monaco-editor").join("settings.json"))
}

/// Read a configuration file. A missing file yields the default
/// configuration; an unreadable or malformed one is an error.
pub fn load_from(path: &Path) -> Result<Configuration, String> {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(Configuration::default())
        }
        Err(e) => return Err(format!("Failed to read {:?}: {}", path, e)),
    };
    serde_json::from_str(&contents).map_err(|e| format!("Failed to parse {:?}: {}", path, e))
}

/// Load from the default location, falling back to defaults on any error.
pub fn load() -> Configuration {
    let Some(path) = default_config_path() else {
        log::warn!("Cannot determine config directory; using default configuration");
        return Configuration::default();
    };
    load_from(&path).unwrap_or_else(|e| {
        log::warn!("{}; using default configuration", e);
        Configuration::default()
    })
}

pub fn save_to(path: &Path, configuration: &Configuration) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create directory {:?}: {}", parent, e))?;
    }
    let json = serde_json::to_string_pretty(configuration)
        .map_err(|e| format!("Failed to serialize configuration: {}", e))?;
    std::fs::write(path, json).map_err(|e| format!("Failed to write {:?}: {}", path, e))
}
