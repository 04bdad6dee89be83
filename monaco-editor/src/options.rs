use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::builder::ScriptObjectBuilder;
use crate::config::{Configuration, MinimapOptions};

/// Options literal for `editor.create` / `editor.updateOptions`.
///
/// Text is carried base64-encoded in `value`; the calling script decodes it
/// with the UTF-8 aware `atob` before handing the options to Monaco.
pub struct ConstructionOptions<'a> {
    text: Option<&'a str>,
    configuration: &'a Configuration,
}

impl<'a> ConstructionOptions<'a> {
    pub fn new(text: Option<&'a str>, configuration: &'a Configuration) -> Self {
        Self {
            text,
            configuration,
        }
    }

    pub fn to_script(&self) -> String {
        let config = self.configuration;
        let mut builder = ScriptObjectBuilder::new();

        builder.append("value", self.text.map(encode_text));
        builder.append("theme", config.theme.map(|t| t.as_str()));
        builder.append("language", config.language.as_deref());
        builder.append("lineNumbers", config.line_numbers.map(|l| l.as_str()));
        if let Some(minimap) = &config.minimap {
            builder.append_script("minimap", &minimap_script(minimap));
        }
        builder.append("readOnly", config.read_only);
        builder.append("fontSize", config.font_size);
        builder.append("fontFamily", config.font_family.as_deref());
        builder.append("lineHeight", config.line_height);
        builder.append("tabSize", config.tab_size);
        builder.append("insertSpaces", config.insert_spaces);
        builder.append("wordWrap", config.word_wrap.map(|w| w.as_str()));
        if let Some(rulers) = &config.rulers {
            let columns: Vec<String> = rulers.iter().map(u32::to_string).collect();
            builder.append_script("rulers", &format!("[{}]", columns.join(", ")));
        }
        builder.append("automaticLayout", config.automatic_layout);
        builder.append("scrollBeyondLastLine", config.scroll_beyond_last_line);
        builder.append("renderWhitespace", config.render_whitespace.as_deref());
        builder.append("cursorStyle", config.cursor_style.as_deref());
        builder.append("cursorBlinking", config.cursor_blinking.as_deref());
        builder.append("folding", config.folding);
        builder.append("contextmenu", config.contextmenu);

        builder.build()
    }
}

fn minimap_script(minimap: &MinimapOptions) -> String {
    let mut builder = ScriptObjectBuilder::new();
    builder.append("enabled", minimap.enabled);
    builder.append("side", minimap.side.map(|s| s.as_str()));
    builder.append("renderCharacters", minimap.render_characters);
    builder.build()
}

/// Base64 of the UTF-8 bytes of `text`, standard alphabet with padding.
pub fn encode_text(text: &str) -> String {
    STANDARD.encode(text.as_bytes())
}
