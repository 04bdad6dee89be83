use std::cell::RefCell;
use std::rc::Rc;

use libadwaita as adw;
use libadwaita::prelude::*;

use monaco_editor::assets::{BundledAssets, DirAssets, LayeredAssets};
use monaco_editor::message::{ScriptMessage, ScriptMessageHandler};
use monaco_editor::{Action, Command, KeyBinding, KeyCode, MonacoEditorBuilder};
use monaco_editor_linux::{create_monaco_editor, HostOptions};

const APP_ID: &str = "dev.monacoeditor.Demo";

/// Directory holding a gzip-compressed Monaco distribution (`Editor/vs/...`),
/// as produced by `scripts/compress-assets.sh`.
const ASSETS_ENV: &str = "MONACO_EDITOR_ASSETS";

const SAMPLE_TEXT: &str = "fn main() {\n    println!(\"Hello, world!\");\n}\n";

fn main() {
    env_logger::init();

    let app = adw::Application::builder().application_id(APP_ID).build();

    app.connect_activate(build_window);

    app.run();
}

fn build_window(app: &adw::Application) {
    let configuration = monaco_editor::config::load();
    let text = Rc::new(RefCell::new(SAMPLE_TEXT.to_string()));

    let mut assets = LayeredAssets::new().with(BundledAssets);
    match std::env::var_os(ASSETS_ENV) {
        Some(dir) => assets = assets.with(DirAssets::new(dir)),
        None => log::warn!("{} not set; Monaco itself will not load", ASSETS_ENV),
    }

    let save = Command::new(
        KeyBinding::Cmd(KeyCode::KeyS),
        "function() { window.webkit.messageHandlers.save.postMessage(editor.getValue().length); }",
    );
    let uppercase = Action::new(
        "demo.uppercase",
        "Uppercase Selection",
        "function(ed) { \
           var sel = ed.getSelection(); \
           ed.executeEdits('demo', [{ range: sel, text: ed.getModel().getValueInRange(sel).toUpperCase() }]); \
         }",
    )
    .keybinding(KeyBinding::CmdShift(KeyCode::KeyU))
    .context_menu("1_modification", 1.5);

    let builder = MonacoEditorBuilder::new(text.clone())
        .configuration(configuration)
        .commands(vec![save])
        .actions(vec![uppercase])
        .on_content_changed(|text| log::debug!("Editor text is now {} bytes", text.len()));

    let saved_text = text.clone();
    let host = HostOptions {
        script_message_handlers: vec![ScriptMessageHandler::new(
            "save",
            move |message: &ScriptMessage| {
                log::info!(
                    "Save requested ({} in page, {} bytes bound)",
                    message.body,
                    saved_text.borrow().len()
                );
            },
        )],
        ..Default::default()
    };

    let (container, editor) = create_monaco_editor(builder, assets, host);
    editor.make_view();

    let window = adw::ApplicationWindow::builder()
        .application(app)
        .title("Monaco Editor")
        .default_width(1000)
        .default_height(700)
        .content(&container)
        .build();

    let resized = editor.clone();
    window.connect_default_width_notify(move |_| resized.view().resize_layout());
    window.connect_default_height_notify(move |_| editor.view().resize_layout());

    window.present();
}
