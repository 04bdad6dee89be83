use std::rc::Rc;

use gtk4::prelude::*;
use gtk4::{gio, glib};
use webkit6::javascriptcore;
use webkit6::prelude::*;

use monaco_editor::assets::AssetSource;
use monaco_editor::message::{
    MessageHandlerKind, ScriptMessage, ScriptMessageHandler, UpdateTextHandler,
    OTHER_MESSAGE_HANDLER, UPDATE_TEXT_HANDLER,
};
use monaco_editor::navigation::{NavigationDelegate, NavigationHandler};
use monaco_editor::scheme::{SchemeHandler, SchemeResponse, SCHEME};
use monaco_editor::view::{ScriptCompletion, WebSurface};
use monaco_editor::{MonacoEditor, MonacoEditorBuilder};

use crate::navigation_signals;

/// `WebSurface` over a WebKitGTK web view.
pub struct WebKitSurface {
    webview: webkit6::WebView,
}

impl WebKitSurface {
    pub fn new(webview: webkit6::WebView) -> Self {
        Self { webview }
    }

    pub fn webview(&self) -> &webkit6::WebView {
        &self.webview
    }
}

impl WebSurface for WebKitSurface {
    fn load_uri(&self, uri: &str) {
        self.webview.load_uri(uri);
    }

    fn evaluate_script(&self, script: &str, completion: ScriptCompletion) {
        self.webview.evaluate_javascript(
            script,
            None,
            None,
            None::<&gio::Cancellable>,
            move |result| completion(result.map(|_| ()).map_err(|e| e.to_string())),
        );
    }
}

pub type NavigationDelegateFactory = Box<dyn FnOnce(&webkit6::WebView) -> Box<dyn NavigationDelegate>>;
pub type MessageHandlerFactory = Box<dyn FnOnce(&webkit6::WebView) -> MessageHandlerKind>;

/// Platform-level extras for one editor. The factories receive the web view
/// so delegates can drive it themselves.
#[derive(Default)]
pub struct HostOptions {
    pub script_message_handlers: Vec<ScriptMessageHandler>,
    pub navigation_delegate: Option<NavigationDelegateFactory>,
    /// Registered under `OtherMessageHandler`.
    pub other_message_handler: Option<MessageHandlerFactory>,
}

/// Create a Monaco editor inside a WebView.
///
/// Returns the container `gtk4::Box` and the adapter. Nothing is loaded
/// until the caller mounts the adapter with `make_view()`.
pub fn create_monaco_editor<A>(
    builder: MonacoEditorBuilder,
    assets: A,
    host: HostOptions,
) -> (gtk4::Box, Rc<MonacoEditor<WebKitSurface>>)
where
    A: AssetSource + 'static,
{
    let container = gtk4::Box::new(gtk4::Orientation::Vertical, 0);
    container.set_hexpand(true);
    container.set_vexpand(true);

    let web_context = webkit6::WebContext::new();
    register_scheme(&web_context, SchemeHandler::new(assets));

    let user_content_manager = webkit6::UserContentManager::new();

    let webview = webkit6::WebView::builder()
        .web_context(&web_context)
        .user_content_manager(&user_content_manager)
        .hexpand(true)
        .vexpand(true)
        .build();

    if let Some(wk_settings) = webkit6::prelude::WebViewExt::settings(&webview) {
        wk_settings.set_enable_javascript(true);
        wk_settings.set_enable_developer_extras(cfg!(debug_assertions));
    }

    let surface = Rc::new(WebKitSurface::new(webview.clone()));
    let editor = Rc::new(builder.build(surface));

    // Page → host: edits arrive as base64 text.
    let update_text = UpdateTextHandler::new(editor.view());
    if !user_content_manager.register_script_message_handler(UPDATE_TEXT_HANDLER, None) {
        log::error!("Failed to register {} message handler", UPDATE_TEXT_HANDLER);
    }
    user_content_manager.connect_script_message_received(
        Some(UPDATE_TEXT_HANDLER),
        move |_ucm, value| update_text.receive(&js_to_json(value)),
    );

    for handler in host.script_message_handlers {
        register_message_handler(&user_content_manager, handler);
    }
    if let Some(factory) = host.other_message_handler {
        register_message_handler(
            &user_content_manager,
            ScriptMessageHandler {
                name: OTHER_MESSAGE_HANDLER.to_string(),
                kind: factory(&webview),
            },
        );
    }

    let view = Rc::downgrade(editor.view());
    let external = host.navigation_delegate.map(|factory| factory(&webview));
    let navigation = NavigationHandler::new(
        external,
        Some(Box::new(move || {
            if let Some(view) = view.upgrade() {
                view.navigation_finished();
            }
        })),
    );
    navigation_signals::connect(&webview, Rc::new(navigation));

    container.append(&webview);

    (container, editor)
}

fn register_scheme<A: AssetSource + 'static>(
    web_context: &webkit6::WebContext,
    handler: SchemeHandler<A>,
) {
    web_context.register_uri_scheme(SCHEME, move |request| {
        let uri = request.uri().map(|u| u.to_string()).unwrap_or_default();
        match handler.handle(&uri) {
            Ok(response) => finish_with_response(request, response),
            Err(e) => {
                log::error!("Failed to serve {}: {}", uri, e);
                let mut error = glib::Error::new(gio::IOErrorEnum::Failed, &e.to_string());
                request.finish_error(&mut error);
            }
        }
    });
}

fn finish_with_response(request: &webkit6::URISchemeRequest, response: SchemeResponse) {
    let content_type = response.content_type().map(str::to_string);
    let headers = webkit6::soup::MessageHeaders::new(webkit6::soup::MessageHeadersType::Response);
    for (name, value) in &response.headers {
        headers.append(name, value);
    }

    let length = response.body.len() as i64;
    let stream = gio::MemoryInputStream::from_bytes(&glib::Bytes::from_owned(response.body));
    let scheme_response = webkit6::URISchemeResponse::new(&stream, length);
    scheme_response.set_status(u32::from(response.status), None);
    if let Some(content_type) = content_type {
        scheme_response.set_content_type(&content_type);
    }
    scheme_response.set_http_headers(headers);
    request.finish_with_response(&scheme_response);
}

fn register_message_handler(
    user_content_manager: &webkit6::UserContentManager,
    handler: ScriptMessageHandler,
) {
    let name = handler.name.clone();
    if handler.wants_reply() {
        if !user_content_manager.register_script_message_handler_with_reply(&name, None) {
            log::error!("Failed to register {} message handler", name);
            return;
        }
        user_content_manager.connect_script_message_with_reply_received(
            Some(&name),
            move |_ucm, value, reply| {
                let message = ScriptMessage {
                    name: handler.name.clone(),
                    body: js_to_json(value),
                };
                match handler.dispatch(&message) {
                    Ok(result) => match value.context() {
                        Some(context) => {
                            let reply_value =
                                javascriptcore::Value::from_json(&context, &result.to_string());
                            reply.return_value(&reply_value);
                        }
                        None => reply.return_error_message("No JavaScript context for reply"),
                    },
                    Err(e) => reply.return_error_message(&e),
                }
                true
            },
        );
    } else {
        if !user_content_manager.register_script_message_handler(&name, None) {
            log::error!("Failed to register {} message handler", name);
            return;
        }
        user_content_manager.connect_script_message_received(Some(&name), move |_ucm, value| {
            let message = ScriptMessage {
                name: handler.name.clone(),
                body: js_to_json(value),
            };
            if let Err(e) = handler.dispatch(&message) {
                log::warn!("{} handler failed: {}", message.name, e);
            }
        });
    }
}

/// Message bodies are structured-cloned JavaScript values; go through JSON.
fn js_to_json(value: &javascriptcore::Value) -> serde_json::Value {
    value
        .to_json(0)
        .and_then(|json| serde_json::from_str(&json).ok())
        .unwrap_or(serde_json::Value::Null)
}
