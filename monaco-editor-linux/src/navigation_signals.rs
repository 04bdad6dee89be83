//! Maps WebKitGTK signals onto the platform-neutral navigation passthrough.

use std::cell::Cell;
use std::rc::Rc;

use gtk4::prelude::*;
use webkit6::prelude::*;
use webkit6::{LoadEvent, PolicyDecisionType};

use monaco_editor::navigation::{
    AuthChallenge, AuthChallengeDisposition, NavigationAction, NavigationActionPolicy,
    NavigationHandler, NavigationResponse, NavigationResponsePolicy,
};

pub fn connect(webview: &webkit6::WebView, navigation: Rc<NavigationHandler>) {
    // WebKit still emits `Finished` after a failed load; the editor must not
    // be created on an error page.
    let failed = Rc::new(Cell::new(false));

    let nav = navigation.clone();
    let failed_in_load = failed.clone();
    webview.connect_load_changed(move |webview, event| {
        let uri = webview.uri();
        let uri = uri.as_deref();
        match event {
            LoadEvent::Started => {
                failed_in_load.set(false);
                nav.did_start_provisional_navigation(uri);
            }
            LoadEvent::Redirected => nav.did_receive_server_redirect(uri),
            LoadEvent::Committed => nav.did_commit(uri),
            LoadEvent::Finished => {
                if !failed_in_load.get() {
                    nav.did_finish(uri);
                }
            }
            _ => {}
        }
    });

    let nav = navigation.clone();
    webview.connect_load_failed(move |_webview, event, failing_uri, error| {
        failed.set(true);
        match event {
            LoadEvent::Started | LoadEvent::Redirected => {
                nav.did_fail_provisional_navigation(Some(failing_uri), &error.to_string())
            }
            _ => nav.did_fail(Some(failing_uri), &error.to_string()),
        }
        false
    });

    let nav = navigation.clone();
    webview.connect_web_process_terminated(move |_webview, reason| {
        nav.web_content_process_did_terminate(&format!("{:?}", reason));
    });

    let nav = navigation.clone();
    webview.connect_decide_policy(move |_webview, decision, decision_type| match decision_type {
        PolicyDecisionType::NavigationAction | PolicyDecisionType::NewWindowAction => {
            let Some(navigation_decision) =
                decision.downcast_ref::<webkit6::NavigationPolicyDecision>()
            else {
                return false;
            };
            let uri = navigation_decision
                .navigation_action()
                .and_then(|mut action| action.request())
                .and_then(|request| request.uri())
                .map(|uri| uri.to_string());
            let action = NavigationAction {
                uri,
                new_window: decision_type == PolicyDecisionType::NewWindowAction,
            };
            match nav.decide_policy_for_action(&action) {
                NavigationActionPolicy::Allow => decision.use_(),
                NavigationActionPolicy::Cancel => decision.ignore(),
            }
            true
        }
        PolicyDecisionType::Response => {
            let Some(response_decision) =
                decision.downcast_ref::<webkit6::ResponsePolicyDecision>()
            else {
                return false;
            };
            let response = match response_decision.response() {
                Some(response) => NavigationResponse {
                    uri: response.uri().map(|uri| uri.to_string()),
                    status: response.status_code(),
                    mime_type: response.mime_type().map(|m| m.to_string()),
                },
                None => NavigationResponse {
                    uri: None,
                    status: 0,
                    mime_type: None,
                },
            };
            match nav.decide_policy_for_response(&response) {
                NavigationResponsePolicy::Allow => decision.use_(),
                NavigationResponsePolicy::Cancel => decision.ignore(),
            }
            true
        }
        _ => false,
    });

    let nav = navigation.clone();
    webview.connect_authenticate(move |_webview, request| {
        let challenge = AuthChallenge {
            host: request.host().map(|h| h.to_string()).unwrap_or_default(),
            port: request.port(),
            realm: request.realm().map(|r| r.to_string()),
        };
        match nav.did_receive_auth_challenge(&challenge) {
            AuthChallengeDisposition::UseCredential { username, password } => {
                let mut credential = webkit6::Credential::new(
                    &username,
                    &password,
                    webkit6::CredentialPersistence::ForSession,
                );
                request.authenticate(Some(&mut credential));
                true
            }
            AuthChallengeDisposition::Cancel => {
                request.cancel();
                true
            }
            AuthChallengeDisposition::PerformDefaultHandling => false,
        }
    });

    let nav = navigation;
    webview.connect_load_failed_with_tls_errors(move |webview, failing_uri, certificate, _errors| {
        let Some(host) = url::Url::parse(failing_uri)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
        else {
            return false;
        };
        if !nav.should_allow_deprecated_tls(&host) {
            return false;
        }
        let Some(session) = webview.network_session() else {
            return false;
        };
        log::warn!("Allowing untrusted TLS certificate for {}", host);
        session.allow_tls_certificate_for_host(certificate, &host);
        webview.load_uri(failing_uri);
        true
    });
}
