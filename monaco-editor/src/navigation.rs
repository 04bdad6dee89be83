//! Navigation lifecycle and policy passthrough.
//!
//! The host view needs exactly one navigation event (load finished). Every
//! other callback is forwarded to an optional delegate supplied by the
//! embedding application, with permissive defaults when it has none.

/// A navigation request the page wants to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationAction {
    pub uri: Option<String>,
    /// True for requests that would open a new window.
    pub new_window: bool,
}

/// A response received for a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationResponse {
    pub uri: Option<String>,
    pub status: u32,
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthChallenge {
    pub host: String,
    pub port: u32,
    pub realm: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationActionPolicy {
    Allow,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationResponsePolicy {
    Allow,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthChallengeDisposition {
    UseCredential { username: String, password: String },
    PerformDefaultHandling,
    Cancel,
}

/// Callbacks an embedding application may implement. Every method has a
/// default; decision methods return `None` when the delegate has no opinion.
pub trait NavigationDelegate {
    fn did_start_provisional_navigation(&self, _uri: Option<&str>) {}
    fn did_receive_server_redirect(&self, _uri: Option<&str>) {}
    fn did_commit(&self, _uri: Option<&str>) {}
    fn did_finish(&self, _uri: Option<&str>) {}
    fn did_fail(&self, _uri: Option<&str>, _error: &str) {}
    fn did_fail_provisional_navigation(&self, _uri: Option<&str>, _error: &str) {}
    fn web_content_process_did_terminate(&self, _reason: &str) {}

    fn decide_policy_for_action(&self, _action: &NavigationAction) -> Option<NavigationActionPolicy> {
        None
    }

    fn decide_policy_for_response(
        &self,
        _response: &NavigationResponse,
    ) -> Option<NavigationResponsePolicy> {
        None
    }

    fn should_allow_deprecated_tls(&self, _host: &str) -> Option<bool> {
        None
    }

    fn did_receive_auth_challenge(
        &self,
        _challenge: &AuthChallenge,
    ) -> Option<AuthChallengeDisposition> {
        None
    }
}

/// Forwards to an external delegate and fires `ready` when loading finishes.
pub struct NavigationHandler {
    external: Option<Box<dyn NavigationDelegate>>,
    ready: Option<Box<dyn Fn()>>,
}

impl NavigationHandler {
    pub fn new(
        external: Option<Box<dyn NavigationDelegate>>,
        ready: Option<Box<dyn Fn()>>,
    ) -> Self {
        Self { external, ready }
    }

    pub fn did_start_provisional_navigation(&self, uri: Option<&str>) {
        log::debug!("did_start_provisional_navigation {:?}", uri);
        if let Some(ext) = &self.external {
            ext.did_start_provisional_navigation(uri);
        }
    }

    pub fn did_receive_server_redirect(&self, uri: Option<&str>) {
        log::debug!("did_receive_server_redirect {:?}", uri);
        if let Some(ext) = &self.external {
            ext.did_receive_server_redirect(uri);
        }
    }

    pub fn did_commit(&self, uri: Option<&str>) {
        log::debug!("did_commit {:?}", uri);
        if let Some(ext) = &self.external {
            ext.did_commit(uri);
        }
    }

    /// The external delegate sees the event before the editor is created.
    pub fn did_finish(&self, uri: Option<&str>) {
        log::debug!("did_finish {:?}", uri);
        if let Some(ext) = &self.external {
            ext.did_finish(uri);
        }
        if let Some(ready) = &self.ready {
            ready();
        }
    }

    pub fn did_fail(&self, uri: Option<&str>, error: &str) {
        log::warn!("Navigation to {:?} failed: {}", uri, error);
        if let Some(ext) = &self.external {
            ext.did_fail(uri, error);
        }
    }

    pub fn did_fail_provisional_navigation(&self, uri: Option<&str>, error: &str) {
        log::warn!("Provisional navigation to {:?} failed: {}", uri, error);
        if let Some(ext) = &self.external {
            ext.did_fail_provisional_navigation(uri, error);
        }
    }

    pub fn web_content_process_did_terminate(&self, reason: &str) {
        log::warn!("Web content process terminated: {}", reason);
        if let Some(ext) = &self.external {
            ext.web_content_process_did_terminate(reason);
        }
    }

    pub fn decide_policy_for_action(&self, action: &NavigationAction) -> NavigationActionPolicy {
        log::debug!("decide_policy_for_action {:?}", action.uri);
        self.external
            .as_ref()
            .and_then(|ext| ext.decide_policy_for_action(action))
            .unwrap_or(NavigationActionPolicy::Allow)
    }

    pub fn decide_policy_for_response(
        &self,
        response: &NavigationResponse,
    ) -> NavigationResponsePolicy {
        log::debug!("decide_policy_for_response {:?}", response.uri);
        self.external
            .as_ref()
            .and_then(|ext| ext.decide_policy_for_response(response))
            .unwrap_or(NavigationResponsePolicy::Allow)
    }

    pub fn should_allow_deprecated_tls(&self, host: &str) -> bool {
        log::debug!("should_allow_deprecated_tls {}", host);
        self.external
            .as_ref()
            .and_then(|ext| ext.should_allow_deprecated_tls(host))
            .unwrap_or(false)
    }

    pub fn did_receive_auth_challenge(&self, challenge: &AuthChallenge) -> AuthChallengeDisposition {
        log::debug!("did_receive_auth_challenge {}:{}", challenge.host, challenge.port);
        self.external
            .as_ref()
            .and_then(|ext| ext.did_receive_auth_challenge(challenge))
            .unwrap_or(AuthChallengeDisposition::PerformDefaultHandling)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn action(uri: &str) -> NavigationAction {
        NavigationAction {
            uri: Some(uri.to_string()),
            new_window: false,
        }
    }

    #[test]
    fn defaults_without_delegate() {
        let handler = NavigationHandler::new(None, None);
        assert_eq!(
            handler.decide_policy_for_action(&action("monacoeditor://editor")),
            NavigationActionPolicy::Allow
        );
        let response = NavigationResponse {
            uri: None,
            status: 200,
            mime_type: Some("text/html".to_string()),
        };
        assert_eq!(
            handler.decide_policy_for_response(&response),
            NavigationResponsePolicy::Allow
        );
        assert!(!handler.should_allow_deprecated_tls("example.com"));
        let challenge = AuthChallenge {
            host: "example.com".to_string(),
            port: 443,
            realm: None,
        };
        assert_eq!(
            handler.did_receive_auth_challenge(&challenge),
            AuthChallengeDisposition::PerformDefaultHandling
        );
    }

    struct Silent;
    impl NavigationDelegate for Silent {}

    #[test]
    fn delegate_without_opinion_gets_defaults() {
        let handler = NavigationHandler::new(Some(Box::new(Silent)), None);
        assert_eq!(
            handler.decide_policy_for_action(&action("https://example.com")),
            NavigationActionPolicy::Allow
        );
        assert!(!handler.should_allow_deprecated_tls("example.com"));
    }

    struct BlockExternal {
        events: Rc<RefCell<Vec<String>>>,
    }

    impl NavigationDelegate for BlockExternal {
        fn did_commit(&self, uri: Option<&str>) {
            self.events.borrow_mut().push(format!("commit {}", uri.unwrap_or("")));
        }

        fn did_finish(&self, _uri: Option<&str>) {
            self.events.borrow_mut().push("finish".to_string());
        }

        fn did_fail(&self, _uri: Option<&str>, error: &str) {
            self.events.borrow_mut().push(format!("fail {}", error));
        }

        fn decide_policy_for_action(&self, action: &NavigationAction) -> Option<NavigationActionPolicy> {
            let internal = action
                .uri
                .as_deref()
                .is_some_and(|u| u.starts_with("monacoeditor:"));
            Some(if internal {
                NavigationActionPolicy::Allow
            } else {
                NavigationActionPolicy::Cancel
            })
        }
    }

    #[test]
    fn delegate_decisions_and_events_are_forwarded() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let handler = NavigationHandler::new(
            Some(Box::new(BlockExternal {
                events: events.clone(),
            })),
            None,
        );
        assert_eq!(
            handler.decide_policy_for_action(&action("https://example.com")),
            NavigationActionPolicy::Cancel
        );
        assert_eq!(
            handler.decide_policy_for_action(&action("monacoeditor://editor")),
            NavigationActionPolicy::Allow
        );
        handler.did_commit(Some("monacoeditor://editor"));
        handler.did_fail(None, "boom");
        assert_eq!(
            *events.borrow(),
            vec!["commit monacoeditor://editor".to_string(), "fail boom".to_string()]
        );
    }

    #[test]
    fn finish_forwards_then_fires_ready() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let ready_seen_finish = Rc::new(Cell::new(false));
        let events_in_ready = events.clone();
        let flag = ready_seen_finish.clone();
        let handler = NavigationHandler::new(
            Some(Box::new(BlockExternal {
                events: events.clone(),
            })),
            Some(Box::new(move || flag.set(events_in_ready.borrow().contains(&"finish".to_string())))),
        );
        handler.did_finish(Some("monacoeditor://editor"));
        assert!(ready_seen_finish.get());
    }

    /// Answers every decision and records every callback it receives.
    struct Recording {
        events: Rc<RefCell<Vec<String>>>,
    }

    impl Recording {
        fn push(&self, event: String) {
            self.events.borrow_mut().push(event);
        }
    }

    impl NavigationDelegate for Recording {
        fn did_start_provisional_navigation(&self, uri: Option<&str>) {
            self.push(format!("start {}", uri.unwrap_or("-")));
        }

        fn did_receive_server_redirect(&self, uri: Option<&str>) {
            self.push(format!("redirect {}", uri.unwrap_or("-")));
        }

        fn did_fail_provisional_navigation(&self, uri: Option<&str>, error: &str) {
            self.push(format!("provisional-fail {} {}", uri.unwrap_or("-"), error));
        }

        fn web_content_process_did_terminate(&self, reason: &str) {
            self.push(format!("terminated {}", reason));
        }

        fn decide_policy_for_response(
            &self,
            response: &NavigationResponse,
        ) -> Option<NavigationResponsePolicy> {
            self.push(format!("response {}", response.status));
            Some(NavigationResponsePolicy::Cancel)
        }

        fn should_allow_deprecated_tls(&self, host: &str) -> Option<bool> {
            self.push(format!("tls {}", host));
            Some(true)
        }

        fn did_receive_auth_challenge(
            &self,
            challenge: &AuthChallenge,
        ) -> Option<AuthChallengeDisposition> {
            self.push(format!("auth {}:{}", challenge.host, challenge.port));
            Some(if challenge.realm.as_deref() == Some("private") {
                AuthChallengeDisposition::Cancel
            } else {
                AuthChallengeDisposition::UseCredential {
                    username: "user".to_string(),
                    password: "secret".to_string(),
                }
            })
        }
    }

    fn recording() -> (NavigationHandler, Rc<RefCell<Vec<String>>>) {
        let events = Rc::new(RefCell::new(Vec::new()));
        let handler = NavigationHandler::new(
            Some(Box::new(Recording {
                events: events.clone(),
            })),
            None,
        );
        (handler, events)
    }

    #[test]
    fn lifecycle_callbacks_reach_delegate_verbatim() {
        let (handler, events) = recording();
        handler.did_start_provisional_navigation(Some("monacoeditor://editor"));
        handler.did_receive_server_redirect(None);
        handler.did_fail_provisional_navigation(Some("https://x.test"), "refused");
        handler.web_content_process_did_terminate("Crashed");
        assert_eq!(
            *events.borrow(),
            vec![
                "start monacoeditor://editor".to_string(),
                "redirect -".to_string(),
                "provisional-fail https://x.test refused".to_string(),
                "terminated Crashed".to_string(),
            ]
        );
    }

    #[test]
    fn delegate_decisions_override_defaults() {
        let (handler, events) = recording();
        let response = NavigationResponse {
            uri: Some("https://x.test".to_string()),
            status: 500,
            mime_type: None,
        };
        assert_eq!(
            handler.decide_policy_for_response(&response),
            NavigationResponsePolicy::Cancel
        );
        assert!(handler.should_allow_deprecated_tls("old.test"));

        let open = AuthChallenge {
            host: "x.test".to_string(),
            port: 8080,
            realm: None,
        };
        assert_eq!(
            handler.did_receive_auth_challenge(&open),
            AuthChallengeDisposition::UseCredential {
                username: "user".to_string(),
                password: "secret".to_string(),
            }
        );
        let private = AuthChallenge {
            realm: Some("private".to_string()),
            ..open
        };
        assert_eq!(
            handler.did_receive_auth_challenge(&private),
            AuthChallengeDisposition::Cancel
        );

        assert_eq!(
            *events.borrow(),
            vec![
                "response 500".to_string(),
                "tls old.test".to_string(),
                "auth x.test:8080".to_string(),
                "auth x.test:8080".to_string(),
            ]
        );
    }
}
