use std::cell::RefCell;

use crate::view::{ScriptCompletion, WebSurface};

/// A `WebSurface` that records what it was asked to do and holds
/// completions until the test releases them.
#[derive(Default)]
pub struct RecordingSurface {
    loads: RefCell<Vec<String>>,
    scripts: RefCell<Vec<String>>,
    pending: RefCell<Vec<ScriptCompletion>>,
}

impl RecordingSurface {
    pub fn loads(&self) -> Vec<String> {
        self.loads.borrow().clone()
    }

    pub fn scripts(&self) -> Vec<String> {
        self.scripts.borrow().clone()
    }

    pub fn count_containing(&self, needle: &str) -> usize {
        self.scripts
            .borrow()
            .iter()
            .filter(|s| s.contains(needle))
            .count()
    }

    /// Deliver `result` to every completion queued so far. Completions
    /// queued while delivering stay pending.
    pub fn complete_all(&self, result: Result<(), String>) {
        let pending = std::mem::take(&mut *self.pending.borrow_mut());
        for completion in pending {
            completion(result.clone());
        }
    }
}

impl WebSurface for RecordingSurface {
    fn load_uri(&self, uri: &str) {
        self.loads.borrow_mut().push(uri.to_string());
    }

    fn evaluate_script(&self, script: &str, completion: ScriptCompletion) {
        self.scripts.borrow_mut().push(script.to_string());
        self.pending.borrow_mut().push(completion);
    }
}
