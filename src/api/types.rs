//! Shared state for the HTTP layer.

use std::sync::Arc;

use crate::pipeline::contradiction::ContradictionChecker;

/// Shared context for all routes. Cheap to clone; the checker is read-only.
#[derive(Clone)]
pub struct ApiContext {
    pub checker: Arc<ContradictionChecker>,
}

impl ApiContext {
    pub fn new(checker: ContradictionChecker) -> Self {
        Self {
            checker: Arc::new(checker),
        }
    }
}
