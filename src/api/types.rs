//! Shared state for the API layer.

use std::sync::Arc;

use crate::grading::Grader;
use crate::session::SessionStore;

/// Shared context for all API routes.
///
/// The grader and session store are injected so tests can swap in a mock
/// backend without touching the router.
#[derive(Clone)]
pub struct ApiContext {
    pub grader: Arc<Grader>,
    pub sessions: Arc<SessionStore>,
}

impl ApiContext {
    pub fn new(grader: Arc<Grader>, sessions: Arc<SessionStore>) -> Self {
        Self { grader, sessions }
    }
}
