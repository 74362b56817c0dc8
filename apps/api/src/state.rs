use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::Config;
use crate::interview::service::Interviewer;
use crate::interview::session::InterviewSession;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub interviewer: Arc<Interviewer>,
    /// The single in-flight interview. The lock serialises calls against it;
    /// multi-candidate support would swap this for a map keyed by session id.
    pub session: Arc<Mutex<InterviewSession>>,
    pub config: Config,
}

impl AppState {
    pub fn new(interviewer: Interviewer, config: Config) -> Self {
        Self {
            interviewer: Arc::new(interviewer),
            session: Arc::new(Mutex::new(InterviewSession::new())),
            config,
        }
    }
}
