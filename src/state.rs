use crate::audit::AuditLog;
use crate::config::AppConfig;
use crate::models::meeting::MeetingDirectory;
use crate::tracker::AgendaOutcomeTracker;

/// Shared application state handed to every handler.
#[derive(Debug)]
pub struct AppState {
    pub tracker: AgendaOutcomeTracker,
    pub directory: MeetingDirectory,
    pub audit: AuditLog,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            tracker: AgendaOutcomeTracker::new(config.vote_policy.clone()),
            directory: MeetingDirectory::new(config.default_location.clone()),
            audit: AuditLog::new(config.audit_max_entries),
        }
    }
}
