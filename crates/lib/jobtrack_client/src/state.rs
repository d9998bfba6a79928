//! Client state tree.

use jobtrack_core::jobs::query::ALL;
use jobtrack_core::models::auth::User;
use jobtrack_core::models::job::{Job, JobStatus, JobType};
use jobtrack_core::models::stats::{DefaultStats, MonthlyApplication};
use uuid::Uuid;

use crate::storage::Session;

/// Alert shown after the "Please provide all values!" check fails.
pub const MISSING_VALUES_ALERT: &str = "Please provide all values!";

/// Sort order requested when no other order has been chosen.
pub const DEFAULT_SORT: &str = "latest";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Success,
    Danger,
}

/// A transient message. At most one is visible at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub text: String,
}

impl Alert {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Success,
            text: text.into(),
        }
    }

    pub fn danger(text: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Danger,
            text: text.into(),
        }
    }
}

/// Editable fields addressed by `HandleChange`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Position,
    Company,
    JobLocation,
    JobType,
    Status,
    Search,
    SearchStatus,
    SearchType,
    Sort,
}

/// The whole client-side state. Only [`reduce`](crate::reducer::reduce)
/// produces new values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientState {
    pub is_loading: bool,
    pub alert: Option<Alert>,

    // Session
    pub user: Option<User>,
    pub token: Option<String>,
    pub user_location: String,

    pub show_sidebar: bool,

    // Job form
    pub is_editing: bool,
    pub edit_job_id: Option<Uuid>,
    pub position: String,
    pub company: String,
    pub job_location: String,
    pub job_type: String,
    pub status: String,

    // Job list
    pub jobs: Vec<Job>,
    pub total_jobs: u64,
    pub page: u32,
    pub num_of_pages: u32,

    // Stats
    pub stats: DefaultStats,
    pub monthly_applications: Vec<MonthlyApplication>,

    // Search filters
    pub search: String,
    pub search_status: String,
    pub search_type: String,
    pub sort: String,
}

impl Default for ClientState {
    fn default() -> Self {
        Self {
            is_loading: false,
            alert: None,
            user: None,
            token: None,
            user_location: String::new(),
            show_sidebar: false,
            is_editing: false,
            edit_job_id: None,
            position: String::new(),
            company: String::new(),
            job_location: String::new(),
            job_type: JobType::default().to_string(),
            status: JobStatus::default().to_string(),
            jobs: Vec::new(),
            total_jobs: 0,
            page: 1,
            num_of_pages: 1,
            stats: DefaultStats::default(),
            monthly_applications: Vec::new(),
            search: String::new(),
            search_status: ALL.to_string(),
            search_type: ALL.to_string(),
            sort: DEFAULT_SORT.to_string(),
        }
    }
}

impl ClientState {
    /// Initial state, hydrated from a stored session when there is one.
    pub fn from_session(session: Option<Session>) -> Self {
        let mut state = Self::default();
        if let Some(session) = session {
            state.apply_session(session);
        }
        state
    }

    pub(crate) fn apply_session(&mut self, session: Session) {
        self.user = Some(session.user);
        self.token = Some(session.token);
        self.user_location = session.location.clone();
        self.job_location = session.location;
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub(crate) fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Position => &mut self.position,
            Field::Company => &mut self.company,
            Field::JobLocation => &mut self.job_location,
            Field::JobType => &mut self.job_type,
            Field::Status => &mut self.status,
            Field::Search => &mut self.search,
            Field::SearchStatus => &mut self.search_status,
            Field::SearchType => &mut self.search_type,
            Field::Sort => &mut self.sort,
        }
    }
}
