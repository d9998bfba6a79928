//! Actions accepted by the reducer.

use jobtrack_core::models::api::JobsResponse;
use jobtrack_core::models::stats::StatsSnapshot;
use uuid::Uuid;

use crate::state::Field;
use crate::storage::Session;

/// Asynchronous operations, each tracked by its own request generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    RegisterUser,
    LoginUser,
    UpdateUser,
    CreateJob,
    EditJob,
    DeleteJob,
    GetJobs,
    ShowStats,
}

impl Operation {
    pub const ALL: [Operation; 8] = [
        Operation::RegisterUser,
        Operation::LoginUser,
        Operation::UpdateUser,
        Operation::CreateJob,
        Operation::EditJob,
        Operation::DeleteJob,
        Operation::GetJobs,
        Operation::ShowStats,
    ];

    pub(crate) fn index(self) -> usize {
        self as usize
    }

    /// Whether the request carries the bearer token.
    pub fn is_authenticated(self) -> bool {
        !matches!(self, Operation::RegisterUser | Operation::LoginUser)
    }

    /// Success alert text, for operations that show one.
    pub fn success_text(self) -> Option<&'static str> {
        match self {
            Operation::RegisterUser => Some("User Created! Redirecting..."),
            Operation::LoginUser => Some("Login Successful! Redirecting..."),
            Operation::UpdateUser => Some("User Profile Updated!"),
            Operation::CreateJob => Some("New Job Created!"),
            Operation::EditJob => Some("Job Updated!"),
            Operation::DeleteJob | Operation::GetJobs | Operation::ShowStats => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Show the missing-values danger alert.
    DisplayAlert,
    ClearAlert,

    /// An operation's request is about to be sent.
    Begin(Operation),
    /// An operation failed with a user-facing message.
    Failed { op: Operation, msg: String },

    /// Register, login or update-user succeeded.
    SessionEstablished { op: Operation, session: Session },
    /// Create or edit succeeded.
    JobSaved(Operation),
    JobDeleted,
    JobsLoaded(JobsResponse),
    StatsLoaded(StatsSnapshot),

    LogoutUser,
    ToggleSidebar,
    HandleChange { field: Field, value: String },
    ClearValues,
    /// Load a listed job into the form for editing.
    SetEditJob { id: Uuid },
    ClearFilters,
    ChangePage(u32),
}
