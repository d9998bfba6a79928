//! Statistics models.
//!
//! `StatsSnapshot` serializes exactly as the `GET /jobs/stats` response body.

use serde::{Deserialize, Serialize};

use super::job::JobStatus;

/// Job counts per status. Every status is always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultStats {
    pub pending: i64,
    pub interview: i64,
    pub declined: i64,
}

impl DefaultStats {
    /// Count for a single status.
    pub fn get(&self, status: JobStatus) -> i64 {
        match status {
            JobStatus::Pending => self.pending,
            JobStatus::Interview => self.interview,
            JobStatus::Declined => self.declined,
        }
    }

    /// Sum over all statuses.
    pub fn total(&self) -> i64 {
        self.pending + self.interview + self.declined
    }
}

/// One point of the monthly application series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyApplication {
    /// Month label, e.g. `"Mar 2024"`.
    pub date: String,
    pub count: i64,
}

/// Derived, read-only statistics view for one user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub default_stats: DefaultStats,
    /// Oldest to newest, at most six entries.
    pub monthly_applications: Vec<MonthlyApplication>,
}

/// Grouped count per status, as produced by the store.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct StatusCount {
    pub status: JobStatus,
    pub count: i64,
}

/// Grouped count per creation month. `month` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct MonthCount {
    pub year: i32,
    pub month: i32,
    pub count: i64,
}
