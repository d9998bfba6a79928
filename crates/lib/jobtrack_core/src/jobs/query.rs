//! Job query builder.
//!
//! Turns the raw `status`/`jobType`/`sort`/`search` request parameters into a
//! [`JobQuery`]. The same query renders to SQL for `PgStore` and evaluates
//! in memory for `MemoryStore`, so both stores agree on filtering and order.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::job::{Job, JobStatus, JobType, ParseEnumError};

/// Filter value meaning "no restriction on this field".
pub const ALL: &str = "all";

/// Fixed result orderings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobSort {
    #[serde(rename = "latest")]
    Latest,
    #[serde(rename = "oldest")]
    Oldest,
    #[serde(rename = "a-z")]
    AToZ,
    #[serde(rename = "z-a")]
    ZToA,
}

impl JobSort {
    /// Every ordering, in display order.
    pub const ALL: [JobSort; 4] = [JobSort::Latest, JobSort::Oldest, JobSort::AToZ, JobSort::ZToA];

    /// Parse a sort parameter. Unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        JobSort::ALL.into_iter().find(|s| s.as_str() == value)
    }

    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobSort::Latest => "latest",
            JobSort::Oldest => "oldest",
            JobSort::AToZ => "a-z",
            JobSort::ZToA => "z-a",
        }
    }

    fn order_by(&self) -> &'static str {
        match self {
            JobSort::Latest => " ORDER BY created_at DESC, id DESC",
            JobSort::Oldest => " ORDER BY created_at ASC, id ASC",
            JobSort::AToZ => " ORDER BY position COLLATE \"C\" ASC, id ASC",
            JobSort::ZToA => " ORDER BY position COLLATE \"C\" DESC, id ASC",
        }
    }

    fn compare(&self, a: &Job, b: &Job) -> Ordering {
        match self {
            JobSort::Latest => b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)),
            JobSort::Oldest => a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)),
            JobSort::AToZ => a.position.cmp(&b.position),
            JobSort::ZToA => b.position.cmp(&a.position),
        }
    }
}

/// Raw query-string parameters of `GET /jobs`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobQueryParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

/// Owner-scoped job query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobQuery {
    pub owner: Uuid,
    pub status: Option<JobStatus>,
    pub job_type: Option<JobType>,
    pub search: Option<String>,
    pub sort: Option<JobSort>,
}

impl JobQuery {
    /// All jobs of `owner`, default order.
    pub fn for_owner(owner: Uuid) -> Self {
        Self {
            owner,
            status: None,
            job_type: None,
            search: None,
            sort: None,
        }
    }

    /// Build a query from request parameters.
    ///
    /// Empty values and the sentinel `"all"` leave a field unrestricted. An
    /// unrecognized sort leaves the default order; an unrecognized status or
    /// job type is an error.
    pub fn from_params(owner: Uuid, params: &JobQueryParams) -> Result<Self, ParseEnumError> {
        let status = restriction(params.status.as_deref())
            .map(str::parse::<JobStatus>)
            .transpose()?;
        let job_type = restriction(params.job_type.as_deref())
            .map(str::parse::<JobType>)
            .transpose()?;
        let search = params
            .search
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let sort = params.sort.as_deref().and_then(JobSort::parse);

        Ok(Self {
            owner,
            status,
            job_type,
            search,
            sort,
        })
    }

    /// Whether `job` passes every filter of this query.
    pub fn matches(&self, job: &Job) -> bool {
        if job.created_by != self.owner {
            return false;
        }
        if self.status.is_some_and(|s| s != job.status) {
            return false;
        }
        if self.job_type.is_some_and(|t| t != job.job_type) {
            return false;
        }
        match &self.search {
            Some(needle) => job
                .position
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            None => true,
        }
    }

    /// Apply the requested ordering in place. Stable, so unsorted queries
    /// keep insertion order.
    pub fn sort_jobs(&self, jobs: &mut [Job]) {
        if let Some(sort) = self.sort {
            jobs.sort_by(|a, b| sort.compare(a, b));
        }
    }

    /// Append `WHERE ... ORDER BY ...` for a `SELECT ... FROM jobs`.
    pub fn push_sql(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        qb.push(" WHERE created_by = ").push_bind(self.owner);
        if let Some(status) = self.status {
            qb.push(" AND status = ").push_bind(status);
        }
        if let Some(job_type) = self.job_type {
            qb.push(" AND job_type = ").push_bind(job_type);
        }
        if let Some(search) = &self.search {
            qb.push(" AND position ILIKE ")
                .push_bind(format!("%{}%", escape_like(search)));
        }
        match self.sort {
            Some(sort) => qb.push(sort.order_by()),
            None => qb.push(" ORDER BY created_at ASC, id ASC"),
        };
    }
}

fn restriction(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty() && *v != ALL)
}

/// Escape LIKE metacharacters so the search term matches literally.
fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
