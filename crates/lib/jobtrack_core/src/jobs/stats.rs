//! Stats aggregation.
//!
//! Stores group jobs by status and by creation month (in SQL for Postgres, in
//! memory for `MemoryStore`); [`snapshot`] merges those groups into the fixed
//! shape clients render.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::models::job::{Job, JobStatus};
use crate::models::stats::{
    DefaultStats, MonthCount, MonthlyApplication, StatsSnapshot, StatusCount,
};

/// Number of most recent active months reported in the series.
pub const MONTHLY_WINDOW: usize = 6;

/// Merge per-status groups into a record with every status present.
pub fn default_stats(counts: &[StatusCount]) -> DefaultStats {
    let mut stats = DefaultStats::default();
    for c in counts {
        match c.status {
            JobStatus::Pending => stats.pending += c.count,
            JobStatus::Interview => stats.interview += c.count,
            JobStatus::Declined => stats.declined += c.count,
        }
    }
    stats
}

/// Label a 1-based month as `"Mon YYYY"`.
pub fn month_label(year: i32, month: i32) -> Option<String> {
    let month = u32::try_from(month).ok()?;
    NaiveDate::from_ymd_opt(year, month, 1).map(|d| d.format("%b %Y").to_string())
}

/// Keep the most recent [`MONTHLY_WINDOW`] month groups, oldest first.
pub fn monthly_applications(mut groups: Vec<MonthCount>) -> Vec<MonthlyApplication> {
    groups.sort_by(|a, b| (b.year, b.month).cmp(&(a.year, a.month)));
    groups.truncate(MONTHLY_WINDOW);
    groups
        .into_iter()
        .rev()
        .filter_map(|g| {
            month_label(g.year, g.month).map(|date| MonthlyApplication {
                date,
                count: g.count,
            })
        })
        .collect()
}

/// Build the snapshot from store-produced groups.
pub fn snapshot(statuses: &[StatusCount], months: Vec<MonthCount>) -> StatsSnapshot {
    StatsSnapshot {
        default_stats: default_stats(statuses),
        monthly_applications: monthly_applications(months),
    }
}

/// Count jobs per status present, in status order.
pub fn group_by_status<'a>(jobs: impl IntoIterator<Item = &'a Job>) -> Vec<StatusCount> {
    let mut groups: BTreeMap<JobStatus, i64> = BTreeMap::new();
    for job in jobs {
        *groups.entry(job.status).or_default() += 1;
    }
    groups
        .into_iter()
        .map(|(status, count)| StatusCount { status, count })
        .collect()
}

/// Count jobs per UTC creation month, newest first.
pub fn group_by_month<'a>(jobs: impl IntoIterator<Item = &'a Job>) -> Vec<MonthCount> {
    let mut groups: BTreeMap<(i32, i32), i64> = BTreeMap::new();
    for job in jobs {
        let key = (job.created_at.year(), job.created_at.month() as i32);
        *groups.entry(key).or_default() += 1;
    }
    groups
        .into_iter()
        .rev()
        .map(|((year, month), count)| MonthCount { year, month, count })
        .collect()
}

/// Full in-memory aggregation over one user's jobs.
pub fn aggregate(jobs: &[Job]) -> StatsSnapshot {
    snapshot(&group_by_status(jobs), group_by_month(jobs))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::models::job::JobType;

    fn job(status: JobStatus, year: i32, month: u32) -> Job {
        let at = Utc
            .with_ymd_and_hms(year, month, 15, 12, 0, 0)
            .single()
            .expect("valid date");
        Job {
            id: Uuid::now_v7(),
            company: "Acme".into(),
            position: "Engineer".into(),
            status,
            job_type: JobType::FullTime,
            job_location: "Remote".into(),
            created_by: Uuid::nil(),
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn zero_jobs_yield_zero_counts_and_empty_series() {
        let snap = aggregate(&[]);
        assert_eq!(
            snap.default_stats,
            DefaultStats {
                pending: 0,
                interview: 0,
                declined: 0
            }
        );
        assert!(snap.monthly_applications.is_empty());
    }

    #[test]
    fn absent_statuses_default_to_zero() {
        let snap = aggregate(&[job(JobStatus::Interview, 2024, 1)]);
        assert_eq!(snap.default_stats.pending, 0);
        assert_eq!(snap.default_stats.interview, 1);
        assert_eq!(snap.default_stats.declined, 0);

        let json = serde_json::to_value(&snap).expect("serialize");
        let stats = json["defaultStats"].as_object().expect("object");
        assert_eq!(stats.len(), 3);
    }

    #[test]
    fn status_counts_sum_to_job_total() {
        let jobs = vec![
            job(JobStatus::Pending, 2024, 1),
            job(JobStatus::Pending, 2024, 2),
            job(JobStatus::Declined, 2024, 2),
            job(JobStatus::Interview, 2023, 12),
            job(JobStatus::Pending, 2023, 11),
        ];
        let snap = aggregate(&jobs);
        assert_eq!(snap.default_stats.total(), jobs.len() as i64);
        assert_eq!(snap.default_stats.get(JobStatus::Pending), 3);
    }

    #[test]
    fn series_keeps_six_most_recent_months_ascending() {
        let mut jobs = Vec::new();
        // Eight distinct months, from Jun 2023 through Jan 2024.
        for (y, m) in [
            (2023, 6),
            (2023, 7),
            (2023, 8),
            (2023, 9),
            (2023, 10),
            (2023, 11),
            (2023, 12),
            (2024, 1),
        ] {
            jobs.push(job(JobStatus::Pending, y, m));
        }
        jobs.push(job(JobStatus::Declined, 2024, 1));

        let snap = aggregate(&jobs);
        let labels: Vec<&str> = snap
            .monthly_applications
            .iter()
            .map(|m| m.date.as_str())
            .collect();
        assert_eq!(
            labels,
            ["Aug 2023", "Sep 2023", "Oct 2023", "Nov 2023", "Dec 2023", "Jan 2024"]
        );
        assert_eq!(snap.monthly_applications.last().map(|m| m.count), Some(2));
    }

    #[test]
    fn series_skips_months_without_jobs() {
        let jobs = vec![job(JobStatus::Pending, 2022, 3), job(JobStatus::Pending, 2024, 5)];
        let snap = aggregate(&jobs);
        let labels: Vec<&str> = snap
            .monthly_applications
            .iter()
            .map(|m| m.date.as_str())
            .collect();
        assert_eq!(labels, ["Mar 2022", "May 2024"]);
    }

    #[test]
    fn monthly_applications_sorts_unordered_groups() {
        let groups = vec![
            MonthCount {
                year: 2023,
                month: 2,
                count: 1,
            },
            MonthCount {
                year: 2024,
                month: 1,
                count: 4,
            },
            MonthCount {
                year: 2023,
                month: 11,
                count: 2,
            },
        ];
        let series = monthly_applications(groups);
        let labels: Vec<&str> = series.iter().map(|m| m.date.as_str()).collect();
        assert_eq!(labels, ["Feb 2023", "Nov 2023", "Jan 2024"]);
    }

    #[test]
    fn month_label_rejects_out_of_range_months() {
        assert_eq!(month_label(2024, 12).as_deref(), Some("Dec 2024"));
        assert!(month_label(2024, 0).is_none());
        assert!(month_label(2024, 13).is_none());
    }
}
