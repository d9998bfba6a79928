//! Pure state transitions.

use jobtrack_core::jobs::query::ALL;

use crate::action::{Action, Operation};
use crate::state::{Alert, ClientState, DEFAULT_SORT, MISSING_VALUES_ALERT};

/// Apply `action` to `state`, returning the next state.
pub fn reduce(mut state: ClientState, action: Action) -> ClientState {
    match action {
        Action::DisplayAlert => {
            state.alert = Some(Alert::danger(MISSING_VALUES_ALERT));
        }
        Action::ClearAlert => {
            state.alert = None;
        }
        Action::Begin(op) => {
            state.is_loading = true;
            if matches!(op, Operation::GetJobs | Operation::ShowStats) {
                state.alert = None;
            }
        }
        Action::Failed { msg, .. } => {
            state.is_loading = false;
            state.alert = Some(Alert::danger(msg));
        }
        Action::SessionEstablished { op, session } => {
            state.is_loading = false;
            state.apply_session(session);
            state.alert = op.success_text().map(Alert::success);
        }
        Action::JobSaved(op) => {
            state.is_loading = false;
            state.alert = op.success_text().map(Alert::success);
        }
        Action::JobDeleted => {
            state.is_loading = false;
        }
        Action::JobsLoaded(resp) => {
            state.is_loading = false;
            state.jobs = resp.jobs;
            state.total_jobs = resp.total_jobs;
            state.num_of_pages = resp.num_of_pages;
        }
        Action::StatsLoaded(snapshot) => {
            state.is_loading = false;
            state.stats = snapshot.default_stats;
            state.monthly_applications = snapshot.monthly_applications;
        }
        Action::LogoutUser => {
            state = ClientState::default();
        }
        Action::ToggleSidebar => {
            state.show_sidebar = !state.show_sidebar;
        }
        Action::HandleChange { field, value } => {
            state.page = 1;
            *state.field_mut(field) = value;
        }
        Action::ClearValues => {
            state.is_editing = false;
            state.edit_job_id = None;
            state.position.clear();
            state.company.clear();
            state.job_location = state.user_location.clone();
            let defaults = ClientState::default();
            state.job_type = defaults.job_type;
            state.status = defaults.status;
        }
        Action::SetEditJob { id } => {
            // Unknown ids leave the form untouched.
            if let Some(job) = state.jobs.iter().find(|j| j.id == id).cloned() {
                state.is_editing = true;
                state.edit_job_id = Some(job.id);
                state.position = job.position;
                state.company = job.company;
                state.job_location = job.job_location;
                state.job_type = job.job_type.to_string();
                state.status = job.status.to_string();
            }
        }
        Action::ClearFilters => {
            state.search.clear();
            state.search_status = ALL.to_string();
            state.search_type = ALL.to_string();
            state.sort = DEFAULT_SORT.to_string();
        }
        Action::ChangePage(page) => {
            state.page = page;
        }
    }
    state
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use jobtrack_core::models::api::JobsResponse;
    use jobtrack_core::models::auth::User;
    use jobtrack_core::models::job::{Job, JobStatus, JobType};
    use jobtrack_core::models::stats::{DefaultStats, MonthlyApplication, StatsSnapshot};
    use uuid::Uuid;

    use super::*;
    use crate::state::{AlertKind, Field};
    use crate::storage::Session;

    fn session() -> Session {
        Session {
            token: "tok".into(),
            user: User {
                id: Uuid::now_v7(),
                name: "Ada".into(),
                email: "ada@example.com".into(),
                last_name: "lastName".into(),
                location: "Paris".into(),
            },
            location: "Paris".into(),
        }
    }

    fn job(position: &str) -> Job {
        let now = Utc::now();
        Job {
            id: Uuid::now_v7(),
            company: "Acme".into(),
            position: position.into(),
            status: JobStatus::Interview,
            job_type: JobType::Remote,
            job_location: "Berlin".into(),
            created_by: Uuid::now_v7(),
            created_at: now,
            updated_at: now,
        }
    }

    fn run(actions: impl IntoIterator<Item = Action>) -> ClientState {
        actions.into_iter().fold(ClientState::default(), reduce)
    }

    #[test]
    fn begin_then_success_sets_session_and_alert() {
        let s = reduce(ClientState::default(), Action::Begin(Operation::LoginUser));
        assert!(s.is_loading);

        let s = reduce(
            s,
            Action::SessionEstablished {
                op: Operation::LoginUser,
                session: session(),
            },
        );
        assert!(!s.is_loading);
        assert_eq!(s.token.as_deref(), Some("tok"));
        assert_eq!(s.user_location, "Paris");
        assert_eq!(s.job_location, "Paris");
        assert_eq!(
            s.alert,
            Some(Alert::success("Login Successful! Redirecting..."))
        );
    }

    #[test]
    fn failure_clears_loading_and_shows_danger() {
        let s = run([
            Action::Begin(Operation::CreateJob),
            Action::Failed {
                op: Operation::CreateJob,
                msg: "Please provide all values".into(),
            },
        ]);
        assert!(!s.is_loading);
        let alert = s.alert.clone().expect("alert");
        assert_eq!(alert.kind, AlertKind::Danger);
        assert_eq!(alert.text, "Please provide all values");
    }

    #[test]
    fn fetch_begin_hides_alert() {
        let s = run([Action::DisplayAlert, Action::Begin(Operation::GetJobs)]);
        assert!(s.alert.is_none());

        let s = run([Action::DisplayAlert, Action::Begin(Operation::CreateJob)]);
        assert!(s.alert.is_some());
    }

    #[test]
    fn second_alert_replaces_first() {
        let s = run([
            Action::Failed {
                op: Operation::EditJob,
                msg: "first".into(),
            },
            Action::DisplayAlert,
        ]);
        assert_eq!(s.alert, Some(Alert::danger(MISSING_VALUES_ALERT)));
    }

    #[test]
    fn jobs_and_stats_load() {
        let listed = vec![job("Engineer"), job("Designer")];
        let s = run([
            Action::Begin(Operation::GetJobs),
            Action::JobsLoaded(JobsResponse {
                jobs: listed.clone(),
                total_jobs: 2,
                num_of_pages: 1,
            }),
            Action::Begin(Operation::ShowStats),
            Action::StatsLoaded(StatsSnapshot {
                default_stats: DefaultStats {
                    pending: 0,
                    interview: 2,
                    declined: 0,
                },
                monthly_applications: vec![MonthlyApplication {
                    date: "Mar 2024".into(),
                    count: 2,
                }],
            }),
        ]);
        assert!(!s.is_loading);
        assert_eq!(s.jobs, listed);
        assert_eq!(s.total_jobs, 2);
        assert_eq!(s.stats.interview, 2);
        assert_eq!(s.monthly_applications.len(), 1);
        assert!(s.alert.is_none());
    }

    #[test]
    fn set_edit_job_loads_form_and_clear_values_resets() {
        let target = job("Engineer");
        let id = target.id;
        let s = run([
            Action::SessionEstablished {
                op: Operation::LoginUser,
                session: session(),
            },
            Action::JobsLoaded(JobsResponse {
                jobs: vec![target],
                total_jobs: 1,
                num_of_pages: 1,
            }),
            Action::SetEditJob { id },
        ]);
        assert!(s.is_editing);
        assert_eq!(s.edit_job_id, Some(id));
        assert_eq!(s.position, "Engineer");
        assert_eq!(s.job_location, "Berlin");
        assert_eq!(s.job_type, "remote");
        assert_eq!(s.status, "interview");

        let s = reduce(s, Action::ClearValues);
        assert!(!s.is_editing);
        assert_eq!(s.edit_job_id, None);
        assert!(s.position.is_empty());
        assert_eq!(s.job_location, "Paris");
        assert_eq!(s.job_type, "full-time");
        assert_eq!(s.status, "pending");
    }

    #[test]
    fn set_edit_job_with_unknown_id_is_noop() {
        let before = ClientState::default();
        let after = reduce(before.clone(), Action::SetEditJob { id: Uuid::now_v7() });
        assert_eq!(before, after);
    }

    #[test]
    fn handle_change_resets_page() {
        let s = run([
            Action::ChangePage(3),
            Action::HandleChange {
                field: Field::Search,
                value: "eng".into(),
            },
        ]);
        assert_eq!(s.page, 1);
        assert_eq!(s.search, "eng");
    }

    #[test]
    fn clear_filters_restores_defaults() {
        let s = run([
            Action::HandleChange {
                field: Field::SearchStatus,
                value: "declined".into(),
            },
            Action::HandleChange {
                field: Field::Sort,
                value: "a-z".into(),
            },
            Action::ClearFilters,
        ]);
        assert_eq!(s.search_status, "all");
        assert_eq!(s.search_type, "all");
        assert_eq!(s.sort, "latest");
    }

    #[test]
    fn logout_resets_everything() {
        let s = run([
            Action::SessionEstablished {
                op: Operation::RegisterUser,
                session: session(),
            },
            Action::ToggleSidebar,
            Action::LogoutUser,
        ]);
        assert_eq!(s, ClientState::default());
        assert!(!s.is_authenticated());
    }

    #[test]
    fn delete_and_fetches_show_no_success_alert() {
        for op in [Operation::DeleteJob, Operation::GetJobs, Operation::ShowStats] {
            assert_eq!(op.success_text(), None);
        }
        let s = run([Action::Begin(Operation::DeleteJob), Action::JobDeleted]);
        assert!(!s.is_loading);
        assert!(s.alert.is_none());
    }
}
