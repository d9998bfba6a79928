//! Client store: owns the state tree and runs each operation's lifecycle.
//!
//! Every async operation dispatches `Begin`, awaits the API, then dispatches
//! exactly one terminal action unless a newer request of the same kind has
//! started in the meantime. Session storage is written after the matching
//! state transition.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use jobtrack_core::jobs::JobQueryParams;
use jobtrack_core::models::api::{AuthResponse, JobRequest, LoginRequest, RegisterRequest, UpdateUserRequest};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::action::{Action, Operation};
use crate::alert::AlertTimer;
use crate::error::ClientError;
use crate::http::ApiClient;
use crate::reducer::reduce;
use crate::requests::RequestGenerations;
use crate::state::{ClientState, Field, MISSING_VALUES_ALERT};
use crate::storage::{Session, SessionStorage};

struct Inner {
    state: Mutex<ClientState>,
    api: ApiClient,
    storage: Arc<dyn SessionStorage>,
    requests: RequestGenerations,
    alert_timer: Arc<AlertTimer>,
}

/// Shared handle to the client state. Cloning is cheap.
#[derive(Clone)]
pub struct Store {
    inner: Arc<Inner>,
}

impl Store {
    /// Create a store hydrated from `storage`. An unreadable stored session
    /// is ignored and the store starts logged out.
    pub fn new(api: ApiClient, storage: Arc<dyn SessionStorage>) -> Self {
        let session = storage.load().unwrap_or_else(|e| {
            warn!(error = %e, "ignoring unreadable stored session");
            None
        });
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(ClientState::from_session(session)),
                api,
                storage,
                requests: RequestGenerations::new(),
                alert_timer: Arc::new(AlertTimer::new()),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ClientState> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> ClientState {
        self.lock().clone()
    }

    pub fn dispatch(&self, action: Action) {
        let mut state = self.lock();
        let current = std::mem::take(&mut *state);
        *state = reduce(current, action);
    }

    // -- Synchronous UI actions ------------------------------------------

    /// Show the missing-values alert. It clears itself when the store was
    /// created inside a Tokio runtime or this is called from one.
    pub fn display_alert(&self) {
        self.dispatch(Action::DisplayAlert);
        self.schedule_clear_alert();
    }

    pub fn toggle_sidebar(&self) {
        self.dispatch(Action::ToggleSidebar);
    }

    pub fn handle_change(&self, field: Field, value: impl Into<String>) {
        self.dispatch(Action::HandleChange {
            field,
            value: value.into(),
        });
    }

    pub fn clear_values(&self) {
        self.dispatch(Action::ClearValues);
    }

    pub fn set_edit_job(&self, id: Uuid) {
        self.dispatch(Action::SetEditJob { id });
    }

    pub fn clear_filters(&self) {
        self.dispatch(Action::ClearFilters);
    }

    pub fn change_page(&self, page: u32) {
        self.dispatch(Action::ChangePage(page));
    }

    /// Drop the session from memory and storage and discard in-flight
    /// responses.
    pub fn logout_user(&self) {
        self.inner.requests.invalidate_all();
        self.inner.alert_timer.cancel();
        self.dispatch(Action::LogoutUser);
        if let Err(e) = self.inner.storage.clear() {
            warn!(error = %e, "failed to clear stored session");
        }
        info!("logged out");
    }

    // -- Account operations ------------------------------------------------

    pub async fn register_user(&self, req: RegisterRequest) -> Result<(), ClientError> {
        if [&req.name, &req.email, &req.password]
            .iter()
            .any(|v| v.trim().is_empty())
        {
            return Err(self.missing_values());
        }
        let op = Operation::RegisterUser;
        if let Some(resp) = self.perform(op, self.inner.api.register(&req)).await? {
            self.establish(op, resp);
        }
        Ok(())
    }

    pub async fn login_user(&self, req: LoginRequest) -> Result<(), ClientError> {
        if req.email.trim().is_empty() || req.password.trim().is_empty() {
            return Err(self.missing_values());
        }
        let op = Operation::LoginUser;
        if let Some(resp) = self.perform(op, self.inner.api.login(&req)).await? {
            self.establish(op, resp);
        }
        Ok(())
    }

    pub async fn update_user(&self, req: UpdateUserRequest) -> Result<(), ClientError> {
        if [&req.email, &req.name, &req.last_name, &req.location]
            .iter()
            .any(|v| v.trim().is_empty())
        {
            return Err(self.missing_values());
        }
        let token = self.token()?;
        let op = Operation::UpdateUser;
        if let Some(resp) = self
            .perform(op, self.inner.api.update_user(&token, &req))
            .await?
        {
            self.establish(op, resp);
        }
        Ok(())
    }

    // -- Job operations ----------------------------------------------------

    /// Submit the job form as a new job.
    pub async fn create_job(&self) -> Result<(), ClientError> {
        let body = self.job_form()?;
        let token = self.token()?;
        let op = Operation::CreateJob;
        if let Some(job) = self
            .perform(op, self.inner.api.create_job(&token, &body))
            .await?
        {
            debug!(job_id = %job.id, "job created");
            self.job_saved(op);
        }
        Ok(())
    }

    /// Submit the job form as an edit of the job selected with
    /// [`set_edit_job`](Self::set_edit_job).
    pub async fn edit_job(&self) -> Result<(), ClientError> {
        let Some(id) = self.lock().edit_job_id else {
            return Err(ClientError::Validation("No job selected for editing".into()));
        };
        let body = self.job_form()?;
        let token = self.token()?;
        let op = Operation::EditJob;
        if let Some(job) = self
            .perform(op, self.inner.api.update_job(&token, id, &body))
            .await?
        {
            debug!(job_id = %job.id, "job updated");
            self.job_saved(op);
        }
        Ok(())
    }

    /// Delete a job, then refresh the list.
    pub async fn delete_job(&self, id: Uuid) -> Result<(), ClientError> {
        let token = self.token()?;
        let op = Operation::DeleteJob;
        if self
            .perform(op, self.inner.api.delete_job(&token, id))
            .await?
            .is_some()
        {
            debug!(job_id = %id, "job removed");
            self.dispatch(Action::JobDeleted);
            self.get_jobs().await?;
        }
        Ok(())
    }

    /// Fetch jobs matching the current search filters.
    pub async fn get_jobs(&self) -> Result<(), ClientError> {
        let token = self.token()?;
        let params = {
            let state = self.lock();
            JobQueryParams {
                status: Some(state.search_status.clone()),
                job_type: Some(state.search_type.clone()),
                sort: Some(state.sort.clone()),
                search: Some(state.search.clone()).filter(|s| !s.is_empty()),
            }
        };
        let op = Operation::GetJobs;
        if let Some(resp) = self
            .perform(op, self.inner.api.list_jobs(&token, &params))
            .await?
        {
            self.dispatch(Action::JobsLoaded(resp));
            self.schedule_clear_alert();
        }
        Ok(())
    }

    pub async fn show_stats(&self) -> Result<(), ClientError> {
        let token = self.token()?;
        let op = Operation::ShowStats;
        if let Some(snapshot) = self.perform(op, self.inner.api.stats(&token)).await? {
            self.dispatch(Action::StatsLoaded(snapshot));
            self.schedule_clear_alert();
        }
        Ok(())
    }

    // -- Lifecycle helpers -------------------------------------------------

    /// Run one request under `op`'s lifecycle. `Ok(None)` means the response
    /// was superseded and has been discarded.
    async fn perform<T, F>(&self, op: Operation, request: F) -> Result<Option<T>, ClientError>
    where
        F: Future<Output = Result<T, ClientError>>,
    {
        let ticket = self.inner.requests.begin(op);
        self.dispatch(Action::Begin(op));
        let result = request.await;

        if !self.inner.requests.is_current(ticket) {
            debug!(?op, "discarding stale response");
            return Ok(None);
        }
        match result {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                self.fail(op, &e);
                Err(e)
            }
        }
    }

    fn fail(&self, op: Operation, err: &ClientError) {
        if op.is_authenticated() && err.is_unauthorized() {
            warn!(?op, "session rejected by server");
            self.logout_user();
            return;
        }
        warn!(?op, error = %err, "request failed");
        self.dispatch(Action::Failed {
            op,
            msg: err.to_string(),
        });
        self.schedule_clear_alert();
    }

    fn establish(&self, op: Operation, resp: AuthResponse) {
        // A new login replaces the identity that in-flight requests carry.
        if !op.is_authenticated() {
            self.inner.requests.invalidate_authenticated();
        }
        let session = Session::from(resp);
        self.dispatch(Action::SessionEstablished {
            op,
            session: session.clone(),
        });
        if let Err(e) = self.inner.storage.save(&session) {
            warn!(error = %e, "failed to persist session");
        }
        info!(user_id = %session.user.id, "session established");
        self.schedule_clear_alert();
    }

    fn job_saved(&self, op: Operation) {
        self.dispatch(Action::JobSaved(op));
        self.dispatch(Action::ClearValues);
        self.schedule_clear_alert();
    }

    fn missing_values(&self) -> ClientError {
        self.display_alert();
        ClientError::Validation(MISSING_VALUES_ALERT.into())
    }

    fn token(&self) -> Result<String, ClientError> {
        self.lock()
            .token
            .clone()
            .ok_or_else(|| ClientError::Validation("Please log in first".into()))
    }

    /// Job request built from the form, after the required-field check.
    fn job_form(&self) -> Result<JobRequest, ClientError> {
        let body = {
            let state = self.lock();
            JobRequest {
                company: state.company.clone(),
                position: state.position.clone(),
                status: Some(state.status.clone()),
                job_type: Some(state.job_type.clone()),
                job_location: Some(state.job_location.clone()),
            }
        };
        if body.company.trim().is_empty() || body.position.trim().is_empty() {
            return Err(self.missing_values());
        }
        Ok(body)
    }

    pub(crate) fn schedule_clear_alert(&self) {
        let store = self.clone();
        self.inner
            .alert_timer
            .schedule(move || store.dispatch(Action::ClearAlert));
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use jobtrack_core::models::auth::User;

    use super::*;
    use crate::state::{Alert, AlertKind};
    use crate::storage::MemoryStorage;

    fn offline_store(storage: Arc<dyn SessionStorage>) -> Store {
        let api = ApiClient::new("http://127.0.0.1:9").unwrap();
        Store::new(api, storage)
    }

    fn session() -> Session {
        Session {
            token: "tok".into(),
            user: User {
                id: Uuid::now_v7(),
                name: "Ada".into(),
                email: "ada@example.com".into(),
                last_name: "lastName".into(),
                location: "Lisbon".into(),
            },
            location: "Lisbon".into(),
        }
    }

    #[test]
    fn display_alert_outside_runtime_keeps_alert() {
        let store = offline_store(Arc::new(MemoryStorage::new()));
        store.display_alert();
        assert_eq!(store.state().alert, Some(Alert::danger(MISSING_VALUES_ALERT)));
    }

    #[test]
    fn hydrates_from_storage() {
        let store = offline_store(Arc::new(MemoryStorage::with_session(session())));
        let state = store.state();
        assert_eq!(state.token.as_deref(), Some("tok"));
        assert_eq!(state.user_location, "Lisbon");
        assert_eq!(state.job_location, "Lisbon");
    }

    #[tokio::test]
    async fn logout_clears_memory_and_storage() {
        let storage = Arc::new(MemoryStorage::with_session(session()));
        let store = offline_store(storage.clone());
        store.logout_user();
        assert!(!store.state().is_authenticated());
        assert_eq!(storage.load().unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn double_alert_shows_second_and_clears_three_seconds_after_it() {
        let store = offline_store(Arc::new(MemoryStorage::new()));
        store.dispatch(Action::Failed {
            op: Operation::EditJob,
            msg: "first".into(),
        });
        store.schedule_clear_alert();

        tokio::time::sleep(Duration::from_secs(2)).await;
        store.display_alert();
        assert_eq!(store.state().alert, Some(Alert::danger(MISSING_VALUES_ALERT)));

        tokio::time::sleep(Duration::from_secs(2)).await;
        let alert = store.state().alert.expect("still visible");
        assert_eq!(alert.kind, AlertKind::Danger);
        assert_eq!(alert.text, MISSING_VALUES_ALERT);

        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(store.state().alert, None);
    }

    #[tokio::test]
    async fn empty_job_form_is_rejected_locally() {
        let store = offline_store(Arc::new(MemoryStorage::with_session(session())));
        store.handle_change(Field::Company, "Acme");
        let err = store.create_job().await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        let state = store.state();
        assert!(!state.is_loading);
        assert_eq!(state.alert, Some(Alert::danger(MISSING_VALUES_ALERT)));
    }

    #[tokio::test]
    async fn network_failure_becomes_alert() {
        let store = offline_store(Arc::new(MemoryStorage::with_session(session())));
        let err = store.show_stats().await.unwrap_err();
        assert!(matches!(err, ClientError::Network(_)));
        let state = store.state();
        assert!(!state.is_loading);
        let alert = state.alert.clone().expect("alert");
        assert_eq!(alert.kind, AlertKind::Danger);
        assert!(alert.text.starts_with("Network error"));
        // Network failures are not authentication failures.
        assert!(state.is_authenticated());
    }

    #[tokio::test]
    async fn job_requests_need_a_session() {
        let store = offline_store(Arc::new(MemoryStorage::new()));
        let err = store.get_jobs().await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert!(!store.state().is_loading);
    }
}
