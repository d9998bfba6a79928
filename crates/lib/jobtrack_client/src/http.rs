//! Typed HTTP client for the Jobtrack API.

use std::time::Duration;

use jobtrack_core::jobs::JobQueryParams;
use jobtrack_core::models::api::{
    AuthResponse, ErrorResponse, JobRequest, JobResponse, JobsResponse, LoginRequest,
    MessageResponse, RegisterRequest, UpdateUserRequest, UpdatedJobResponse,
};
use jobtrack_core::models::job::Job;
use jobtrack_core::models::stats::StatsSnapshot;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use uuid::Uuid;

use crate::error::ClientError;

/// Path prefix of every API route.
pub const API_PREFIX: &str = "/api/v1";

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Thin wrapper over `reqwest::Client` bound to one API base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let url = format!("{}{API_PREFIX}{path}", self.base_url);
        debug!(%method, %url, "api request");
        let builder = self.http.request(method, url);
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub async fn register(&self, body: &RegisterRequest) -> Result<AuthResponse, ClientError> {
        let req = self.request(Method::POST, "/auth/register", None).json(body);
        send(req).await
    }

    pub async fn login(&self, body: &LoginRequest) -> Result<AuthResponse, ClientError> {
        let req = self.request(Method::POST, "/auth/login", None).json(body);
        send(req).await
    }

    pub async fn update_user(
        &self,
        token: &str,
        body: &UpdateUserRequest,
    ) -> Result<AuthResponse, ClientError> {
        let req = self
            .request(Method::PATCH, "/auth/updateUser", Some(token))
            .json(body);
        send(req).await
    }

    pub async fn create_job(&self, token: &str, body: &JobRequest) -> Result<Job, ClientError> {
        let req = self.request(Method::POST, "/jobs", Some(token)).json(body);
        let resp: JobResponse = send(req).await?;
        Ok(resp.job)
    }

    pub async fn list_jobs(
        &self,
        token: &str,
        params: &JobQueryParams,
    ) -> Result<JobsResponse, ClientError> {
        let req = self.request(Method::GET, "/jobs", Some(token)).query(params);
        send(req).await
    }

    pub async fn update_job(
        &self,
        token: &str,
        id: Uuid,
        body: &JobRequest,
    ) -> Result<Job, ClientError> {
        let req = self
            .request(Method::PATCH, &format!("/jobs/{id}"), Some(token))
            .json(body);
        let resp: UpdatedJobResponse = send(req).await?;
        Ok(resp.updated_job)
    }

    pub async fn delete_job(&self, token: &str, id: Uuid) -> Result<MessageResponse, ClientError> {
        let req = self.request(Method::DELETE, &format!("/jobs/{id}"), Some(token));
        send(req).await
    }

    pub async fn stats(&self, token: &str) -> Result<StatsSnapshot, ClientError> {
        let req = self.request(Method::GET, "/jobs/stats", Some(token));
        send(req).await
    }
}

async fn send<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, ClientError> {
    let resp = req.send().await?;
    if !resp.status().is_success() {
        return Err(api_error(resp).await);
    }
    Ok(resp.json().await?)
}

/// Build an `Api` error from a failed response, preferring the body's `msg`.
async fn api_error(resp: Response) -> ClientError {
    let status = resp.status();
    let msg = match resp.json::<ErrorResponse>().await {
        Ok(body) => body.msg,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string(),
    };
    ClientError::Api {
        status: status.as_u16(),
        msg,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:5000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
    }

    #[tokio::test]
    async fn unreachable_server_is_network_error() {
        // Port 9 (discard) is not expected to accept HTTP.
        let client = ApiClient::new("http://127.0.0.1:9").unwrap();
        let err = client.stats("token").await.unwrap_err();
        assert!(matches!(err, ClientError::Network(_)), "{err:?}");
    }
}
