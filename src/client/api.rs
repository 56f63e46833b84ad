//! HTTP client for the job board API.

use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use tracing::{debug, info};

use crate::models::{ContactRequest, JobListing, SubmitJobRequest};
use crate::types::{ClientError, ClientResult, MessageResponse};

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    /// `GET /api/jobs?<query>`; `query` is an already encoded query string.
    pub async fn list_jobs(&self, query: &str) -> ClientResult<Vec<JobListing>> {
        let url = if query.is_empty() {
            format!("{}/api/jobs", self.base_url)
        } else {
            format!("{}/api/jobs?{}", self.base_url, query)
        };
        debug!(url = %url, "Fetching job listings");

        let response = self.http.get(&url).send().await?;
        let response = check_status(response).await?;
        let jobs: Vec<JobListing> = response.json().await?;

        debug!(count = jobs.len(), "Job listings received");
        Ok(jobs)
    }

    pub async fn submit_job(&self, request: &SubmitJobRequest) -> ClientResult<String> {
        let message = self.post_message("/api/submit-job", request).await?;
        info!("Job submitted: {}", message);
        Ok(message)
    }

    pub async fn send_contact(&self, request: &ContactRequest) -> ClientResult<String> {
        self.post_message("/api/contact", request).await
    }

    async fn post_message<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<String> {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;
        let response = check_status(response).await?;
        let body: MessageResponse = response.json().await?;
        Ok(body.message)
    }
}

/// Turn a non-2xx response into a [`ClientError`], keeping the server's
/// `{message}` when there is one.
async fn check_status(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<MessageResponse>(&text)
        .map(|body| body.message)
        .unwrap_or_else(|_| {
            status
                .canonical_reason()
                .unwrap_or("Unexpected response")
                .to_string()
        });

    if status == StatusCode::BAD_REQUEST {
        Err(ClientError::Validation(message))
    } else {
        Err(ClientError::Http { status: status.as_u16(), message })
    }
}
