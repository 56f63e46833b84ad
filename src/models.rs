use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::config::Config;
use crate::db::JobStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn JobStore>,
    pub config: Config,
}

// Persisted records. Text fields of a job are kept in storage form
// (lowercase, whitespace collapsed to `_`) and `form_link` is percent-encoded.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct JobRecord {
    pub id: Uuid,
    pub company_name: String,
    pub job_role: String,
    pub job_type: String,
    pub location: String,
    pub salary: i64,
    pub tags: Vec<String>,
    pub company_logo: Option<String>,
    pub form_link: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A job ready to be written; produced from a validated submission.
#[derive(Debug, Clone, PartialEq)]
pub struct NewJob {
    pub company_name: String,
    pub job_role: String,
    pub job_type: String,
    pub location: String,
    pub salary: i64,
    pub tags: Vec<String>,
    pub company_logo: Option<String>,
    pub form_link: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SupportMessage {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSupportMessage {
    pub username: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// Client-facing job, as returned by `GET /api/jobs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListing {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub company_name: String,
    pub job_role: String,
    pub job_type: String,
    pub location: String,
    pub salary: i64,
    pub tags: Vec<String>,
    pub company_logo: Option<String>,
    pub form_link: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// API Request/Response types

/// Salary arrives either as a JSON number or as the raw form string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SalaryInput {
    Number(i64),
    Text(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitJobRequest {
    #[validate(required, length(min = 1))]
    pub company_name: Option<String>,
    pub company_logo: Option<String>,
    #[validate(required, length(min = 1))]
    pub job_role: Option<String>,
    #[validate(required, length(min = 1))]
    pub job_type: Option<String>,
    #[validate(required, length(min = 1))]
    pub location: Option<String>,
    #[validate(required)]
    pub salary: Option<SalaryInput>,
    /// Comma separated, e.g. `"rust, remote"`.
    pub tags: Option<String>,
    #[validate(required, length(min = 1))]
    pub form_link: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ContactRequest {
    #[validate(required, length(min = 1))]
    pub email: Option<String>,
    #[validate(required, length(min = 1))]
    pub subject: Option<String>,
    #[validate(required, length(min = 1))]
    pub message: Option<String>,
    #[validate(required, length(min = 1))]
    pub username: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub database: String,
}
