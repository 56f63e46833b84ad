use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::JobStore;
use crate::models::*;
use crate::search::{sql, JobQuery};
use crate::types::AppResult;

/// Postgres-backed store. Queries are built at runtime so the crate
/// compiles without a live database.
#[derive(Clone)]
pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn insert_job(&self, job: NewJob) -> AppResult<JobRecord> {
        let now = Utc::now();
        let record = sqlx::query_as::<_, JobRecord>(&format!(
            r#"
            INSERT INTO jobs (id, company_name, job_role, job_type, location, salary, tags,
                              company_logo, form_link, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
            RETURNING {}
            "#,
            sql::JOB_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(job.company_name)
        .bind(job.job_role)
        .bind(job.job_type)
        .bind(job.location)
        .bind(job.salary)
        .bind(job.tags)
        .bind(job.company_logo)
        .bind(job.form_link)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn find_jobs(&self, query: &JobQuery) -> AppResult<Vec<JobRecord>> {
        let mut builder = sql::select_jobs(query);
        let jobs = builder
            .build_query_as::<JobRecord>()
            .fetch_all(&self.pool)
            .await?;

        Ok(jobs)
    }

    async fn insert_support_message(&self, message: NewSupportMessage) -> AppResult<SupportMessage> {
        let now = Utc::now();
        let saved = sqlx::query_as::<_, SupportMessage>(
            r#"
            INSERT INTO support_messages (id, username, email, subject, message, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING id, username, email, subject, message, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(message.username)
        .bind(message.email)
        .bind(message.subject)
        .bind(message.message)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }

    async fn ping(&self) -> AppResult<&'static str> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await?;

        Ok("connected")
    }
}
