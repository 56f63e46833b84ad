use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use crate::config::DatabaseConfig;
use crate::models::{JobRecord, NewJob, NewSupportMessage, SupportMessage};
use crate::search::JobQuery;
use crate::types::AppResult;
use anyhow::Result;

pub use memory::MemoryJobStore;
pub use operations::PgJobStore;

pub mod memory;
pub mod operations;

/// Persistence seam for jobs and support messages.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn insert_job(&self, job: NewJob) -> AppResult<JobRecord>;

    /// Jobs matching every filter of `query`, in insertion order.
    async fn find_jobs(&self, query: &JobQuery) -> AppResult<Vec<JobRecord>>;

    async fn insert_support_message(&self, message: NewSupportMessage) -> AppResult<SupportMessage>;

    /// Short backend name for health reporting.
    async fn ping(&self) -> AppResult<&'static str>;
}

pub async fn create_pool(config: &DatabaseConfig, url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect(url)
        .await?;

    // Test connection
    sqlx::query("SELECT 1")
        .fetch_one(&pool)
        .await?;

    Ok(pool)
}
