use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::JobStore;
use crate::models::*;
use crate::search::JobQuery;
use crate::types::AppResult;

/// Process-local store, used when no database is configured.
#[derive(Clone, Default)]
pub struct MemoryJobStore {
    jobs: Arc<RwLock<Vec<JobRecord>>>,
    messages: Arc<RwLock<Vec<SupportMessage>>>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn messages(&self) -> Vec<SupportMessage> {
        self.messages.read().await.clone()
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn insert_job(&self, job: NewJob) -> AppResult<JobRecord> {
        let now = Utc::now();
        let record = JobRecord {
            id: Uuid::new_v4(),
            company_name: job.company_name,
            job_role: job.job_role,
            job_type: job.job_type,
            location: job.location,
            salary: job.salary,
            tags: job.tags,
            company_logo: job.company_logo,
            form_link: job.form_link,
            created_at: now,
            updated_at: now,
        };

        let mut guard = self.jobs.write().await;
        guard.push(record.clone());
        Ok(record)
    }

    async fn find_jobs(&self, query: &JobQuery) -> AppResult<Vec<JobRecord>> {
        let guard = self.jobs.read().await;
        Ok(guard.iter().filter(|job| query.matches(job)).cloned().collect())
    }

    async fn insert_support_message(&self, message: NewSupportMessage) -> AppResult<SupportMessage> {
        let now = Utc::now();
        let saved = SupportMessage {
            id: Uuid::new_v4(),
            username: message.username,
            email: message.email,
            subject: message.subject,
            message: message.message,
            created_at: now,
            updated_at: now,
        };

        let mut guard = self.messages.write().await;
        guard.push(saved.clone());
        Ok(saved)
    }

    async fn ping(&self) -> AppResult<&'static str> {
        Ok("in-memory")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::JobFilter;

    fn new_job(job_role: &str, salary: i64) -> NewJob {
        NewJob {
            company_name: "acme".to_string(),
            job_role: job_role.to_string(),
            job_type: "full_time".to_string(),
            location: "remote".to_string(),
            salary,
            tags: vec![],
            company_logo: None,
            form_link: "https%3A%2F%2Facme.example".to_string(),
        }
    }

    #[tokio::test]
    async fn test_find_jobs_filters_and_keeps_insertion_order() {
        let store = MemoryJobStore::new();
        store.insert_job(new_job("backend_developer", 40_000)).await.unwrap();
        store.insert_job(new_job("designer", 50_000)).await.unwrap();
        store.insert_job(new_job("frontend_developer", 60_000)).await.unwrap();

        let all = store.find_jobs(&JobQuery::new()).await.unwrap();
        assert_eq!(all.len(), 3);

        let query = JobQuery::new().with(JobFilter::Keywords { terms: vec!["developer".to_string()] });
        let roles: Vec<_> = store
            .find_jobs(&query)
            .await
            .unwrap()
            .into_iter()
            .map(|job| job.job_role)
            .collect();
        assert_eq!(roles, vec!["backend_developer", "frontend_developer"]);
    }

    #[tokio::test]
    async fn test_support_messages_are_kept() {
        let store = MemoryJobStore::new();
        store
            .insert_support_message(NewSupportMessage {
                username: "ada".to_string(),
                email: "ada@example.com".to_string(),
                subject: "Hello".to_string(),
                message: "Listing is broken".to_string(),
            })
            .await
            .unwrap();

        let messages = store.messages().await;
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].subject, "Hello");
    }
}
