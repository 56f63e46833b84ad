//! Saved Jobs Store
//!
//! Bookmarked job ids and the day each was saved, persisted as a small
//! JSON file. The store is passed to whoever needs it; readers either
//! call [`SavedJobsStore::list`] or hold a [`watch::Receiver`] from
//! [`SavedJobsStore::subscribe`] to follow changes.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::{watch, Mutex};
use tracing::info;
use uuid::Uuid;

use crate::models::JobListing;
use crate::types::{ClientError, ClientResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedJob {
    pub id: Uuid,
    pub date: NaiveDate,
}

pub struct SavedJobsStore {
    path: PathBuf,
    tmp_path: PathBuf,
    entries: watch::Sender<Vec<SavedJob>>,
    write_lock: Mutex<()>,
}

impl SavedJobsStore {
    /// Open the store at `path`; a missing file is an empty store.
    pub async fn open(path: impl Into<PathBuf>) -> ClientResult<Self> {
        let path = path.into();
        let entries = if fs::try_exists(&path).await.map_err(storage_error)? {
            let content = fs::read_to_string(&path).await.map_err(storage_error)?;
            serde_json::from_str(&content).map_err(storage_error)?
        } else {
            Vec::new()
        };

        let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(".tmp");
        let tmp_path = path.with_file_name(tmp_name);

        let (entries, _) = watch::channel(entries);
        Ok(Self { path, tmp_path, entries, write_lock: Mutex::new(()) })
    }

    pub fn list(&self) -> Vec<SavedJob> {
        self.entries.borrow().clone()
    }

    pub fn is_saved(&self, id: Uuid) -> bool {
        self.entries.borrow().iter().any(|entry| entry.id == id)
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<SavedJob>> {
        self.entries.subscribe()
    }

    /// Bookmark `id` today. Returns `false` if it was already saved.
    pub async fn save(&self, id: Uuid) -> ClientResult<bool> {
        self.save_on(id, Local::now().date_naive()).await
    }

    pub async fn save_on(&self, id: Uuid, date: NaiveDate) -> ClientResult<bool> {
        self.update(|entries| {
            if entries.iter().any(|entry| entry.id == id) {
                return false;
            }
            entries.push(SavedJob { id, date });
            true
        })
        .await
    }

    /// Returns `false` if `id` was not saved.
    pub async fn remove(&self, id: Uuid) -> ClientResult<bool> {
        self.update(|entries| {
            let before = entries.len();
            entries.retain(|entry| entry.id != id);
            entries.len() != before
        })
        .await
    }

    /// Save or unsave `id`; returns whether it is saved afterwards.
    pub async fn toggle(&self, id: Uuid) -> ClientResult<bool> {
        if self.is_saved(id) {
            self.remove(id).await?;
            Ok(false)
        } else {
            self.save(id).await?;
            Ok(true)
        }
    }

    /// Resolve saved ids against `listings`, grouped by the day they were
    /// saved. Saved ids with no listing are skipped.
    pub fn group_by_date(&self, listings: &[JobListing]) -> BTreeMap<NaiveDate, Vec<JobListing>> {
        let entries = self.entries.borrow();
        let mut groups: BTreeMap<NaiveDate, Vec<JobListing>> = BTreeMap::new();

        for entry in entries.iter() {
            if let Some(listing) = listings.iter().find(|listing| listing.id == entry.id) {
                groups.entry(entry.date).or_default().push(listing.clone());
            }
        }

        groups
    }

    async fn update<F>(&self, change: F) -> ClientResult<bool>
    where
        F: FnOnce(&mut Vec<SavedJob>) -> bool,
    {
        let _guard = self.write_lock.lock().await;

        let mut next = self.list();
        if !change(&mut next) {
            return Ok(false);
        }

        self.persist(&next).await?;
        self.entries.send_replace(next);
        Ok(true)
    }

    async fn persist(&self, entries: &[SavedJob]) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await.map_err(storage_error)?;
        }
        let content = serde_json::to_string_pretty(entries).map_err(storage_error)?;
        // Replace the file in one step so a failed write leaves the old one.
        fs::write(&self.tmp_path, content).await.map_err(storage_error)?;
        fs::rename(&self.tmp_path, &self.path).await.map_err(storage_error)?;

        info!(count = entries.len(), "Saved jobs written to {:?}", self.path);
        Ok(())
    }
}

fn storage_error(e: impl std::fmt::Display) -> ClientError {
    ClientError::Storage(e.to_string())
}
