//! Persistent per-user profile store.
//!
//! One `UserProfile` row per user id, held in memory behind a write lock and
//! written through to a JSON file on every mutation. The write lock
//! serializes read-modify-write sequences, so no two mutations on the same
//! profile can interleave. Mutations persist a snapshot first and commit to
//! the in-memory map only on success: a failed write leaves no partial
//! update visible.
//!
//! There is no generic "set field" primitive on purpose; every logical
//! mutation is its own typed operation so the score/level/streak invariants
//! stay inside this module.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use crate::domain::{level_for, Level, UserProfile};
use crate::error::TutorError;

const DEFAULT_DB_PATH: &str = "./profiles.json";

#[derive(Clone)]
pub struct ProfileStore {
    rows: Arc<RwLock<HashMap<String, UserProfile>>>,
    persist_path: Option<PathBuf>,
}

impl ProfileStore {
    /// Open the store at `path`, loading existing rows. A missing file means
    /// an empty store; an unreadable or unparseable file is a startup error.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TutorError> {
        let path = path.as_ref().to_path_buf();
        let rows: HashMap<String, UserProfile> = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            serde_json::from_str(&raw)?
        } else {
            HashMap::new()
        };
        info!(target: "profile", path = %path.display(), users = rows.len(), "Profile store opened");
        Ok(Self {
            rows: Arc::new(RwLock::new(rows)),
            persist_path: Some(path),
        })
    }

    /// Open at PROFILE_DB_PATH (default `./profiles.json`).
    pub fn open_from_env() -> Result<Self, TutorError> {
        let path = std::env::var("PROFILE_DB_PATH").unwrap_or_else(|_| DEFAULT_DB_PATH.into());
        Self::open(path)
    }

    /// Store without a backing file. Used by tests.
    pub fn in_memory() -> Self {
        Self {
            rows: Arc::new(RwLock::new(HashMap::new())),
            persist_path: None,
        }
    }

    fn persist(&self, rows: &HashMap<String, UserProfile>) -> Result<(), TutorError> {
        let Some(path) = &self.persist_path else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(rows)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Read-only copy of one profile.
    pub async fn get(&self, user_id: &str) -> Option<UserProfile> {
        self.rows.read().await.get(user_id).cloned()
    }

    /// Create-if-absent. An existing profile only has its display name
    /// refreshed (informational field; nothing else is touched).
    #[instrument(level = "debug", skip(self, display_name), fields(%user_id))]
    pub async fn ensure_profile(
        &self,
        user_id: &str,
        display_name: Option<String>,
    ) -> Result<UserProfile, TutorError> {
        let mut rows = self.rows.write().await;
        match rows.get(user_id) {
            Some(existing) => {
                let mut row = existing.clone();
                if display_name.is_some() && row.display_name != display_name {
                    row.display_name = display_name;
                    let mut snapshot = rows.clone();
                    snapshot.insert(user_id.to_string(), row.clone());
                    self.persist(&snapshot)?;
                    rows.insert(user_id.to_string(), row.clone());
                }
                Ok(row)
            }
            None => {
                let row = UserProfile::new(user_id, display_name);
                let mut snapshot = rows.clone();
                snapshot.insert(user_id.to_string(), row.clone());
                self.persist(&snapshot)?;
                rows.insert(user_id.to_string(), row.clone());
                info!(target: "profile", %user_id, "Profile created");
                Ok(row)
            }
        }
    }

    /// Apply one typed mutation to an existing row, persist, then commit.
    async fn mutate<F>(&self, user_id: &str, f: F) -> Result<UserProfile, TutorError>
    where
        F: FnOnce(&mut UserProfile),
    {
        let mut rows = self.rows.write().await;
        let mut row = rows.get(user_id).cloned().ok_or(TutorError::NotRegistered)?;
        f(&mut row);
        let mut snapshot = rows.clone();
        snapshot.insert(user_id.to_string(), row.clone());
        self.persist(&snapshot)?;
        rows.insert(user_id.to_string(), row.clone());
        Ok(row)
    }

    /// Add `delta` points. Returns the new score.
    #[instrument(level = "debug", skip(self), fields(%user_id, delta))]
    pub async fn increment_score(&self, user_id: &str, delta: u32) -> Result<u32, TutorError> {
        let row = self.mutate(user_id, |p| p.score += delta).await?;
        debug!(target: "profile", %user_id, score = row.score, "Score incremented");
        Ok(row.score)
    }

    /// Rewrite `level` from the current score. Idempotent.
    #[instrument(level = "debug", skip(self), fields(%user_id))]
    pub async fn recompute_level(&self, user_id: &str) -> Result<Level, TutorError> {
        let row = self.mutate(user_id, |p| p.level = level_for(p.score)).await?;
        Ok(row.level)
    }

    /// Advance the consecutive-day streak against `today`:
    /// same day is a no-op, yesterday increments, anything else (first
    /// activity, an older gap, or a future date from clock skew) resets to 1.
    #[instrument(level = "debug", skip(self), fields(%user_id, %today))]
    pub async fn touch_streak(&self, user_id: &str, today: NaiveDate) -> Result<u32, TutorError> {
        // Whole transition under one write-lock critical section: the
        // same-day guard must see the date a concurrent touch just wrote.
        let mut rows = self.rows.write().await;
        let mut row = rows.get(user_id).cloned().ok_or(TutorError::NotRegistered)?;
        if row.last_active == Some(today) {
            // At-most-once-per-day increment; nothing to persist.
            return Ok(row.streak);
        }
        let yesterday = row
            .last_active
            .map(|d| today.signed_duration_since(d).num_days() == 1)
            .unwrap_or(false);
        row.streak = if yesterday { row.streak + 1 } else { 1 };
        row.last_active = Some(today);
        let mut snapshot = rows.clone();
        snapshot.insert(user_id.to_string(), row.clone());
        self.persist(&snapshot)?;
        rows.insert(user_id.to_string(), row.clone());
        debug!(target: "profile", %user_id, streak = row.streak, "Streak touched");
        Ok(row.streak)
    }
}
