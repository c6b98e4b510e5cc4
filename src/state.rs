//! Application state: content catalog, profile store, and pending answer keys.
//!
//! This module owns:
//!   - the immutable content catalog (external TOML bank or built-in seeds)
//!   - the persistent profile store
//!   - the per-user pending answer-key slots (ephemeral, in-memory only;
//!     lost on restart, which costs at most one in-flight quiz)

use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use crate::catalog::ContentCatalog;
use crate::config::load_content_config_from_env;
use crate::domain::AnswerKey;
use crate::store::ProfileStore;

#[derive(Clone)]
pub struct AppState {
    pub catalog: ContentCatalog,
    pub profiles: ProfileStore,
    pending: Arc<RwLock<HashMap<String, AnswerKey>>>,
}

impl AppState {
    /// Build state from env: load the content bank (fatal on error when a
    /// path is configured), open the profile store, start with no pending
    /// quizzes.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let (catalog, source) = match load_content_config_from_env()? {
            Some(cfg) => (ContentCatalog::new(cfg)?, "config"),
            None => (ContentCatalog::from_seeds(), "seeds"),
        };
        let (grammar, vocabulary, puzzles, lessons) = catalog.inventory();
        info!(target: "practice", %source, grammar, vocabulary, puzzles, lessons, "Startup content inventory");

        let profiles = ProfileStore::open_from_env()?;
        Ok(Self::with_parts(catalog, profiles))
    }

    /// Assemble from already-built parts. Tests use this with an in-memory
    /// profile store.
    pub fn with_parts(catalog: ContentCatalog, profiles: ProfileStore) -> Self {
        Self {
            catalog,
            profiles,
            pending: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Store the answer key for a freshly issued bundle. Last write wins:
    /// reissuing `daily` before a reply discards the earlier key.
    pub async fn set_pending(&self, user_id: &str, key: AnswerKey) {
        let mut pending = self.pending.write().await;
        if let Some(old) = pending.insert(user_id.to_string(), key) {
            debug!(target: "practice", %user_id, discarded = %old.bundle_id, "Pending answer key overwritten");
        }
    }

    /// Peek at the pending key without consuming it.
    pub async fn pending_for(&self, user_id: &str) -> Option<AnswerKey> {
        self.pending.read().await.get(user_id).cloned()
    }

    /// Consume the pending key: remove-and-return in one critical section.
    /// Of two concurrent replies, only one can observe the key.
    pub async fn take_pending(&self, user_id: &str) -> Option<AnswerKey> {
        self.pending.write().await.remove(user_id)
    }
}
