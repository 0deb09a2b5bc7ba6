//! File-based State Store Adapter
//!
//! Keeps the rotation record as a pretty-printed JSON file. Every save
//! rewrites the whole file through a sibling temp file and a rename.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;

use crate::domain::rotation::{Roster, RotationState, StateRecord};
use crate::ports::{StateStore, StateStoreError};

/// JSON file storage for the rotation state
#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
    roster: Arc<Roster>,
}

impl FileStateStore {
    /// Create a store for the file at `path`, validated against `roster`.
    ///
    /// # Example
    /// ```ignore
    /// let store = FileStateStore::new("/data/bot_state.json", roster);
    /// ```
    pub fn new<P: AsRef<Path>>(path: P, roster: Arc<Roster>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            roster,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn read_record(&self) -> Result<Option<StateRecord>, String> {
        let json = match fs::read_to_string(&self.path).await {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(format!("read failed: {}", e)),
        };
        serde_json::from_str(&json)
            .map(Some)
            .map_err(|e| format!("parse failed: {}", e))
    }
}

#[async_trait]
impl StateStore for FileStateStore {
    async fn load(&self) -> RotationState {
        let record = match self.read_record().await {
            Ok(Some(record)) => record,
            Ok(None) => {
                tracing::warn!(path = %self.path.display(), "State file not found, starting fresh");
                return RotationState::initial(&self.roster);
            }
            Err(e) => {
                tracing::error!(path = %self.path.display(), "Unreadable state file, using defaults: {}", e);
                return RotationState::initial(&self.roster);
            }
        };

        match RotationState::from_record(&self.roster, &record) {
            Ok(state) => {
                if record.is_legacy() {
                    tracing::warn!(
                        path = %self.path.display(),
                        legacy_last_payer = record.last_payer_index,
                        "Converted state file from the earlier layout; rewritten on next save"
                    );
                }
                tracing::info!(
                    last_settled = state.last_settled_index(),
                    obligor = %state.current_name(),
                    paid = state.current_cycle_paid(),
                    "Rotation state loaded"
                );
                state
            }
            Err(e) => {
                tracing::error!(path = %self.path.display(), "Invalid state file, using defaults: {}", e);
                RotationState::initial(&self.roster)
            }
        }
    }

    async fn save(&self, state: &RotationState) -> Result<(), StateStoreError> {
        if let Err(e) = state.validate(&self.roster) {
            tracing::error!(?state, "Refusing to save invalid state: {}", e);
            return Err(StateStoreError::Rejected(e));
        }

        let json = serde_json::to_string_pretty(&state.to_record())
            .map_err(|e| StateStoreError::SerializationFailed(e.to_string()))?;

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .await
                .map_err(|e| StateStoreError::IoError(e.to_string()))?;
        }

        let temp = self.temp_path();
        fs::write(&temp, json)
            .await
            .map_err(|e| StateStoreError::IoError(e.to_string()))?;
        fs::rename(&temp, &self.path)
            .await
            .map_err(|e| StateStoreError::IoError(e.to_string()))?;

        tracing::debug!(
            last_settled = state.last_settled_index(),
            obligor = %state.current_name(),
            paid = state.current_cycle_paid(),
            "Rotation state saved"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rotation::RotationEngine;
    use tempfile::TempDir;

    fn roster() -> Arc<Roster> {
        Arc::new(Roster::new(["Ana", "Bruno", "Caio"]).unwrap())
    }

    fn store_in(dir: &TempDir) -> FileStateStore {
        FileStateStore::new(dir.path().join("bot_state.json"), roster())
    }

    #[tokio::test]
    async fn test_load_missing_file_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);

        let state = store.load().await;

        assert_eq!(state, RotationState::initial(&roster()));
    }

    #[tokio::test]
    async fn test_save_and_load_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        let roster = roster();
        let state = RotationState::settled(&roster, Some(1), true).unwrap();

        store.save(&state).await.unwrap();
        let loaded = store.load().await;

        assert_eq!(loaded, state);
    }

    #[tokio::test]
    async fn test_save_of_loaded_state_is_byte_identical() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        let state = RotationState::settled(&roster(), Some(0), false).unwrap();
        store.save(&state).await.unwrap();
        let before = std::fs::read(store.path()).unwrap();

        let loaded = store.load().await;
        store.save(&loaded).await.unwrap();

        assert_eq!(std::fs::read(store.path()).unwrap(), before);
    }

    #[tokio::test]
    async fn test_load_recomputes_stored_current_fields() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        std::fs::write(
            store.path(),
            r#"{"format_version": 1, "last_payer_index": 1, "current_payer_index": 0, "current_payer_name": "Ana", "current_cycle_paid": true}"#,
        )
        .unwrap();

        let state = store.load().await;

        assert_eq!(state.current_index(), 2);
        assert_eq!(state.current_name(), "Caio");
        assert!(state.current_cycle_paid());
    }

    #[tokio::test]
    async fn test_load_legacy_file_keeps_last_announced_participant() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        std::fs::write(
            store.path(),
            r#"{"last_payer_index": 1, "current_payer_index": 1, "current_payer_name": "Bruno", "current_cycle_paid": false}"#,
        )
        .unwrap();

        let state = store.load().await;
        assert_eq!(state.current_name(), "Bruno");

        store.save(&state).await.unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(json["format_version"], 1);
        assert_eq!(store.load().await, state);
    }

    #[tokio::test]
    async fn test_load_corrupt_json_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        std::fs::write(store.path(), "{ not json").unwrap();

        assert_eq!(store.load().await, RotationState::initial(&roster()));
    }

    #[tokio::test]
    async fn test_load_wrong_types_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        std::fs::write(store.path(), r#"{"last_payer_index": "one", "current_cycle_paid": 1}"#)
            .unwrap();

        assert_eq!(store.load().await, RotationState::initial(&roster()));
    }

    #[tokio::test]
    async fn test_load_out_of_range_pointer_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        std::fs::write(store.path(), r#"{"last_payer_index": 9, "current_cycle_paid": true}"#)
            .unwrap();

        let state = store.load().await;

        assert_eq!(state, RotationState::initial(&roster()));
        assert!(!state.current_cycle_paid());
    }

    #[tokio::test]
    async fn test_save_rejects_state_from_other_roster_without_writing() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        let good = RotationState::settled(&roster(), Some(0), false).unwrap();
        store.save(&good).await.unwrap();
        let before = std::fs::read(store.path()).unwrap();

        let longer = Roster::new(["Ana", "Bruno", "Caio", "Duda", "Eva"]).unwrap();
        let poison = RotationState::settled(&longer, Some(3), false).unwrap();
        let result = store.save(&poison).await;

        assert!(matches!(result, Err(StateStoreError::Rejected(_))));
        assert_eq!(std::fs::read(store.path()).unwrap(), before);
    }

    #[tokio::test]
    async fn test_save_creates_parent_directory() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStateStore::new(temp_dir.path().join("data/state.json"), roster());

        store.save(&RotationState::initial(&roster())).await.unwrap();

        assert!(store.path().exists());
        assert!(!store.temp_path().exists());
    }

    #[tokio::test]
    async fn test_pending_candidate_reloads_to_settled_obligor() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        let roster = roster();
        let engine = RotationEngine::new(&roster);
        let settled = RotationState::settled(&roster, Some(0), false).unwrap();
        let pending = engine.advance(&settled);

        store.save(&pending).await.unwrap();
        let loaded = store.load().await;

        assert_eq!(loaded.current_name(), "Bruno");
        assert_eq!(loaded.last_settled(), Some(0));
    }

    #[tokio::test]
    async fn test_written_file_uses_stored_field_names() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        store.save(&RotationState::initial(&roster())).await.unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();

        assert_eq!(json["last_payer_index"], -1);
        assert_eq!(json["current_payer_name"], "Ana");
    }
}
