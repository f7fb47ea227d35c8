use super::{LedgerStore, StoreError};
use crate::database::models::{LedgerDocument, RosterDocument};
use crate::ledger::LedgerState;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::error;

/// Two pretty-printed JSON documents: the per-day ledger and the roster.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    ledger_path: PathBuf,
    roster_path: PathBuf,
}

impl JsonFileStore {
    pub fn new(ledger_path: PathBuf, roster_path: PathBuf) -> Self {
        Self {
            ledger_path,
            roster_path,
        }
    }
}

impl LedgerStore for JsonFileStore {
    fn load(&self) -> impl Future<Output = Result<LedgerState, StoreError>> + Send {
        async move {
            let days: LedgerDocument = read_document(&self.ledger_path).await?;
            let roster: RosterDocument = read_document(&self.roster_path).await?;
            Ok(LedgerState { days, roster })
        }
    }

    fn persist(&self, state: &LedgerState) -> impl Future<Output = Result<(), StoreError>> + Send {
        let encoded = serde_json::to_vec_pretty(&state.days)
            .and_then(|days| Ok((days, serde_json::to_vec_pretty(&state.roster)?)));
        let ledger_path = self.ledger_path.clone();
        let roster_path = self.roster_path.clone();

        async move {
            let (days, roster) = encoded?;
            tokio::task::spawn_blocking(move || write_both(&roster_path, &roster, &ledger_path, &days))
                .await?
        }
    }
}

/// Missing file means empty document.
async fn read_document<T: DeserializeOwned + Default>(path: &Path) -> Result<T, StoreError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(T::default()),
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    serde_json::from_slice(&bytes).map_err(|source| StoreError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

/// Roster first, then ledger. If the ledger write fails the roster file is
/// put back the way it was, so disk never holds half a mutation.
fn write_both(
    roster_path: &Path,
    roster: &[u8],
    ledger_path: &Path,
    days: &[u8],
) -> Result<(), StoreError> {
    let previous_roster = match std::fs::read(roster_path) {
        Ok(bytes) => Some(bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(source) => {
            return Err(StoreError::Io {
                path: roster_path.to_path_buf(),
                source,
            });
        }
    };
    if previous_roster.as_deref() != Some(roster) {
        atomic_write(roster_path, roster)?;
    }

    if let Err(e) = atomic_write(ledger_path, days) {
        let restored = match &previous_roster {
            Some(bytes) if bytes.as_slice() != roster => atomic_write(roster_path, bytes),
            Some(_) => Ok(()),
            None => std::fs::remove_file(roster_path).map_err(|source| StoreError::Io {
                path: roster_path.to_path_buf(),
                source,
            }),
        };
        if let Err(restore) = restored {
            error!("Failed to restore {}: {}", roster_path.display(), restore);
        }
        return Err(e);
    }
    Ok(())
}

/// Write to a sibling temp file and rename over the target.
fn atomic_write(path: &Path, data: &[u8]) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(io_err)?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(data).map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{Attendance, ExternalRoster, LogicalDay, Participant};
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> JsonFileStore {
        JsonFileStore::new(
            dir.path().join("fishingData.json"),
            dir.path().join("externalUsers.json"),
        )
    }

    fn day(s: &str) -> LogicalDay {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn missing_files_load_empty() {
        let dir = TempDir::new().unwrap();
        let state = store_in(&dir).load().await.unwrap();
        assert_eq!(state, LedgerState::default());
    }

    #[tokio::test]
    async fn persisted_state_loads_back() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let mut records = BTreeMap::new();
        records.insert(Participant::Member(42), Attendance::Done { helper: None });
        records.insert(
            Participant::External("Grandpa Joe".into()),
            Attendance::Done {
                helper: Some(Participant::Member(42)),
            },
        );
        records.insert(Participant::External("Alice".into()), Attendance::Pending);
        let mut state = LedgerState {
            roster: ExternalRoster::new(vec!["Grandpa Joe".into(), "Alice".into()]),
            ..Default::default()
        };
        state.days.insert(day("2024-03-01"), records);

        store.persist(&state).await.unwrap();
        assert_eq!(store.load().await.unwrap(), state);
    }

    #[tokio::test]
    async fn ledger_file_uses_day_and_participant_keys() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let mut state = LedgerState::default();
        state.days.entry(day("2024-03-01")).or_default().insert(
            Participant::Member(42),
            Attendance::Done {
                helper: Some(Participant::Member(7)),
            },
        );

        store.persist(&state).await.unwrap();

        let raw = std::fs::read_to_string(dir.path().join("fishingData.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["2024-03-01"]["42"], "7");
    }

    #[tokio::test]
    async fn loads_legacy_keys() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("fishingData.json"),
            r#"{ "2024-03-01": { "42": null, "43": "42", "Grandpa Joe": "42" } }"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("externalUsers.json"), r#"["Grandpa Joe"]"#).unwrap();

        let state = store_in(&dir).load().await.unwrap();

        let records = &state.days[&day("2024-03-01")];
        assert_eq!(records[&Participant::Member(42)], Attendance::Done { helper: None });
        assert_eq!(
            records[&Participant::External("Grandpa Joe".into())].helper(),
            Some(&Participant::Member(42))
        );
        assert!(state.roster.contains_exact("Grandpa Joe"));
    }

    #[tokio::test]
    async fn malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("fishingData.json"), "{ not json").unwrap();

        let err = store_in(&dir).load().await.unwrap_err();
        assert!(matches!(err, StoreError::Malformed { .. }));
    }

    #[tokio::test]
    async fn bad_day_key_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("fishingData.json"), r#"{ "yesterday": {} }"#).unwrap();

        assert!(store_in(&dir).load().await.is_err());
    }

    #[tokio::test]
    async fn failed_ledger_write_leaves_roster_untouched() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let before = LedgerState {
            roster: ExternalRoster::new(vec!["Bob".into()]),
            ..Default::default()
        };
        store.persist(&before).await.unwrap();

        // A non-empty directory can't be renamed over.
        let ledger_path = dir.path().join("fishingData.json");
        std::fs::remove_file(&ledger_path).unwrap();
        std::fs::create_dir_all(ledger_path.join("blocker")).unwrap();

        let after = LedgerState {
            roster: ExternalRoster::new(vec!["Bob".into(), "Alice".into()]),
            ..Default::default()
        };
        assert!(store.persist(&after).await.is_err());

        std::fs::remove_dir_all(&ledger_path).unwrap();
        assert_eq!(store.load().await.unwrap(), before);
    }

    #[tokio::test]
    async fn failed_first_write_removes_new_roster_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let ledger_path = dir.path().join("fishingData.json");
        std::fs::create_dir_all(ledger_path.join("blocker")).unwrap();

        let state = LedgerState {
            roster: ExternalRoster::new(vec!["Alice".into()]),
            ..Default::default()
        };
        assert!(store.persist(&state).await.is_err());

        assert!(!dir.path().join("externalUsers.json").exists());
    }

    #[test]
    fn atomic_write_creates_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a/b/ledger.json");
        atomic_write(&path, b"{}").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }
}
