use super::{LedgerStore, StoreError};
use crate::database::migrations;
use crate::database::models::{FishingRecordRow, RecordStatus, RosterRow};
use crate::ledger::{Attendance, ExternalRoster, LedgerState, LogicalDay, Participant};
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;
use std::future::Future;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        let pool = SqlitePool::connect_with(connect_options).await?;

        migrations::run_migrations(&pool).await?;

        Ok(Self { pool })
    }

    async fn load_state(&self) -> Result<LedgerState, StoreError> {
        let rows = sqlx::query_as::<_, FishingRecordRow>(
            "SELECT day, participant, status, helper FROM fishing_records ORDER BY day, participant",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut state = LedgerState::default();
        for row in rows {
            let day = LogicalDay::from_str(&row.day)
                .map_err(|e| StoreError::Corrupt(format!("day '{}': {}", row.day, e)))?;
            let status = RecordStatus::try_from(row.status.as_str()).map_err(StoreError::Corrupt)?;
            let attendance = match status {
                RecordStatus::Pending => Attendance::Pending,
                RecordStatus::Done => Attendance::Done {
                    helper: row.helper.as_deref().map(Participant::from_key),
                },
            };
            state
                .days
                .entry(day)
                .or_default()
                .insert(Participant::from_key(&row.participant), attendance);
        }

        let roster = sqlx::query_as::<_, RosterRow>(
            "SELECT name FROM external_roster ORDER BY position ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        state.roster = ExternalRoster::new(roster.into_iter().map(|row| row.name).collect());

        Ok(state)
    }

    /// Replaces both tables inside one transaction.
    async fn replace_state(&self, state: &LedgerState) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM fishing_records")
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM external_roster")
            .execute(&mut *tx)
            .await?;

        for (day, records) in &state.days {
            for (participant, attendance) in records {
                let status = if attendance.is_done() {
                    RecordStatus::Done
                } else {
                    RecordStatus::Pending
                };
                sqlx::query(
                    "INSERT INTO fishing_records (day, participant, status, helper) VALUES (?, ?, ?, ?)",
                )
                .bind(day.to_string())
                .bind(participant.key())
                .bind(status.as_str())
                .bind(attendance.helper().map(Participant::key))
                .execute(&mut *tx)
                .await?;
            }
        }

        for (position, name) in state.roster.iter().enumerate() {
            sqlx::query("INSERT INTO external_roster (position, name) VALUES (?, ?)")
                .bind(position as i64)
                .bind(name)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

impl LedgerStore for SqliteStore {
    fn load(&self) -> impl Future<Output = Result<LedgerState, StoreError>> + Send {
        self.load_state()
    }

    fn persist(&self, state: &LedgerState) -> impl Future<Output = Result<(), StoreError>> + Send {
        self.replace_state(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn store_in(dir: &TempDir) -> SqliteStore {
        let url = format!("sqlite:{}", dir.path().join("fishing.db").display());
        SqliteStore::connect(&url).await.unwrap()
    }

    #[tokio::test]
    async fn fresh_database_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;
        assert_eq!(store.load().await.unwrap(), LedgerState::default());
    }

    #[tokio::test]
    async fn persist_replaces_previous_contents() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;
        let day: LogicalDay = "2024-03-01".parse().unwrap();

        let mut first = LedgerState {
            roster: ExternalRoster::new(vec!["Bob".into(), "Alice".into()]),
            ..Default::default()
        };
        first.days.entry(day).or_default().insert(
            Participant::External("Alice".into()),
            Attendance::Done {
                helper: Some(Participant::Member(42)),
            },
        );
        first
            .days
            .entry(day)
            .or_default()
            .insert(Participant::External("Bob".into()), Attendance::Pending);
        store.persist(&first).await.unwrap();
        assert_eq!(store.load().await.unwrap(), first);

        let mut second = LedgerState {
            roster: ExternalRoster::new(vec!["Alice".into()]),
            ..Default::default()
        };
        second
            .days
            .entry(day)
            .or_default()
            .insert(Participant::Member(42), Attendance::Done { helper: None });
        store.persist(&second).await.unwrap();

        assert_eq!(store.load().await.unwrap(), second);
    }

    #[tokio::test]
    async fn corrupt_day_is_reported() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;
        sqlx::query(
            "INSERT INTO fishing_records (day, participant, status, helper) VALUES ('someday', '42', 'done', NULL)",
        )
        .execute(&store.pool)
        .await
        .unwrap();

        assert!(matches!(store.load().await, Err(StoreError::Corrupt(_))));
    }
}
