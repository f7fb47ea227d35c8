pub mod clock;
pub mod day;
pub mod participant;
pub mod record;
pub mod roster;

pub use clock::{Clock, SystemClock};
pub use day::LogicalDay;
pub use participant::{Member, Participant, TargetQuery};
pub use record::Attendance;
pub use roster::{ExternalRoster, NameMatching};

use crate::database::{LedgerStore, StoreError};
use crate::utils::validation::validate_external_name;
use chrono::FixedOffset;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

pub type DayRecords = BTreeMap<Participant, Attendance>;

/// Everything the store persists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerState {
    pub days: BTreeMap<LogicalDay, DayRecords>,
    pub roster: ExternalRoster,
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("failed to persist ledger: {0}")]
    Persist(#[from] StoreError),
}

/// Self-marks always have a target, so there is no unknown case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelfMarkOutcome {
    Marked,
    AlreadyMarked,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkOutcome {
    Marked(Participant),
    AlreadyMarked(Participant),
    UnknownTarget,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added(String),
    Duplicate(String),
    Invalid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed(String),
    NotFound,
}

/// A participant together with the name shown for them today.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownParticipant {
    pub participant: Participant,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedEntry {
    pub participant: Participant,
    pub display_name: String,
    /// `None` for a self-mark, otherwise the helper's name or "Unknown".
    pub helper: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub day: LogicalDay,
    pub completed: Vec<CompletedEntry>,
    pub pending: Vec<KnownParticipant>,
}

impl StatusReport {
    pub fn total(&self) -> usize {
        self.completed.len() + self.pending.len()
    }
}

pub const UNKNOWN_HELPER: &str = "Unknown";

#[derive(Debug, Clone, Copy)]
pub struct LedgerSettings {
    pub offset: FixedOffset,
    pub name_matching: NameMatching,
    /// Day maps older than this many days are dropped on reset.
    pub retention_days: u32,
}

/// The single authoritative copy of who went fishing. Every mutation is
/// written through to the store; if the write fails the mutation is undone.
pub struct AttendanceLedger<S> {
    state: LedgerState,
    store: S,
    clock: Arc<dyn Clock>,
    settings: LedgerSettings,
}

impl<S: LedgerStore> AttendanceLedger<S> {
    /// Loads persisted state. A malformed store is an error, never an empty ledger.
    pub async fn open(
        store: S,
        clock: Arc<dyn Clock>,
        settings: LedgerSettings,
    ) -> Result<Self, StoreError> {
        let state = store.load().await?;
        info!(
            days = state.days.len(),
            roster = state.roster.len(),
            "Loaded fishing ledger"
        );
        Ok(Self {
            state,
            store,
            clock,
            settings,
        })
    }

    pub fn today(&self) -> LogicalDay {
        LogicalDay::from_instant(self.clock.now(), self.settings.offset)
    }

    pub fn roster(&self) -> &ExternalRoster {
        &self.state.roster
    }

    #[cfg(test)]
    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    pub fn record(&self, day: LogicalDay, participant: &Participant) -> Option<&Attendance> {
        self.state.days.get(&day)?.get(participant)
    }

    /// Maps a target onto a known participant. Free-text names prefer an
    /// exact match, then the configured matching mode; roster entries win
    /// over member display names. Menu selections must match exactly.
    pub fn resolve(&self, query: &TargetQuery, members: &[Member]) -> Option<Participant> {
        let matching = self.settings.name_matching;
        match query {
            TargetQuery::Member(id) => members
                .iter()
                .find(|m| m.id == *id)
                .map(Participant::from),
            TargetQuery::External(name) => self
                .state
                .roster
                .find(name, NameMatching::CaseSensitive)
                .map(|n| Participant::External(n.to_string())),
            TargetQuery::Name(name) => {
                let name = name.trim();
                let by = |mode: NameMatching| {
                    self.state
                        .roster
                        .find(name, mode)
                        .map(|n| Participant::External(n.to_string()))
                        .or_else(|| {
                            members
                                .iter()
                                .find(|m| mode.matches(&m.display_name, name))
                                .map(Participant::from)
                        })
                };
                by(NameMatching::CaseSensitive).or_else(|| by(matching))
            }
        }
    }

    pub async fn mark_self(
        &mut self,
        participant: Participant,
    ) -> Result<SelfMarkOutcome, LedgerError> {
        let day = self.today();
        Ok(if self.mark(day, &participant, None).await? {
            SelfMarkOutcome::Marked
        } else {
            SelfMarkOutcome::AlreadyMarked
        })
    }

    pub async fn mark_for(
        &mut self,
        target: &TargetQuery,
        helper: Participant,
        members: &[Member],
    ) -> Result<MarkOutcome, LedgerError> {
        let day = self.today();
        let Some(target) = self.resolve(target, members) else {
            return Ok(MarkOutcome::UnknownTarget);
        };
        Ok(if self.mark(day, &target, Some(helper)).await? {
            MarkOutcome::Marked(target)
        } else {
            MarkOutcome::AlreadyMarked(target)
        })
    }

    /// Returns `false` when `target` was already done for `day`.
    async fn mark(
        &mut self,
        day: LogicalDay,
        target: &Participant,
        helper: Option<Participant>,
    ) -> Result<bool, LedgerError> {
        if self.record(day, target).is_some_and(Attendance::is_done) {
            return Ok(false);
        }

        let previous = self.state.clone();
        self.state
            .days
            .entry(day)
            .or_default()
            .insert(target.clone(), Attendance::Done {
                helper: helper.clone(),
            });
        self.commit(previous).await?;

        info!(
            %day,
            participant = %target,
            helper = helper.as_ref().map(Participant::key).as_deref().unwrap_or("self"),
            "Marked fishing as done"
        );
        Ok(true)
    }

    /// Everyone eligible today: the supplied members followed by the roster.
    pub fn known_participants(&self, members: &[Member]) -> Vec<KnownParticipant> {
        let members = members.iter().map(|m| KnownParticipant {
            participant: Participant::from(m),
            display_name: m.display_name.clone(),
        });
        let externals = self.state.roster.iter().map(|name| KnownParticipant {
            participant: Participant::External(name.to_string()),
            display_name: name.to_string(),
        });
        members.chain(externals).collect()
    }

    pub fn status(&self, known: &[KnownParticipant]) -> StatusReport {
        let day = self.today();
        let records = self.state.days.get(&day);
        let display_name = |p: &Participant| {
            known
                .iter()
                .find(|k| &k.participant == p)
                .map(|k| k.display_name.clone())
        };

        let mut completed = Vec::new();
        let mut pending = Vec::new();
        for entry in known {
            match records.and_then(|r| r.get(&entry.participant)) {
                Some(Attendance::Done { helper }) => completed.push(CompletedEntry {
                    participant: entry.participant.clone(),
                    display_name: entry.display_name.clone(),
                    helper: helper
                        .as_ref()
                        .map(|h| display_name(h).unwrap_or_else(|| UNKNOWN_HELPER.to_string())),
                }),
                Some(Attendance::Pending) | None => pending.push(entry.clone()),
            }
        }

        StatusReport {
            day,
            completed,
            pending,
        }
    }

    /// Seeds today's map with every roster name as pending and drops day
    /// maps past the retention window. Records already written for today
    /// (marks that landed between midnight and the reset) are kept.
    pub async fn reset(&mut self, seed: &ExternalRoster) -> Result<LogicalDay, LedgerError> {
        let day = self.today();
        let previous = self.state.clone();

        let records = self.state.days.entry(day).or_default();
        for name in seed.iter() {
            records
                .entry(Participant::External(name.to_string()))
                .or_insert(Attendance::Pending);
        }

        let retention = i64::from(self.settings.retention_days);
        self.state
            .days
            .retain(|kept, _| day.days_since(*kept) <= retention);

        self.commit(previous).await?;
        info!(%day, seeded = seed.len(), kept_days = self.state.days.len(), "Fishing data reset");
        Ok(day)
    }

    pub async fn add_external(&mut self, name: &str) -> Result<AddOutcome, LedgerError> {
        let Ok(name) = validate_external_name(name) else {
            return Ok(AddOutcome::Invalid);
        };
        if self.state.roster.contains_exact(name) {
            return Ok(AddOutcome::Duplicate(name.to_string()));
        }

        let previous = self.state.clone();
        self.state.roster.push(name.to_string());
        self.commit(previous).await?;

        info!(name, "Added external participant");
        Ok(AddOutcome::Added(name.to_string()))
    }

    pub async fn remove_external(&mut self, name: &str) -> Result<RemoveOutcome, LedgerError> {
        let Some(found) = self
            .state
            .roster
            .lookup(name.trim(), self.settings.name_matching)
            .map(str::to_string)
        else {
            return Ok(RemoveOutcome::NotFound);
        };

        let previous = self.state.clone();
        self.state.roster.remove(&found);
        self.commit(previous).await?;

        info!(name = %found, "Removed external participant");
        Ok(RemoveOutcome::Removed(found))
    }

    async fn commit(&mut self, previous: LedgerState) -> Result<(), LedgerError> {
        if let Err(e) = self.store.persist(&self.state).await {
            error!("Failed to persist ledger, rolling back: {}", e);
            self.state = previous;
            return Err(LedgerError::Persist(e));
        }
        Ok(())
    }
}
