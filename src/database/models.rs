use crate::ledger::{DayRecords, ExternalRoster, LogicalDay};
use sqlx::FromRow;
use std::collections::BTreeMap;

/// `{ "YYYY-MM-DD": { "<participant key>": null | false | "<helper key>" } }`
pub type LedgerDocument = BTreeMap<LogicalDay, DayRecords>;

/// `["name", ...]`
pub type RosterDocument = ExternalRoster;

#[derive(Debug, Clone, FromRow)]
pub struct FishingRecordRow {
    pub day: String,
    pub participant: String,
    pub status: String, // "pending" or "done"
    pub helper: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct RosterRow {
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordStatus {
    Pending,
    Done,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Pending => "pending",
            RecordStatus::Done => "done",
        }
    }
}

impl TryFrom<&str> for RecordStatus {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "pending" => Ok(RecordStatus::Pending),
            "done" => Ok(RecordStatus::Done),
            _ => Err(format!("Invalid record status: {}", s)),
        }
    }
}
