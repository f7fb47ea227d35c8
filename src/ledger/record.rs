use super::participant::Participant;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// State of one (day, participant) pair.
///
/// On disk: `false` for a seeded pending entry, `null` for a self-mark and
/// the helper's key otherwise. `true` is accepted as a self-mark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attendance {
    Pending,
    Done { helper: Option<Participant> },
}

impl Attendance {
    pub fn is_done(&self) -> bool {
        matches!(self, Attendance::Done { .. })
    }

    pub fn helper(&self) -> Option<&Participant> {
        match self {
            Attendance::Done { helper } => helper.as_ref(),
            Attendance::Pending => None,
        }
    }
}

impl Serialize for Attendance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Attendance::Pending => serializer.serialize_bool(false),
            Attendance::Done { helper: None } => serializer.serialize_none(),
            Attendance::Done {
                helper: Some(helper),
            } => serializer.serialize_str(&helper.key()),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawMark {
    Flag(bool),
    Helper(Option<String>),
}

impl<'de> Deserialize<'de> for Attendance {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawMark::deserialize(deserializer)? {
            RawMark::Flag(false) => Attendance::Pending,
            RawMark::Flag(true) | RawMark::Helper(None) => Attendance::Done { helper: None },
            RawMark::Helper(Some(key)) => Attendance::Done {
                helper: Some(Participant::from_key(&key)),
            },
        })
    }
}
