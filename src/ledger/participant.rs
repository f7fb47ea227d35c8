use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

const EXTERNAL_PREFIX: &str = "external:";

/// A guild member as seen at the moment of the event. Bots are filtered out
/// before a `Member` is ever built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: u64,
    pub display_name: String,
}

impl Member {
    pub fn new(id: u64, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
        }
    }
}

/// Identity of someone who can go fishing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Participant {
    Member(u64),
    External(String),
}

impl Participant {
    /// Storage key. Members are stored by bare id so files written by
    /// earlier versions of the bot stay readable.
    pub fn key(&self) -> String {
        match self {
            Participant::Member(id) => id.to_string(),
            Participant::External(name) => format!("{EXTERNAL_PREFIX}{name}"),
        }
    }

    /// Inverse of [`Participant::key`]. Unprefixed, non-numeric keys are
    /// legacy external names.
    pub fn from_key(key: &str) -> Self {
        if let Some(name) = key.strip_prefix(EXTERNAL_PREFIX) {
            return Participant::External(name.to_string());
        }
        match key.parse::<u64>() {
            Ok(id) => Participant::Member(id),
            Err(_) => Participant::External(key.to_string()),
        }
    }
}

impl From<&Member> for Participant {
    fn from(member: &Member) -> Self {
        Participant::Member(member.id)
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

impl Serialize for Participant {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.key())
    }
}

impl<'de> Deserialize<'de> for Participant {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        Ok(Participant::from_key(&key))
    }
}

/// What an event says about who should be marked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetQuery {
    /// A user picked through the platform's user option.
    Member(u64),
    /// Free text: roster entries first, then member display names.
    Name(String),
    /// A roster entry picked from the offline selection menu.
    External(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip_both_variants() {
        let member = Participant::Member(184405311681986560);
        let external = Participant::External("Grandpa Joe".into());

        assert_eq!(member.key(), "184405311681986560");
        assert_eq!(external.key(), "external:Grandpa Joe");
        assert_eq!(Participant::from_key(&member.key()), member);
        assert_eq!(Participant::from_key(&external.key()), external);
    }

    #[test]
    fn numeric_external_names_stay_external() {
        let external = Participant::External("42".into());
        assert_eq!(Participant::from_key(&external.key()), external);
    }

    #[test]
    fn legacy_bare_names_load_as_external() {
        assert_eq!(
            Participant::from_key("Alice"),
            Participant::External("Alice".into())
        );
    }

    #[test]
    fn members_sort_before_externals() {
        let mut all = vec![
            Participant::External("Bob".into()),
            Participant::Member(7),
            Participant::External("Alice".into()),
        ];
        all.sort();
        assert_eq!(all[0], Participant::Member(7));
        assert_eq!(all[1], Participant::External("Alice".into()));
    }
}
