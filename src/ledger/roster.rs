use serde::{Deserialize, Serialize};

/// How free-text names are compared when resolving a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameMatching {
    CaseSensitive,
    #[default]
    CaseInsensitive,
}

impl NameMatching {
    pub fn matches(self, candidate: &str, query: &str) -> bool {
        match self {
            NameMatching::CaseSensitive => candidate == query,
            NameMatching::CaseInsensitive => candidate.to_lowercase() == query.to_lowercase(),
        }
    }
}

/// Ordered list of non-member participants. Uniqueness is enforced by the
/// ledger, not by this type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExternalRoster(Vec<String>);

impl ExternalRoster {
    pub fn new(names: Vec<String>) -> Self {
        Self(names)
    }

    pub fn contains_exact(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }

    /// First entry matching `name` under `matching`, in roster order.
    pub fn find(&self, name: &str, matching: NameMatching) -> Option<&str> {
        self.0
            .iter()
            .find(|n| matching.matches(n, name))
            .map(String::as_str)
    }

    /// Exact entry if there is one, otherwise the first hit under `matching`.
    /// Keeps "Alice" and "alice" individually addressable.
    pub fn lookup(&self, name: &str, matching: NameMatching) -> Option<&str> {
        self.find(name, NameMatching::CaseSensitive)
            .or_else(|| self.find(name, matching))
    }

    pub(crate) fn push(&mut self, name: String) {
        self.0.push(name);
    }

    pub(crate) fn remove(&mut self, name: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|n| n != name);
        self.0.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}
