//! Roster value object - the fixed, ordered list of rotation participants.

use std::collections::HashSet;

use crate::domain::foundation::ValidationError;

/// One line of the published rotation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    /// 1-based position in the rotation.
    pub position: usize,
    pub name: String,
}

/// Ordered, immutable list of participants.
///
/// # Invariants
///
/// - at least one participant
/// - no blank names
/// - names are unique, compared case-insensitively
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    names: Vec<String>,
}

impl Roster {
    /// Builds a roster, trimming each name.
    pub fn new<I, S>(names: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<String> = names
            .into_iter()
            .map(|n| n.as_ref().trim().to_string())
            .collect();

        if names.is_empty() {
            return Err(ValidationError::empty_field("roster"));
        }

        let mut seen = HashSet::new();
        for name in &names {
            if name.is_empty() {
                return Err(ValidationError::empty_field("roster entry"));
            }
            if !seen.insert(name.to_lowercase()) {
                return Err(ValidationError::invalid_format(
                    "roster",
                    format!("duplicate name '{}'", name),
                ));
            }
        }

        Ok(Self { names })
    }

    /// Parses a comma-separated list such as `"Ana, Bruno, Caio"`.
    pub fn from_csv(csv: &str) -> Result<Self, ValidationError> {
        if csv.trim().is_empty() {
            return Err(ValidationError::empty_field("roster"));
        }
        Self::new(csv.split(','))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Name at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Case-insensitive exact lookup of a participant's index.
    pub fn position_of(&self, name: &str) -> Option<usize> {
        let wanted = name.trim().to_lowercase();
        self.names.iter().position(|n| n.to_lowercase() == wanted)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Rotation order with 1-based positions.
    pub fn entries(&self) -> Vec<RosterEntry> {
        self.names
            .iter()
            .enumerate()
            .map(|(i, name)| RosterEntry {
                position: i + 1,
                name: name.clone(),
            })
            .collect()
    }

    /// Name at `index`; callers hold an index already checked against this roster.
    pub(crate) fn name_at(&self, index: usize) -> &str {
        &self.names[index % self.names.len()]
    }
}
