use serde::{Deserialize, Serialize};

/// A single weighted entry of the checklist.
///
/// Example YAML:
/// ```yaml
/// - title: "Seizure"
///   description: "Recent onset. Exclude metabolic, infectious or drug causes."
///   score: 8
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SymptomDescriptor {
    /// Short label shown in lists
    pub title: String,

    /// Explanatory text shown when the entry is expanded
    #[serde(default)]
    pub description: String,

    /// Points added to the total when the entry is selected
    pub score: u32,
}

impl SymptomDescriptor {
    pub fn new(title: impl Into<String>, description: impl Into<String>, score: u32) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            score,
        }
    }
}

/// Ordered, read-only list of symptom descriptors.
///
/// Positions are significant: index `i` of a selection refers to entry `i` here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checklist {
    items: Vec<SymptomDescriptor>,
}

impl Default for Checklist {
    /// The built-in SELENA-SLEDAI descriptor table
    fn default() -> Self {
        Self::new(super::builtin::sledai_descriptors())
    }
}

impl Checklist {
    pub fn new(items: Vec<SymptomDescriptor>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SymptomDescriptor> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SymptomDescriptor> {
        self.items.iter()
    }

    pub fn items(&self) -> &[SymptomDescriptor] {
        &self.items
    }

    /// Point values in checklist order
    pub fn weights(&self) -> Vec<u32> {
        self.items.iter().map(|item| item.score).collect()
    }

    /// Highest score reachable with every entry selected
    pub fn max_score(&self) -> u32 {
        self.items.iter().map(|item| item.score).sum()
    }
}

impl<'a> IntoIterator for &'a Checklist {
    type Item = &'a SymptomDescriptor;
    type IntoIter = std::slice::Iter<'a, SymptomDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
