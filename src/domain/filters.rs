//! Name filters declared by format writers
//!
//! A writer advertises the formats it produces as a list of
//! `(label, patterns)` entries, e.g. `("Json files", ["*.json"])`. The
//! resolver uses two queries on these sets:
//!
//! - label equality (case-insensitive) for an explicit format hint
//! - substring containment (case-insensitive) of the target suffix in the
//!   raw pattern text
//!
//! The patterns are never parsed as globs. `"*.json"` matches the suffix
//! `"json"` and also `"js"` or `"on"`.

use std::fmt;

/// One `(label, patterns)` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameFilterEntry {
    label: String,
    patterns: Vec<String>,
}

impl NameFilterEntry {
    /// Creates a new entry
    pub fn new<I, S>(label: impl Into<String>, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            label: label.into(),
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }

    /// Human-readable format label
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether the label equals `label`, ignoring case
    pub fn has_label(&self, label: &str) -> bool {
        self.label.to_lowercase() == label.to_lowercase()
    }

    /// Whether any pattern contains `needle`, ignoring case
    pub fn pattern_contains(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.patterns
            .iter()
            .any(|pattern| pattern.to_lowercase().contains(&needle))
    }

    fn validate(&self) -> Result<(), String> {
        if self.label.trim().is_empty() {
            return Err("filter label cannot be empty".to_string());
        }
        if self.patterns.is_empty() {
            return Err(format!("filter '{}' declares no patterns", self.label));
        }
        if self.patterns.iter().any(|p| p.is_empty()) {
            return Err(format!("filter '{}' has an empty pattern", self.label));
        }
        Ok(())
    }
}

/// Renders as `Json files (*.json)`
impl fmt::Display for NameFilterEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label, self.patterns.join(" "))
    }
}

/// Ordered set of filter entries declared by one writer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameFilterSet {
    entries: Vec<NameFilterEntry>,
}

impl NameFilterSet {
    /// Creates an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry, builder style
    pub fn with_entry<I, S>(mut self, label: impl Into<String>, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries.push(NameFilterEntry::new(label, patterns));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &NameFilterEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry whose label equals `label`, ignoring case
    pub fn find_label(&self, label: &str) -> Option<&NameFilterEntry> {
        self.entries.iter().find(|e| e.has_label(label))
    }

    /// First entry with a pattern containing `suffix`, ignoring case
    pub fn find_suffix(&self, suffix: &str) -> Option<&NameFilterEntry> {
        self.entries.iter().find(|e| e.pattern_contains(suffix))
    }

    /// Checks the set is usable for resolution
    ///
    /// # Errors
    ///
    /// Returns a description of the first problem found: no entries, an empty
    /// label, an entry without patterns, or an empty pattern.
    pub fn validate(&self) -> Result<(), String> {
        if self.entries.is_empty() {
            return Err("no name filters declared".to_string());
        }
        self.entries.iter().try_for_each(NameFilterEntry::validate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json_filters() -> NameFilterSet {
        NameFilterSet::new().with_entry("Json files", ["*.json"])
    }

    #[test]
    fn test_label_match_is_case_insensitive_and_exact() {
        let filters = json_filters();
        assert!(filters.find_label("Json files").is_some());
        assert!(filters.find_label("JSON FILES").is_some());
        assert!(filters.find_label("Json").is_none());
        assert!(filters.find_label("Json files (*.json)").is_none());
    }

    #[test]
    fn test_suffix_is_substring_of_pattern() {
        let filters = json_filters();
        assert!(filters.find_suffix("json").is_some());
        assert!(filters.find_suffix("JSON").is_some());
        assert!(filters.find_suffix("js").is_some());
        assert!(filters.find_suffix("lua").is_none());
    }

    #[test]
    fn test_empty_suffix_matches_everything() {
        assert!(json_filters().find_suffix("").is_some());
    }

    #[test]
    fn test_find_returns_matching_entry() {
        let filters = NameFilterSet::new()
            .with_entry("Lua files", ["*.lua"])
            .with_entry("Json files", ["*.json", "*.js"]);
        assert_eq!(filters.find_suffix("js").map(|e| e.label()), Some("Json files"));
        assert_eq!(
            filters.find_label("lua FILES").map(|e| e.label()),
            Some("Lua files")
        );
    }

    #[test]
    fn test_display() {
        let entry = NameFilterEntry::new("Json files", ["*.json", "*.js"]);
        assert_eq!(entry.to_string(), "Json files (*.json *.js)");
    }

    #[test]
    fn test_validate() {
        assert!(json_filters().validate().is_ok());
        assert!(NameFilterSet::new().validate().is_err());
        assert!(NameFilterSet::new()
            .with_entry("", ["*.x"])
            .validate()
            .is_err());
        assert!(NameFilterSet::new()
            .with_entry("X files", Vec::<String>::new())
            .validate()
            .is_err());
        assert!(NameFilterSet::new()
            .with_entry("X files", ["*.x", ""])
            .validate()
            .is_err());
    }
}
