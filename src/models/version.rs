//! Version log model.
//!
//! Every successful content update (reverts included) appends exactly one
//! record; records are never mutated or deleted afterwards.

use serde::{Deserialize, Serialize};

use super::Language;

/// An immutable audit entry describing one change to a content field.
///
/// Wire format is snake_case, matching what the history view renders
/// (`old_value`, `new_value`, `timestamp`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionRecord {
    /// Opaque unique id (UUID v4).
    pub id: String,
    pub section: String,
    pub language: Language,
    pub field: String,
    /// Value of the field immediately before the change.
    pub old_value: String,
    /// Value the change wrote.
    pub new_value: String,
    /// Session identity of the editor who made the change.
    pub author: String,
    /// RFC 3339 creation instant.
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_record_wire_format() {
        let record = VersionRecord {
            id: "abc".to_string(),
            section: "about".to_string(),
            language: Language::En,
            field: "bio".to_string(),
            old_value: "A".to_string(),
            new_value: "B".to_string(),
            author: "admin".to_string(),
            timestamp: "2024-01-01T00:00:00+00:00".to_string(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["language"], "en");
        assert_eq!(json["old_value"], "A");
        assert_eq!(json["new_value"], "B");
        assert_eq!(json["author"], "admin");
    }
}
