//! Content model matching the nested mapping the frontend renders:
//! section -> language -> field -> text.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Site language. The site is strictly bilingual; anything else is rejected
/// at the API edge.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Pt,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Pt => "pt",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "en" => Some(Language::En),
            "pt" => Some(Language::Pt),
            _ => None,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-section content, one field map per language.
///
/// Field parity between `en` and `pt` is a soft invariant: the snapshot
/// reports whatever keys exist for each language and the editor renders them
/// independently, so the two maps may diverge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SectionContent {
    #[serde(default)]
    pub en: BTreeMap<String, String>,
    #[serde(default)]
    pub pt: BTreeMap<String, String>,
}

impl SectionContent {
    pub fn fields_mut(&mut self, language: Language) -> &mut BTreeMap<String, String> {
        match language {
            Language::En => &mut self.en,
            Language::Pt => &mut self.pt,
        }
    }
}

/// The full current content mapping, keyed by section. This is the single
/// live copy of what the site shows; serialized exactly as the frontend
/// consumes it: `{"about": {"en": {"bio": "..."}, "pt": {...}}}`.
pub type ContentSnapshot = BTreeMap<String, SectionContent>;

/// Request body for `PUT /api/admin/content` — a single-field update.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateContentRequest {
    pub section: String,
    pub language: String,
    pub field: String,
    pub value: String,
}
