//! Domain entities. Pure data structures for the core business.
//!
//! No CSV/HTTP/filesystem types here; adapters map into these.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Tone profile ("demographic") assigned to a contact. Drives how the draft is rephrased.
///
/// The set of valid labels is configuration (see [`ToneCatalog`]), so this is a
/// newtype over the label text rather than a closed enum.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToneLabel(String);

impl ToneLabel {
    /// Sentinel for contacts nobody has tagged yet.
    pub const UNSET: &'static str = "Unknown";

    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn unset() -> Self {
        Self(Self::UNSET.to_string())
    }

    pub fn is_unset(&self) -> bool {
        self.0 == Self::UNSET
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ToneLabel {
    fn default() -> Self {
        Self::unset()
    }
}

impl fmt::Display for ToneLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Persisted tags: contact id -> tone label. Never contains the unset sentinel.
pub type TagMap = BTreeMap<String, ToneLabel>;

/// The tone labels a user may assign. Order is presentation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToneCatalog {
    labels: Vec<ToneLabel>,
}

impl ToneCatalog {
    pub const DEFAULT_LABELS: [&'static str; 6] = [
        "Professional",
        "Casual",
        "Formal",
        "Technical",
        "Polite",
        "Humorous",
    ];

    /// Build a catalog from raw labels. Blank entries, duplicates and the sentinel are dropped.
    /// Falls back to the default labels if nothing usable remains.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<ToneLabel> = Vec::new();
        for raw in labels {
            let trimmed = raw.as_ref().trim();
            if trimmed.is_empty() || trimmed == ToneLabel::UNSET {
                continue;
            }
            let label = ToneLabel::new(trimmed);
            if !out.contains(&label) {
                out.push(label);
            }
        }
        if out.is_empty() {
            return Self::default();
        }
        Self { labels: out }
    }

    /// Parse a comma-separated list (e.g. from `TONE_RELAY_TONES`).
    pub fn parse(list: &str) -> Self {
        Self::new(list.split(','))
    }

    pub fn labels(&self) -> &[ToneLabel] {
        &self.labels
    }

    pub fn contains(&self, label: &ToneLabel) -> bool {
        self.labels.contains(label)
    }
}

impl Default for ToneCatalog {
    fn default() -> Self {
        Self {
            labels: Self::DEFAULT_LABELS.iter().map(|l| ToneLabel::new(*l)).collect(),
        }
    }
}

/// A contact from the directory, with its tone overlaid from the tag store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub display_name: String,
    /// Ordered as the directory lists them; only the first is used for sending.
    pub phone_numbers: Vec<String>,
    pub avatar: Option<String>,
    #[serde(default)]
    pub tone: ToneLabel,
}

impl Contact {
    /// First listed phone number, trimmed. `None` when missing or blank; later numbers are not tried.
    pub fn primary_phone(&self) -> Option<&str> {
        self.phone_numbers
            .first()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
    }
}

/// Result of asking for access to a platform capability (contacts, SMS).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessStatus {
    Granted,
    Denied,
}

/// Selected contacts sharing one tone label. Built fresh for each dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToneGroup {
    pub label: ToneLabel,
    pub members: Vec<Contact>,
}

impl ToneGroup {
    /// Phone numbers to send to: each member's first number; members without one are skipped.
    pub fn recipients(&self) -> Vec<String> {
        self.members
            .iter()
            .filter_map(|c| c.primary_phone().map(str::to_string))
            .collect()
    }
}

/// The draft rewritten for one tone label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenMessage {
    pub label: ToneLabel,
    pub text: String,
}

/// What happened to one tone group during a dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupOutcome {
    pub message: RewrittenMessage,
    pub recipients: Vec<String>,
    /// False when the group had no resolvable phone number and nothing was sent.
    pub sent: bool,
}

/// Summary of a completed dispatch, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub groups: Vec<GroupOutcome>,
}

impl DispatchReport {
    pub fn sends(&self) -> usize {
        self.groups.iter().filter(|g| g.sent).count()
    }

    pub fn recipients(&self) -> usize {
        self.groups
            .iter()
            .filter(|g| g.sent)
            .map(|g| g.recipients.len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_parse_trims_and_dedups() {
        let catalog = ToneCatalog::parse(" Formal, Casual ,,Formal,Unknown");
        assert_eq!(
            catalog.labels(),
            &[ToneLabel::new("Formal"), ToneLabel::new("Casual")]
        );
    }

    #[test]
    fn test_catalog_empty_falls_back_to_default() {
        let catalog = ToneCatalog::parse(" , ");
        assert_eq!(catalog, ToneCatalog::default());
        assert_eq!(catalog.labels().len(), 6);
    }

    #[test]
    fn test_blank_first_phone_counts_as_missing() {
        let contact = Contact {
            id: "1".into(),
            display_name: "Ada".into(),
            phone_numbers: vec!["  ".into(), "+100".into()],
            avatar: None,
            tone: ToneLabel::unset(),
        };
        assert_eq!(contact.primary_phone(), None);
    }

    #[test]
    fn test_tone_label_serializes_as_plain_string() {
        let json = serde_json::to_string(&ToneLabel::new("Casual")).unwrap();
        assert_eq!(json, "\"Casual\"");
    }
}
