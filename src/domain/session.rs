//! Interactive session state: the draft, the loaded contacts, the selection and the tag map.
//!
//! All mutation is user driven; derived views (selection, search, groups) are computed on demand.

use super::entities::{Contact, TagMap, ToneCatalog, ToneLabel};
use super::errors::DomainError;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default)]
pub struct Session {
    contacts: Vec<Contact>,
    draft: String,
    selected: BTreeSet<String>,
    tags: TagMap,
    catalog: ToneCatalog,
}

impl Session {
    /// Start a session over already tone-overlaid contacts and the tag map they came from.
    pub fn new(contacts: Vec<Contact>, tags: TagMap, catalog: ToneCatalog) -> Self {
        Self {
            contacts,
            draft: String::new(),
            selected: BTreeSet::new(),
            tags,
            catalog,
        }
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn catalog(&self) -> &ToneCatalog {
        &self.catalog
    }

    pub fn tags(&self) -> &TagMap {
        &self.tags
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Flip selection for `id`. Returns whether the contact is now selected.
    /// Ids not in the directory are ignored.
    pub fn toggle_selection(&mut self, id: &str) -> bool {
        if !self.contacts.iter().any(|c| c.id == id) {
            return false;
        }
        if self.selected.remove(id) {
            false
        } else {
            self.selected.insert(id.to_string());
            true
        }
    }

    /// Replace the whole selection. Unknown ids are dropped.
    pub fn set_selection<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected = ids
            .into_iter()
            .map(Into::into)
            .filter(|id| self.contacts.iter().any(|c| &c.id == id))
            .collect();
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    /// Number of selected contacts, including those without a phone number.
    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// Selected contacts in directory order.
    pub fn selected_contacts(&self) -> Vec<Contact> {
        self.contacts
            .iter()
            .filter(|c| self.selected.contains(&c.id))
            .cloned()
            .collect()
    }

    /// Case-insensitive substring match on display name.
    pub fn search(&self, query: &str) -> Vec<&Contact> {
        let needle = query.trim().to_lowercase();
        self.contacts
            .iter()
            .filter(|c| c.display_name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Dispatch needs a non-empty draft and at least one selected contact.
    pub fn can_dispatch(&self) -> bool {
        !self.draft.trim().is_empty() && !self.selected.is_empty()
    }

    /// The tag map that assigning `label` to `id` would produce. The session is not touched,
    /// so callers can persist first and apply with [`Session::assign_tone`] once that succeeds.
    ///
    /// Assigning the unset sentinel removes the contact's entry.
    pub fn tags_with_tone(&self, id: &str, label: &ToneLabel) -> Result<TagMap, DomainError> {
        if !label.is_unset() && !self.catalog.contains(label) {
            return Err(DomainError::Validation(format!(
                "tone '{}' is not one of the configured tones",
                label
            )));
        }
        if !self.contacts.iter().any(|c| c.id == id) {
            return Err(DomainError::Validation(format!(
                "no contact with id '{}'",
                id
            )));
        }

        let mut tags = self.tags.clone();
        if label.is_unset() {
            tags.remove(id);
        } else {
            tags.insert(id.to_string(), label.clone());
        }
        Ok(tags)
    }

    /// Assign a tone to a contact and return the full tag map to persist.
    pub fn assign_tone(&mut self, id: &str, label: ToneLabel) -> Result<&TagMap, DomainError> {
        self.tags = self.tags_with_tone(id, &label)?;
        if let Some(contact) = self.contacts.iter_mut().find(|c| c.id == id) {
            contact.tone = label;
        }
        Ok(&self.tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(id: &str, name: &str, phones: &[&str]) -> Contact {
        Contact {
            id: id.to_string(),
            display_name: name.to_string(),
            phone_numbers: phones.iter().map(|p| p.to_string()).collect(),
            avatar: None,
            tone: ToneLabel::unset(),
        }
    }

    fn session() -> Session {
        Session::new(
            vec![
                contact("1", "Ada Lovelace", &["+100"]),
                contact("2", "Alan Turing", &[]),
                contact("3", "Grace Hopper", &["+300"]),
            ],
            TagMap::new(),
            ToneCatalog::default(),
        )
    }

    #[test]
    fn test_toggle_selection() {
        let mut s = session();
        assert!(s.toggle_selection("1"));
        assert!(s.is_selected("1"));
        assert!(!s.toggle_selection("1"));
        assert!(!s.is_selected("1"));
        assert!(!s.toggle_selection("missing"));
        assert_eq!(s.selected_count(), 0);
    }

    #[test]
    fn test_phoneless_contact_still_counts_as_selected() {
        let mut s = session();
        s.toggle_selection("2");
        s.toggle_selection("3");
        assert_eq!(s.selected_count(), 2);
        let ids: Vec<String> = s.selected_contacts().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["2", "3"]);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let s = session();
        let hits: Vec<&str> = s.search("a").iter().map(|c| c.id.as_str()).collect();
        assert_eq!(hits, vec!["1", "2", "3"]);
        let hits: Vec<&str> = s.search("TUR").iter().map(|c| c.id.as_str()).collect();
        assert_eq!(hits, vec!["2"]);
    }

    #[test]
    fn test_can_dispatch_requires_draft_and_selection() {
        let mut s = session();
        assert!(!s.can_dispatch());
        s.set_draft("   ");
        s.toggle_selection("1");
        assert!(!s.can_dispatch());
        s.set_draft("Dinner on Friday?");
        assert!(s.can_dispatch());
    }

    #[test]
    fn test_assign_tone_updates_contact_and_tags() {
        let mut s = session();
        let tags = s.assign_tone("1", ToneLabel::new("Formal")).unwrap().clone();
        assert_eq!(tags.get("1"), Some(&ToneLabel::new("Formal")));
        assert_eq!(s.contacts()[0].tone, ToneLabel::new("Formal"));

        let tags = s.assign_tone("1", ToneLabel::unset()).unwrap();
        assert!(tags.is_empty());
        assert!(s.contacts()[0].tone.is_unset());
    }

    #[test]
    fn test_assign_tone_rejects_unknown_label_and_contact() {
        let mut s = session();
        assert!(matches!(
            s.assign_tone("1", ToneLabel::new("Sarcastic")),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            s.assign_tone("nope", ToneLabel::new("Formal")),
            Err(DomainError::Validation(_))
        ));
        assert!(s.tags().is_empty());
    }

    #[test]
    fn test_set_selection_drops_unknown_ids() {
        let mut s = session();
        s.set_selection(["1", "zzz", "3"]);
        assert_eq!(s.selected_count(), 2);
    }

    #[test]
    fn test_tags_with_tone_leaves_session_untouched() {
        let s = session();
        let tags = s.tags_with_tone("3", &ToneLabel::new("Polite")).unwrap();
        assert_eq!(tags.get("3"), Some(&ToneLabel::new("Polite")));
        assert!(s.tags().is_empty());
        assert!(s.contacts()[2].tone.is_unset());
    }
}
