//! Partition a selection of contacts into tone groups.

use super::entities::{Contact, ToneGroup};

/// Group contacts by exact tone label, keeping the order in which each label is first seen.
///
/// Members keep their relative order from `contacts`, so the output is deterministic for a given input.
pub fn group_by_tone(contacts: &[Contact]) -> Vec<ToneGroup> {
    let mut groups: Vec<ToneGroup> = Vec::new();
    for contact in contacts {
        match groups.iter_mut().find(|g| g.label == contact.tone) {
            Some(group) => group.members.push(contact.clone()),
            None => groups.push(ToneGroup {
                label: contact.tone.clone(),
                members: vec![contact.clone()],
            }),
        }
    }
    groups
}
