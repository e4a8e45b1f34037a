//! Implements ContactDirectoryPort over a CSV export of the address book.
//!
//! Columns: `id,name,phone_numbers,avatar`. `phone_numbers` is an ordered, `|`-separated list.

use crate::domain::{AccessStatus, Contact, DomainError, ToneLabel};
use crate::ports::ContactDirectoryPort;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

const PHONE_SEPARATOR: char = '|';

#[derive(Debug, Deserialize)]
struct ContactRow {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    phone_numbers: String,
    #[serde(default)]
    avatar: Option<String>,
}

impl ContactRow {
    /// Rows without a name are dropped; rows without an id get one derived from name and numbers.
    fn into_contact(self) -> Option<Contact> {
        let name = self.name.trim();
        if name.is_empty() {
            return None;
        }
        let phone_numbers: Vec<String> = self
            .phone_numbers
            .split(PHONE_SEPARATOR)
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
        let id = match self.id.trim() {
            "" => derived_id(name, &phone_numbers),
            id => id.to_string(),
        };
        Some(Contact {
            id,
            display_name: name.to_string(),
            phone_numbers,
            avatar: self.avatar.filter(|a| !a.trim().is_empty()),
            tone: ToneLabel::unset(),
        })
    }
}

/// Name-based UUID so the same row maps to the same id on every load.
fn derived_id(name: &str, phone_numbers: &[String]) -> String {
    let key = format!("{}\n{}", name, phone_numbers.join("|"));
    uuid::Uuid::new_v5(&uuid::Uuid::NAMESPACE_OID, key.as_bytes()).to_string()
}

/// Parse directory CSV into contacts sorted by display name.
pub fn parse_contacts(raw: &str) -> Result<Vec<Contact>, csv::Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(raw.as_bytes());

    let mut contacts = Vec::new();
    for row in rdr.deserialize::<ContactRow>() {
        if let Some(contact) = row?.into_contact() {
            contacts.push(contact);
        }
    }
    contacts.sort_by(|a, b| {
        a.display_name
            .to_lowercase()
            .cmp(&b.display_name.to_lowercase())
    });
    Ok(contacts)
}

/// File-backed contact directory. Access is granted when the file is readable.
pub struct CsvContactDirectory {
    path: PathBuf,
}

impl CsvContactDirectory {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait::async_trait]
impl ContactDirectoryPort for CsvContactDirectory {
    async fn request_access(&self) -> AccessStatus {
        match fs::metadata(&self.path).await {
            Ok(meta) if meta.is_file() => AccessStatus::Granted,
            _ => {
                debug!(path = %self.path.display(), "contact file not readable");
                AccessStatus::Denied
            }
        }
    }

    async fn list_contacts(&self) -> Result<Vec<Contact>, DomainError> {
        let raw = fs::read_to_string(&self.path)
            .await
            .map_err(|e| DomainError::Directory(format!("read {}: {}", self.path.display(), e)))?;
        let contacts =
            parse_contacts(&raw).map_err(|e| DomainError::Directory(format!("parse: {}", e)))?;
        info!(
            path = %self.path.display(),
            count = contacts.len(),
            "contacts read"
        );
        Ok(contacts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_contacts_basic() {
        let raw = "id,name,phone_numbers,avatar\n\
                   2,grace hopper,+1 555 0100|+1 555 0101,\n\
                   1,Ada Lovelace,+44 20 7946 0000,https://example.com/ada.png\n";
        let contacts = parse_contacts(raw).unwrap();

        assert_eq!(contacts.len(), 2);
        assert_eq!(contacts[0].display_name, "Ada Lovelace");
        assert_eq!(
            contacts[0].avatar.as_deref(),
            Some("https://example.com/ada.png")
        );
        assert_eq!(
            contacts[1].phone_numbers,
            vec!["+1 555 0100", "+1 555 0101"]
        );
        assert!(contacts.iter().all(|c| c.tone.is_unset()));
        assert_eq!(contacts[1].avatar, None);
    }

    #[test]
    fn test_parse_contacts_drops_nameless_and_fills_missing_ids() {
        let raw = "id,name,phone_numbers,avatar\n\
                   9,,+1,\n\
                   ,Bob,,\n";
        let contacts = parse_contacts(raw).unwrap();

        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].display_name, "Bob");
        assert!(!contacts[0].id.is_empty());
        assert!(contacts[0].phone_numbers.is_empty());
    }

    #[test]
    fn test_missing_id_is_stable_across_loads() {
        let raw = "id,name,phone_numbers,avatar\n\
                   ,Bob,+1,\n\
                   ,Bob,+2,\n";
        let first = parse_contacts(raw).unwrap();
        let second = parse_contacts(raw).unwrap();

        assert_eq!(first[0].id, second[0].id);
        assert_eq!(first[1].id, second[1].id);
        assert_ne!(first[0].id, first[1].id);
    }

    #[tokio::test]
    async fn test_missing_file_denies_access() {
        let dir = tempfile::tempdir().unwrap();
        let directory = CsvContactDirectory::new(dir.path().join("contacts.csv"));
        assert_eq!(directory.request_access().await, AccessStatus::Denied);
    }

    #[tokio::test]
    async fn test_list_contacts_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contacts.csv");
        fs::write(&path, "id,name,phone_numbers,avatar\n1,Ada,+1,\n")
            .await
            .unwrap();
        let directory = CsvContactDirectory::new(&path);

        assert_eq!(directory.request_access().await, AccessStatus::Granted);
        let contacts = directory.list_contacts().await.unwrap();
        assert_eq!(contacts[0].id, "1");
        assert_eq!(contacts[0].primary_phone(), Some("+1"));
    }
}
