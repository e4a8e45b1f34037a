//! Directory loading: request contact access -> list contacts -> overlay saved tones.
//!
//! Denied access degrades to an empty directory; it is never an error.

use crate::domain::{AccessStatus, Contact, DomainError, TagMap};
use crate::ports::{ContactDirectoryPort, TagStorePort};
use std::sync::Arc;
use tracing::{info, warn};

/// Contacts ready for a session, plus the tag map they were overlaid with.
#[derive(Debug, Clone)]
pub struct DirectoryLoad {
    pub status: AccessStatus,
    pub contacts: Vec<Contact>,
    pub tags: TagMap,
}

pub struct DirectoryService {
    directory: Arc<dyn ContactDirectoryPort>,
    tags: Arc<dyn TagStorePort>,
}

impl DirectoryService {
    pub fn new(directory: Arc<dyn ContactDirectoryPort>, tags: Arc<dyn TagStorePort>) -> Self {
        Self { directory, tags }
    }

    pub async fn load(&self) -> Result<DirectoryLoad, DomainError> {
        let tags = self.tags.load().await?;
        let status = self.directory.request_access().await;
        if status == AccessStatus::Denied {
            warn!("contact access denied; continuing with an empty directory");
            return Ok(DirectoryLoad {
                status,
                contacts: Vec::new(),
                tags,
            });
        }

        let mut contacts = self.directory.list_contacts().await?;
        let mut tagged = 0usize;
        for contact in &mut contacts {
            if let Some(label) = tags.get(&contact.id) {
                contact.tone = label.clone();
                tagged += 1;
            }
        }
        info!(contacts = contacts.len(), tagged, "directory loaded");

        Ok(DirectoryLoad {
            status,
            contacts,
            tags,
        })
    }

    /// Persist the full tag map after an edit.
    pub async fn save_tags(&self, tags: &TagMap) -> Result<(), DomainError> {
        self.tags.save(tags).await
    }
}
