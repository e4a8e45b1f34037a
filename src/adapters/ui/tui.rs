//! Implements InputPort. Inquire-based interactive menu.
//!
//! Draft editing, recipient selection, tone tagging, dispatch and the social starter flow.
//! Each action runs to completion before the menu is shown again, so a dispatch can't be re-entered.

use crate::domain::{
    AccessStatus, Contact, DispatchReport, DomainError, Session, ToneCatalog, ToneLabel,
};
use crate::ports::InputPort;
use crate::usecases::{DirectoryService, DispatchService, StarterService};
use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use inquire::ui::{Color, RenderConfig, Styled};
use inquire::{Confirm, InquireError, MultiSelect, Select, Text};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Applies the prompt theme globally. Call once before the first prompt.
pub fn apply_theme() {
    let config = RenderConfig::default_colored()
        .with_prompt_prefix(Styled::new("›").with_fg(Color::LightCyan))
        .with_highlighted_option_prefix(Styled::new("▸").with_fg(Color::LightMagenta));
    inquire::set_global_render_config(config);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuItem {
    EditDraft,
    SelectRecipients,
    AssignTone,
    Dispatch,
    Starter,
    Reload,
    Exit,
}

struct MenuEntry {
    item: MenuItem,
    label: String,
}

impl fmt::Display for MenuEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

fn entry(item: MenuItem, label: impl Into<String>) -> MenuEntry {
    MenuEntry {
        item,
        label: label.into(),
    }
}

/// Main menu for the current state. Contact actions are hidden while access is denied.
fn menu(session: &Session, access: AccessStatus, starter_enabled: bool) -> Vec<MenuEntry> {
    let mut items = Vec::new();
    if session.draft().trim().is_empty() {
        items.push(entry(MenuItem::EditDraft, "Write draft"));
    } else {
        items.push(entry(
            MenuItem::EditDraft,
            format!("Edit draft ({} chars)", session.draft().chars().count()),
        ));
    }
    if access == AccessStatus::Granted {
        items.push(entry(
            MenuItem::SelectRecipients,
            format!("Select recipients ({} selected)", session.selected_count()),
        ));
        items.push(entry(MenuItem::AssignTone, "Assign tone"));
    }
    let dispatch_label = match session.selected_count() {
        0 => "Select a contact".to_string(),
        n => format!("Rephrase for {} recipients", n),
    };
    items.push(entry(MenuItem::Dispatch, dispatch_label));
    if starter_enabled {
        items.push(entry(MenuItem::Starter, "Conversation starter from a profile"));
    }
    items.push(entry(MenuItem::Reload, "Reload contacts"));
    items.push(entry(MenuItem::Exit, "Exit"));
    items
}

#[derive(Clone)]
struct ContactOption {
    id: String,
    label: String,
}

impl fmt::Display for ContactOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

fn contact_line(contact: &Contact) -> String {
    let phone = if contact.primary_phone().is_some() {
        ""
    } else {
        " (no phone)"
    };
    format!("{} [{}]{}", contact.display_name, contact.tone, phone)
}

fn contact_options(contacts: &[&Contact]) -> Vec<ContactOption> {
    contacts
        .iter()
        .map(|c| ContactOption {
            id: c.id.clone(),
            label: contact_line(c),
        })
        .collect()
}

/// Full selection after a multi-select over `shown`: picks outside the search are kept.
fn merged_selection(
    session: &Session,
    shown: &[ContactOption],
    chosen: &[ContactOption],
) -> Vec<String> {
    session
        .selected_contacts()
        .into_iter()
        .map(|c| c.id)
        .filter(|id| !shown.iter().any(|o| &o.id == id))
        .chain(chosen.iter().map(|o| o.id.clone()))
        .collect()
}

struct ToneOption {
    label: ToneLabel,
}

impl fmt::Display for ToneOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.label.is_unset() {
            write!(f, "{} (clear)", self.label)
        } else {
            write!(f, "{}", self.label)
        }
    }
}

/// One line per group, in dispatch order.
fn report_lines(report: &DispatchReport) -> Vec<String> {
    report
        .groups
        .iter()
        .map(|g| {
            if g.sent {
                format!(
                    "✓ {} -> {} recipient(s): {}",
                    g.message.label,
                    g.recipients.len(),
                    g.message.text
                )
            } else {
                format!("- {}: skipped, no phone numbers", g.message.label)
            }
        })
        .collect()
}

/// `Ok(None)` when the user cancels (Esc / Ctrl-C).
fn prompt<T>(result: Result<T, InquireError>) -> Result<Option<T>, DomainError> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(DomainError::Prompt(e.to_string())),
    }
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// TUI adapter. Owns the interactive session.
pub struct TuiInputPort {
    session: Mutex<Session>,
    access: Mutex<AccessStatus>,
    catalog: ToneCatalog,
    contacts_path: PathBuf,
    directory: Arc<DirectoryService>,
    dispatch: Arc<DispatchService>,
    starter: Option<Arc<StarterService>>,
}

impl TuiInputPort {
    pub fn new(
        directory: Arc<DirectoryService>,
        dispatch: Arc<DispatchService>,
        starter: Option<Arc<StarterService>>,
        catalog: ToneCatalog,
        contacts_path: PathBuf,
    ) -> Self {
        Self {
            session: Mutex::new(Session::default()),
            access: Mutex::new(AccessStatus::Denied),
            catalog,
            contacts_path,
            directory,
            dispatch,
            starter,
        }
    }

    /// Reload contacts and tags, keeping the current draft.
    async fn reload(&self) -> Result<(), DomainError> {
        let load = self.directory.load().await?;
        let mut session = self.session.lock().await;
        let draft = session.draft().to_string();
        *session = Session::new(load.contacts, load.tags, self.catalog.clone());
        session.set_draft(draft);
        *self.access.lock().await = load.status;

        if load.status == AccessStatus::Denied {
            println!(
                "  Contact access unavailable. Export your address book to {} \
                 (columns: id,name,phone_numbers,avatar) and choose \"Reload contacts\".",
                self.contacts_path.display()
            );
        } else {
            println!("  {} contacts loaded.", session.contacts().len());
        }
        Ok(())
    }

    async fn edit_draft(&self) -> Result<(), DomainError> {
        let mut session = self.session.lock().await;
        let current = session.draft().to_string();
        let Some(text) = prompt(
            Text::new("Original message:")
                .with_placeholder("Type your draft...")
                .with_initial_value(&current)
                .prompt(),
        )?
        else {
            return Ok(());
        };
        session.set_draft(text);
        Ok(())
    }

    async fn select_recipients(&self) -> Result<(), DomainError> {
        let Some(query) = prompt(Text::new("Search contacts (empty for all):").prompt())? else {
            return Ok(());
        };
        let mut session = self.session.lock().await;
        let options = contact_options(&session.search(&query));
        if options.is_empty() {
            println!("  No contacts match \"{}\".", query);
            return Ok(());
        }
        let defaults: Vec<usize> = options
            .iter()
            .enumerate()
            .filter(|(_, o)| session.is_selected(&o.id))
            .map(|(i, _)| i)
            .collect();

        let Some(chosen) = prompt(
            MultiSelect::new("Toggle recipients:", options.clone())
                .with_default(&defaults)
                .prompt(),
        )?
        else {
            return Ok(());
        };

        let selection = merged_selection(&session, &options, &chosen);
        session.set_selection(selection);
        println!("  {} selected", session.selected_count());
        Ok(())
    }

    async fn assign_tone(&self) -> Result<(), DomainError> {
        let Some(query) = prompt(Text::new("Search contacts (empty for all):").prompt())? else {
            return Ok(());
        };
        let mut session = self.session.lock().await;
        let options = contact_options(&session.search(&query));
        if options.is_empty() {
            println!("  No contacts match \"{}\".", query);
            return Ok(());
        }
        let Some(contact) = prompt(Select::new("Contact:", options).prompt())? else {
            return Ok(());
        };

        let current = session
            .contacts()
            .iter()
            .find(|c| c.id == contact.id)
            .map(|c| c.tone.clone())
            .unwrap_or_default();
        let tones: Vec<ToneOption> = self
            .catalog
            .labels()
            .iter()
            .cloned()
            .chain(std::iter::once(ToneLabel::unset()))
            .map(|label| ToneOption { label })
            .collect();
        let cursor = tones.iter().position(|t| t.label == current).unwrap_or(0);

        let Some(tone) = prompt(
            Select::new("How should the message sound for this contact?", tones)
                .with_starting_cursor(cursor)
                .prompt(),
        )?
        else {
            return Ok(());
        };

        self.save_tone(&mut session, &contact.id, tone.label).await
    }

    /// Persist first; the session only shows the tone once it is on disk.
    async fn save_tone(
        &self,
        session: &mut Session,
        id: &str,
        label: ToneLabel,
    ) -> Result<(), DomainError> {
        let tags = session.tags_with_tone(id, &label)?;
        self.directory.save_tags(&tags).await?;
        session.assign_tone(id, label.clone())?;
        info!(contact = %id, tone = %label, "tone assigned");
        Ok(())
    }

    /// First load. A failure is reported and the menu starts with an empty directory.
    async fn initial_load(&self) {
        if let Err(e) = self.reload().await {
            warn!(error = %e, "initial contact load failed");
            println!("  ✗ {}", e);
        }
    }

    async fn run_dispatch(&self) -> Result<(), DomainError> {
        let (draft, selected) = {
            let session = self.session.lock().await;
            if !session.can_dispatch() {
                println!("  Write a draft and select at least one contact first.");
                return Ok(());
            }
            (session.draft().to_string(), session.selected_contacts())
        };

        let question = format!("Rephrase and send to {} recipient(s)?", selected.len());
        match prompt(Confirm::new(&question).with_default(true).prompt())? {
            Some(true) => {}
            _ => return Ok(()),
        }

        let pb = spinner("Rephrasing and sending...");
        let result = self.dispatch.dispatch(&draft, &selected).await;
        pb.finish_and_clear();

        let report = result?;
        for line in report_lines(&report) {
            println!("  {}", line);
        }
        Ok(())
    }

    async fn run_starter(&self) -> Result<(), DomainError> {
        let Some(starter) = &self.starter else {
            println!("  Set TONE_RELAY_APIFY_TOKEN to enable profile scraping.");
            return Ok(());
        };
        let Some(handle) = prompt(
            Text::new("Profile handle:")
                .with_placeholder("@username")
                .prompt(),
        )?
        else {
            return Ok(());
        };

        let pb = spinner("Scraping profile...");
        let result = starter.starter_for(&handle).await;
        pb.finish_and_clear();

        match result? {
            Some(line) => println!("\n  {}\n", line),
            None => println!("  No biography found for that profile."),
        }
        Ok(())
    }
}

#[async_trait]
impl InputPort for TuiInputPort {
    async fn run(&self) -> Result<(), DomainError> {
        self.initial_load().await;

        loop {
            let entries = {
                let session = self.session.lock().await;
                let access = *self.access.lock().await;
                menu(&session, access, self.starter.is_some())
            };
            let Some(choice) = prompt(Select::new("What next?", entries).prompt())? else {
                break;
            };

            let result = match choice.item {
                MenuItem::EditDraft => self.edit_draft().await,
                MenuItem::SelectRecipients => self.select_recipients().await,
                MenuItem::AssignTone => self.assign_tone().await,
                MenuItem::Dispatch => self.run_dispatch().await,
                MenuItem::Starter => self.run_starter().await,
                MenuItem::Reload => self.reload().await,
                MenuItem::Exit => break,
            };
            if let Err(e) = result {
                warn!(error = %e, "action failed");
                println!("  ✗ {}", e);
            }
        }
        Ok(())
    }
}
