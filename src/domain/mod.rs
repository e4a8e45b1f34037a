//! Core domain layer. No external I/O dependencies.
//!
//! Entities and business rules live here. Dependencies flow inward.

pub mod entities;
pub mod errors;
pub mod grouping;
pub mod session;

pub use entities::{
    AccessStatus, Contact, DispatchReport, GroupOutcome, RewrittenMessage, TagMap, ToneCatalog,
    ToneGroup, ToneLabel,
};
pub use errors::DomainError;
pub use grouping::group_by_tone;
pub use session::Session;
