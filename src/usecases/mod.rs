//! Application use cases. Orchestrate domain logic via ports.

pub mod directory_service;
pub mod dispatch_service;
pub mod starter_service;

pub use directory_service::{DirectoryLoad, DirectoryService};
pub use dispatch_service::DispatchService;
pub use starter_service::StarterService;
