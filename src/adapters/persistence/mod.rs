//! Persistence adapters.

pub mod tag_store_json;

pub use tag_store_json::JsonTagStore;
