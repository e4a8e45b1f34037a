//! Infrastructure adapters. Implement outbound ports.
//!
//! Gemini, Apify, Twilio, filesystem. Map errors to DomainError.

pub mod ai;
pub mod directory;
pub mod persistence;
pub mod sms;
pub mod social;
pub mod ui;
