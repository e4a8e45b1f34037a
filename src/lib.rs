//! tone-relay: one draft, rephrased per contact tone, dispatched as SMS. Hexagonal Architecture.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
