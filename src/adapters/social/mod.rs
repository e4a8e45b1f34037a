//! Social profile adapters.

pub mod apify;

pub use apify::ApifyBioFetcher;
