//! Contact directory adapters.

pub mod csv_directory;

pub use csv_directory::CsvContactDirectory;
