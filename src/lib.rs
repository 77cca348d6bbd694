pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod export;
pub mod infrastructure;
pub mod ingest;
pub mod model;
pub mod store;
pub mod tasks;
pub mod viz;

pub use app::SpamScopeApp;
pub use error::ScanError;
