//! drive_lister - read-only, folder-scoped access to Google Drive.
//!
//! This library provides functionality to:
//! - Authenticate with a service account key, optionally impersonating a user
//! - Resolve a target folder by id, by name, or default to the storage root
//! - List files in that folder, optionally filtered by mime type
//! - Fetch metadata for a single file by id
//!
//! # Example
//!
//! ```no_run
//! use drive_lister::{DriveConfig, FolderLister};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let key = std::fs::read_to_string("service-account.json")?;
//!     let config = DriveConfig::new(key).with_folder_name("Reports");
//!     let lister = FolderLister::new(&config)?;
//!
//!     for file in lister.list_files(Some("application/pdf")).await? {
//!         println!("{}", file);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod query;

// Re-exports for convenience
pub use auth::Authenticator;
pub use client::FolderLister;
pub use config::{DriveConfig, FolderTarget};
pub use error::{DriveError, Result};
pub use models::FileMetadata;
