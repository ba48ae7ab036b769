//! Configuration for a folder-scoped lister.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::{DriveError, Result};

/// Map key holding the raw service account JSON payload.
pub const SERVICE_ACCOUNT_KEY: &str = "service_account_key";
/// Map key holding an explicit target folder id.
pub const TARGET_FOLDER_ID: &str = "target_folder_id";
/// Map key holding a target folder name to look up.
pub const TARGET_FOLDER_NAME: &str = "target_folder_name";
/// Map key holding the user to impersonate via domain-wide delegation.
pub const IMPERSONATE_USER: &str = "impersonate_user";

pub const ENV_SERVICE_ACCOUNT_KEY: &str = "GDRIVE_SERVICE_ACCOUNT_KEY";
pub const ENV_TARGET_FOLDER_ID: &str = "GDRIVE_TARGET_FOLDER_ID";
pub const ENV_TARGET_FOLDER_NAME: &str = "GDRIVE_TARGET_FOLDER_NAME";
pub const ENV_IMPERSONATE_USER: &str = "GDRIVE_IMPERSONATE_USER";

/// Which folder a lister targets, before any lookup happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderTarget {
    /// Use this id verbatim.
    Id(String),
    /// Look up the single non-trashed folder with this name.
    Name(String),
    /// The root of the caller's storage.
    Root,
}

/// Settings for [`FolderLister`](crate::FolderLister).
///
/// Optional values that are empty or whitespace-only are treated as unset.
#[derive(Clone, Default)]
pub struct DriveConfig {
    pub service_account_key: String,
    pub target_folder_id: Option<String>,
    pub target_folder_name: Option<String>,
    pub impersonate_user: Option<String>,
}

impl DriveConfig {
    /// Create a config from a raw service account JSON payload.
    pub fn new(service_account_key: impl Into<String>) -> Self {
        Self {
            service_account_key: service_account_key.into(),
            ..Default::default()
        }
    }

    pub fn with_folder_id(mut self, folder_id: impl Into<String>) -> Self {
        self.target_folder_id = Some(folder_id.into());
        self
    }

    pub fn with_folder_name(mut self, folder_name: impl Into<String>) -> Self {
        self.target_folder_name = Some(folder_name.into());
        self
    }

    pub fn with_impersonate_user(mut self, user: impl Into<String>) -> Self {
        self.impersonate_user = Some(user.into());
        self
    }

    /// Build a config from a flat key/value mapping.
    ///
    /// Recognized keys are [`SERVICE_ACCOUNT_KEY`], [`TARGET_FOLDER_ID`],
    /// [`TARGET_FOLDER_NAME`] and [`IMPERSONATE_USER`]; anything else is ignored.
    pub fn from_map(params: &HashMap<String, String>) -> Result<Self> {
        let config = Self {
            service_account_key: params
                .get(SERVICE_ACCOUNT_KEY)
                .cloned()
                .unwrap_or_default(),
            target_folder_id: params.get(TARGET_FOLDER_ID).cloned(),
            target_folder_name: params.get(TARGET_FOLDER_NAME).cloned(),
            impersonate_user: params.get(IMPERSONATE_USER).cloned(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Build a config from `GDRIVE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let config = Self {
            service_account_key: std::env::var(ENV_SERVICE_ACCOUNT_KEY).unwrap_or_default(),
            target_folder_id: std::env::var(ENV_TARGET_FOLDER_ID).ok(),
            target_folder_name: std::env::var(ENV_TARGET_FOLDER_NAME).ok(),
            impersonate_user: std::env::var(ENV_IMPERSONATE_USER).ok(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that a service account key is present.
    pub fn validate(&self) -> Result<()> {
        if is_blank(&self.service_account_key) {
            return Err(DriveError::Configuration(
                "service account key is required".to_string(),
            ));
        }
        Ok(())
    }

    /// The folder policy in priority order: explicit id, then name, then root.
    pub fn folder_target(&self) -> FolderTarget {
        if let Some(id) = non_blank(&self.target_folder_id) {
            return FolderTarget::Id(id.to_string());
        }
        if let Some(name) = non_blank(&self.target_folder_name) {
            return FolderTarget::Name(name.to_string());
        }
        FolderTarget::Root
    }

    /// The delegation subject, if one is configured.
    pub fn impersonate_user(&self) -> Option<&str> {
        non_blank(&self.impersonate_user)
    }
}

impl fmt::Debug for DriveConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriveConfig")
            .field("service_account_key", &"<redacted>")
            .field("target_folder_id", &self.target_folder_id)
            .field("target_folder_name", &self.target_folder_name)
            .field("impersonate_user", &self.impersonate_user)
            .finish()
    }
}

/// Read a service account JSON key file into a string payload.
pub fn read_key_file<P: AsRef<Path>>(path: P) -> Result<String> {
    Ok(fs::read_to_string(path)?)
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !is_blank(v))
}
