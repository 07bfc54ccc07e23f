// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Runtime configuration: scratch space, transfer tuning and vault accounts.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ExportError, Result};
use crate::models::Credentials;
use crate::store::VaultSettings;

/// Vault account of one journal.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct VaultAccount {
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl fmt::Debug for VaultAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaultAccount")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Top-level configuration, usually read from a JSON file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Directory for temporary batch archives (default: the OS temp dir).
    #[serde(default = "default_temp_dir")]
    pub temp_dir: PathBuf,

    /// Connect/read/write timeout for vault transfers (None = transport defaults).
    #[serde(default)]
    pub transfer_timeout_secs: Option<u64>,

    /// Append a random suffix to batch names so same-second exports cannot collide.
    #[serde(default)]
    pub unique_remote_names: bool,

    /// Vault accounts keyed by journal (context) id.
    #[serde(default)]
    pub vaults: HashMap<String, VaultAccount>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            temp_dir: default_temp_dir(),
            transfer_timeout_secs: None,
            unique_remote_names: false,
            vaults: HashMap::new(),
        }
    }
}

fn default_temp_dir() -> PathBuf {
    std::env::temp_dir()
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|err| ExportError::Config {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        serde_json::from_str(&raw).map_err(|err| ExportError::Config {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })
    }

    pub fn transfer_timeout(&self) -> Option<Duration> {
        self.transfer_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

impl VaultSettings for Config {
    fn vault_credentials(&self, context_id: &str) -> Credentials {
        self.vaults
            .get(context_id)
            .map(|account| {
                Credentials::new(
                    account.host.clone(),
                    account.username.clone(),
                    account.password.clone(),
                )
            })
            .unwrap_or_default()
    }
}
