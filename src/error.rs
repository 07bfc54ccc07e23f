// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Error taxonomy for the export pipeline.
//!
//! Every variant is terminal to the current export attempt. The `Display`
//! text doubles as the message shown on the status page.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Failures that can end an export attempt.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The request carried no issue identifiers.
    #[error("no issue was selected for export")]
    NoSelection,

    /// An issue could not be resolved within the current context.
    #[error("issue {issue_id} could not be loaded")]
    IssueNotFound {
        /// Identifier as supplied by the caller.
        issue_id: String,
    },

    /// The temporary archive could not be created or opened for writing.
    #[error("the export file could not be created: {source}")]
    ArchiveCreation {
        #[source]
        source: io::Error,
    },

    /// Adding an entry to the archive failed.
    #[error("the export file could not be created: failed to add {entry}: {reason}")]
    ArchiveWrite {
        /// Path of the entry inside the archive.
        entry: String,
        reason: String,
    },

    /// Closing the archive reported a failure.
    #[error("the export file could not be created: {reason}")]
    ArchiveFinalization { reason: String },

    /// At least one vault setting is empty.
    #[error("the vault settings are incomplete; host, username and password are required")]
    InvalidCredentials,

    /// No session could be established with the vault host.
    #[error("could not connect to the vault server {host}")]
    Connection {
        host: String,
        reason: String,
    },

    /// The vault rejected the configured username/password.
    #[error("the vault server rejected the configured credentials")]
    Authentication { reason: String },

    /// The upload was rejected or did not complete.
    #[error("the transfer of {remote_name} to the vault failed: {reason}")]
    Transfer {
        remote_name: String,
        reason: String,
    },

    /// Streaming the archive back to the caller failed.
    #[error("the export file could not be sent: {0}")]
    Stream(#[source] io::Error),

    /// A configuration or catalog file could not be loaded.
    #[error("configuration error in {path:?}: {reason}")]
    Config { path: PathBuf, reason: String },
}

impl ExportError {
    pub(crate) fn archive_write(entry: impl Into<String>, reason: impl ToString) -> Self {
        Self::ArchiveWrite {
            entry: entry.into(),
            reason: reason.to_string(),
        }
    }
}
