// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Vault login details resolved from per-journal settings.

use std::fmt;

use crate::error::{ExportError, Result};

/// Host and login for the preservation vault. No field has a default.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub server: String,
    pub user: String,
    pub password: String,
}

impl Credentials {
    pub fn new(
        server: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            server: server.into(),
            user: user.into(),
            password: password.into(),
        }
    }

    /// Reject credentials with any blank field before a connection is attempted.
    pub fn validate(&self) -> Result<()> {
        let complete = [&self.server, &self.user, &self.password]
            .iter()
            .all(|field| !field.trim().is_empty());
        if complete {
            Ok(())
        } else {
            Err(ExportError::InvalidCredentials)
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("server", &self.server)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}
