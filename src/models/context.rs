// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! The journal an export runs for.
//!
//! Localized values arrive already resolved to the request locale; this
//! layer only decides which of them to present.

use serde::{Deserialize, Serialize};

/// Journal settings consumed by the export pipeline.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalContext {
    pub id: String,
    /// Localized acronym; prefixes every batch filename.
    #[serde(default)]
    pub acronym: String,
    #[serde(default)]
    pub abbreviation: Option<String>,
    #[serde(default)]
    pub online_issn: Option<String>,
    #[serde(default)]
    pub print_issn: Option<String>,
    #[serde(default)]
    pub issn: Option<String>,
}

impl JournalContext {
    /// ISSN to show on the status page: online, then print, then the generic one.
    pub fn display_issn(&self) -> Option<&str> {
        [&self.online_issn, &self.print_issn, &self.issn]
            .into_iter()
            .filter_map(|value| non_empty(value.as_deref()))
            .next()
    }

    pub fn display_abbreviation(&self) -> Option<&str> {
        non_empty(self.abbreviation.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
