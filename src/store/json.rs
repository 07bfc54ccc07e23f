// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Catalog snapshot loaded from a JSON file.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::CatalogStore;
use crate::error::{ExportError, Result};
use crate::models::{Article, Issue, JournalContext};

/// In-memory catalog of journals and their issues.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct JsonCatalog {
    #[serde(default)]
    pub contexts: Vec<JournalContext>,
    #[serde(default)]
    pub issues: Vec<Issue>,
}

impl JsonCatalog {
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

    pub fn find_context(&self, context_id: &str) -> Option<&JournalContext> {
        self.contexts.iter().find(|c| c.id == context_id)
    }

    /// Issues of one journal in catalog order.
    pub fn issues_of<'a>(&'a self, context_id: &'a str) -> impl Iterator<Item = &'a Issue> + 'a {
        self.issues.iter().filter(move |i| i.context_id == context_id)
    }
}

impl CatalogStore for JsonCatalog {
    fn find_issue(&self, context: &JournalContext, issue_id: &str) -> Option<Issue> {
        self.issues
            .iter()
            .find(|i| i.id == issue_id && i.context_id == context.id)
            .cloned()
    }

    fn published_articles(&self, _context: &JournalContext, issue: &Issue) -> Vec<Article> {
        let mut articles: Vec<Article> = issue
            .articles
            .iter()
            .filter(|a| a.is_published())
            .cloned()
            .collect();
        articles.sort_by_key(|a| a.seq);
        articles
    }
}
