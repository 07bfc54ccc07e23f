// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Seams to the host application: record lookup, article serialization and
//! per-journal vault settings.
//!
//! The pipeline only ever talks to these traits. [`JsonCatalog`] and
//! [`XmlArticleSerializer`] are small file-backed stand-ins used by the CLI.

pub mod json;
pub mod xml;

pub use json::JsonCatalog;
pub use xml::XmlArticleSerializer;

use crate::models::{Article, Credentials, Issue, JournalContext};

/// Read access to issues and their published articles.
pub trait CatalogStore {
    /// Resolve an issue by identifier, scoped to `context`.
    fn find_issue(&self, context: &JournalContext, issue_id: &str) -> Option<Issue>;

    /// Published articles of `issue`, ordered by ascending sequence number.
    fn published_articles(&self, context: &JournalContext, issue: &Issue) -> Vec<Article>;
}

/// Produces the export document for a single article.
pub trait DocumentSerializer {
    fn serialize(&self, context: &JournalContext, issue: &Issue, article: &Article) -> Vec<u8>;
}

/// Per-journal vault settings.
pub trait VaultSettings {
    /// Missing settings come back as empty strings, never as defaults.
    fn vault_credentials(&self, context_id: &str) -> Credentials;
}
