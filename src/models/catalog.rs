// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Issue, article and galley records as handed over by the data store.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One edition of the journal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub id: String,
    /// Context (journal) the issue belongs to.
    pub context_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub articles: Vec<Article>,
}

/// Editorial state of a submission; only `Published` ones are exported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublicationStatus {
    #[default]
    Queued,
    Scheduled,
    Published,
    Declined,
}

/// A submission placed in an issue.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    /// Position inside the issue's table of contents.
    pub seq: i64,
    #[serde(default)]
    pub status: PublicationStatus,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub galleys: Vec<Galley>,
}

impl Article {
    pub fn is_published(&self) -> bool {
        self.status == PublicationStatus::Published
    }
}

/// Publishable rendition of an article (PDF, HTML, ...).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Galley {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub file: Option<SubmissionFile>,
}

/// File on durable storage backing a galley.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionFile {
    /// Name the file was uploaded with; used as the archive entry name.
    pub client_file_name: String,
    /// Where the bytes live on disk. May point at a file that no longer exists.
    pub path: PathBuf,
}
