// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Export orchestration: selection check, archive build, delivery, cleanup.
//!
//! [`Exporter::export`] reports failures as [`ExportError`];
//! [`Exporter::handle`] is the request boundary that turns any failure into
//! a message on the status page instead of propagating it.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use time::OffsetDateTime;
use time::macros::format_description;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{ExportError, Result};
use crate::logic::archive::{BuiltArchive, build_archive};
use crate::logic::delivery::{
    DownloadMeta, ResponseSink, VaultConnector, deliver, stream_download,
};
use crate::models::JournalContext;
use crate::store::{CatalogStore, DocumentSerializer, VaultSettings};
use crate::utils::{hash_file, sanitize_component};

/// How the caller wants the batch delivered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportMode {
    #[default]
    Download,
    Push,
}

impl FromStr for ExportMode {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "download" => Ok(Self::Download),
            "push" | "ftp" => Ok(Self::Push),
            other => Err(format!("unknown export mode `{other}` (expected download or push)")),
        }
    }
}

impl fmt::Display for ExportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Download => "download",
            Self::Push => "push",
        })
    }
}

/// Where a single export goes; a download needs somewhere to stream to.
pub enum ExportTarget<'s> {
    Download(&'s mut dyn ResponseSink),
    Push,
}

impl ExportTarget<'_> {
    pub fn mode(&self) -> ExportMode {
        match self {
            Self::Download(_) => ExportMode::Download,
            Self::Push => ExportMode::Push,
        }
    }
}

/// What a successful export produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExportOutcome {
    Pushed {
        remote_name: String,
        bytes: u64,
        sha256: Option<String>,
    },
    Downloaded {
        meta: DownloadMeta,
        sha256: Option<String>,
    },
}

/// Settings that shape a single export run.
#[derive(Clone, Debug)]
pub struct ExportOptions {
    pub temp_dir: PathBuf,
    pub transfer_timeout: Option<Duration>,
    pub unique_remote_names: bool,
    /// Wall clock used for batch names.
    pub now: fn() -> OffsetDateTime,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for ExportOptions {
    fn from(config: &Config) -> Self {
        Self {
            temp_dir: config.temp_dir.clone(),
            transfer_timeout: config.transfer_timeout(),
            unique_remote_names: config.unique_remote_names,
            now: local_now,
        }
    }
}

fn local_now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

/// Build the batch name `<acronym>_batch_<YYYY-MM-DD-HH-mm-ss>.zip`.
///
/// With `unique` set, a short random tag is added before the extension so
/// that two exports within the same second get distinct remote names.
pub fn batch_filename(acronym: &str, at: OffsetDateTime, unique: bool) -> String {
    let stamp = at
        .format(format_description!(
            "[year]-[month]-[day]-[hour]-[minute]-[second]"
        ))
        .unwrap_or_else(|_| at.unix_timestamp().to_string());
    let acronym = sanitize_component(acronym);
    if unique {
        let tag = uuid::Uuid::new_v4().simple().to_string();
        format!("{acronym}_batch_{stamp}_{}.zip", &tag[..8])
    } else {
        format!("{acronym}_batch_{stamp}.zip")
    }
}

/// Page shown after an export that did not end in a download.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusPage {
    pub issn: Option<String>,
    pub abbreviation: Option<String>,
    pub success_message: Option<String>,
    pub error_message: Option<String>,
}

impl StatusPage {
    pub fn for_context(context: &JournalContext) -> Self {
        Self {
            issn: context.display_issn().map(str::to_string),
            abbreviation: context.display_abbreviation().map(str::to_string),
            ..Default::default()
        }
    }

    pub fn render(&self) -> String {
        let mut lines = Vec::new();
        if let Some(abbreviation) = &self.abbreviation {
            lines.push(format!("Journal: {abbreviation}"));
        }
        if let Some(issn) = &self.issn {
            lines.push(format!("ISSN: {issn}"));
        }
        if let Some(message) = &self.success_message {
            lines.push(format!("Success: {message}"));
        }
        if let Some(message) = &self.error_message {
            lines.push(format!("Error: {message}"));
        }
        lines.join("\n")
    }
}

/// Result of handling one export request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExportResponse {
    /// Render this page.
    Page(StatusPage),
    /// The archive was already streamed; nothing else may be sent.
    Streamed(ExportOutcome),
}

/// Wires the host's collaborators into the export pipeline.
pub struct Exporter<'a> {
    pub store: &'a dyn CatalogStore,
    pub serializer: &'a dyn DocumentSerializer,
    pub settings: &'a dyn VaultSettings,
    pub connector: &'a dyn VaultConnector,
    pub options: ExportOptions,
}

impl Exporter<'_> {
    /// Export `issue_ids` of `context` as one batch.
    ///
    /// The temporary archive is removed exactly once before this returns,
    /// whether delivery succeeded or not. A failed build never hands back an
    /// archive: the builder has already removed its partial file by then.
    /// Repeated issue ids are exported once, at their first position.
    pub fn export(
        &self,
        context: &JournalContext,
        issue_ids: &[String],
        target: ExportTarget<'_>,
    ) -> Result<ExportOutcome> {
        if issue_ids.is_empty() {
            return Err(ExportError::NoSelection);
        }
        info!(context = %context.id, mode = %target.mode(), issues = ?issue_ids, "export requested");

        let archive = build_archive(
            context,
            issue_ids,
            self.store,
            self.serializer,
            &self.options.temp_dir,
        )?;
        let result = self.dispatch(context, &archive, target);

        let path = archive.path().to_path_buf();
        match archive.file.close() {
            Ok(()) => debug!(path = %path.display(), "temporary archive removed"),
            Err(err) => warn!(path = %path.display(), error = %err, "could not remove temporary archive"),
        }
        result
    }

    fn dispatch(
        &self,
        context: &JournalContext,
        archive: &BuiltArchive,
        target: ExportTarget<'_>,
    ) -> Result<ExportOutcome> {
        let filename = batch_filename(
            &context.acronym,
            (self.options.now)(),
            self.options.unique_remote_names,
        );
        let sha256 = match hash_file(archive.path()) {
            Ok(digest) => Some(digest),
            Err(err) => {
                warn!(error = %err, "could not hash export archive");
                None
            }
        };
        if let Some(digest) = &sha256 {
            info!(filename = %filename, sha256 = %digest, "batch archive digest");
        }

        match target {
            ExportTarget::Push => {
                let credentials = self.settings.vault_credentials(&context.id);
                let bytes = deliver(
                    self.connector,
                    archive.path(),
                    &credentials,
                    &filename,
                    self.options.transfer_timeout,
                )?;
                Ok(ExportOutcome::Pushed {
                    remote_name: filename,
                    bytes,
                    sha256,
                })
            }
            ExportTarget::Download(sink) => {
                let meta = stream_download(archive.path(), &filename, sink)?;
                Ok(ExportOutcome::Downloaded { meta, sha256 })
            }
        }
    }

    /// Run an export and map the result onto the response surface.
    ///
    /// Failures never escape: they become the page's error message.
    pub fn handle(
        &self,
        context: &JournalContext,
        issue_ids: &[String],
        target: ExportTarget<'_>,
    ) -> ExportResponse {
        let mut page = StatusPage::for_context(context);
        match self.export(context, issue_ids, target) {
            Ok(outcome @ ExportOutcome::Downloaded { .. }) => ExportResponse::Streamed(outcome),
            Ok(ExportOutcome::Pushed { remote_name, .. }) => {
                page.success_message = Some(format!(
                    "The selected issues were delivered to the vault as {remote_name}."
                ));
                ExportResponse::Page(page)
            }
            Err(err) => {
                warn!(context = %context.id, error = %err, "export failed");
                page.error_message = Some(err.to_string());
                ExportResponse::Page(page)
            }
        }
    }
}
