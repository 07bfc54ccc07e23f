// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Batch export of published journal issues for long-term preservation.
//!
//! Selected issues are packed into a temporary ZIP (one export document per
//! article plus its galley files), then either streamed back to the caller
//! or uploaded to a remote preservation vault over passive-mode FTP. The
//! temporary archive never outlives the request.

pub mod app;
pub mod config;
pub mod error;
pub mod logic;
pub mod models;
pub mod store;
pub mod utils;

pub use config::Config;
pub use error::{ExportError, Result};
pub use logic::archive::{BuildSummary, BuiltArchive, build_archive};
pub use logic::delivery::{
    DownloadMeta, FtpConnector, ResponseSink, VaultConnector, VaultSession, deliver,
    stream_download,
};
pub use logic::export::{
    ExportMode, ExportOptions, ExportOutcome, ExportResponse, ExportTarget, Exporter,
    StatusPage, batch_filename,
};
