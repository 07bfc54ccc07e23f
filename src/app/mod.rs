// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Command-line front end wiring the file-backed catalog, the configuration
//! and the FTP connector into the exporter.

pub mod file_sink;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::logic::delivery::FtpConnector;
use crate::logic::export::{
    ExportMode, ExportOptions, ExportOutcome, ExportResponse, ExportTarget, Exporter,
};
use crate::store::{CatalogStore, JsonCatalog, XmlArticleSerializer};
use file_sink::FileSink;

#[derive(Debug, Parser)]
#[command(name = "issuepack", version, about = "Package journal issues for preservation")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Export issues as one batch archive
    Export {
        /// Catalog snapshot (JSON) holding journals and issues
        #[arg(long)]
        catalog: PathBuf,
        /// Configuration file (JSON) with vault accounts
        #[arg(long)]
        config: Option<PathBuf>,
        /// Journal (context) id
        #[arg(long)]
        context: String,
        /// Issue id to include; repeat for several, order is kept
        #[arg(long = "issue")]
        issues: Vec<String>,
        /// `download` saves the batch locally, `push` uploads it to the vault
        #[arg(long, default_value_t = ExportMode::Download)]
        mode: ExportMode,
        /// Where to save a download (default: suggested name in the current dir)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// List the issues of a journal
    Issues {
        #[arg(long)]
        catalog: PathBuf,
        #[arg(long)]
        context: String,
    },
}

/// Parse arguments, install logging and run the requested command.
pub fn run() -> Result<ExitCode> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Export {
            catalog,
            config,
            context,
            issues,
            mode,
            output,
        } => export(catalog, config, &context, &issues, mode, output),
        Command::Issues { catalog, context } => list_issues(catalog, &context),
    }
}

fn export(
    catalog_path: PathBuf,
    config_path: Option<PathBuf>,
    context_id: &str,
    issue_ids: &[String],
    mode: ExportMode,
    output: Option<PathBuf>,
) -> Result<ExitCode> {
    let catalog = JsonCatalog::load(&catalog_path).context("Failed to load catalog")?;
    let config = match config_path {
        Some(path) => Config::load(&path).context("Failed to load configuration")?,
        None => Config::default(),
    };
    let journal = catalog
        .find_context(context_id)
        .with_context(|| format!("Unknown journal context `{context_id}`"))?;

    let exporter = Exporter {
        store: &catalog,
        serializer: &XmlArticleSerializer,
        settings: &config,
        connector: &FtpConnector,
        options: ExportOptions::from(&config),
    };

    let cwd = std::env::current_dir().context("Failed to resolve current directory")?;
    let mut sink = FileSink::new(output, cwd);
    let target = match mode {
        ExportMode::Download => ExportTarget::Download(&mut sink),
        ExportMode::Push => ExportTarget::Push,
    };

    match exporter.handle(journal, issue_ids, target) {
        ExportResponse::Streamed(ExportOutcome::Downloaded { meta, sha256 }) => {
            for (name, value) in meta.headers() {
                println!("{name}: {value}");
            }
            if let Some(path) = sink.path() {
                println!("saved to {}", path.display());
            }
            if let Some(digest) = sha256 {
                println!("sha256: {digest}");
            }
            Ok(ExitCode::SUCCESS)
        }
        ExportResponse::Streamed(outcome) => {
            println!("{outcome:?}");
            Ok(ExitCode::SUCCESS)
        }
        ExportResponse::Page(page) => {
            println!("{}", page.render());
            Ok(if page.error_message.is_some() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
    }
}

fn list_issues(catalog_path: PathBuf, context_id: &str) -> Result<ExitCode> {
    let catalog = JsonCatalog::load(&catalog_path).context("Failed to load catalog")?;
    let journal = catalog
        .find_context(context_id)
        .with_context(|| format!("Unknown journal context `{context_id}`"))?;

    for issue in catalog.issues_of(context_id) {
        let published = catalog.published_articles(journal, issue).len();
        println!("{}\t{}\t{published} published", issue.id, issue.title);
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, Command};
    use crate::logic::export::ExportMode;

    #[test]
    fn export_command_keeps_issue_order_and_parses_mode() {
        let cli = Cli::try_parse_from([
            "issuepack", "export", "--catalog", "c.json", "--context", "j1", "--issue", "I2",
            "--issue", "I1", "--mode", "ftp",
        ])
        .unwrap();

        let Command::Export { issues, mode, .. } = cli.command else {
            panic!("expected export command");
        };
        assert_eq!(issues, ["I2", "I1"]);
        assert_eq!(mode, ExportMode::Push);
    }

    #[test]
    fn export_command_defaults_to_download() {
        let cli = Cli::try_parse_from([
            "issuepack", "export", "--catalog", "c.json", "--context", "j1",
        ])
        .unwrap();

        let Command::Export { issues, mode, .. } = cli.command else {
            panic!("expected export command");
        };
        assert!(issues.is_empty());
        assert_eq!(mode, ExportMode::Download);
    }
}
