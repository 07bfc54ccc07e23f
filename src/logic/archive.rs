// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Batch archive assembly.
//!
//! Layout of a batch:
//! - `<articleId>/<articleId>.xml`: the article's export document.
//! - `<articleId>/<clientFileName>`: one entry per galley file found on disk.
//!
//! Issues are written in the order requested, articles by ascending sequence.

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, Seek, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};
use zip::{CompressionMethod, ZipWriter, write::FileOptions};

use crate::error::{ExportError, Result};
use crate::models::{Article, Galley, Issue, JournalContext, SubmissionFile};
use crate::store::{CatalogStore, DocumentSerializer};

/// Counters reported after a batch was written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub issues: usize,
    pub articles: usize,
    pub files_added: usize,
    pub files_skipped: usize,
}

/// A finished batch in temporary storage.
///
/// Dropping it deletes the file, so whoever holds it owns the cleanup.
#[derive(Debug)]
pub struct BuiltArchive {
    pub file: NamedTempFile,
    pub summary: BuildSummary,
}

impl BuiltArchive {
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// Write the requested issues into a fresh ZIP under `temp_dir`.
///
/// Issue identifiers selected more than once are exported at their first
/// position only. Fails on the first unresolvable issue or entry that cannot
/// be written. The archive is closed on every path; on failure the temporary
/// file is removed here, before the error is returned, so callers never
/// receive a path to clean up.
pub fn build_archive(
    context: &JournalContext,
    issue_ids: &[String],
    store: &dyn CatalogStore,
    serializer: &dyn DocumentSerializer,
    temp_dir: &Path,
) -> Result<BuiltArchive> {
    if issue_ids.is_empty() {
        return Err(ExportError::NoSelection);
    }

    let file = tempfile::Builder::new()
        .prefix("issuepack")
        .suffix(".zip")
        .tempfile_in(temp_dir)
        .map_err(|source| ExportError::ArchiveCreation { source })?;
    info!(
        context = %context.id,
        issues = issue_ids.len(),
        path = %file.path().display(),
        "building export archive"
    );

    let mut zip = ZipWriter::new(file.as_file());
    let written = write_issues(&mut zip, context, issue_ids, store, serializer);
    // Close the archive even when writing failed; the first error wins.
    let finished = zip.finish();
    let summary = written?;
    finished.map_err(|err| ExportError::ArchiveFinalization {
        reason: err.to_string(),
    })?;

    info!(
        issues = summary.issues,
        articles = summary.articles,
        files_added = summary.files_added,
        files_skipped = summary.files_skipped,
        "export archive ready"
    );
    Ok(BuiltArchive { file, summary })
}

fn write_issues<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    context: &JournalContext,
    issue_ids: &[String],
    store: &dyn CatalogStore,
    serializer: &dyn DocumentSerializer,
) -> Result<BuildSummary> {
    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut summary = BuildSummary::default();
    let mut seen_issues: HashSet<&str> = HashSet::new();
    let mut seen_articles: HashSet<String> = HashSet::new();

    for issue_id in issue_ids {
        if !seen_issues.insert(issue_id.as_str()) {
            debug!(issue = %issue_id, "issue selected twice, later occurrence ignored");
            continue;
        }
        let issue =
            store
                .find_issue(context, issue_id)
                .ok_or_else(|| ExportError::IssueNotFound {
                    issue_id: issue_id.clone(),
                })?;

        let mut articles = store.published_articles(context, &issue);
        articles.retain(Article::is_published);
        articles.sort_by_key(|a| a.seq);
        debug!(issue = %issue.id, articles = articles.len(), "adding issue");

        for article in &articles {
            // An article folder is written once per batch.
            if !seen_articles.insert(article.id.clone()) {
                warn!(article = %article.id, issue = %issue.id, "article already in batch, skipped");
                continue;
            }
            write_article(zip, options, context, &issue, article, serializer, &mut summary)?;
        }
        summary.issues += 1;
    }

    Ok(summary)
}

fn write_article<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    options: FileOptions<'_, ()>,
    context: &JournalContext,
    issue: &Issue,
    article: &Article,
    serializer: &dyn DocumentSerializer,
    summary: &mut BuildSummary,
) -> Result<()> {
    let document_entry = format!("{0}/{0}.xml", article.id);
    // Only this article's document is held in memory.
    let document = serializer.serialize(context, issue, article);
    zip.start_file(document_entry.as_str(), options)
        .map_err(|err| ExportError::archive_write(&document_entry, err))?;
    zip.write_all(&document)
        .map_err(|err| ExportError::archive_write(&document_entry, err))?;
    summary.articles += 1;

    let mut entries = HashSet::from([document_entry]);
    for galley in &article.galleys {
        let Some(source) = galley_source(galley) else {
            summary.files_skipped += 1;
            continue;
        };

        let entry = format!(
            "{}/{}",
            article.id,
            entry_file_name(&source.client_file_name, &galley.id)
        );
        if !entries.insert(entry.clone()) {
            warn!(entry = %entry, galley = %galley.id, "duplicate entry name, galley file skipped");
            summary.files_skipped += 1;
            continue;
        }

        let mut reader =
            File::open(&source.path).map_err(|err| ExportError::archive_write(&entry, err))?;
        zip.start_file(entry.as_str(), options)
            .map_err(|err| ExportError::archive_write(&entry, err))?;
        io::copy(&mut reader, zip).map_err(|err| ExportError::archive_write(&entry, err))?;
        debug!(entry = %entry, "added galley file");
        summary.files_added += 1;
    }

    Ok(())
}

/// The galley's file, if it has one and it is present on disk.
fn galley_source(galley: &Galley) -> Option<&SubmissionFile> {
    let file = galley.file.as_ref()?;
    if file.path.is_file() {
        Some(file)
    } else {
        debug!(
            galley = %galley.id,
            path = %file.path.display(),
            "galley file missing on disk, skipped"
        );
        None
    }
}

/// Keep only the last path segment of an uploaded filename so entries stay
/// inside their article folder.
fn entry_file_name<'a>(client_file_name: &'a str, galley_id: &'a str) -> &'a str {
    let name = client_file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    if name.is_empty() || name == "." || name == ".." {
        galley_id
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use std::fs::{self, File};
    use std::io::Read;
    use std::path::Path;

    use tempfile::TempDir;
    use zip::ZipArchive;

    use super::{build_archive, entry_file_name};
    use crate::error::ExportError;
    use crate::models::{
        Article, Galley, Issue, JournalContext, PublicationStatus, SubmissionFile,
    };
    use crate::store::{CatalogStore, DocumentSerializer};

    struct FixedSerializer;

    impl DocumentSerializer for FixedSerializer {
        fn serialize(&self, _: &JournalContext, issue: &Issue, article: &Article) -> Vec<u8> {
            format!("<article issue=\"{}\" id=\"{}\"/>", issue.id, article.id).into_bytes()
        }
    }

    /// Store that returns articles exactly as given, without filtering or sorting.
    struct RawStore(Vec<Issue>);

    impl CatalogStore for RawStore {
        fn find_issue(&self, context: &JournalContext, issue_id: &str) -> Option<Issue> {
            self.0
                .iter()
                .find(|i| i.id == issue_id && i.context_id == context.id)
                .cloned()
        }

        fn published_articles(&self, _: &JournalContext, issue: &Issue) -> Vec<Article> {
            issue.articles.clone()
        }
    }

    fn context() -> JournalContext {
        JournalContext {
            id: "j1".into(),
            acronym: "JDS".into(),
            ..Default::default()
        }
    }

    fn article(id: &str, seq: i64, galleys: Vec<Galley>) -> Article {
        Article {
            id: id.into(),
            seq,
            status: PublicationStatus::Published,
            title: String::new(),
            galleys,
        }
    }

    fn galley(id: &str, name: &str, path: &Path) -> Galley {
        Galley {
            id: id.into(),
            label: "PDF".into(),
            file: Some(SubmissionFile {
                client_file_name: name.into(),
                path: path.to_path_buf(),
            }),
        }
    }

    fn issue(id: &str, articles: Vec<Article>) -> Issue {
        Issue {
            id: id.into(),
            context_id: "j1".into(),
            title: String::new(),
            articles,
        }
    }

    fn entry_names(path: &Path) -> Vec<String> {
        let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
        (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect()
    }

    #[test]
    fn build_archive_orders_articles_by_seq_and_adds_existing_files() {
        let tmp = TempDir::new().unwrap();
        let pdf = tmp.path().join("stored-a1.bin");
        fs::write(&pdf, b"%PDF-1.7").unwrap();
        let store = RawStore(vec![issue(
            "I1",
            vec![
                article("A1", 2, vec![galley("G1", "a1.pdf", &pdf)]),
                article("A2", 1, Vec::new()),
            ],
        )]);

        let built =
            build_archive(&context(), &["I1".into()], &store, &FixedSerializer, tmp.path())
                .unwrap();

        assert_eq!(
            entry_names(built.path()),
            ["A2/A2.xml", "A1/A1.xml", "A1/a1.pdf"]
        );
        assert_eq!(built.summary.articles, 2);
        assert_eq!(built.summary.files_added, 1);

        let mut archive = ZipArchive::new(File::open(built.path()).unwrap()).unwrap();
        let mut body = String::new();
        archive
            .by_name("A1/a1.pdf")
            .unwrap()
            .read_to_string(&mut body)
            .unwrap();
        assert_eq!(body, "%PDF-1.7");
    }

    #[test]
    fn build_archive_keeps_requested_issue_order() {
        let tmp = TempDir::new().unwrap();
        let store = RawStore(vec![
            issue("I1", vec![article("A1", 1, Vec::new())]),
            issue("I2", vec![article("B1", 1, Vec::new())]),
        ]);

        let built = build_archive(
            &context(),
            &["I2".into(), "I1".into()],
            &store,
            &FixedSerializer,
            tmp.path(),
        )
        .unwrap();

        assert_eq!(entry_names(built.path()), ["B1/B1.xml", "A1/A1.xml"]);
    }

    // Galleys without a file, or whose file vanished, are skipped silently.
    #[test]
    fn build_archive_skips_absent_galley_files() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("gone.pdf");
        let store = RawStore(vec![issue(
            "I1",
            vec![article(
                "A1",
                1,
                vec![
                    galley("G1", "gone.pdf", &missing),
                    Galley {
                        id: "G2".into(),
                        label: "HTML".into(),
                        file: None,
                    },
                ],
            )],
        )]);

        let built =
            build_archive(&context(), &["I1".into()], &store, &FixedSerializer, tmp.path())
                .unwrap();

        assert_eq!(entry_names(built.path()), ["A1/A1.xml"]);
        assert_eq!(built.summary.files_skipped, 2);
    }

    #[test]
    fn build_archive_drops_unpublished_articles() {
        let tmp = TempDir::new().unwrap();
        let mut draft = article("A9", 0, Vec::new());
        draft.status = PublicationStatus::Scheduled;
        let store = RawStore(vec![issue("I1", vec![draft, article("A1", 1, Vec::new())])]);

        let built =
            build_archive(&context(), &["I1".into()], &store, &FixedSerializer, tmp.path())
                .unwrap();

        assert_eq!(entry_names(built.path()), ["A1/A1.xml"]);
    }

    #[test]
    fn build_archive_fails_for_unknown_issue_and_removes_temp_file() {
        let tmp = TempDir::new().unwrap();
        let store = RawStore(vec![issue("I1", vec![article("A1", 1, Vec::new())])]);

        let err = build_archive(
            &context(),
            &["I1".into(), "I404".into()],
            &store,
            &FixedSerializer,
            tmp.path(),
        )
        .unwrap_err();

        assert!(matches!(err, ExportError::IssueNotFound { ref issue_id } if issue_id == "I404"));
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[test]
    fn build_archive_rejects_unwritable_temp_dir() {
        let tmp = TempDir::new().unwrap();
        let store = RawStore(Vec::new());

        let err = build_archive(
            &context(),
            &["I1".into()],
            &store,
            &FixedSerializer,
            &tmp.path().join("does-not-exist"),
        )
        .unwrap_err();

        assert!(matches!(err, ExportError::ArchiveCreation { .. }));
    }

    #[test]
    fn build_archive_skips_duplicate_galley_names() {
        let tmp = TempDir::new().unwrap();
        let first = tmp.path().join("first.bin");
        let second = tmp.path().join("second.bin");
        fs::write(&first, b"one").unwrap();
        fs::write(&second, b"two").unwrap();
        let store = RawStore(vec![issue(
            "I1",
            vec![article(
                "A1",
                1,
                vec![galley("G1", "a.pdf", &first), galley("G2", "a.pdf", &second)],
            )],
        )]);

        let built =
            build_archive(&context(), &["I1".into()], &store, &FixedSerializer, tmp.path())
                .unwrap();

        assert_eq!(entry_names(built.path()), ["A1/A1.xml", "A1/a.pdf"]);
        assert_eq!(built.summary.files_skipped, 1);
    }

    #[test]
    fn build_archive_exports_repeated_issue_once() {
        let tmp = TempDir::new().unwrap();
        let store = RawStore(vec![
            issue("I1", vec![article("A1", 1, Vec::new())]),
            issue("I2", vec![article("B1", 1, Vec::new())]),
        ]);

        let built = build_archive(
            &context(),
            &["I1".into(), "I2".into(), "I1".into()],
            &store,
            &FixedSerializer,
            tmp.path(),
        )
        .unwrap();

        assert_eq!(entry_names(built.path()), ["A1/A1.xml", "B1/B1.xml"]);
        assert_eq!(built.summary.issues, 2);
    }

    // The same article listed under two issues gets a single folder.
    #[test]
    fn build_archive_writes_shared_article_once() {
        let tmp = TempDir::new().unwrap();
        let store = RawStore(vec![
            issue("I1", vec![article("A1", 1, Vec::new())]),
            issue("I2", vec![article("A1", 1, Vec::new()), article("B1", 2, Vec::new())]),
        ]);

        let built = build_archive(
            &context(),
            &["I1".into(), "I2".into()],
            &store,
            &FixedSerializer,
            tmp.path(),
        )
        .unwrap();

        assert_eq!(entry_names(built.path()), ["A1/A1.xml", "B1/B1.xml"]);
        assert_eq!(built.summary.articles, 2);
    }

    // `/proc/self/mem` is a regular file whose first page cannot be read.
    #[cfg(target_os = "linux")]
    #[test]
    fn build_archive_reports_unreadable_galley_and_removes_temp_file() {
        let tmp = TempDir::new().unwrap();
        let scratch = tmp.path().join("scratch");
        fs::create_dir_all(&scratch).unwrap();
        let store = RawStore(vec![issue(
            "I1",
            vec![article(
                "A1",
                1,
                vec![galley("G1", "broken.pdf", Path::new("/proc/self/mem"))],
            )],
        )]);

        let err = build_archive(&context(), &["I1".into()], &store, &FixedSerializer, &scratch)
            .unwrap_err();

        assert!(
            matches!(err, ExportError::ArchiveWrite { ref entry, .. } if entry == "A1/broken.pdf"),
            "unexpected error: {err}"
        );
        assert_eq!(fs::read_dir(&scratch).unwrap().count(), 0);
    }

    #[test]
    fn entry_file_name_strips_directories() {
        assert_eq!(entry_file_name("a1.pdf", "G1"), "a1.pdf");
        assert_eq!(entry_file_name("../../etc/passwd", "G1"), "passwd");
        assert_eq!(entry_file_name("C:\\upload\\paper.pdf", "G1"), "paper.pdf");
        assert_eq!(entry_file_name("..", "G1"), "G1");
        assert_eq!(entry_file_name("dir/", "G1"), "G1");
    }
}
