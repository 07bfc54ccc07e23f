// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Download receiver that saves the streamed batch to disk.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::logic::delivery::{DownloadMeta, ResponseSink};

/// Writes a direct download to `output`, or to the suggested filename
/// inside `fallback_dir` when no explicit output path was given.
#[derive(Debug)]
pub struct FileSink {
    output: Option<PathBuf>,
    fallback_dir: PathBuf,
    target: Option<PathBuf>,
    writer: Option<BufWriter<File>>,
}

impl FileSink {
    pub fn new(output: Option<PathBuf>, fallback_dir: PathBuf) -> Self {
        Self {
            output,
            fallback_dir,
            target: None,
            writer: None,
        }
    }

    /// Where the body went, once a download has started.
    pub fn path(&self) -> Option<&Path> {
        self.target.as_deref()
    }
}

impl ResponseSink for FileSink {
    fn begin_download(&mut self, meta: &DownloadMeta) -> io::Result<()> {
        let target = self
            .output
            .clone()
            .unwrap_or_else(|| self.fallback_dir.join(&meta.filename));
        self.writer = Some(BufWriter::new(File::create(&target)?));
        self.target = Some(target);
        Ok(())
    }
}

impl Write for FileSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.writer.as_mut() {
            Some(writer) => writer.write(buf),
            None => Err(io::Error::other("download body sent before its metadata")),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.writer.as_mut() {
            Some(writer) => writer.flush(),
            None => Ok(()),
        }
    }
}
