// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Getting a finished batch to its destination.
//!
//! Two routes exist: an authenticated passive-mode FTP upload to the
//! preservation vault, or streaming the bytes straight back to the caller.

use std::fs::File;
use std::io::{self, Read, Write};
use std::net::ToSocketAddrs;
use std::path::Path;
use std::time::Duration;

use suppaftp::types::FileType;
use suppaftp::{FtpStream, Mode};
use tracing::{debug, info, warn};

use crate::error::{ExportError, Result};
use crate::models::Credentials;

/// Port used when the configured host does not name one.
pub const DEFAULT_FTP_PORT: u16 = 21;

/// An open, not necessarily authenticated, session with the vault.
pub trait VaultSession {
    /// Fails with [`ExportError::Authentication`] when the login is rejected.
    fn login(&mut self, user: &str, password: &str) -> Result<()>;

    /// Let the server open the data port, which keeps uploads working behind NAT.
    fn enter_passive_mode(&mut self) -> Result<()>;

    /// Upload `reader` as binary content; returns the number of bytes sent.
    fn put_binary(&mut self, remote_name: &str, reader: &mut dyn Read) -> Result<u64>;

    /// End the session. Called exactly once, whatever happened before.
    fn close(&mut self);
}

/// Opens sessions with a vault host.
pub trait VaultConnector {
    /// Fails with [`ExportError::Connection`] when the host cannot be reached.
    fn connect(&self, host: &str, timeout: Option<Duration>) -> Result<Box<dyn VaultSession>>;
}

/// Closes the wrapped session when dropped.
struct OpenSession {
    host: String,
    inner: Box<dyn VaultSession>,
}

impl Drop for OpenSession {
    fn drop(&mut self) {
        self.inner.close();
        debug!(host = %self.host, "vault session closed");
    }
}

/// Push the archive at `path` to the vault as `remote_name`.
///
/// Credentials are checked before any network activity. Once a session is
/// open it is closed on every exit path, including failed logins and uploads.
pub fn deliver(
    connector: &dyn VaultConnector,
    path: &Path,
    credentials: &Credentials,
    remote_name: &str,
    timeout: Option<Duration>,
) -> Result<u64> {
    credentials.validate()?;

    let transfer_error = |reason: String| ExportError::Transfer {
        remote_name: remote_name.to_string(),
        reason,
    };
    let mut local = File::open(path).map_err(|err| transfer_error(err.to_string()))?;
    let expected = local
        .metadata()
        .map_err(|err| transfer_error(err.to_string()))?
        .len();

    info!(host = %credentials.server, "connecting to vault");
    let mut session = OpenSession {
        host: credentials.server.clone(),
        inner: connector.connect(&credentials.server, timeout)?,
    };
    session.inner.login(&credentials.user, &credentials.password)?;
    debug!(user = %credentials.user, "vault login accepted");
    session.inner.enter_passive_mode()?;

    let sent = session.inner.put_binary(remote_name, &mut local)?;
    if sent != expected {
        return Err(transfer_error(format!(
            "upload incomplete: sent {sent} of {expected} bytes"
        )));
    }

    info!(remote_name, bytes = sent, "batch uploaded to vault");
    Ok(sent)
}

/// Production connector speaking plain FTP.
#[derive(Clone, Copy, Debug, Default)]
pub struct FtpConnector;

impl VaultConnector for FtpConnector {
    fn connect(&self, host: &str, timeout: Option<Duration>) -> Result<Box<dyn VaultSession>> {
        let address = with_default_port(host);
        let connection_error = |reason: String| ExportError::Connection {
            host: host.to_string(),
            reason,
        };

        let stream = match timeout {
            Some(limit) => {
                let socket = address
                    .to_socket_addrs()
                    .map_err(|err| connection_error(err.to_string()))?
                    .next()
                    .ok_or_else(|| connection_error("host did not resolve".to_string()))?;
                FtpStream::connect_timeout(socket, limit)
            }
            None => FtpStream::connect(address.as_str()),
        }
        .map_err(|err| connection_error(err.to_string()))?;

        if let Some(limit) = timeout {
            let tcp = stream.get_ref();
            if let Err(err) = tcp
                .set_read_timeout(Some(limit))
                .and_then(|_| tcp.set_write_timeout(Some(limit)))
            {
                warn!(host, error = %err, "could not apply transfer timeout");
            }
        }

        Ok(Box::new(FtpSession { stream }))
    }
}

struct FtpSession {
    stream: FtpStream,
}

impl VaultSession for FtpSession {
    fn login(&mut self, user: &str, password: &str) -> Result<()> {
        self.stream
            .login(user, password)
            .map_err(|err| ExportError::Authentication {
                reason: err.to_string(),
            })
    }

    fn enter_passive_mode(&mut self) -> Result<()> {
        self.stream.set_mode(Mode::Passive);
        Ok(())
    }

    fn put_binary(&mut self, remote_name: &str, mut reader: &mut dyn Read) -> Result<u64> {
        let transfer_error = |err: suppaftp::FtpError| ExportError::Transfer {
            remote_name: remote_name.to_string(),
            reason: err.to_string(),
        };
        self.stream
            .transfer_type(FileType::Binary)
            .map_err(transfer_error)?;
        self.stream
            .put_file(remote_name, &mut reader)
            .map_err(transfer_error)
    }

    fn close(&mut self) {
        if let Err(err) = self.stream.quit() {
            debug!(error = %err, "vault did not acknowledge QUIT");
        }
    }
}

/// Append the standard FTP port unless the host already carries one.
fn with_default_port(host: &str) -> String {
    let host = host.trim();
    if let Some(rest) = host.strip_prefix('[') {
        // Bracketed IPv6, with or without a port.
        return if rest.contains("]:") {
            host.to_string()
        } else {
            format!("{host}:{DEFAULT_FTP_PORT}")
        };
    }
    match host.matches(':').count() {
        0 => format!("{host}:{DEFAULT_FTP_PORT}"),
        1 => host.to_string(),
        _ => format!("[{host}]:{DEFAULT_FTP_PORT}"),
    }
}

/// Transfer metadata sent ahead of a direct download.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadMeta {
    pub content_type: String,
    pub filename: String,
    /// Exact size of the archive in bytes.
    pub content_length: u64,
}

impl DownloadMeta {
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename={}", self.filename)
    }

    /// Header name/value pairs in the order they are emitted.
    pub fn headers(&self) -> [(&'static str, String); 3] {
        [
            ("content-type", self.content_type.clone()),
            ("content-disposition", self.content_disposition()),
            ("content-length", self.content_length.to_string()),
        ]
    }
}

/// Receiver of a direct download: metadata first, then the raw body.
pub trait ResponseSink: Write {
    fn begin_download(&mut self, meta: &DownloadMeta) -> io::Result<()>;
}

/// Stream the archive at `path` unchanged into `sink`, announced as `filename`.
pub fn stream_download(
    path: &Path,
    filename: &str,
    sink: &mut dyn ResponseSink,
) -> Result<DownloadMeta> {
    let mut file = File::open(path).map_err(ExportError::Stream)?;
    let content_length = file.metadata().map_err(ExportError::Stream)?.len();
    let meta = DownloadMeta {
        content_type: mime_guess::from_path(filename)
            .first_or_octet_stream()
            .to_string(),
        filename: filename.to_string(),
        content_length,
    };

    sink.begin_download(&meta).map_err(ExportError::Stream)?;
    let copied = io::copy(&mut file, sink).map_err(ExportError::Stream)?;
    sink.flush().map_err(ExportError::Stream)?;
    debug!(filename, bytes = copied, "archive streamed to caller");
    Ok(meta)
}
