// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Shared test doubles for the delivery and export tests.

use std::cell::RefCell;
use std::io::{self, Read, Write};
use std::rc::Rc;
use std::time::Duration;

use crate::error::{ExportError, Result};
use crate::logic::delivery::{DownloadMeta, ResponseSink, VaultConnector, VaultSession};

/// What a recorded session was asked to do, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum SessionEvent {
    Connect(String),
    Login(String),
    Passive,
    Put(String, u64),
    Close,
}

/// Failures the fake vault should simulate.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Script {
    pub refuse_connect: bool,
    pub reject_login: bool,
    pub fail_upload: bool,
    pub truncate_upload: bool,
}

/// Connector that records every call instead of touching the network.
pub(crate) struct RecordingConnector {
    script: Script,
    events: Rc<RefCell<Vec<SessionEvent>>>,
}

impl RecordingConnector {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            events: Rc::default(),
        }
    }

    pub fn events(&self) -> Vec<SessionEvent> {
        self.events.borrow().clone()
    }
}

impl VaultConnector for RecordingConnector {
    fn connect(&self, host: &str, _timeout: Option<Duration>) -> Result<Box<dyn VaultSession>> {
        self.events
            .borrow_mut()
            .push(SessionEvent::Connect(host.to_string()));
        if self.script.refuse_connect {
            return Err(ExportError::Connection {
                host: host.to_string(),
                reason: "connection refused".into(),
            });
        }
        Ok(Box::new(RecordingSession {
            script: self.script,
            events: Rc::clone(&self.events),
        }))
    }
}

struct RecordingSession {
    script: Script,
    events: Rc<RefCell<Vec<SessionEvent>>>,
}

impl VaultSession for RecordingSession {
    fn login(&mut self, user: &str, _password: &str) -> Result<()> {
        self.events
            .borrow_mut()
            .push(SessionEvent::Login(user.to_string()));
        if self.script.reject_login {
            return Err(ExportError::Authentication {
                reason: "530 Login incorrect".into(),
            });
        }
        Ok(())
    }

    fn enter_passive_mode(&mut self) -> Result<()> {
        self.events.borrow_mut().push(SessionEvent::Passive);
        Ok(())
    }

    fn put_binary(&mut self, remote_name: &str, reader: &mut dyn Read) -> Result<u64> {
        if self.script.fail_upload {
            return Err(ExportError::Transfer {
                remote_name: remote_name.to_string(),
                reason: "553 Could not create file".into(),
            });
        }
        let mut body = Vec::new();
        let read = reader.read_to_end(&mut body).map_err(ExportError::Stream)? as u64;
        let sent = if self.script.truncate_upload {
            read / 2
        } else {
            read
        };
        self.events
            .borrow_mut()
            .push(SessionEvent::Put(remote_name.to_string(), sent));
        Ok(sent)
    }

    fn close(&mut self) {
        self.events.borrow_mut().push(SessionEvent::Close);
    }
}

/// In-memory download receiver.
#[derive(Debug, Default)]
pub(crate) struct BufferSink {
    pub meta: Option<DownloadMeta>,
    pub body: Vec<u8>,
}

impl Write for BufferSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.body.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl ResponseSink for BufferSink {
    fn begin_download(&mut self, meta: &DownloadMeta) -> io::Result<()> {
        self.meta = Some(meta.clone());
        Ok(())
    }
}
