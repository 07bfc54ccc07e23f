// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Domain layer: journal records, the context they live in, and vault credentials.

pub mod catalog;
pub mod context;
pub mod credentials;

pub use catalog::{Article, Galley, Issue, PublicationStatus, SubmissionFile};
pub use context::JournalContext;
pub use credentials::Credentials;
