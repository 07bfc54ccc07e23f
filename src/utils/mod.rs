// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Shared helper utilities reused by the builder and the orchestrator.

pub mod hash;
pub mod sanitize_component;

/// Compute the SHA-256 hash of a file.
pub use hash::hash_file;
/// Sanitize journal settings into filesystem-safe path components.
pub use sanitize_component::sanitize_component;
