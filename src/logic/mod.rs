// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Export pipeline: archive assembly, delivery and the orchestrator tying them together.

pub mod archive;
pub mod delivery;
pub mod export;

#[cfg(test)]
pub(crate) mod test_support;
