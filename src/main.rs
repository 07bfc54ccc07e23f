// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    issuepack::app::run()
}
