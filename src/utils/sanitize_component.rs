// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Turn free-form journal settings into safe filename components.

/// Component used when a value sanitizes to nothing.
pub const FALLBACK_COMPONENT: &str = "journal";

/// Produce a single filesystem- and FTP-safe path component.
///
/// # Steps
/// - Transliterate Unicode to ASCII with `deunicode` (e.g., "Å" → "A").
/// - Keep ASCII alphanumerics plus `-`, `_` and `.`; everything else becomes `_`.
/// - Collapse runs of `_` and `.`, then trim them from both ends.
/// - Fall back to [`FALLBACK_COMPONENT`] when nothing is left.
///
/// Case is preserved so that journal acronyms stay recognizable in batch names.
pub fn sanitize_component(value: &str) -> String {
    let transliterated = deunicode::deunicode(value);
    let mut out = String::with_capacity(transliterated.len());
    let mut last: Option<char> = None;

    for ch in transliterated.chars() {
        let mapped = if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || ch == '.' {
            ch
        } else {
            '_'
        };

        if matches!(mapped, '_' | '.') && last == Some(mapped) {
            continue;
        }
        out.push(mapped);
        last = Some(mapped);
    }

    let trimmed = out.trim_matches(|c| c == '_' || c == '.');
    if trimmed.is_empty() {
        FALLBACK_COMPONENT.to_string()
    } else {
        trimmed.to_string()
    }
}
