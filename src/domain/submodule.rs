//! Parsing of the `.gitmodules` submodule configuration file.

use crate::error::{ReleaseError, Result};

/// One `[submodule "<name>"]` section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmoduleEntry {
    pub section: String,
    pub path: String,
}

/// Parse `.gitmodules` content into its entries, in file order.
///
/// Keys are matched case-insensitively; `#` and `;` start comment lines.
/// Every section must carry a `path` key.
pub fn parse_gitmodules(content: &str) -> Result<Vec<SubmoduleEntry>> {
    let mut entries = Vec::new();
    let mut current: Option<(String, Option<String>)> = None;

    for (lineno, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let section = header
                .strip_suffix(']')
                .ok_or_else(|| malformed(lineno, raw))?
                .trim()
                .to_string();
            if let Some(done) = current.take() {
                entries.push(finish(done)?);
            }
            current = Some((section, None));
            continue;
        }

        let (key, value) = line.split_once('=').ok_or_else(|| malformed(lineno, raw))?;
        let Some((_, path)) = current.as_mut() else {
            return Err(malformed(lineno, raw));
        };
        if key.trim().eq_ignore_ascii_case("path") {
            *path = Some(unquote(value.trim()).to_string());
        }
    }

    if let Some(done) = current.take() {
        entries.push(finish(done)?);
    }

    Ok(entries)
}

fn finish((section, path): (String, Option<String>)) -> Result<SubmoduleEntry> {
    let path = path.ok_or_else(|| {
        ReleaseError::config(format!(".gitmodules section [{}] has no path", section))
    })?;
    Ok(SubmoduleEntry { section, path })
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

fn malformed(lineno: usize, line: &str) -> ReleaseError {
    ReleaseError::config(format!(
        ".gitmodules line {}: cannot parse '{}'",
        lineno + 1,
        line.trim()
    ))
}
