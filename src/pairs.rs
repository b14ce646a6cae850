/*!
 * Text units and the pairs file format.
 *
 * A text unit is one translatable span from the source document plus its
 * generated identifier. Units travel between pipeline stages through plain
 * UTF-8 "pairs files": one record per unit, records separated by a blank
 * line, each record starting with an identifier line. The extractor writes
 * `identifier|||first line` so that a multi-line original cannot be confused
 * with the identifier line; the translator writes `identifier` followed by
 * the text on the next line. The reader accepts both separators.
 */

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

/// Identifier lexeme accepted on read. Generation always produces the
/// stricter `TRANSLATE_` + 8 hex chars form, but replies and hand-edited
/// files are matched leniently.
pub static IDENTIFIER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"TRANSLATE_[A-Za-z0-9]+").unwrap());

/// Separator between identifier and first text line in extracted files
pub const FIELD_SEPARATOR: &str = "|||";

/// Location of a text unit inside the document tree. A position locator,
/// not an ownership pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitLocation {
    /// Zero-based page index
    pub page: usize,
    /// Zero-based text-node index within the page
    pub index: usize,
}

/// One translatable text span from the source document
#[derive(Debug, Clone)]
pub struct TextUnit {
    /// Opaque token, unique within a document
    pub identifier: String,
    /// Original text, may be multi-line and contain markup
    pub original_text: String,
    /// Where the unit came from
    pub location: UnitLocation,
}

/// Identifier plus final (translated or fallback) text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationPair {
    /// The unit's identifier
    pub identifier: String,
    /// Translated text, or the original text when translation could not
    /// be recovered
    pub translated_text: String,
}

impl fmt::Display for TranslationPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.identifier, self.translated_text)
    }
}

/// A record re-parsed from a persisted pairs file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairRecord {
    /// The unit's identifier
    pub identifier: String,
    /// The record's text, trimmed
    pub text: String,
}

/// Generate a fresh identifier that is not already in `used`.
///
/// The 8-hex-char suffix makes intra-document collisions negligible; the
/// set check turns "negligible" into "impossible" for one extraction run.
pub fn generate_identifier(used: &mut HashSet<String>) -> String {
    loop {
        let suffix: String = Uuid::new_v4().simple().to_string().chars().take(8).collect();
        let identifier = format!("TRANSLATE_{}", suffix);
        if used.insert(identifier.clone()) {
            return identifier;
        }
    }
}

/// True if the line opens a record: an identifier at the start of the line,
/// optionally followed by the field separator or whitespace.
fn identifier_at_line_start(line: &str) -> Option<&str> {
    let m = IDENTIFIER_REGEX.find(line)?;
    if m.start() != 0 {
        return None;
    }
    let rest = &line[m.end()..];
    if rest.is_empty() || rest.starts_with(FIELD_SEPARATOR) || rest.trim().is_empty() {
        Some(m.as_str())
    } else {
        None
    }
}

/// Parse the contents of a pairs file into records.
///
/// A new record starts at an identifier line that sits at a record boundary
/// (start of input, or immediately after a blank line). This keeps literal
/// `TRANSLATE_` substrings inside a unit's text from splitting the record.
/// Records whose text is empty after trimming are dropped with a warning.
pub fn parse_pairs(content: &str) -> Vec<PairRecord> {
    let mut records: Vec<PairRecord> = Vec::new();
    let mut current_id: Option<String> = None;
    let mut buffer: Vec<&str> = Vec::new();
    let mut at_boundary = true;

    let mut finalize = |id: Option<String>, buffer: &mut Vec<&str>, records: &mut Vec<PairRecord>| {
        if let Some(identifier) = id {
            let text = buffer.join("\n").trim().to_string();
            if text.is_empty() {
                warn!("Skipping empty text for {}", identifier);
            } else {
                records.push(PairRecord { identifier, text });
            }
        }
        buffer.clear();
    };

    for line in content.lines() {
        if at_boundary {
            if let Some(identifier) = identifier_at_line_start(line) {
                finalize(current_id.take(), &mut buffer, &mut records);
                current_id = Some(identifier.to_string());
                let rest = &line[identifier.len()..];
                if let Some(first) = rest.strip_prefix(FIELD_SEPARATOR) {
                    buffer.push(first);
                }
                at_boundary = false;
                continue;
            }
        }
        if current_id.is_some() {
            buffer.push(line);
        }
        at_boundary = line.trim().is_empty();
    }
    finalize(current_id, &mut buffer, &mut records);

    records
}

/// Read and parse a pairs file from disk
pub fn read_pairs_file<P: AsRef<Path>>(path: P) -> Result<Vec<PairRecord>> {
    let content = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read pairs file: {:?}", path.as_ref()))?;
    Ok(parse_pairs(&content))
}

/// Serialize extracted units: `identifier|||text`, blank line between records
pub fn format_extracted(units: &[TextUnit]) -> String {
    units
        .iter()
        .map(|u| format!("{}{}{}", u.identifier, FIELD_SEPARATOR, u.original_text))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Serialize translated pairs: identifier line, then the text, blank line
/// between records
pub fn format_translated(pairs: &[TranslationPair]) -> String {
    pairs
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join("\n\n")
}
