/*!
 * Merging translated pairs back into the masked document.
 *
 * Lookup is exact trimmed string equality between a text node's content and
 * a pair's identifier. Nodes that match nothing are left untouched and
 * reported; a missing translation never fails the merge.
 */

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use anyhow::{Context, Result};
use log::{info, warn};

use crate::document::IpeDocument;
use crate::pairs::{PairRecord, TranslationPair};

/// Result of one merge run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    /// Number of text nodes replaced
    pub replaced: usize,
    /// Trimmed contents of non-blank nodes that matched no pair,
    /// deduplicated and sorted
    pub unresolved: Vec<String>,
}

/// Replace every text node whose trimmed content equals a known identifier
/// with that identifier's translated text.
pub fn merge_translations(masked: &IpeDocument, pairs: &[TranslationPair]) -> (IpeDocument, MergeReport) {
    let mut lookup: HashMap<&str, &str> = HashMap::with_capacity(pairs.len());
    for pair in pairs {
        if lookup
            .insert(pair.identifier.as_str(), pair.translated_text.as_str())
            .is_some()
        {
            warn!("Duplicate translation for {}, keeping the last one", pair.identifier);
        }
    }

    let mut merged = masked.clone();
    let mut replaced = 0usize;
    let mut unresolved: BTreeSet<String> = BTreeSet::new();

    merged.for_each_text_element_mut(|elem| {
        let content = elem.text_content();
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return;
        }
        match lookup.get(trimmed) {
            Some(translation) => {
                elem.set_text(*translation);
                replaced += 1;
            }
            None => {
                unresolved.insert(trimmed.to_string());
            }
        }
    });

    let report = MergeReport {
        replaced,
        unresolved: unresolved.into_iter().collect(),
    };
    (merged, report)
}

/// Merge a masked document file with a translated pairs file and write the
/// merged document. Returns the report for the caller's summary.
pub fn merge_files<P: AsRef<Path>>(
    masked_path: P,
    translated_path: P,
    merged_path: P,
) -> Result<MergeReport> {
    let masked = IpeDocument::parse_file(masked_path.as_ref())
        .with_context(|| format!("Failed to parse masked document: {:?}", masked_path.as_ref()))?;
    let records = crate::pairs::read_pairs_file(translated_path.as_ref())?;
    let pairs: Vec<TranslationPair> = records
        .into_iter()
        .map(|PairRecord { identifier, text }| TranslationPair {
            identifier,
            translated_text: text,
        })
        .collect();
    info!("Loaded {} translations", pairs.len());

    let (merged, report) = merge_translations(&masked, &pairs);

    if !report.unresolved.is_empty() {
        warn!("Could not find translations for these identifiers:");
        for identifier in &report.unresolved {
            warn!("  - {}", identifier);
        }
    }
    info!("Replaced {} text elements", report.replaced);

    merged
        .write_file(merged_path.as_ref())
        .with_context(|| format!("Failed to write merged document: {:?}", merged_path.as_ref()))?;
    info!("Merged file saved to {:?}", merged_path.as_ref());

    Ok(report)
}
