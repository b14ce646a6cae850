/*!
 * Text extraction and document masking.
 *
 * The extractor walks the document depth-first in document order (page by
 * page, text node by text node), assigns each non-blank text node a fresh
 * identifier, and produces a masked copy of the document where every
 * extracted node holds its identifier instead of its text. Downstream log
 * correlation relies on this traversal order.
 */

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use crate::document::IpeDocument;
use crate::file_utils::{ArtifactPaths, FileManager};
use crate::pairs::{format_extracted, generate_identifier, TextUnit, UnitLocation};

/// Output of one extraction run
#[derive(Debug)]
pub struct ExtractionResult {
    /// The document with extracted text replaced by identifiers
    pub masked: IpeDocument,
    /// Extracted units in traversal order
    pub units: Vec<TextUnit>,
}

/// Extract up to `max_units` text units from a document.
///
/// Once the cap is reached the remaining text nodes keep their original
/// text unmodified, so a small cap yields a deterministic partial mask
/// rather than an error.
pub fn extract_units(doc: &IpeDocument, max_units: Option<usize>) -> ExtractionResult {
    let cap = max_units.unwrap_or(usize::MAX);
    let mut masked = doc.clone();
    let mut units: Vec<TextUnit> = Vec::new();
    let mut used_identifiers: HashSet<String> = HashSet::new();
    let mut cap_reached = false;

    masked.for_each_text_element_located_mut(|page, index, elem| {
        let original_text = elem.text_content();
        if original_text.trim().is_empty() {
            return;
        }
        if units.len() >= cap {
            if !cap_reached {
                info!("Reached maximum of {} units, leaving the rest untouched", cap);
                cap_reached = true;
            }
            return;
        }

        let identifier = generate_identifier(&mut used_identifiers);
        elem.set_text(identifier.clone());
        units.push(TextUnit {
            identifier,
            original_text,
            location: UnitLocation { page, index },
        });
    });

    ExtractionResult { masked, units }
}

/// Extract a document from disk and persist both artifacts: the masked
/// document and the extracted pairs file.
pub fn extract_file<P: AsRef<Path>>(
    input: P,
    paths: &ArtifactPaths,
    max_units: Option<usize>,
) -> Result<ExtractionResult> {
    let input = input.as_ref();
    info!("Extracting text from {:?}", input);

    let doc = IpeDocument::parse_file(input)
        .with_context(|| format!("Failed to parse document: {:?}", input))?;
    let result = extract_units(&doc, max_units);

    result
        .masked
        .write_file(&paths.masked_document)
        .with_context(|| format!("Failed to write masked document: {:?}", paths.masked_document))?;
    FileManager::write_to_file(&paths.extracted_pairs, &format_extracted(&result.units))?;

    info!(
        "Extracted {} units, masked document saved to {:?}, pairs saved to {:?}",
        result.units.len(),
        paths.masked_document,
        paths.extracted_pairs
    );

    Ok(result)
}
