/*!
 * Tests for the persisted pairs file format
 */

use anyhow::Result;

use crate::common;
use ipetrans::pairs::{format_translated, read_pairs_file, TranslationPair};

/// Test that a pairs file written in the extracted format reads back
#[test]
fn test_read_pairs_file_withExtractedFormat_shouldParseRecords() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let content = "TRANSLATE_ab12cd34|||Kürzeste Wege\n\nTRANSLATE_ef56ab78|||Sei $G = (V, E)$ ein Graph";
    let path = common::create_test_file(&temp_dir.path().to_path_buf(), "extracted.txt", content)?;

    let records = read_pairs_file(&path)?;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].identifier, "TRANSLATE_ab12cd34");
    assert_eq!(records[1].text, "Sei $G = (V, E)$ ein Graph");
    Ok(())
}

/// Test that a pairs file written in the translated format reads back
#[test]
fn test_read_pairs_file_withTranslatedFormat_shouldParseRecords() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let pairs = vec![
        TranslationPair {
            identifier: "TRANSLATE_ab12cd34".to_string(),
            translated_text: "Shortest paths".to_string(),
        },
        TranslationPair {
            identifier: "TRANSLATE_ef56ab78".to_string(),
            translated_text: "Let $G = (V, E)$ be a graph".to_string(),
        },
    ];
    let path = common::create_test_file(
        &temp_dir.path().to_path_buf(),
        "translated.txt",
        &format_translated(&pairs),
    )?;

    let records = read_pairs_file(&path)?;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].text, "Shortest paths");
    assert_eq!(records[1].identifier, "TRANSLATE_ef56ab78");
    Ok(())
}

/// Test that reading a missing pairs file is an error, not an empty result
#[test]
fn test_read_pairs_file_withMissingFile_shouldFail() {
    assert!(read_pairs_file("does/not/exist.txt").is_err());
}
