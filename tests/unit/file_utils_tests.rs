/*!
 * Tests for file utility functions and artifact path derivation
 */

use std::path::PathBuf;

use anyhow::Result;

use crate::common;
use ipetrans::file_utils::{ArtifactPaths, FileManager};

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file =
        common::create_test_file(&temp_dir.path().to_path_buf(), "exists.txt", "content")?;

    assert!(FileManager::file_exists(&test_file));

    Ok(())
}

/// Test that file_exists returns false for non-existent files
#[test]
fn test_file_exists_withNonExistentFile_shouldReturnFalse() {
    assert!(!FileManager::file_exists("non_existent_file.tmp"));
}

/// Test that write_to_file creates missing parent directories
#[test]
fn test_write_to_file_withMissingParentDir_shouldCreateIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("a/b/out.txt");

    FileManager::write_to_file(&nested, "hello")?;

    assert_eq!(FileManager::read_to_string(&nested)?, "hello");
    Ok(())
}

/// Test that append_to_log_file appends one timestamped line per call
#[test]
fn test_append_to_log_file_shouldAppendTimestampedLines() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let log_path = temp_dir.path().join("audit.log");

    FileManager::append_to_log_file(&log_path, "first finding")?;
    FileManager::append_to_log_file(&log_path, "second finding")?;

    let content = FileManager::read_to_string(&log_path)?;
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with('['));
    assert!(lines[0].ends_with("first finding"));
    assert!(lines[1].ends_with("second finding"));
    Ok(())
}

/// Test that artifact paths use the documented fixed suffixes
#[test]
fn test_artifact_paths_withTargetLanguage_shouldDeriveAllFiveNames() {
    let paths = ArtifactPaths::for_input("slides/slides07.ipe", "en");

    assert_eq!(paths.masked_document, PathBuf::from("slides/slides07_en.ipe"));
    assert_eq!(paths.extracted_pairs, PathBuf::from("slides/slides07_extracted.txt"));
    assert_eq!(
        paths.translated_pairs,
        PathBuf::from("slides/slides07_extracted_translated.txt")
    );
    assert_eq!(paths.merged_document, PathBuf::from("slides/slides07_en_merged.ipe"));
    assert_eq!(paths.audit_log, PathBuf::from("slides/slides07_extracted.log"));
}

/// Test that artifact paths follow the input's directory
#[test]
fn test_artifact_paths_withBareFilename_shouldStayInCurrentDir() {
    let paths = ArtifactPaths::for_input("deck.ipe", "fr");
    assert_eq!(paths.masked_document, PathBuf::from("deck_fr.ipe"));
    assert_eq!(paths.extracted_pairs, PathBuf::from("deck_extracted.txt"));
}
