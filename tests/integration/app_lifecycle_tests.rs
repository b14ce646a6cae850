/*!
 * Integration tests for the application controller lifecycle
 */

use std::fs;

use anyhow::Result;

use crate::common;
use ipetrans::app_controller::Controller;
use ipetrans::file_utils::FileManager;
use ipetrans::providers::mock::MOCK_TRANSLATION_PREFIX;

/// Test that a debug-mode run produces every persisted artifact
#[tokio::test]
async fn test_run_withDebugMode_shouldProduceAllArtifacts() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_ipe(&temp_dir.path().to_path_buf(), "slides07.ipe")?;

    let controller = Controller::with_config(common::test_config())?;
    let merged = controller.run(&input, true).await?;

    assert_eq!(merged, temp_dir.path().join("slides07_en_merged.ipe"));
    assert!(FileManager::file_exists(temp_dir.path().join("slides07_en.ipe")));
    assert!(FileManager::file_exists(temp_dir.path().join("slides07_extracted.txt")));
    assert!(FileManager::file_exists(temp_dir.path().join("slides07_extracted_translated.txt")));

    let merged_content = FileManager::read_to_string(&merged)?;
    assert!(merged_content.contains(MOCK_TRANSLATION_PREFIX));
    // The input itself must never be rewritten
    assert_eq!(FileManager::read_to_string(&input)?, common::SAMPLE_IPE);
    Ok(())
}

/// Test that the stage commands compose into the same pipeline
#[tokio::test]
async fn test_stage_commands_shouldComposeIntoFullPipeline() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_ipe(&temp_dir.path().to_path_buf(), "slides07.ipe")?;
    let controller = Controller::with_config(common::test_config())?;

    let extracted = controller.extract(&input)?;
    assert_eq!(extracted, temp_dir.path().join("slides07_extracted.txt"));

    let translated = controller.translate(&extracted, true).await?;
    assert_eq!(translated, temp_dir.path().join("slides07_extracted_translated.txt"));

    let masked = temp_dir.path().join("slides07_en.ipe");
    let merged = controller.merge(&masked, &translated)?;
    assert_eq!(merged, temp_dir.path().join("slides07_en_merged.ipe"));
    assert!(FileManager::read_to_string(&merged)?.contains(MOCK_TRANSLATION_PREFIX));
    Ok(())
}

/// Test that a range run skips missing slide files but processes the rest
#[tokio::test]
async fn test_run_range_withMissingFiles_shouldSkipThem() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    common::create_test_ipe(&dir, "slides04.ipe")?;
    common::create_test_ipe(&dir, "slides06.ipe")?;

    let controller = Controller::with_config(common::test_config())?;
    controller.run_range(&dir, 4, 6, true).await?;

    assert!(FileManager::file_exists(dir.join("slides04_en_merged.ipe")));
    assert!(!FileManager::file_exists(dir.join("slides05_en_merged.ipe")));
    assert!(FileManager::file_exists(dir.join("slides06_en_merged.ipe")));
    Ok(())
}

/// Test that a corrupt slide does not abort the remainder of a range
#[tokio::test]
async fn test_run_range_withCorruptSlide_shouldContinue() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    common::create_test_file(&dir, "slides04.ipe", "<ipe><unclosed")?;
    common::create_test_ipe(&dir, "slides05.ipe")?;

    let controller = Controller::with_config(common::test_config())?;
    controller.run_range(&dir, 4, 5, true).await?;

    assert!(!FileManager::file_exists(dir.join("slides04_en_merged.ipe")));
    assert!(FileManager::file_exists(dir.join("slides05_en_merged.ipe")));
    Ok(())
}

/// Test that a run against a missing input file fails up front
#[tokio::test]
async fn test_run_withMissingInput_shouldFail() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::with_config(common::test_config())?;
    let result = controller.run(&temp_dir.path().join("nope.ipe"), true).await;
    assert!(result.is_err());
    Ok(())
}

/// Test that an invalid configuration is rejected at controller creation
#[test]
fn test_with_config_withInvalidConfig_shouldFail() {
    let mut config = common::test_config();
    config.translation.batch_size = 0;
    assert!(Controller::with_config(config).is_err());
}

/// Test that a repeated debug run overwrites stale artifacts
#[tokio::test]
async fn test_run_twice_shouldOverwriteArtifacts() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_ipe(&temp_dir.path().to_path_buf(), "slides07.ipe")?;
    let controller = Controller::with_config(common::test_config())?;

    let merged = controller.run(&input, true).await?;
    let first = fs::metadata(&merged)?.len();
    let merged = controller.run(&input, true).await?;
    assert_eq!(fs::metadata(&merged)?.len(), first);
    Ok(())
}
