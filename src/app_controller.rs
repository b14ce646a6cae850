/*!
 * Application controller.
 *
 * Sequences the three pipeline stages for one document
 * (extract -> translate -> merge) and drives ranges of numbered slide
 * files. Stages communicate only through the persisted artifacts, so each
 * is also invocable on its own from the CLI.
 */

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use log::{error, info, warn};

use crate::app_config::Config;
use crate::errors::AppError;
use crate::extractor;
use crate::file_utils::{ArtifactPaths, FileManager};
use crate::merger;
use crate::providers::mock::MockBackend;
use crate::translator::TranslationService;

// @struct: Main application controller
pub struct Controller {
    // @field: Validated configuration
    config: Config,
}

impl Controller {
    // @creates: Controller with validated config
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    // @returns: The active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the complete workflow for one document and return the path of
    /// the merged output.
    pub async fn run<P: AsRef<Path>>(&self, input_file: P, debug_mode: bool) -> Result<PathBuf> {
        let input = input_file.as_ref();
        if !FileManager::file_exists(input) {
            return Err(anyhow!("Input file does not exist: {:?}", input));
        }

        // Built before any work so a missing credential aborts immediately
        let service = self.build_service(debug_mode)?;

        let paths = ArtifactPaths::for_input(input, &self.config.target_language);
        info!("=== Starting translation workflow for {:?} ===", input);
        info!(
            "Batch size: {}, max units: {}, backend: {}",
            self.config.translation.batch_size,
            self.config
                .translation
                .max_units
                .map_or("all".to_string(), |n| n.to_string()),
            service.backend_name()
        );

        info!("=== Step 1: extracting text ===");
        extractor::extract_file(input, &paths, self.config.translation.max_units)?;

        info!("=== Step 2: translating text ===");
        service
            .translate_pairs_file(&paths.extracted_pairs, &paths.translated_pairs, &paths.audit_log)
            .await?;

        info!("=== Step 3: merging translations ===");
        merger::merge_files(&paths.masked_document, &paths.translated_pairs, &paths.merged_document)?;

        info!("=== Workflow complete ===");
        info!("Final merged file: {:?}", paths.merged_document);

        Ok(paths.merged_document)
    }

    /// Run the workflow over `slidesNN.ipe` files in a directory for the
    /// inclusive index range. Missing files are skipped with a warning and
    /// per-file failures do not abort the range; only a missing credential
    /// does.
    pub async fn run_range<P: AsRef<Path>>(
        &self,
        dir: P,
        start: u32,
        end: u32,
        debug_mode: bool,
    ) -> Result<()> {
        let dir = dir.as_ref();
        info!("=== Starting batch translation of slides {:02} to {:02} ===", start, end);

        for slide_num in start..=end {
            let input = dir.join(format!("slides{:02}.ipe", slide_num));
            if !FileManager::file_exists(&input) {
                warn!("File {:?} not found, skipping", input);
                continue;
            }

            info!("=== Processing slide {:02} ===", slide_num);
            match self.run(&input, debug_mode).await {
                Ok(_) => info!("Successfully processed slide {:02}", slide_num),
                Err(e) => {
                    if matches!(e.downcast_ref::<AppError>(), Some(AppError::MissingApiKey(_))) {
                        return Err(e);
                    }
                    error!("Error processing slide {:02}: {}. Continuing with next slide.", slide_num, e);
                }
            }
        }

        info!("=== Completed batch translation of slides {:02} to {:02} ===", start, end);
        Ok(())
    }

    /// Extract stage only: mask the document and write the pairs file
    pub fn extract<P: AsRef<Path>>(&self, input_file: P) -> Result<PathBuf> {
        let input = input_file.as_ref();
        if !FileManager::file_exists(input) {
            return Err(anyhow!("Input file does not exist: {:?}", input));
        }
        let paths = ArtifactPaths::for_input(input, &self.config.target_language);
        extractor::extract_file(input, &paths, self.config.translation.max_units)?;
        Ok(paths.extracted_pairs)
    }

    /// Translate stage only: read a pairs file and write the translated
    /// pairs and audit log next to it
    pub async fn translate<P: AsRef<Path>>(&self, extracted_file: P, debug_mode: bool) -> Result<PathBuf> {
        let extracted = extracted_file.as_ref();
        if !FileManager::file_exists(extracted) {
            return Err(anyhow!("Pairs file does not exist: {:?}", extracted));
        }
        let service = self.build_service(debug_mode)?;

        let stem = extracted
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let dir = extracted.parent().unwrap_or(Path::new("")).to_path_buf();
        let translated = dir.join(format!("{}_translated.txt", stem));
        let audit_log = dir.join(format!("{}.log", stem));

        service
            .translate_pairs_file(extracted, translated.as_path(), audit_log.as_path())
            .await?;
        Ok(translated)
    }

    /// Merge stage only: combine a masked document with translated pairs
    pub fn merge<P: AsRef<Path>>(&self, masked_file: P, translated_file: P) -> Result<PathBuf> {
        let masked = masked_file.as_ref();
        let translated = translated_file.as_ref();
        for path in [masked, translated] {
            if !FileManager::file_exists(path) {
                return Err(anyhow!("Input file does not exist: {:?}", path));
            }
        }

        let stem = masked
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let dir = masked.parent().unwrap_or(Path::new("")).to_path_buf();
        let merged = dir.join(format!("{}_merged.ipe", stem));

        merger::merge_files(masked, translated, merged.as_path())?;
        Ok(merged)
    }

    fn build_service(&self, debug_mode: bool) -> Result<TranslationService, AppError> {
        if debug_mode {
            info!("=== Running in debug mode - no API calls will be made ===");
            return Ok(TranslationService::with_backend(
                self.config.clone(),
                Box::new(MockBackend::working()),
            ));
        }
        TranslationService::new(&self.config)
    }
}
