use anyhow::{Context, Result};
use chrono::Local;
use std::fs;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

// @module: File and artifact path utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Append content to a log file with timestamp
    pub fn append_to_log_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file: {:?}", path.as_ref()))?;

        writeln!(file, "[{}] {}", timestamp, content)
            .with_context(|| format!("Failed to write to log file: {:?}", path.as_ref()))?;

        Ok(())
    }
}

/// Derived paths for every artifact of one document's translation run.
///
/// All names are derived from the input filename with fixed suffixes so a
/// run never clobbers its input: masked document gets the target language
/// tag, the pairs files get `_extracted` / `_translated`, the final
/// document gets `_merged`, and the diagnostic log gets a `.log` extension.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    /// Source document with all unit text replaced by identifiers
    pub masked_document: PathBuf,
    /// Extracted (identifier, original text) pairs
    pub extracted_pairs: PathBuf,
    /// Translated (identifier, text) pairs
    pub translated_pairs: PathBuf,
    /// Final document with translations merged back in
    pub merged_document: PathBuf,
    /// Audit log for suspicious delimiter parity
    pub audit_log: PathBuf,
}

impl ArtifactPaths {
    /// Derive all artifact paths for an input document and target language
    pub fn for_input<P: AsRef<Path>>(input: P, target_language: &str) -> Self {
        let input = input.as_ref();
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let dir = input.parent().unwrap_or(Path::new("")).to_path_buf();

        let masked_stem = format!("{}_{}", stem, target_language);
        Self {
            masked_document: dir.join(format!("{}.ipe", masked_stem)),
            extracted_pairs: dir.join(format!("{}_extracted.txt", stem)),
            translated_pairs: dir.join(format!("{}_extracted_translated.txt", stem)),
            merged_document: dir.join(format!("{}_merged.ipe", masked_stem)),
            audit_log: dir.join(format!("{}_extracted.log", stem)),
        }
    }
}
