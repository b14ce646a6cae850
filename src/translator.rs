/*!
 * Batch translation of extracted text units.
 *
 * Units are partitioned into fixed-size contiguous batches; each batch is
 * one backend call. The backend reply is free-form prose with embedded
 * identifier lines, so recovery goes through a tolerant line parser and
 * every unit ends up with an explicit outcome: translated, per-unit
 * fallback when its identifier never appeared in the reply, or whole-batch
 * fallback when the call itself failed. A unit is never dropped and a
 * failed batch never aborts the run.
 */

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{error, info, warn};

use crate::app_config::{Config, TranslationProvider};
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::pairs::{format_translated, PairRecord, TranslationPair, IDENTIFIER_REGEX};
use crate::providers::mock::MockBackend;
use crate::providers::openai::OpenAI;
use crate::providers::{Backend, ChatRequest};

/// Reserved delimiter whose per-line parity is audited after translation.
/// An odd count of `$` on a line is a likely sign of broken LaTeX math
/// markup from truncation or escaping errors.
pub const RESERVED_DELIMITER: char = '$';

/// How a unit's final text came to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// The backend reply contained this unit's identifier
    Translated,
    /// The identifier was absent from an otherwise usable reply; the
    /// original text was kept
    MissingFromReply,
    /// The whole batch call failed; the original text was kept
    BatchFailed,
}

/// Final result for one unit, tagged with how it was obtained so callers
/// cannot mistake a fallback for a translation
#[derive(Debug, Clone)]
pub struct TranslationOutcome {
    /// The unit's identifier and final text
    pub pair: TranslationPair,
    /// Success or fallback tag
    pub disposition: Disposition,
}

/// Counts of outcome dispositions for an end-of-run summary
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TranslationSummary {
    /// Units with a recovered translation
    pub translated: usize,
    /// Units that fell back because their identifier was missing from a reply
    pub missing_from_reply: usize,
    /// Units that fell back because their batch call failed
    pub batch_failed: usize,
}

impl TranslationSummary {
    /// Total number of units processed
    pub fn total(&self) -> usize {
        self.translated + self.missing_from_reply + self.batch_failed
    }
}

/// One audit finding: a line whose reserved-delimiter count is odd
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditFinding {
    /// Identifier of the entry the line belongs to
    pub identifier: String,
    /// The line preceding the offending one (the identifier line for the
    /// first line of an entry)
    pub previous_line: String,
    /// The offending line
    pub line: String,
    /// Number of reserved delimiters on the line
    pub count: usize,
}

/// Translation service driving a backend over batches of units
pub struct TranslationService {
    backend: Box<dyn Backend>,
    config: Config,
}

impl TranslationService {
    /// Create a service from configuration.
    ///
    /// Selecting a real backend without an API key is fatal here, before
    /// any work begins, since no fallback is possible without a backend.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let backend: Box<dyn Backend> = match config.translation.provider {
            TranslationProvider::Mock => Box::new(MockBackend::working()),
            TranslationProvider::OpenAI => {
                let api_key = config.translation.resolve_api_key().ok_or_else(|| {
                    AppError::MissingApiKey(
                        "OpenAI API key is required. Pass --api-key, set it in the config file, \
                         or set the OPENAI_API_KEY environment variable."
                            .to_string(),
                    )
                })?;
                Box::new(OpenAI::new(
                    api_key,
                    config.translation.endpoint.clone(),
                    config.translation.model.clone(),
                    config.translation.temperature,
                    config.translation.timeout_secs,
                )?)
            }
        };
        Ok(Self::with_backend(config.clone(), backend))
    }

    /// Create a service with an explicit backend (used by tests and debug mode)
    pub fn with_backend(config: Config, backend: Box<dyn Backend>) -> Self {
        Self { backend, config }
    }

    /// Short name of the active backend
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Translate records batch by batch, strictly sequentially.
    ///
    /// The returned outcomes cover every input record exactly once; order
    /// follows the input, though the merger re-associates by identifier and
    /// does not rely on it.
    pub async fn translate_records(&self, records: &[PairRecord]) -> Vec<TranslationOutcome> {
        let batch_size = self.config.translation.batch_size.max(1);
        let delay = Duration::from_millis(self.config.translation.rate_limit_delay_ms);
        let total_batches = records.len().div_ceil(batch_size);
        let mut outcomes: Vec<TranslationOutcome> = Vec::with_capacity(records.len());

        info!(
            "Translating {} units in {} batches of up to {} via {}",
            records.len(),
            total_batches,
            batch_size,
            self.backend.name()
        );

        for (batch_idx, batch) in records.chunks(batch_size).enumerate() {
            // Pace real backends between successive calls
            if batch_idx > 0 && !self.backend.is_offline() && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            info!(
                "Batch {}/{}: sending {} units",
                batch_idx + 1,
                total_batches,
                batch.len()
            );

            let request = self.build_request(batch);
            match self.backend.chat(&request).await {
                Ok(reply) => {
                    let translations = parse_reply(&reply);
                    for record in batch {
                        match translations.get(&record.identifier) {
                            Some(text) => outcomes.push(TranslationOutcome {
                                pair: TranslationPair {
                                    identifier: record.identifier.clone(),
                                    translated_text: text.clone(),
                                },
                                disposition: Disposition::Translated,
                            }),
                            None => {
                                warn!(
                                    "Could not find translation for {}, using original text",
                                    record.identifier
                                );
                                outcomes.push(TranslationOutcome {
                                    pair: TranslationPair {
                                        identifier: record.identifier.clone(),
                                        translated_text: record.text.clone(),
                                    },
                                    disposition: Disposition::MissingFromReply,
                                });
                            }
                        }
                    }
                }
                Err(e) => {
                    error!(
                        "Error processing batch {}/{}: {}. Using original text for the whole batch.",
                        batch_idx + 1,
                        total_batches,
                        e
                    );
                    for record in batch {
                        outcomes.push(TranslationOutcome {
                            pair: TranslationPair {
                                identifier: record.identifier.clone(),
                                translated_text: record.text.clone(),
                            },
                            disposition: Disposition::BatchFailed,
                        });
                    }
                }
            }
        }

        outcomes
    }

    /// Translate a persisted pairs file and write the translated pairs and
    /// the audit log next to it. Returns the outcomes for reporting.
    pub async fn translate_pairs_file<P: AsRef<Path>>(
        &self,
        extracted_path: P,
        translated_path: P,
        audit_log_path: P,
    ) -> Result<Vec<TranslationOutcome>> {
        let records = crate::pairs::read_pairs_file(extracted_path.as_ref())?;
        info!("Found {} valid entries to translate", records.len());

        let outcomes = self.translate_records(&records).await;

        let pairs: Vec<TranslationPair> = outcomes.iter().map(|o| o.pair.clone()).collect();
        FileManager::write_to_file(translated_path.as_ref(), &format_translated(&pairs))
            .with_context(|| format!("Failed to write translated pairs: {:?}", translated_path.as_ref()))?;
        info!("Translations saved to {:?}", translated_path.as_ref());

        let findings = audit_delimiter_parity(&outcomes);
        if !findings.is_empty() {
            warn!(
                "{} line(s) with an odd {} count, see {:?}",
                findings.len(),
                RESERVED_DELIMITER,
                audit_log_path.as_ref()
            );
            write_audit_log(audit_log_path.as_ref(), &findings)?;
        }

        let summary = summarize(&outcomes);
        info!(
            "Translation complete: {} translated, {} missing-from-reply fallbacks, {} batch-failure fallbacks",
            summary.translated, summary.missing_from_reply, summary.batch_failed
        );

        Ok(outcomes)
    }

    /// Build the backend request for one batch
    fn build_request(&self, batch: &[PairRecord]) -> ChatRequest {
        let source = &self.config.source_language;
        let target = &self.config.target_language;
        let system_prompt = self.config.translation.rendered_system_prompt(source, target);

        let mut user_prompt = format!(
            "Translate each of the following {} texts to {}, preserving all LaTeX commands and \
             formatting exactly as they appear in the original text. Do not add or remove any $ \
             symbols under any circumstances. Ensure all braces {{}}, brackets [] and parentheses \
             () remain exactly as in the original text. Each text has a unique ID and must be \
             returned with that exact same ID.\n\n",
            source, target
        );
        for record in batch {
            user_prompt.push_str(&record.identifier);
            user_prompt.push('\n');
            user_prompt.push_str(&record.text);
            user_prompt.push_str("\n\n");
        }
        user_prompt.push_str(
            "For each text above, provide the translation with the exact same ID format:\n\n\
             [ID]\n[Your translation]\n\n\
             Keep each ID exactly as provided. Make sure every original text has a corresponding translation.",
        );

        ChatRequest {
            system_prompt,
            user_prompt,
            units: batch
                .iter()
                .map(|r| (r.identifier.clone(), r.text.clone()))
                .collect(),
        }
    }
}

/// Parse a free-form backend reply into (identifier, translation) entries.
///
/// A line containing an identifier resets the current identifier and starts
/// a fresh accumulation buffer; other lines append to the buffer. Lines
/// before the first identifier line are discarded. Buffers are finalized
/// (trimmed) at the next identifier line or end of reply; entries that end
/// up empty are treated as unresolved so the fallback path handles them.
pub fn parse_reply(reply: &str) -> HashMap<String, String> {
    let mut translations: HashMap<String, String> = HashMap::new();
    let mut current_id: Option<String> = None;
    let mut buffer: Vec<&str> = Vec::new();

    let mut finalize =
        |id: Option<String>, buffer: &mut Vec<&str>, translations: &mut HashMap<String, String>| {
            if let Some(identifier) = id {
                let text = buffer.join("\n").trim().to_string();
                if !text.is_empty() {
                    translations.insert(identifier, text);
                }
            }
            buffer.clear();
        };

    for line in reply.lines() {
        if let Some(m) = IDENTIFIER_REGEX.find(line) {
            finalize(current_id.take(), &mut buffer, &mut translations);
            current_id = Some(m.as_str().to_string());
        } else if current_id.is_some() {
            buffer.push(line);
        }
    }
    finalize(current_id, &mut buffer, &mut translations);

    translations
}

/// Count outcomes per disposition
pub fn summarize(outcomes: &[TranslationOutcome]) -> TranslationSummary {
    let mut summary = TranslationSummary::default();
    for outcome in outcomes {
        match outcome.disposition {
            Disposition::Translated => summary.translated += 1,
            Disposition::MissingFromReply => summary.missing_from_reply += 1,
            Disposition::BatchFailed => summary.batch_failed += 1,
        }
    }
    summary
}

/// Scan every outcome's entry line by line for an odd count of the reserved
/// delimiter. Purely diagnostic; findings never fail the run.
pub fn audit_delimiter_parity(outcomes: &[TranslationOutcome]) -> Vec<AuditFinding> {
    let mut findings = Vec::new();
    for outcome in outcomes {
        let mut previous_line = outcome.pair.identifier.clone();
        for line in outcome.pair.translated_text.lines() {
            let count = line.matches(RESERVED_DELIMITER).count();
            if count % 2 != 0 {
                findings.push(AuditFinding {
                    identifier: outcome.pair.identifier.clone(),
                    previous_line: previous_line.clone(),
                    line: line.to_string(),
                    count,
                });
            }
            previous_line = line.to_string();
        }
    }
    findings
}

/// Append audit findings to the diagnostic log
pub fn write_audit_log(path: &Path, findings: &[AuditFinding]) -> Result<()> {
    for finding in findings {
        FileManager::append_to_log_file(
            path,
            &format!(
                "{}\n{} {}'s: {}",
                finding.previous_line, finding.count, RESERVED_DELIMITER, finding.line
            ),
        )?;
    }
    Ok(())
}
