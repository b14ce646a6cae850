/*!
 * # ipetrans - AI translation for Ipe slide documents
 *
 * A Rust library for translating the text labels of Ipe vector-graphics
 * slide decks with an LLM while preserving all graphical layout.
 *
 * ## Features
 *
 * - Extract text labels from `.ipe` documents into identifier-keyed pairs
 * - Translate pairs in batches using an OpenAI-compatible backend
 * - Merge translations back without disturbing any non-text structure
 * - Fall back to the original text whenever a translation cannot be
 *   recovered from the backend reply
 * - Deterministic mock backend for offline and debug runs
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `document`: Ipe XML document model and traversal
 * - `pairs`: Text units, identifiers and the pairs file format
 * - `extractor`: Document masking and unit extraction
 * - `translator`: Batch translation, reply recovery and auditing
 * - `merger`: Re-insertion of translated text
 * - `file_utils`: File system operations and artifact paths
 * - `app_controller`: Workflow sequencing
 * - `providers`: Backend client implementations:
 *   - `providers::openai`: OpenAI-compatible API client
 *   - `providers::mock`: Deterministic offline backend
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod document;
pub mod errors;
pub mod extractor;
pub mod file_utils;
pub mod merger;
pub mod pairs;
pub mod providers;
pub mod translator;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use document::IpeDocument;
pub use errors::{AppError, DocumentError, ProviderError};
pub use pairs::{TextUnit, TranslationPair};
pub use translator::TranslationService;
