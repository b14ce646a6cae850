/*!
 * Common test utilities for the ipetrans test suite
 */

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use tempfile::TempDir;

use ipetrans::app_config::Config;

/// Initializes logging for test output, once per process
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// A small but realistic Ipe slide document: preamble, layers, math and
/// an empty text node
pub const SAMPLE_IPE: &str = r#"<?xml version="1.0"?>
<!DOCTYPE ipe SYSTEM "ipe.dtd">
<ipe version="70218" creator="Ipe 7.2.24">
<info created="D:20240101120000" modified="D:20240101120000"/>
<preamble>\usepackage[german]{babel}</preamble>
<page>
<layer name="alpha"/>
<text layer="alpha" pos="16 400" stroke="black" type="label">Kürzeste Wege</text>
<text layer="alpha" pos="16 380" stroke="black" type="label">Sei $G = (V, E)$ ein Graph</text>
<path layer="alpha" stroke="black">16 300 m 200 300 l</path>
<text layer="alpha" pos="16 360" stroke="black" type="label">   </text>
</page>
<page>
<layer name="alpha"/>
<text layer="alpha" pos="16 400" stroke="black" type="label">Laufzeit $O(n \log n)$</text>
</page>
</ipe>
"#;

/// Creates a sample .ipe document for testing
pub fn create_test_ipe(dir: &PathBuf, filename: &str) -> Result<PathBuf> {
    create_test_file(dir, filename, SAMPLE_IPE)
}

/// A config suitable for offline tests: no pacing, small batches
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.translation.rate_limit_delay_ms = 0;
    config.translation.batch_size = 10;
    config
}
