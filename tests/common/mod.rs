//! Test utilities shared by the rich-text normalization test suite

use anyhow::Result;
use kodegen_tools_richtext::{
    LineBreakMode, NormalizerConfig, PassthroughSanitizer, RichTextNormalizer,
};
use std::path::PathBuf;
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

/// Install a `RUST_LOG`-driven subscriber once per test binary
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Normalizer whose line-break formatting is active in `mode`
#[allow(dead_code)]
pub fn normalizer_with_mode(mode: LineBreakMode) -> Result<RichTextNormalizer> {
    let config = NormalizerConfig::builder()
        .preserve_line_breaks(false)
        .line_break_mode(mode)
        .build()?;
    Ok(RichTextNormalizer::new(config))
}

/// Normalize with the default config and no sanitizing
#[allow(dead_code)]
pub fn normalize_default(html: &str) -> Result<String> {
    Ok(RichTextNormalizer::default().normalize(html, &PassthroughSanitizer)?)
}

/// Write `json` to a config file inside a fresh temp dir
#[allow(dead_code)]
pub fn write_config(json: &str) -> Result<(TempDir, PathBuf)> {
    let dir = TempDir::new()?;
    let path = dir.path().join("normalizer.json");
    std::fs::write(&path, json)?;
    Ok((dir, path))
}
