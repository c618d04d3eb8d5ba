// Category CLI: Rich-text normalization
//
// Reads author-entered HTML on stdin and writes normalized HTML to stdout.
// An optional first argument names a JSON normalizer config file.

use anyhow::{Context, Result};
use kodegen_tools_richtext::{NormalizerConfig, PassthroughSanitizer, RichTextNormalizer};
use std::io::{Read, Write};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => NormalizerConfig::from_json_file(&path)
            .with_context(|| format!("Failed to load normalizer config from {path}"))?,
        None => NormalizerConfig::default(),
    };
    log::info!(
        "Normalizing with line break mode '{}'",
        config.effective_line_break_mode()
    );

    let mut html = String::new();
    std::io::stdin()
        .read_to_string(&mut html)
        .context("Failed to read HTML from stdin")?;

    let normalizer = RichTextNormalizer::new(config);
    let normalized = normalizer
        .normalize_async(&html, &PassthroughSanitizer)
        .await?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{normalized}")?;
    Ok(())
}
