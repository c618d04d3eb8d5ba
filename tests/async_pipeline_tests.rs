//! Async entry points and sanitizer integration

use anyhow::Result;
use kodegen_tools_richtext::{
    AsyncHtmlSanitizer, HtmlSanitizer, NormalizeError, NormalizeResult, PassthroughSanitizer,
    RichTextNormalizer,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

mod common;

/// Sanitizer that yields to the runtime before answering
struct YieldingSanitizer {
    calls: AtomicUsize,
}

impl AsyncHtmlSanitizer for YieldingSanitizer {
    async fn sanitize_async(&self, html: String) -> NormalizeResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        Ok(html.replace("<b>", "<strong>").replace("</b>", "</strong>"))
    }
}

struct PanickingSanitizer;

impl HtmlSanitizer for PanickingSanitizer {
    fn sanitize(&self, _html: &str) -> NormalizeResult<String> {
        panic!("sanitizer crashed");
    }
}

#[tokio::test]
async fn test_async_sanitizer_is_awaited() -> Result<()> {
    common::init_tracing();
    let sanitizer = YieldingSanitizer {
        calls: AtomicUsize::new(0),
    };
    let normalizer = RichTextNormalizer::default();
    let result = normalizer
        .normalize_async("<div>Bold: <b>yes</b>,ok 😎</div>", &sanitizer)
        .await?;
    assert_eq!(result, "<p>Bold: <strong>yes</strong>, ok 😎</p>");
    assert_eq!(sanitizer.calls.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn test_blank_input_skips_async_sanitizer() -> Result<()> {
    let sanitizer = YieldingSanitizer {
        calls: AtomicUsize::new(0),
    };
    let result = RichTextNormalizer::default().normalize_async("\n\n", &sanitizer).await?;
    assert_eq!(result, "");
    assert_eq!(sanitizer.calls.load(Ordering::SeqCst), 0);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_calls_keep_their_own_emoji() -> Result<()> {
    let normalizer = Arc::new(RichTextNormalizer::default());
    let inputs = ["🐶 dog", "🐱 cat", "🦊 fox", "🐻 bear", "🐼 panda", "🐨 koala"];

    let handles: Vec<_> = inputs
        .iter()
        .map(|input| {
            let normalizer = Arc::clone(&normalizer);
            let input = (*input).to_string();
            tokio::spawn(async move {
                let sanitizer = YieldingSanitizer {
                    calls: AtomicUsize::new(0),
                };
                let output = normalizer.normalize_async(&input, &sanitizer).await;
                (input, output)
            })
        })
        .collect();

    for handle in handles {
        let (input, output) = handle.await?;
        assert_eq!(output?, input);
    }
    Ok(())
}

#[tokio::test]
async fn test_blocking_wrapper_reports_panics() {
    let err = RichTextNormalizer::default()
        .normalize_blocking("<p>x</p>", Arc::new(PanickingSanitizer))
        .await
        .expect_err("panicking sanitizer must surface as an error");
    assert!(matches!(err, NormalizeError::TaskJoin(_)));
}

#[tokio::test]
async fn test_blocking_wrapper_matches_sync_path() -> Result<()> {
    let normalizer = RichTextNormalizer::default();
    let html = "<span>Hi,there</span>";
    let expected = normalizer.normalize(html, &PassthroughSanitizer)?;
    let actual = normalizer
        .normalize_blocking(html, Arc::new(PassthroughSanitizer))
        .await?;
    assert_eq!(actual, expected);
    assert_eq!(actual, "Hi, there");
    Ok(())
}
