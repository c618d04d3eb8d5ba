pub mod config;
pub mod error;
pub mod normalizer;
pub mod sanitizer;

pub use config::{LineBreakMode, NormalizerConfig, NormalizerConfigBuilder, NumericSeparatorTier};
pub use error::{NormalizeError, NormalizeResult};
pub use normalizer::{EmojiMap, PreparedHtml, RichTextNormalizer};
pub use sanitizer::{AsyncHtmlSanitizer, EscapingSanitizer, HtmlSanitizer, PassthroughSanitizer};
