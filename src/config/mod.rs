//! Configuration module for rich-text normalization
//!
//! This module provides the `NormalizerConfig` struct, its fluent builder,
//! and JSON loading with validation and sensible defaults.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod methods;
pub mod types;

// Re-exports for public API
pub use builder::NormalizerConfigBuilder;
pub use types::{
    DEFAULT_ATTRIBUTE_STRIP_LIST, DEFAULT_ATTRIBUTE_STRIP_PREFIXES, DEFAULT_BLOCK_ELEMENTS,
    LineBreakMode, NormalizerConfig, NumericSeparatorTier,
};
