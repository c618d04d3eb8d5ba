//! Emoji protection across destructive text transforms
//!
//! Swaps emoji code points for `###EMOJI_<n>###` placeholders before the
//! pipeline runs and swaps them back afterwards. Unlike a stateful
//! protector object, the vault is a pure function pair: `extract` hands
//! back an [`EmojiMap`] and `restore` consumes it, so concurrent calls can
//! never see each other's placeholders.
//!
//! Author text may already contain the literal `###EMOJI_`. Such literals
//! are vaulted as well, and `restore` is a single left-to-right scan that
//! never rescans what it has written, so `restore(extract(s)) == s` holds
//! for every input.

use std::ops::RangeInclusive;

/// Start of every placeholder token
pub const PLACEHOLDER_PREFIX: &str = "###EMOJI_";

/// End of every placeholder token
pub const PLACEHOLDER_SUFFIX: &str = "###";

/// Code points treated as emoji
pub const DEFAULT_EMOJI_RANGES: &[RangeInclusive<char>] = &[
    // Misc Symbols and Pictographs
    '\u{1F300}'..='\u{1F5FF}',
    // Emoticons
    '\u{1F600}'..='\u{1F64F}',
    // Transport and Map Symbols
    '\u{1F680}'..='\u{1F6FF}',
    // Supplemental Symbols and Pictographs
    '\u{1F900}'..='\u{1F9FF}',
    // Symbols and Pictographs Extended-A
    '\u{1FA70}'..='\u{1FAFF}',
    // Regional indicators (flags)
    '\u{1F1E6}'..='\u{1F1FF}',
    // Misc Symbols
    '\u{2600}'..='\u{26FF}',
    // Dingbats
    '\u{2700}'..='\u{27BF}',
    // Single pictographs outside the blocks above
    '\u{231A}'..='\u{231B}',
    '\u{2328}'..='\u{2328}',
    '\u{23CF}'..='\u{23CF}',
    '\u{23E9}'..='\u{23F3}',
    '\u{23F8}'..='\u{23FA}',
    '\u{24C2}'..='\u{24C2}',
    '\u{25AA}'..='\u{25AB}',
    '\u{25B6}'..='\u{25B6}',
    '\u{25C0}'..='\u{25C0}',
    '\u{25FB}'..='\u{25FE}',
    '\u{2934}'..='\u{2935}',
    '\u{2B05}'..='\u{2B07}',
    '\u{2B1B}'..='\u{2B1C}',
    '\u{2B50}'..='\u{2B50}',
    '\u{2B55}'..='\u{2B55}',
    '\u{3030}'..='\u{3030}',
    '\u{303D}'..='\u{303D}',
    '\u{3297}'..='\u{3297}',
    '\u{3299}'..='\u{3299}',
    '\u{1F004}'..='\u{1F004}',
    '\u{1F0CF}'..='\u{1F0CF}',
    '\u{1F18E}'..='\u{1F18E}',
    '\u{1F191}'..='\u{1F19A}',
];

/// One extracted substring and the token standing in for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmojiEntry {
    pub placeholder: String,
    pub original: String,
}

/// Insertion-ordered placeholder → original mapping for a single call.
///
/// Entry `n` always carries placeholder `###EMOJI_<n>###`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmojiMap {
    entries: Vec<EmojiEntry>,
}

impl EmojiMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Original text for a placeholder token
    #[must_use]
    pub fn get(&self, placeholder: &str) -> Option<&str> {
        let index = parse_token(placeholder)?;
        self.original_at(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EmojiEntry> {
        self.entries.iter()
    }

    fn original_at(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|entry| entry.original.as_str())
    }

    fn push(&mut self, original: &str) -> String {
        let placeholder = placeholder_for(self.entries.len());
        self.entries.push(EmojiEntry {
            placeholder: placeholder.clone(),
            original: original.to_string(),
        });
        placeholder
    }
}

#[inline]
fn placeholder_for(index: usize) -> String {
    format!("{PLACEHOLDER_PREFIX}{index}{PLACEHOLDER_SUFFIX}")
}

/// Parse a complete token into its index
fn parse_token(token: &str) -> Option<usize> {
    let digits = token
        .strip_prefix(PLACEHOLDER_PREFIX)?
        .strip_suffix(PLACEHOLDER_SUFFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Whether `ch` falls in any of `ranges`
#[inline]
fn is_emoji(ch: char, ranges: &[RangeInclusive<char>]) -> bool {
    ranges.iter().any(|range| range.contains(&ch))
}

/// Replace every emoji in `text` with a placeholder, using the default ranges.
///
/// # Example
/// ```rust
/// # use kodegen_tools_richtext::normalizer::emoji_vault::{extract, restore};
/// let (protected, map) = extract("Hi 👋 and 👋");
/// assert_eq!(protected, "Hi ###EMOJI_0### and ###EMOJI_1###");
/// assert_eq!(map.len(), 2);
/// assert_eq!(restore(&protected, &map), "Hi 👋 and 👋");
/// ```
#[must_use]
pub fn extract(text: &str) -> (String, EmojiMap) {
    extract_with_ranges(text, DEFAULT_EMOJI_RANGES)
}

/// Replace every code point in `ranges` with a placeholder.
///
/// Placeholders are numbered in scan order starting at zero. Repeated
/// emoji get distinct placeholders. Pre-existing `###EMOJI_` literals are
/// vaulted too so they survive `restore` untouched.
#[must_use]
pub fn extract_with_ranges(text: &str, ranges: &[RangeInclusive<char>]) -> (String, EmojiMap) {
    let mut map = EmojiMap::new();

    // Fast path: nothing to protect
    if !text.contains(PLACEHOLDER_PREFIX) && !text.chars().any(|ch| is_emoji(ch, ranges)) {
        return (text.to_string(), map);
    }

    let mut output = String::with_capacity(text.len() + 16);
    let mut rest = text;
    while let Some(ch) = rest.chars().next() {
        if rest.starts_with(PLACEHOLDER_PREFIX) {
            output.push_str(&map.push(PLACEHOLDER_PREFIX));
            rest = &rest[PLACEHOLDER_PREFIX.len()..];
            continue;
        }

        let width = ch.len_utf8();
        if is_emoji(ch, ranges) {
            output.push_str(&map.push(&rest[..width]));
        } else {
            output.push(ch);
        }
        rest = &rest[width..];
    }

    tracing::debug!("Vaulted {} emoji/placeholder literals", map.len());
    (output, map)
}

/// Put the vaulted originals back in place of their placeholders.
///
/// Literal matching only; no regex. Tokens that are not in `map` (for
/// example tokens from another call) are left as they are. With an empty
/// map the input is returned unchanged.
#[must_use]
pub fn restore(text: &str, map: &EmojiMap) -> String {
    if map.is_empty() {
        return text.to_string();
    }

    let mut output = String::with_capacity(text.len());
    let mut rest = text;
    let mut unmatched = 0usize;

    while let Some(start) = rest.find(PLACEHOLDER_PREFIX) {
        output.push_str(&rest[..start]);
        let candidate = &rest[start..];

        let after_prefix = &candidate[PLACEHOLDER_PREFIX.len()..];
        let digit_len = after_prefix
            .bytes()
            .take_while(u8::is_ascii_digit)
            .count();
        let token_len = PLACEHOLDER_PREFIX.len() + digit_len + PLACEHOLDER_SUFFIX.len();

        let original = if digit_len > 0
            && after_prefix[digit_len..].starts_with(PLACEHOLDER_SUFFIX)
        {
            after_prefix[..digit_len]
                .parse::<usize>()
                .ok()
                .and_then(|index| map.original_at(index))
        } else {
            None
        };

        match original {
            Some(original) => {
                output.push_str(original);
                rest = &candidate[token_len..];
            }
            None => {
                unmatched += 1;
                output.push_str(PLACEHOLDER_PREFIX);
                rest = after_prefix;
            }
        }
    }
    output.push_str(rest);

    if unmatched > 0 {
        tracing::warn!("{} placeholder-like tokens had no vault entry", unmatched);
    }
    output
}
