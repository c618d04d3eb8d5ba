//! Property tests for the emoji vault and the punctuation spacer

use kodegen_tools_richtext::normalizer::emoji_vault::{extract, restore};
use kodegen_tools_richtext::normalizer::punctuation_spacing::fix_punctuation_spacing_with;
use kodegen_tools_richtext::NumericSeparatorTier;
use proptest::prelude::*;

fn tier() -> impl Strategy<Value = NumericSeparatorTier> {
    prop_oneof![
        Just(NumericSeparatorTier::Adjacent),
        Just(NumericSeparatorTier::Spaced),
        Just(NumericSeparatorTier::Markup),
    ]
}

proptest! {
    #[test]
    fn emoji_round_trip_any_text(text in any::<String>()) {
        let (protected, map) = extract(&text);
        prop_assert_eq!(restore(&protected, &map), text);
    }

    #[test]
    fn emoji_round_trip_with_placeholder_lookalikes(
        text in "(###EMOJI_|[0-9]|#|😀|🚀|☃|a| ){0,24}"
    ) {
        let (protected, map) = extract(&text);
        prop_assert!(!protected.contains('😀'));
        prop_assert_eq!(restore(&protected, &map), text);
    }

    #[test]
    fn spacer_is_idempotent(
        text in "[a-z0-9 .,;:!?<>&]{0,40}",
        tier in tier(),
    ) {
        let once = fix_punctuation_spacing_with(&text, tier);
        let twice = fix_punctuation_spacing_with(&once, tier);
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn spacer_only_inserts_spaces(text in "[a-z0-9 .,;:!?]{0,40}") {
        let fixed = fix_punctuation_spacing_with(&text, NumericSeparatorTier::Markup);
        prop_assert_eq!(fixed.replace(' ', ""), text.replace(' ', ""));
    }
}
