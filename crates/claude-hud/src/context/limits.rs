//! Context window ceilings per model.

/// Ceiling used when the model is unknown.
pub const DEFAULT_CONTEXT_LIMIT: u64 = 200_000;

/// Model-name substrings and their context ceilings, matched in order.
///
/// The first key contained in the model identifier wins, so dated variants
/// (`claude-opus-4-5-20250101`) resolve to their family entry.
pub const MODEL_CONTEXT_LIMITS: &[(&str, u64)] = &[
    ("claude-opus-4-5", 200_000),
    ("claude-sonnet-4", 200_000),
    ("claude-haiku-3-5", 200_000),
];

/// Context ceiling for `model`, or [`DEFAULT_CONTEXT_LIMIT`].
pub fn context_limit(model: Option<&str>) -> u64 {
    let Some(model) = model else {
        return DEFAULT_CONTEXT_LIMIT;
    };
    MODEL_CONTEXT_LIMITS
        .iter()
        .find(|(key, _)| model.contains(key))
        .map_or(DEFAULT_CONTEXT_LIMIT, |&(_, limit)| limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dated_model_matches_family() {
        assert_eq!(
            context_limit(Some("claude-opus-4-5-20250101")),
            context_limit(Some("claude-opus-4-5"))
        );
    }

    #[test]
    fn unknown_and_missing_fall_back() {
        assert_eq!(context_limit(None), DEFAULT_CONTEXT_LIMIT);
        assert_eq!(context_limit(Some("gpt-4o")), DEFAULT_CONTEXT_LIMIT);
        assert_eq!(context_limit(Some("")), DEFAULT_CONTEXT_LIMIT);
    }

    #[test]
    fn table_keys_resolve_to_their_own_ceiling() {
        for &(key, limit) in MODEL_CONTEXT_LIMITS {
            assert_eq!(context_limit(Some(key)), limit);
        }
    }
}
