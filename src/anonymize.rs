//! User id masking.
//!
//! Chat exports carry display names. Before records leave the parser the
//! leading characters of every name are replaced with `*`.

/// Number of leading characters masked by default.
pub const DEFAULT_MASK_LEN: usize = 3;

/// Masks the first `num_chars` characters of `user_id` with `*`.
///
/// Lengths are counted in characters, not bytes, so Hangul names are masked
/// per syllable.
///
/// When `num_chars` covers the whole id, the result is `len - 1` asterisks
/// and nothing of the original survives. Note that this is one character
/// shorter than the id; downstream consumers depend on that exact output.
/// An empty id yields an empty string.
///
/// # Example
///
/// ```rust
/// use kakaopack::anonymize::anonymize_user_id;
///
/// assert_eq!(anonymize_user_id("kakaofriend", 3), "***aofriend");
/// assert_eq!(anonymize_user_id("가나다", 3), "**");
/// ```
pub fn anonymize_user_id(user_id: &str, num_chars: usize) -> String {
    let len = user_id.chars().count();

    if num_chars >= len {
        return "*".repeat(len.saturating_sub(1));
    }

    let mut anonymized = "*".repeat(num_chars);
    anonymized.extend(user_id.chars().skip(num_chars));
    anonymized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masks_prefix() {
        assert_eq!(anonymize_user_id("ABCDEF", 3), "***DEF");
        assert_eq!(anonymize_user_id("1234", 3), "***4");
    }

    #[test]
    fn test_full_mask_is_one_shorter() {
        // Three-character id with the default mask: two asterisks, not three.
        assert_eq!(anonymize_user_id("가나다", DEFAULT_MASK_LEN), "**");
        assert_eq!(anonymize_user_id("ABC", 3), "**");
        assert_eq!(anonymize_user_id("J", 3), "");
        assert_eq!(anonymize_user_id("AB", 5), "*");
    }

    #[test]
    fn test_multibyte_suffix_preserved() {
        assert_eq!(anonymize_user_id("성민상님안녕", 3), "***님안녕");
    }

    #[test]
    fn test_zero_mask_is_identity() {
        assert_eq!(anonymize_user_id("frodo", 0), "frodo");
    }

    #[test]
    fn test_empty_id() {
        assert_eq!(anonymize_user_id("", 3), "");
        assert_eq!(anonymize_user_id("", 0), "");
    }
}
