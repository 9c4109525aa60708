//! Helpers for keeping credentials out of log output

/// Number of trailing characters left visible by [`mask_token`]
const VISIBLE_SUFFIX: usize = 4;

/// Mask an API token for logging, keeping only its last four characters.
///
/// Tokens of four characters or fewer are fully masked.
pub fn mask_token(token: &str) -> String {
    let count = token.chars().count();
    if count <= VISIBLE_SUFFIX {
        return "*".repeat(count);
    }

    let suffix: String = token.chars().skip(count - VISIBLE_SUFFIX).collect();
    format!("{}{}", "*".repeat(count - VISIBLE_SUFFIX), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_token_keeps_last_four() {
        assert_eq!(mask_token("abcdef123456"), "********3456");
    }

    #[test]
    fn test_mask_token_short_values() {
        assert_eq!(mask_token("abcd"), "****");
        assert_eq!(mask_token(""), "");
    }
}
