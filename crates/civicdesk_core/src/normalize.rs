//! Canonical token form for complaint text.
//!
//! Every comparison in the dedup path runs over this form, so the rules are
//! deliberately blunt: lowercase, strip everything that is not an ASCII
//! letter or digit, collapse whitespace.

/// Normalize raw complaint text into space-separated lowercase tokens.
///
/// Any character outside `[a-z0-9]` (after ASCII lowercasing) acts as a
/// separator; runs of separators collapse to a single space and the result
/// is trimmed. Empty or all-punctuation input yields the empty string.
/// Idempotent.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for c in text.chars() {
        let c = c.to_ascii_lowercase();
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            out.push(c);
            pending_space = false;
        } else {
            pending_space = true;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_strips_punctuation() {
        assert_eq!(normalize("Pot-hole, in ROAD!!"), "pot hole in road");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(normalize("  water \t leak \n near   park "), "water leak near park");
    }

    #[test]
    fn test_digits_survive() {
        assert_eq!(normalize("ward 12, lamp #3"), "ward 12 lamp 3");
    }

    #[test]
    fn test_non_ascii_becomes_separator() {
        assert_eq!(normalize("café—garbage"), "caf garbage");
    }

    #[test]
    fn test_empty_and_punctuation_only() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("!!! ??? ..."), "");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "Streetlight NOT working!!",
            "  pot-hole in road  ",
            "garbage overflow near market",
            "",
            "¡água! 100%",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
        }
    }
}
