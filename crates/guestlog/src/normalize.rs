//! Name normalization for sign-out matching.
//!
//! Keys are whitespace-collapsed and lower-cased so that "Jane  Doe" and
//! "jane doe" find the same visit. Keys are never displayed.

/// Canonical form of free text: trimmed, lower-cased, inner whitespace runs
/// collapsed to a single space.
///
/// Total: empty or all-whitespace input yields an empty key, which callers
/// must reject before matching.
#[must_use]
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lookup key for a first and last name.
#[must_use]
pub fn make_key(first: &str, last: &str) -> String {
    normalize(&format!("{first} {last}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_and_lowercases() {
        assert_eq!(normalize("  Jane DOE \n"), "jane doe");
    }

    #[test]
    fn test_normalize_collapses_inner_whitespace() {
        assert_eq!(normalize("jane \t  \n doe"), "jane doe");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \t\n "), "");
    }

    #[test]
    fn test_normalize_idempotent() {
        let once = normalize("  Mary   Ann  O'Neil ");
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn test_make_key_matches_full_name() {
        assert_eq!(make_key("Jane", "Doe"), normalize("Jane Doe"));
        assert_eq!(make_key(" jane  ", "  doe"), "jane doe");
    }

    #[test]
    fn test_make_key_with_empty_parts() {
        assert_eq!(make_key("", ""), "");
        assert_eq!(make_key("Cher", ""), "cher");
    }

    #[test]
    fn test_normalize_non_ascii() {
        assert_eq!(normalize("ÉLODIE  Müller"), "élodie müller");
    }
}
