//! Deterministic slug derivation.
//!
//! The aggregate recomputes the slug from the item name on every write, so
//! slug generation must be a pure function of the name.

/// Derive a URL slug from a display name.
///
/// Lowercases ASCII alphanumeric runs and joins them with single dashes.
/// Everything else (whitespace, punctuation, non-ASCII) acts as a separator.
/// Never produces leading, trailing, or doubled dashes.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_separator = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn lowercases_and_joins_words() {
        assert_eq!(slugify("Black Tee"), "black-tee");
        assert_eq!(slugify("Slim Fit Jeans 32"), "slim-fit-jeans-32");
    }

    #[test]
    fn punctuation_acts_as_separator() {
        assert_eq!(slugify("Tee / V-Neck (Men's)"), "tee-v-neck-men-s");
        assert_eq!(slugify("  padded   name  "), "padded-name");
    }

    #[test]
    fn empty_and_symbol_only_names_yield_empty_slug() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
    }

    proptest! {
        #[test]
        fn never_produces_edge_or_double_dashes(name in ".{0,64}") {
            let slug = slugify(&name);
            prop_assert!(!slug.starts_with('-'));
            prop_assert!(!slug.ends_with('-'));
            prop_assert!(!slug.contains("--"));
        }

        #[test]
        fn slugify_is_idempotent(name in ".{0,64}") {
            let once = slugify(&name);
            prop_assert_eq!(slugify(&once), once);
        }

        #[test]
        fn output_is_lowercase_alphanumeric_and_dashes(name in ".{0,64}") {
            let slug = slugify(&name);
            prop_assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        }
    }
}
