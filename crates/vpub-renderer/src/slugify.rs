//! URL slug normalization.

/// Normalize arbitrary text into a URL-path-safe slug.
///
/// Lowercases ASCII alphanumerics and collapses every run of other
/// characters into a single hyphen. Boundary hyphens are trimmed, so
/// the result always matches `[a-z0-9]([a-z0-9-]*[a-z0-9])?` or is
/// empty. Idempotent: normalizing a normalized slug returns it
/// unchanged.
#[must_use]
pub fn normalize_slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_lowercases_and_hyphenates() {
        assert_eq!(normalize_slug("My Great Note!"), "my-great-note");
    }

    #[test]
    fn test_collapses_symbol_runs() {
        assert_eq!(normalize_slug("a - _ b"), "a-b");
    }

    #[test]
    fn test_trims_boundary_hyphens() {
        assert_eq!(normalize_slug("--hello--"), "hello");
    }

    #[test]
    fn test_idempotent() {
        let once = normalize_slug("My Great Note!");
        assert_eq!(normalize_slug(&once), once);
    }

    #[test]
    fn test_all_symbols_yields_empty() {
        assert_eq!(normalize_slug("!!!"), "");
    }

    #[test]
    fn test_digits_kept() {
        assert_eq!(normalize_slug("2024 Review"), "2024-review");
    }
}
