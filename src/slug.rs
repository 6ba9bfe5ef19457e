//! URL slug generation shared by every resource with a `slug` column.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::RepositoryError;

fn patterns() -> &'static (Regex, Regex) {
    static PATTERNS: OnceLock<(Regex, Regex)> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        (
            Regex::new(r"[^\w\s-]").expect("strip pattern compiles"),
            Regex::new(r"[-\s]+").expect("collapse pattern compiles"),
        )
    })
}

/// Lowercases `text`, drops everything except word characters, whitespace and `-`, then
/// collapses whitespace/dash runs into a single `-` and trims dashes from both ends.
///
/// `"Hello, World!"` becomes `"hello-world"`. The result may be empty.
pub fn slugify(text: &str) -> String {
    let (strip, collapse) = patterns();
    let lowered = text.to_lowercase();
    let stripped = strip.replace_all(&lowered, "");
    let collapsed = collapse.replace_all(&stripped, "-");
    collapsed.trim_matches('-').to_string()
}

/// Returns the slug to store: the explicit one when given, else one derived from `name`.
///
/// Fails when the result is empty, e.g. a name made only of punctuation.
pub fn resolve_slug(name: &str, explicit: Option<&str>) -> Result<String, RepositoryError> {
    let slug = match explicit {
        Some(explicit) if !explicit.trim().is_empty() => slugify(explicit),
        _ => slugify(name),
    };

    if slug.is_empty() {
        return Err(RepositoryError::validation_error(format!(
            "Cannot derive a slug from '{name}'"
        )));
    }
    Ok(slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugifies_punctuation_and_spacing() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  a -- b  "), "a-b");
        assert_eq!(slugify("Q3 Planning_Board"), "q3-planning_board");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn keeps_unicode_word_characters() {
        assert_eq!(slugify("Café Menü"), "café-menü");
    }

    #[test]
    fn explicit_slug_wins_but_is_normalized() {
        assert_eq!(
            resolve_slug("Guest List", Some("VIP Guests")).unwrap(),
            "vip-guests"
        );
        assert_eq!(resolve_slug("Guest List", Some("  ")).unwrap(), "guest-list");
        assert_eq!(resolve_slug("Guest List", None).unwrap(), "guest-list");
    }

    #[test]
    fn empty_slug_is_rejected() {
        assert!(matches!(
            resolve_slug("!!!", None),
            Err(RepositoryError::Validation(_))
        ));
    }
}
