//! Turns a credited character string into the character's given name.
//!
//! Credits are dominated by rank, title and descriptor prefixes ("Captain",
//! "Dr.", "Young"), so the first token in reading order that survives the
//! denylist is taken as the name. Later tokens, including alternates after a
//! `/`, are never considered once a name has been found.

use crate::core::denylist;
use crate::domain::model::NormalizedName;

/// Extracts at most one lowercase given name from `raw`.
///
/// ```
/// use movie_names::core::normalizer::normalize;
///
/// assert_eq!(normalize("Captain James T. Kirk").unwrap().as_str(), "james");
/// assert!(normalize("The Narrator").is_none());
/// ```
pub fn normalize(raw: &str) -> Option<NormalizedName> {
    raw.replace('/', " ")
        .split_whitespace()
        .map(|token| clean_token(&token.to_lowercase()))
        .find(|token| is_plausible_name(token))
        .map(NormalizedName::new_unchecked)
}

fn clean_token(token: &str) -> String {
    token
        .chars()
        .filter(|c| !matches!(c, '.' | '-' | '\'' | '’'))
        .map(|c| match c {
            'é' | 'è' => 'e',
            other => other,
        })
        .collect()
}

// A token with no letter at all is punctuation, never a name.
fn is_plausible_name(token: &str) -> bool {
    !denylist::is_denied(token) && token.chars().any(char::is_alphabetic)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(raw: &str) -> Option<String> {
        normalize(raw).map(NormalizedName::into_inner)
    }

    #[test]
    fn test_skips_rank_and_strips_abbreviation_period() {
        assert_eq!(name("Captain James T. Kirk").as_deref(), Some("james"));
    }

    #[test]
    fn test_slash_alternates_keep_first_only() {
        assert_eq!(name("Sam/Bill").as_deref(), Some("sam"));
        assert_eq!(name("Sam / Bill").as_deref(), Some("sam"));
        assert_eq!(name("Bill/Sam").as_deref(), Some("bill"));
    }

    #[test]
    fn test_honorific_falls_through_to_surname() {
        assert_eq!(name("Mrs. Doubtfire").as_deref(), Some("doubtfire"));
    }

    #[test]
    fn test_all_denied_tokens_yield_none() {
        assert_eq!(name("The Narrator"), None);
        assert_eq!(name("Young King (voice)"), None);
    }

    #[test]
    fn test_accent_folded_and_annotation_skipped() {
        assert_eq!(name("José (voice)").as_deref(), Some("jose"));
        assert_eq!(name("Hélène").as_deref(), Some("helene"));
        assert_eq!(name("JOSÉ").as_deref(), Some("jose"));
    }

    #[test]
    fn test_other_diacritics_pass_through() {
        assert_eq!(name("Zoë").as_deref(), Some("zoë"));
        assert_eq!(name("Ñandú").as_deref(), Some("ñandú"));
    }

    #[test]
    fn test_hyphens_and_apostrophes_are_removed() {
        assert_eq!(name("Mary-Jane Watson").as_deref(), Some("maryjane"));
        assert_eq!(name("D'Artagnan").as_deref(), Some("dartagnan"));
        assert_eq!(name("O’Hara").as_deref(), Some("ohara"));
    }

    #[test]
    fn test_empty_and_punctuation_only_yield_none() {
        assert_eq!(name(""), None);
        assert_eq!(name("   "), None);
        assert_eq!(name("..."), None);
        assert_eq!(name("- / -"), None);
        assert_eq!(name("?!"), None);
    }

    #[test]
    fn test_is_deterministic() {
        let raw = "Lt. Col. Frank Slade";
        assert_eq!(normalize(raw), normalize(raw));
        assert_eq!(name(raw).as_deref(), Some("frank"));
    }
}
