use crate::core::normalizer::normalize;
use crate::domain::model::{CharacterSet, CreditedRole};

/// Collects distinct given names from the first `max_count` credits of `cast`.
///
/// Credits past `max_count` are never examined, so the result can hold fewer
/// than `max_count` names once unnamed credits and duplicates are dropped.
pub fn extract_characters(cast: &[CreditedRole], max_count: usize) -> CharacterSet {
    let mut characters = CharacterSet::default();
    for role in cast.iter().take(max_count) {
        if let Some(name) = normalize(&role.character) {
            characters.insert(name);
        }
    }
    characters
}
