//! Tokens that are never accepted as a character's given name.
//!
//! Entries are compared after normalization (lowercase, no `.`, `-` or
//! apostrophes), so `"Dr."` is listed as `dr` and `"(voice)"` keeps its
//! parentheses.

use std::collections::HashSet;
use std::sync::LazyLock;

const DENYLIST_TOKENS: &[&str] = &[
    // articles, connectives
    "the", "a", "an", "of", "and", "&", "as", "in", "on", "at", "with", "from", "to",
    // honorifics
    "mr", "mrs", "ms", "miss", "mister", "missus", "madam", "madame", "sir", "lady", "lord",
    "dame", "master", "dr", "doctor", "prof", "professor", "jr", "sr",
    // royalty and nobility
    "king", "queen", "prince", "princess", "duke", "duchess", "count", "countess", "baron",
    "baroness", "emperor", "empress",
    // ranks
    "general", "gen", "colonel", "col", "major", "maj", "captain", "capt", "cpt", "lieutenant",
    "lt", "sergeant", "sgt", "corporal", "cpl", "private", "pvt", "admiral", "adm", "commander",
    "cmdr", "officer", "agent", "detective", "det", "inspector", "sheriff", "deputy", "marshal",
    "chief",
    // offices
    "judge", "senator", "president", "governor", "mayor",
    // clergy
    "father", "fr", "reverend", "rev", "pastor", "priest", "bishop", "cardinal", "saint", "st",
    // family
    "mother", "sister", "brother", "uncle", "aunt", "auntie", "grandma", "grandpa", "granny",
    "mom", "dad",
    // descriptors
    "young", "old", "little", "big", "baby", "man", "woman", "boy", "girl", "kid", "guy",
    "narrator", "voice", "himself", "herself", "themselves", "additional", "voices", "various",
    // credit annotations
    "(voice)", "(young)", "(old)", "(older)", "(younger)", "(uncredited)", "(archive",
    "footage)", "(as", "(credit", "only)", "(singing", "(in", "(segment", "(scenes",
    "deleted)", "(cameo)",
    // stray markers
    "", "(", ")", "#", "#1", "#2", "#3", "*", "?", ",", ":", ";", "!", "+", "\"",
];

static DENYLIST: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| DENYLIST_TOKENS.iter().copied().collect());

/// Returns true when `token` must not be treated as a name.
pub fn is_denied(token: &str) -> bool {
    DENYLIST.contains(token)
}
