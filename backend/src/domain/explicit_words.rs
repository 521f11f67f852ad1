//! Static list of disallowed words used for feed moderation.
//!
//! Hashtag exclusion compares `#word` case-insensitively and exactly; text
//! matching uses word boundaries so `class` does not trip `ass`.

const EXPLICIT_WORDS: &[&str] = &[
    "18plus", "adult", "anal", "boobs", "camgirl", "erotic", "explicit", "fetish", "hentai",
    "horny", "milf", "naked", "nsfw", "nude", "nudes", "onlyfans", "porn", "porno", "sex",
    "sexy", "xxx",
];

/// The disallowed words, lowercase, without `#`.
#[must_use]
pub fn explicit_words() -> &'static [&'static str] {
    EXPLICIT_WORDS
}

/// Disallowed words in their `#`-prefixed post form.
#[must_use]
pub fn explicit_hashtags() -> Vec<String> {
    EXPLICIT_WORDS.iter().map(|word| format!("#{word}")).collect()
}

/// Whether `tag` (with or without `#`) is an explicit word.
#[must_use]
pub fn is_explicit_tag(tag: &str) -> bool {
    let bare = tag.trim_start_matches('#');
    EXPLICIT_WORDS
        .iter()
        .any(|word| word.eq_ignore_ascii_case(bare))
}

/// Whether `text` contains an explicit word as a whole word.
#[must_use]
pub fn contains_explicit_word(text: &str) -> bool {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| !token.is_empty())
        .any(is_explicit_tag)
}
