//! Text normalization for keyword and city matching.
//!
//! Vietnamese input arrives with or without diacritics ("Đà Nẵng", "Da Nang",
//! "da nang"); every table in the crate is written in the folded form.

use deunicode::deunicode;

/// Lower-case and strip diacritics: `"Hà Nội"` → `"ha noi"`.
pub fn normalize(text: &str) -> String {
    deunicode(text).to_lowercase()
}

/// [`normalize`] and reduce to words. Anything other than an ASCII
/// alphanumeric or `/` separates words; the result has single spaces and no
/// leading or trailing whitespace.
pub fn searchable(text: &str) -> String {
    let folded: String = normalize(text)
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '/' { c } else { ' ' })
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lower-cased words with diacritics kept: `"Ngày Mốt, Huế"` → `"ngày mốt huế"`.
/// Used where folding would merge distinct words ("một"/"mốt", "mãi"/"mai").
pub fn accented_words(text: &str) -> String {
    let lowered: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '/' { c } else { ' ' })
        .collect();
    lowered.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whether `text` carries any non-ASCII letter.
pub fn has_diacritics(text: &str) -> bool {
    text.chars().any(|c| c.is_alphabetic() && !c.is_ascii())
}

/// Whether `phrase` occurs in `haystack` on word boundaries.
/// Both sides must already be in [`searchable`] form.
pub fn contains_phrase(haystack: &str, phrase: &str) -> bool {
    if phrase.is_empty() {
        return false;
    }
    format!(" {haystack} ").contains(&format!(" {phrase} "))
}

/// Upper-case the first character of `word`, leaving the rest untouched.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
