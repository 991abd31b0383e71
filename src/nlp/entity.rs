//! City extraction.

use crate::domain::Gazetteer;

use super::normalize::{capitalize, contains_phrase, searchable};

/// Filler removed before treating what is left of a message as a place name.
const STOPWORDS: &[&str] = &[
    "thoi tiet", "du bao", "ngay mai", "ngay mot", "hom nay", "mai", "mot", "la", "co",
    "khong", "se", "du kien", "co mua", "trong", "thanh pho", "mua", "ao mua", "luong mua",
    "troi uot", "o", "tai", "nhu the nao", "the nao", "bao nhieu", "ngay", "weather",
    "forecast", "will", "it", "rain", "in", "at", "the", "what", "is", "today", "tomorrow",
    "day", "after", "for", "how", "be", "there", "city",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CitySource {
    /// Matched a gazetteer entry; the name is the entry's display name.
    Gazetteer,
    /// Whatever words survived stopword removal. May not resolve with the
    /// forecast provider and never has a province code.
    FreeText,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityMatch {
    pub name: String,
    pub source: CitySource,
}

impl CityMatch {
    pub fn is_low_confidence(&self) -> bool {
        self.source == CitySource::FreeText
    }
}

/// Find the city a message talks about.
///
/// Gazetteer entries are tried longest name first. Without a match the
/// message minus stopwords and numbers is returned as a capitalized
/// free-text name; if nothing is left, no city was resolved.
pub fn extract_city(message: &str, gazetteer: &Gazetteer) -> Option<CityMatch> {
    let text = searchable(message);

    if let Some(entry) = gazetteer
        .entries()
        .iter()
        .find(|e| contains_phrase(&text, e.searchable()))
    {
        return Some(CityMatch {
            name: entry.name.clone(),
            source: CitySource::Gazetteer,
        });
    }

    let name = strip_stopwords(&text)
        .split(' ')
        .filter(|w| !w.is_empty() && !w.chars().any(|c| c.is_ascii_digit()))
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ");

    (!name.is_empty()).then_some(CityMatch {
        name,
        source: CitySource::FreeText,
    })
}

fn strip_stopwords(text: &str) -> String {
    let mut stopwords = STOPWORDS.to_vec();
    stopwords.sort_by_key(|s| std::cmp::Reverse(s.len()));

    let mut padded = format!(" {text} ");
    for word in stopwords {
        let needle = format!(" {word} ");
        while padded.contains(&needle) {
            padded = padded.replacen(&needle, " ", 1);
        }
    }
    padded.trim().to_string()
}
