//! Intent detection: target day and rain questions.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use super::normalize::{accented_words, contains_phrase, has_diacritics, searchable};

static DAY_MONTH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,2})/(\d{1,2})").expect("day/month pattern is valid"));

/// Day words in one spelling. Folding diacritics merges "mốt" (day after
/// tomorrow) with "một" (one) and "mai" (tomorrow) with "mãi" (forever), so
/// accented input is matched against the accented table.
struct DayVocabulary {
    /// Checked first: they contain a tomorrow token or compete with one.
    day_after_tomorrow_phrases: &'static [&'static str],
    tomorrow: &'static [&'static str],
    /// Bare "mốt"; only consulted once no tomorrow token matched.
    day_after_tomorrow: &'static [&'static str],
}

static ACCENTED_DAYS: DayVocabulary = DayVocabulary {
    day_after_tomorrow_phrases: &["ngày mốt", "day after tomorrow"],
    tomorrow: &["ngày mai", "mai", "tomorrow"],
    day_after_tomorrow: &["mốt"],
};

static FOLDED_DAYS: DayVocabulary = DayVocabulary {
    day_after_tomorrow_phrases: &["ngay mot", "day after tomorrow"],
    tomorrow: &["ngay mai", "mai", "tomorrow"],
    day_after_tomorrow: &["mot"],
};

const RAIN_KEYWORDS: &[&str] = &[
    "mua",
    "ao mua",
    "luong mua",
    "co mua",
    "troi uot",
    "rain",
    "raining",
    "rainy",
    "rainfall",
    "precipitation",
    "shower",
    "showers",
];

fn contains_any(haystack: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| contains_phrase(haystack, p))
}

/// Days from `today` to the day the message asks about.
///
/// Tomorrow-style tokens win over a `D/M` date; a date is resolved in
/// `today`'s year and may give a negative or large offset. Anything else,
/// including an impossible date such as `31/2`, is today (0).
///
/// Day words are matched with diacritics when the message has any; the
/// folded spellings apply only to input typed without them.
pub fn detect_day_offset(message: &str, today: NaiveDate) -> i64 {
    let text = searchable(message);
    let (words, days) = if has_diacritics(message) {
        (accented_words(message), &ACCENTED_DAYS)
    } else {
        (text.clone(), &FOLDED_DAYS)
    };

    if contains_any(&words, days.day_after_tomorrow_phrases) {
        return 2;
    }
    if contains_any(&words, days.tomorrow) {
        return 1;
    }
    if contains_any(&words, days.day_after_tomorrow) {
        return 2;
    }

    DAY_MONTH
        .captures(&text)
        .and_then(|caps| {
            let day = caps[1].parse::<u32>().ok()?;
            let month = caps[2].parse::<u32>().ok()?;
            NaiveDate::from_ymd_opt(today.year(), month, day)
        })
        .map(|target| (target - today).num_days())
        .unwrap_or(0)
}

/// Whether the message asks about rain or precipitation.
pub fn is_rain_query(message: &str) -> bool {
    contains_any(&searchable(message), RAIN_KEYWORDS)
}
