//! City gazetteer: display name → province code used by the rain model.

use std::collections::{HashMap, HashSet};

use crate::error::GazetteerError;
use crate::nlp::normalize::searchable;

/// Codes are the categorical encoding the rain model was trained with.
/// "Ha Noi" and "Hanoi" are distinct training stations.
const VIETNAM_PROVINCE_CODES: &[(&str, u32)] = &[
    ("Bac Lieu", 0),
    ("Ben Tre", 1),
    ("Bien Hoa", 2),
    ("Buon Me Thuot", 3),
    ("Ca Mau", 4),
    ("Cam Pha", 5),
    ("Cam Ranh", 6),
    ("Can Tho", 7),
    ("Chau Doc", 8),
    ("Da Lat", 9),
    ("Ha Noi", 10),
    ("Hai Duong", 11),
    ("Hai Phong", 12),
    ("Hanoi", 13),
    ("Ho Chi Minh City", 14),
    ("Hoa Binh", 15),
    ("Hong Gai", 16),
    ("Hue", 17),
    ("Long Xuyen", 18),
    ("My Tho", 19),
    ("Nam Dinh", 20),
    ("Nha Trang", 21),
    ("Phan Rang", 22),
    ("Phan Thiet", 23),
    ("Play Cu", 24),
    ("Qui Nhon", 25),
    ("Rach Gia", 26),
    ("Soc Trang", 27),
    ("Tam Ky", 28),
    ("Tan An", 29),
    ("Thai Nguyen", 30),
    ("Thanh Hoa", 31),
    ("Tra Vinh", 32),
    ("Tuy Hoa", 33),
    ("Uong Bi", 34),
    ("Viet Tri", 35),
    ("Vinh", 36),
    ("Vinh Long", 37),
    ("Vung Tau", 38),
    ("Yen Bai", 39),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GazetteerEntry {
    pub name: String,
    pub province_code: u32,
    searchable: String,
}

impl GazetteerEntry {
    fn new(name: &str, province_code: u32) -> Self {
        Self {
            name: name.to_string(),
            province_code,
            searchable: searchable_name(name),
        }
    }

    /// Folded form matched against messages ("Ho Chi Minh City" → "ho chi minh").
    pub fn searchable(&self) -> &str {
        &self.searchable
    }
}

/// Folded city name with the "city" word removed.
pub fn searchable_name(name: &str) -> String {
    searchable(name)
        .split(' ')
        .filter(|w| *w != "city")
        .collect::<Vec<_>>()
        .join(" ")
}

/// Immutable after construction; entries are kept in match order (longest
/// display name first, ties alphabetical) so a short name can never shadow a
/// longer one that contains it.
#[derive(Debug, Clone)]
pub struct Gazetteer {
    entries: Vec<GazetteerEntry>,
    codes: HashMap<String, u32>,
}

impl Gazetteer {
    pub fn vietnam() -> Self {
        Self::build(
            VIETNAM_PROVINCE_CODES
                .iter()
                .map(|(name, code)| GazetteerEntry::new(name, *code))
                .collect(),
        )
    }

    /// Build a gazetteer from arbitrary entries, enforcing unique codes and
    /// unique normalized names.
    pub fn from_entries<'a, I>(entries: I) -> Result<Self, GazetteerError>
    where
        I: IntoIterator<Item = (&'a str, u32)>,
    {
        let mut by_code: HashMap<u32, String> = HashMap::new();
        let mut names = HashSet::new();
        let mut built = Vec::new();

        for (name, code) in entries {
            if let Some(first) = by_code.insert(code, name.to_string()) {
                return Err(GazetteerError::DuplicateCode {
                    code,
                    first,
                    second: name.to_string(),
                });
            }
            let entry = GazetteerEntry::new(name, code);
            if !names.insert(entry.searchable.clone()) {
                return Err(GazetteerError::DuplicateName(name.to_string()));
            }
            built.push(entry);
        }

        Ok(Self::build(built))
    }

    fn build(mut entries: Vec<GazetteerEntry>) -> Self {
        entries.sort_by(|a, b| {
            b.name
                .chars()
                .count()
                .cmp(&a.name.chars().count())
                .then_with(|| a.name.cmp(&b.name))
        });
        let codes = entries
            .iter()
            .map(|e| (e.name.clone(), e.province_code))
            .collect();
        Self { entries, codes }
    }

    /// Entries in match order.
    pub fn entries(&self) -> &[GazetteerEntry] {
        &self.entries
    }

    /// Province code for an exact display name.
    pub fn province_code(&self, city: &str) -> Option<u32> {
        self.codes.get(city).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Gazetteer {
    fn default() -> Self {
        Self::vietnam()
    }
}
