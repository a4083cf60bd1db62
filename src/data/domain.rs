//! Crop catalogue types and the text normalisation rules applied to them.

use std::collections::HashSet;

use serde::Serialize;
use unicode_normalization::UnicodeNormalization;

/// One canonical catalogue entry.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct CropRecord {
    pub name: String,
    pub crop_type: String,
}

/// Raw row as read from the catalogue source, before normalisation.
#[derive(Clone, Debug)]
pub struct RawCropRow {
    pub crop: String,
    pub crop_type: String,
}

/// Canonicalise a crop name.
///
/// NFKD, outer whitespace stripped, embedded newlines and tabs removed,
/// inner whitespace runs collapsed to one space, then title-cased.
pub fn normalize_crop_name(raw: &str) -> String {
    let decomposed: String = raw.nfkd().collect();
    let stripped: String = decomposed
        .trim()
        .chars()
        .filter(|c| *c != '\n' && *c != '\t')
        .collect();
    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    title_case(&collapsed)
}

/// Canonicalise a crop type label: trimmed and lower-cased.
pub fn normalize_crop_type(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Display form of a crop type: first character upper-cased, rest lower-cased
/// ("whole year" becomes "Whole year").
pub fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Upper-case every cased letter that does not follow another cased letter,
/// lower-case the rest. Uncased characters (digits, marks, punctuation)
/// start a new word.
fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut previous_cased = false;
    for ch in input.chars() {
        let cased = ch.is_uppercase() || ch.is_lowercase();
        if cased {
            if previous_cased {
                out.extend(ch.to_lowercase());
            } else {
                // Title case: only the first char of a multi-char upper mapping
                // stays upper ("ß" becomes "Ss", not "SS").
                let mut upper = ch.to_uppercase();
                if let Some(first) = upper.next() {
                    out.push(first);
                }
                for rest in upper {
                    out.extend(rest.to_lowercase());
                }
            }
        } else {
            out.push(ch);
        }
        previous_cased = cased;
    }
    out
}

/// Deduplicated, name-sorted crop catalogue. Immutable once built.
#[derive(Clone, Debug, Default)]
pub struct CropTable {
    records: Vec<CropRecord>,
}

impl CropTable {
    /// Normalise rows, keep the first occurrence of each name, sort by name.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = RawCropRow>,
    {
        let mut seen = HashSet::new();
        let mut records: Vec<CropRecord> = rows
            .into_iter()
            .map(|row| CropRecord {
                name: normalize_crop_name(&row.crop),
                crop_type: normalize_crop_type(&row.crop_type),
            })
            .filter(|record| seen.insert(record.name.clone()))
            .collect();
        // Stable sort; names are unique at this point anyway.
        records.sort_by(|a, b| a.name.cmp(&b.name));
        Self { records }
    }

    pub fn records(&self) -> &[CropRecord] {
        &self.records
    }

    /// Crop names in table order.
    pub fn names(&self) -> Vec<String> {
        self.records.iter().map(|r| r.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&CropRecord> {
        self.records
            .binary_search_by(|r| r.name.as_str().cmp(name))
            .ok()
            .map(|idx| &self.records[idx])
    }

    pub fn crop_type(&self, name: &str) -> Option<&str> {
        self.get(name).map(|r| r.crop_type.as_str())
    }

    /// Distinct crop types, sorted.
    pub fn types(&self) -> Vec<String> {
        let mut types: Vec<String> = self
            .records
            .iter()
            .map(|r| r.crop_type.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        types.sort();
        types
    }

    /// Records whose type matches `crop_type` after normalisation.
    pub fn crops_of_type(&self, crop_type: &str) -> Vec<&CropRecord> {
        let wanted = normalize_crop_type(crop_type);
        self.records
            .iter()
            .filter(|r| r.crop_type == wanted)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(crop: &str, crop_type: &str) -> RawCropRow {
        RawCropRow {
            crop: crop.to_string(),
            crop_type: crop_type.to_string(),
        }
    }

    #[test]
    fn names_are_cleaned_and_title_cased() {
        assert_eq!(normalize_crop_name("  rice  "), "Rice");
        assert_eq!(normalize_crop_name("black   gram"), "Black Gram");
        assert_eq!(normalize_crop_name("moong(green gram)"), "Moong(Green Gram)");
        assert_eq!(normalize_crop_name("ARHAR/TUR"), "Arhar/Tur");
        assert_eq!(normalize_crop_name("sugar\tcane\n"), "Sugarcane");
    }

    #[test]
    fn compatibility_forms_are_decomposed() {
        // U+FB01 LATIN SMALL LIGATURE FI
        assert_eq!(normalize_crop_name("\u{fb01}nger millet"), "Finger Millet");
        // non-breaking space collapses like any other whitespace
        assert_eq!(normalize_crop_name("soya\u{a0}bean"), "Soya Bean");
    }

    #[test]
    fn crop_type_display_is_capitalized() {
        assert_eq!(capitalize("kharif"), "Kharif");
        assert_eq!(capitalize("whole year"), "Whole year");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn types_are_trimmed_and_lowered() {
        assert_eq!(normalize_crop_type("  Kharif "), "kharif");
        assert_eq!(normalize_crop_type("RABI"), "rabi");
    }

    #[test]
    fn first_occurrence_wins_and_table_is_sorted() {
        let table = CropTable::from_rows(vec![
            row("wheat", "Rabi"),
            row(" Rice", "kharif"),
            row("rice ", "rabi"),
            row("Bajra", "kharif"),
        ]);

        assert_eq!(table.names(), vec!["Bajra", "Rice", "Wheat"]);
        assert_eq!(table.crop_type("Rice"), Some("kharif"));
        assert_eq!(table.crop_type("Barley"), None);
    }

    #[test]
    fn filter_by_type() {
        let table = CropTable::from_rows(vec![
            row("wheat", "rabi"),
            row("rice", "kharif"),
            row("bajra", "Kharif"),
        ]);
        let kharif: Vec<&str> = table
            .crops_of_type(" KHARIF")
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(kharif, vec!["Bajra", "Rice"]);
        assert_eq!(table.types(), vec!["kharif", "rabi"]);
    }
}
