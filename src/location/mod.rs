//! Location derivation for harvested documents
//!
//! Documents published by Hampton Roads localities usually name the city or a
//! ZIP code they concern. This module looks those up in a built-in gazetteer so
//! that stored documents carry a coordinate for map display.

mod gazetteer;

pub use gazetteer::{LOCALITIES, ZIP_CODES};

use serde::{Deserialize, Serialize};

/// Structured location attached to a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Locality name as listed in the gazetteer
    pub city: Option<String>,

    /// `[latitude, longitude]` of the locality
    pub coordinates: Option<[f64; 2]>,

    pub zip_code: Option<String>,

    /// 0.0 to 1.0
    pub confidence: f32,
}

/// Detects the locality a document is about
///
/// The title is searched before the content. A locality name match yields
/// coordinates with confidence 0.8; a ZIP code alone yields confidence 0.7
/// and no coordinates.
///
/// # Examples
///
/// ```
/// use docket::location::detect_location;
///
/// let location = detect_location("Norfolk Zoning Map", "").unwrap();
/// assert_eq!(location.city.as_deref(), Some("Norfolk"));
/// ```
pub fn detect_location(title: &str, content: &str) -> Option<Location> {
    let title_lower = title.to_lowercase();
    let content_lower = content.to_lowercase();

    let zip_code = find_zip(title).or_else(|| find_zip(content));

    let locality = [&title_lower, &content_lower].into_iter().find_map(|text| {
        LOCALITIES
            .iter()
            .find(|(name, _, _)| contains_word(text, &name.to_lowercase()))
    });

    match (locality, zip_code) {
        (Some((name, lat, lng)), zip_code) => Some(Location {
            city: Some((*name).to_string()),
            coordinates: Some([*lat, *lng]),
            zip_code,
            confidence: 0.8,
        }),
        (None, Some(zip_code)) => Some(Location {
            city: None,
            coordinates: None,
            zip_code: Some(zip_code),
            confidence: 0.7,
        }),
        (None, None) => None,
    }
}

/// Whole-word, already-lowercased substring search
fn contains_word(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(start, _)| {
        let end = start + needle.len();
        let before = haystack[..start].chars().next_back();
        let after = haystack[end..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

fn find_zip(text: &str) -> Option<String> {
    text.split(|c: char| !c.is_ascii_digit())
        .find(|token| token.len() == 5 && ZIP_CODES.contains(token))
        .map(str::to_string)
}
