use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

pub const ROOM_DELIMITER: char = '|';
pub const FACILITY_DELIMITER: char = ',';
pub const ROOM_QUALIFIER_DELIMITER: char = '-';

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// A hotel as loaded from the catalog. Immutable for the lifetime of the process.
///
/// `rooms` and `prices` are positionally aligned: the Nth price belongs to the
/// Nth room. A `None` price marks a value that could not be parsed.
#[derive(Clone, Debug, PartialEq)]
pub struct HotelRecord {
    pub name: String,
    pub address: String,
    pub coordinates: Coordinates,
    pub rating: f64,
    pub rooms: Vec<String>,
    pub prices: Vec<Option<f64>>,
    pub facilities: Vec<String>,
    pub checkin: String,
    pub checkout: String,
}

impl HotelRecord {
    /// Positional (room, price) pairs, stopping at the shorter of the two lists.
    pub fn room_offers(&self) -> impl Iterator<Item = (&str, Option<f64>)> + '_ {
        self.rooms.iter().map(String::as_str).zip(self.prices.iter().copied())
    }

    pub fn has_facility(&self, facility: &str) -> bool {
        let wanted = facility.trim().to_lowercase();
        self.facilities.iter().any(|candidate| candidate.to_lowercase() == wanted)
    }
}

/// Category prefix of a room label: everything before the first `-`, trimmed
/// and lowercased. `"Standard-6 hrs"` becomes `"standard"`.
pub fn room_category(label: &str) -> String {
    label.split(ROOM_QUALIFIER_DELIMITER).next().unwrap_or_default().trim().to_lowercase()
}

pub fn split_rooms(raw: &str) -> Vec<String> {
    raw.split(ROOM_DELIMITER).map(|room| room.trim().to_string()).collect()
}

pub fn split_prices(raw: &str) -> Vec<Option<f64>> {
    raw.split(ROOM_DELIMITER).map(|price| price.trim().parse::<f64>().ok()).collect()
}

pub fn split_facilities(raw: &str) -> Vec<String> {
    raw.split(FACILITY_DELIMITER)
        .map(str::trim)
        .filter(|facility| !facility.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Catalog and caller payloads carry numbers either as JSON numbers or as
/// numeric strings.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

impl NumberOrText {
    fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(text) => text.trim().parse::<f64>().ok(),
        }
    }

    fn into_text(self) -> String {
        match self {
            Self::Number(value) => value.to_string(),
            Self::Text(text) => text,
        }
    }
}

pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<NumberOrText>::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(value) => value.as_f64().map(Some).ok_or_else(|| {
            serde::de::Error::custom(format!("expected a number, found `{}`", value.into_text()))
        }),
    }
}

pub(crate) fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<NumberOrText>::deserialize(deserializer)?.map(NumberOrText::into_text))
}

/// Raw shape of one entry in the catalog file.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct CatalogEntry {
    pub name: Option<String>,
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub longitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rating: Option<f64>,
    pub room: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub price: Option<String>,
    pub facilities: Option<String>,
    pub checkin: Option<String>,
    pub checkout: Option<String>,
}

impl CatalogEntry {
    pub fn into_record(self) -> Result<HotelRecord, String> {
        let name = self
            .name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| "hotel name is missing".to_string())?;
        let latitude = self.latitude.ok_or_else(|| format!("hotel `{name}` has no latitude"))?;
        let longitude = self.longitude.ok_or_else(|| format!("hotel `{name}` has no longitude"))?;

        Ok(HotelRecord {
            address: self.address.unwrap_or_default(),
            coordinates: Coordinates::new(latitude, longitude),
            rating: self.rating.unwrap_or(0.0),
            rooms: split_rooms(self.room.as_deref().unwrap_or_default()),
            prices: split_prices(self.price.as_deref().unwrap_or_default()),
            facilities: split_facilities(self.facilities.as_deref().unwrap_or_default()),
            checkin: self.checkin.unwrap_or_default(),
            checkout: self.checkout.unwrap_or_default(),
            name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{room_category, split_facilities, split_prices, split_rooms, CatalogEntry};

    #[test]
    fn room_category_takes_prefix_before_first_dash() {
        assert_eq!(room_category("Standard-6 hrs"), "standard");
        assert_eq!(room_category(" Male Dormitory - 12 hrs-AC"), "male dormitory");
        assert_eq!(room_category("Deluxe"), "deluxe");
    }

    #[test]
    fn unparseable_prices_stay_in_position() {
        let prices = split_prices("1500| n/a |3000.5");
        assert_eq!(prices, vec![Some(1500.0), None, Some(3000.5)]);
        assert_eq!(split_rooms("Standard-6hrs| Deluxe "), vec!["Standard-6hrs", "Deluxe"]);
    }

    #[test]
    fn facilities_are_trimmed_and_blank_entries_dropped() {
        assert_eq!(split_facilities("WiFi, Pool,, Parking "), vec!["WiFi", "Pool", "Parking"]);
        assert!(split_facilities("").is_empty());
    }

    #[test]
    fn catalog_entry_accepts_numeric_strings_and_missing_rating() {
        let entry: CatalogEntry = serde_json::from_str(
            r#"{"name":"Lotus Inn","latitude":"28.61","longitude":77.2,"room":"Standard","price":1500,"rating":null}"#,
        )
        .expect("entry should parse");
        let record = entry.into_record().expect("entry should convert");

        assert_eq!(record.coordinates.latitude, 28.61);
        assert_eq!(record.rating, 0.0);
        assert_eq!(record.prices, vec![Some(1500.0)]);
        assert!(record.facilities.is_empty());
    }

    #[test]
    fn catalog_entry_without_coordinates_is_rejected() {
        let entry: CatalogEntry =
            serde_json::from_str(r#"{"name":"Nowhere Lodge"}"#).expect("entry should parse");
        let error = entry.into_record().expect_err("missing coordinates must fail");
        assert!(error.contains("latitude"));
    }

    #[test]
    fn facility_lookup_is_case_insensitive() {
        let entry: CatalogEntry = serde_json::from_str(
            r#"{"name":"Lotus Inn","latitude":1,"longitude":2,"facilities":"WiFi, Pool"}"#,
        )
        .expect("entry should parse");
        let record = entry.into_record().expect("entry should convert");
        assert!(record.has_facility("wifi"));
        assert!(record.has_facility(" POOL "));
        assert!(!record.has_facility("gym"));
    }
}
