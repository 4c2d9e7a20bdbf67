use tracing::{debug, info};

use crate::domain::{
    hotel::{room_category, HotelRecord},
    search::{FilterCriteria, FilteredHotel},
};

/// Upper bound on hotels returned by a single filter call. Matches past the
/// cap are dropped silently.
pub const MAX_FILTER_RESULTS: usize = 10;

/// Scans `hotels` in order and returns those with at least one matching
/// room/price pair and every required facility, capped at
/// [`MAX_FILTER_RESULTS`].
pub fn filter_hotels(criteria: &FilterCriteria, hotels: &[HotelRecord]) -> Vec<FilteredHotel> {
    info!(
        event_name = "hotel.filter.start",
        room_query = criteria.room_query.as_deref().unwrap_or("<any>"),
        price_range = ?criteria.price_range,
        min_rating = ?criteria.min_rating,
        facilities = ?criteria.required_facilities,
        catalog_size = hotels.len(),
        "filtering hotels"
    );

    let room_query = criteria.room_query.as_deref().map(str::to_lowercase);
    let required_facilities: Vec<String> =
        criteria.required_facilities.iter().map(|facility| facility.trim().to_lowercase()).collect();

    let mut results = Vec::new();
    for hotel in hotels {
        if below_min_rating(hotel, criteria.min_rating) {
            continue;
        }

        let (matching_rooms, matching_prices) =
            matching_offers(hotel, room_query.as_deref(), criteria);
        if matching_rooms.is_empty() || !has_all_facilities(hotel, &required_facilities) {
            continue;
        }

        results.push(FilteredHotel::from_matches(hotel, matching_rooms, matching_prices));
        if results.len() == MAX_FILTER_RESULTS {
            debug!(event_name = "hotel.filter.capped", cap = MAX_FILTER_RESULTS, "result cap reached");
            break;
        }
    }

    info!(event_name = "hotel.filter.done", matches = results.len(), "hotel filter complete");
    results
}

fn below_min_rating(hotel: &HotelRecord, min_rating: Option<f64>) -> bool {
    min_rating.is_some_and(|min_rating| hotel.rating < min_rating)
}

/// Category-exact room matching: the label's prefix before the first `-`
/// must equal the query, ignoring case and surrounding whitespace.
fn room_matches(label: &str, room_query: Option<&str>) -> bool {
    room_query.map_or(true, |query| room_category(label) == query.trim())
}

fn matching_offers(
    hotel: &HotelRecord,
    room_query: Option<&str>,
    criteria: &FilterCriteria,
) -> (Vec<String>, Vec<f64>) {
    let mut rooms = Vec::new();
    let mut prices = Vec::new();

    for (room, price) in hotel.room_offers() {
        // An unparseable price never matches, whatever else the criteria say.
        let Some(price) = price else {
            continue;
        };
        let price_match = criteria.price_range.map_or(true, |range| range.contains(price));

        if price_match && room_matches(room, room_query) {
            rooms.push(room.to_string());
            prices.push(price);
        }
    }

    (rooms, prices)
}

fn has_all_facilities(hotel: &HotelRecord, required: &[String]) -> bool {
    required.iter().all(|facility| hotel.has_facility(facility))
}

#[cfg(test)]
mod tests {
    use crate::domain::{
        hotel::{split_facilities, split_prices, split_rooms, Coordinates, HotelRecord},
        search::{FilterCriteria, FilterQuery},
    };

    use super::{filter_hotels, MAX_FILTER_RESULTS};

    fn hotel(name: &str, rating: f64, rooms: &str, prices: &str, facilities: &str) -> HotelRecord {
        HotelRecord {
            name: name.to_string(),
            address: format!("{name} Road, New Delhi"),
            coordinates: Coordinates::new(28.6, 77.2),
            rating,
            rooms: split_rooms(rooms),
            prices: split_prices(prices),
            facilities: split_facilities(facilities),
            checkin: "12:00 PM".to_string(),
            checkout: "11:00 AM".to_string(),
        }
    }

    #[test]
    fn scenario_standard_room_in_price_band() {
        let catalog = vec![hotel("Lotus Inn", 4.5, "Standard-6hrs|Deluxe", "1500|3000", "WiFi, Pool")];
        let criteria = FilterQuery {
            room_query: Some("Standard".to_string()),
            price_range: Some("1000-2000".to_string()),
            min_rating: Some(4.0),
            required_facilities: None,
        }
        .into_criteria();

        let results = filter_hotels(&criteria, &catalog);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Lotus Inn");
        assert_eq!(results[0].matching_rooms, vec!["Standard-6hrs".to_string()]);
        assert_eq!(results[0].matching_prices, vec![1500.0]);
    }

    #[test]
    fn no_criteria_returns_every_room_capped_at_ten_hotels() {
        let catalog: Vec<HotelRecord> = (0..14)
            .map(|index| hotel(&format!("Hotel {index}"), 0.0, "Standard|Deluxe|Suite", "1|2|3", ""))
            .collect();

        let results = filter_hotels(&FilterCriteria::default(), &catalog);

        assert_eq!(results.len(), MAX_FILTER_RESULTS);
        assert_eq!(results[0].name, "Hotel 0");
        assert_eq!(results[9].name, "Hotel 9");
        assert!(results.iter().all(|hotel| hotel.matching_rooms.len() == 3));
    }

    #[test]
    fn price_outside_range_excludes_room_even_when_name_matches() {
        let catalog = vec![hotel("Lotus Inn", 4.0, "Standard-6hrs|Standard-12hrs", "999.99|2000", "")];
        let criteria = FilterCriteria::default().with_room_query("standard").with_price_range(1000.0, 2000.0);

        let results = filter_hotels(&criteria, &catalog);

        assert_eq!(results[0].matching_rooms, vec!["Standard-12hrs".to_string()]);
        assert_eq!(results[0].matching_prices, vec![2000.0]);
    }

    #[test]
    fn facility_match_is_case_insensitive() {
        let catalog = vec![
            hotel("Lotus Inn", 4.0, "Standard", "1500", "WiFi, Pool"),
            hotel("Dry Lodge", 4.0, "Standard", "1500", "Pool"),
        ];
        let criteria = FilterCriteria::default().with_facility("wifi");

        let results = filter_hotels(&criteria, &catalog);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Lotus Inn");
    }

    #[test]
    fn hotel_below_min_rating_never_appears() {
        let catalog = vec![
            hotel("Budget Stay", 3.9, "Standard", "500", "WiFi"),
            hotel("Unrated", 0.0, "Standard", "500", "WiFi"),
            hotel("Grand", 4.0, "Standard", "500", "WiFi"),
        ];
        let criteria = FilterCriteria::default().with_min_rating(4.0).with_facility("WIFI");

        let names: Vec<String> =
            filter_hotels(&criteria, &catalog).into_iter().map(|hotel| hotel.name).collect();

        assert_eq!(names, vec!["Grand".to_string()]);
    }

    #[test]
    fn unrated_hotel_is_kept_without_rating_filter() {
        let catalog = vec![hotel("Unrated", 0.0, "Standard", "500", "")];
        assert_eq!(filter_hotels(&FilterCriteria::default(), &catalog).len(), 1);
    }

    #[test]
    fn room_query_matches_category_not_substring() {
        let catalog = vec![hotel(
            "Hostel One",
            4.0,
            "Male Dormitory-6 hrs|Female Dormitory-6 hrs|Dormitory Deluxe",
            "300|300|450",
            "",
        )];
        let criteria = FilterCriteria::default().with_room_query("Male Dormitory");

        let results = filter_hotels(&criteria, &catalog);

        assert_eq!(results[0].matching_rooms, vec!["Male Dormitory-6 hrs".to_string()]);
        assert!(filter_hotels(&FilterCriteria::default().with_room_query("Dorm"), &catalog).is_empty());
    }

    #[test]
    fn unparseable_price_never_matches() {
        let catalog = vec![hotel("Lotus Inn", 4.0, "Standard|Deluxe", "on request|3000", "")];

        let results = filter_hotels(&FilterCriteria::default(), &catalog);

        assert_eq!(results[0].matching_rooms, vec!["Deluxe".to_string()]);
        assert_eq!(results[0].matching_prices, vec![3000.0]);
    }

    #[test]
    fn mismatched_lengths_truncate_to_shorter_list() {
        let catalog = vec![hotel("Lotus Inn", 4.0, "Standard|Deluxe|Suite", "1000|2000", "")];

        let results = filter_hotels(&FilterCriteria::default(), &catalog);

        assert_eq!(results[0].matching_rooms, vec!["Standard".to_string(), "Deluxe".to_string()]);
    }

    #[test]
    fn hotel_without_matching_room_is_excluded_even_with_facilities() {
        let catalog = vec![hotel("Lotus Inn", 4.0, "Deluxe", "3000", "WiFi")];
        let criteria = FilterCriteria::default().with_room_query("Standard").with_facility("wifi");

        assert!(filter_hotels(&criteria, &catalog).is_empty());
    }
}
