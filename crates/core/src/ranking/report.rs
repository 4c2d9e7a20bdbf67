use std::fmt;

use crate::domain::distance::{DestinationDistance, DistanceOutcome, RankedHotel};

pub const NO_MATCHING_HOTELS: &str = "No hotels match the criteria.";
pub const NO_VALID_DESTINATIONS: &str = "No valid tourist places found.";

const TABLE_HEADER: &str = "| Hotel | Latitude | Longitude | Tourist Places | Total Distance |";
const TABLE_SEPARATOR: &str = "|---|---|---|---|---|";

/// Outcome of a ranking run. The two sentinels are well-formed answers, not
/// errors: the caller is a conversational agent and always gets something
/// to show.
#[derive(Clone, Debug, PartialEq)]
pub enum DistanceReport {
    NoMatchingHotels,
    NoValidDestinations,
    Ranked(Vec<RankedHotel>),
}

impl DistanceReport {
    pub fn hotels(&self) -> &[RankedHotel] {
        match self {
            Self::Ranked(hotels) => hotels,
            Self::NoMatchingHotels | Self::NoValidDestinations => &[],
        }
    }

    pub fn is_sentinel(&self) -> bool {
        !matches!(self, Self::Ranked(_))
    }

    /// Markdown table, one row per hotel, destinations separated by `<br>`.
    pub fn render(&self) -> String {
        match self {
            Self::NoMatchingHotels => NO_MATCHING_HOTELS.to_string(),
            Self::NoValidDestinations => NO_VALID_DESTINATIONS.to_string(),
            Self::Ranked(hotels) => {
                let mut lines = Vec::with_capacity(hotels.len() + 2);
                lines.push(TABLE_HEADER.to_string());
                lines.push(TABLE_SEPARATOR.to_string());
                lines.extend(hotels.iter().map(render_row));
                lines.join("\n")
            }
        }
    }
}

impl fmt::Display for DistanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn render_row(ranked: &RankedHotel) -> String {
    let places =
        ranked.distances.iter().map(render_destination).collect::<Vec<_>>().join("<br>");
    format!(
        "| {} | {} | {} | {} | {:.2} km |",
        escape_cell(&ranked.hotel.name),
        ranked.hotel.latitude,
        ranked.hotel.longitude,
        places,
        ranked.total_distance_km()
    )
}

fn render_destination(distance: &DestinationDistance) -> String {
    let place = escape_cell(&distance.destination);
    match &distance.outcome {
        DistanceOutcome::Resolved(leg) => {
            format!("{place}: {} ({})", leg.distance_text, leg.duration_text)
        }
        DistanceOutcome::Failed(failure) => format!("{place}: N/A ({failure})"),
    }
}

fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|")
}
