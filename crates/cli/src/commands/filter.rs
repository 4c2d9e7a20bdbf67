use clap::Args;
use tripstay_core::domain::search::FilterQuery;

use super::{load_catalog, load_config, CommandResult};

const COMMAND: &str = "filter";

#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    #[arg(long, value_name = "CATEGORY", help = "Room category to match, e.g. Deluxe")]
    pub room: Option<String>,
    #[arg(long = "price-range", value_name = "MIN-MAX", help = "Inclusive nightly price range")]
    pub price_range: Option<String>,
    #[arg(long = "min-rating", value_name = "RATING", help = "Minimum hotel rating")]
    pub min_rating: Option<f64>,
    #[arg(
        long = "facility",
        value_name = "NAME",
        help = "Facility every hotel must offer (repeatable)"
    )]
    pub facilities: Vec<String>,
}

impl From<FilterArgs> for FilterQuery {
    fn from(args: FilterArgs) -> Self {
        Self {
            room_query: args.room,
            price_range: args.price_range,
            min_rating: args.min_rating,
            required_facilities: (!args.facilities.is_empty()).then_some(args.facilities),
        }
    }
}

pub fn run(args: FilterArgs) -> CommandResult {
    execute(args).unwrap_or_else(|failure| failure)
}

fn execute(args: FilterArgs) -> Result<CommandResult, CommandResult> {
    let config = load_config(COMMAND)?;
    let catalog = load_catalog(COMMAND, &config)?;

    let hotels = catalog.search(&FilterQuery::from(args).into_criteria());
    serde_json::to_string_pretty(&hotels)
        .map(CommandResult::output)
        .map_err(|error| CommandResult::failure(COMMAND, "serialization", error.to_string(), 1))
}

#[cfg(test)]
mod tests {
    use tripstay_core::domain::search::FilterQuery;

    use super::FilterArgs;

    #[test]
    fn empty_facility_list_means_no_facility_filter() {
        let query = FilterQuery::from(FilterArgs::default());
        assert_eq!(query.required_facilities, None);

        let query = FilterQuery::from(FilterArgs {
            facilities: vec!["Pool".to_string()],
            ..FilterArgs::default()
        });
        assert_eq!(query.required_facilities, Some(vec!["Pool".to_string()]));
    }
}
