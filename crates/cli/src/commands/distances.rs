use clap::Args;
use tripstay_core::ranking::{query::DistanceQuery, DistanceRanker, RankSettings};

use super::{
    configured_maps_client, filter::FilterArgs, load_catalog, load_config, runtime,
    CommandResult, EXIT_INVALID_INPUT,
};

const COMMAND: &str = "distances";

#[derive(Debug, Clone, Default, Args)]
pub struct DistanceArgs {
    #[arg(
        long = "place",
        value_name = "PLACE",
        required = true,
        help = "Tourist place to measure from each hotel (repeatable)"
    )]
    pub places: Vec<String>,
    #[command(flatten)]
    pub filter: FilterArgs,
    #[arg(long, value_name = "N", help = "Maximum number of hotels to list (default 10)")]
    pub limit: Option<usize>,
}

/// Filters the catalog with the given flags, then ranks the survivors by
/// total distance and prints the rendered table.
pub fn run(args: DistanceArgs) -> CommandResult {
    execute(args).unwrap_or_else(|failure| failure)
}

fn execute(args: DistanceArgs) -> Result<CommandResult, CommandResult> {
    let config = load_config(COMMAND)?;
    let catalog = load_catalog(COMMAND, &config)?;

    let query = DistanceQuery {
        tourist_places: args.places,
        hotels: None,
        filter: args.filter.into(),
        limit: args.limit,
    };
    let request = query.into_request(&catalog).map_err(|error| {
        CommandResult::failure(COMMAND, "invalid_request", error.to_string(), EXIT_INVALID_INPUT)
    })?;

    let client = configured_maps_client(COMMAND, &config)?;
    let ranker = DistanceRanker::new(client.clone(), client, RankSettings::from(&config.maps));
    let report = runtime(COMMAND)?.block_on(ranker.rank(&request));

    Ok(CommandResult::output(report.render()))
}
