use serde::Serialize;
use tripstay_core::{errors::ApplicationError, ranking::provider::Geocoder};

use super::{
    configured_maps_client, load_config, runtime, CommandResult, EXIT_INVALID_INPUT, EXIT_MAPS,
};

const COMMAND: &str = "geocode";

#[derive(Debug, Serialize)]
struct GeocodeOutput {
    geocoded_places: Vec<(String, f64, f64)>,
}

pub fn run(places: &str) -> CommandResult {
    execute(places).unwrap_or_else(|failure| failure)
}

fn execute(places: &str) -> Result<CommandResult, CommandResult> {
    let places: Vec<&str> =
        places.split(',').map(str::trim).filter(|place| !place.is_empty()).collect();
    if places.is_empty() {
        return Err(CommandResult::failure(
            COMMAND,
            "invalid_request",
            "at least one place name is required",
            EXIT_INVALID_INPUT,
        ));
    }

    let config = load_config(COMMAND)?;
    let client = configured_maps_client(COMMAND, &config)?;

    let geocoded_places = runtime(COMMAND)?.block_on(async {
        let mut resolved = Vec::with_capacity(places.len());
        for place in &places {
            let coordinates = client.resolve(place).await.map_err(resolution_failure)?;
            resolved.push((place.to_string(), coordinates.latitude, coordinates.longitude));
        }
        Ok::<_, CommandResult>(resolved)
    })?;

    serde_json::to_string_pretty(&GeocodeOutput { geocoded_places })
        .map(CommandResult::output)
        .map_err(|error| CommandResult::failure(COMMAND, "serialization", error.to_string(), 1))
}

fn resolution_failure(error: impl Into<ApplicationError>) -> CommandResult {
    match error.into() {
        ApplicationError::Domain(error) => CommandResult::failure(
            COMMAND,
            "unresolvable_place",
            error.to_string(),
            EXIT_INVALID_INPUT,
        ),
        other => CommandResult::failure(COMMAND, "maps_unavailable", other.to_string(), EXIT_MAPS),
    }
}
