pub mod config;
pub mod distances;
pub mod doctor;
pub mod filter;
pub mod geocode;

use serde::Serialize;
use tokio::runtime::Runtime;
use tripstay_core::{
    catalog::Catalog,
    config::{AppConfig, LoadOptions},
};
use tripstay_maps::GoogleMapsClient;

pub const EXIT_INVALID_INPUT: u8 = 2;
pub const EXIT_CATALOG: u8 = 3;
pub const EXIT_MAPS: u8 = 4;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    /// Raw command output on stdout, without the status envelope.
    fn output(output: String) -> Self {
        Self { exit_code: 0, output }
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

fn load_config(command: &str) -> Result<AppConfig, CommandResult> {
    AppConfig::load(LoadOptions::default()).map_err(|error| {
        CommandResult::failure(command, "config_validation", error.to_string(), EXIT_INVALID_INPUT)
    })
}

fn load_catalog(command: &str, config: &AppConfig) -> Result<Catalog, CommandResult> {
    Catalog::load(&config.catalog.path).map_err(|error| {
        CommandResult::failure(command, "catalog_load", error.to_string(), EXIT_CATALOG)
    })
}

/// Builds the maps client and refuses to continue without an api key, so
/// commands fail fast instead of reporting NOT_CONFIGURED per lookup.
fn configured_maps_client(
    command: &str,
    config: &AppConfig,
) -> Result<GoogleMapsClient, CommandResult> {
    let client = GoogleMapsClient::from_config(&config.maps).map_err(|error| {
        CommandResult::failure(command, "maps_client", error.to_string(), EXIT_MAPS)
    })?;

    if !client.is_configured() {
        return Err(CommandResult::failure(
            command,
            "maps_not_configured",
            "no maps api key configured; set TRIPSTAY_MAPS_API_KEY or GOOGLE_MAPS_API_KEY",
            EXIT_MAPS,
        ));
    }
    Ok(client)
}

fn runtime(command: &str) -> Result<Runtime, CommandResult> {
    tokio::runtime::Builder::new_current_thread().enable_all().build().map_err(|error| {
        CommandResult::failure(
            command,
            "runtime",
            format!("failed to initialize async runtime: {error}"),
            1,
        )
    })
}
