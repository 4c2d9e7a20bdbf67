use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ranking::{batch::PROVIDER_MAX_BATCH_SIZE, RankSettings};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub catalog: CatalogConfig,
    pub maps: MapsConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct CatalogConfig {
    pub path: PathBuf,
}

#[derive(Clone, Debug)]
pub struct MapsConfig {
    pub api_key: Option<SecretString>,
    pub geocode_url: String,
    pub distance_matrix_url: String,
    pub timeout_secs: u64,
    pub max_batch_size: usize,
    pub max_concurrent_requests: usize,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub graceful_shutdown_secs: u64,
    pub allowed_origins: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub catalog_path: Option<PathBuf>,
    pub maps_api_key: Option<String>,
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

pub const DEFAULT_CONFIG_FILE: &str = "tripstay.toml";

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig { path: PathBuf::from("hotels_with_details.json") },
            maps: MapsConfig {
                api_key: None,
                geocode_url: "https://maps.googleapis.com/maps/api/geocode/json".to_string(),
                distance_matrix_url: "https://maps.googleapis.com/maps/api/distancematrix/json"
                    .to_string(),
                timeout_secs: 10,
                max_batch_size: PROVIDER_MAX_BATCH_SIZE,
                max_concurrent_requests: 4,
            },
            server: ServerConfig {
                bind_address: "0.0.0.0".to_string(),
                port: 8080,
                graceful_shutdown_secs: 15,
                allowed_origins: Vec::new(),
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl MapsConfig {
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_ref().is_some_and(|key| !key.expose_secret().trim().is_empty())
    }
}

impl From<&MapsConfig> for RankSettings {
    fn from(maps: &MapsConfig) -> Self {
        Self {
            max_batch_size: maps.max_batch_size,
            max_concurrent_requests: maps.max_concurrent_requests,
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(catalog) = patch.catalog {
            if let Some(path) = catalog.path {
                self.catalog.path = path;
            }
        }

        if let Some(maps) = patch.maps {
            if let Some(api_key) = maps.api_key {
                self.maps.api_key = Some(secret_value(api_key));
            }
            if let Some(geocode_url) = maps.geocode_url {
                self.maps.geocode_url = geocode_url;
            }
            if let Some(distance_matrix_url) = maps.distance_matrix_url {
                self.maps.distance_matrix_url = distance_matrix_url;
            }
            if let Some(timeout_secs) = maps.timeout_secs {
                self.maps.timeout_secs = timeout_secs;
            }
            if let Some(max_batch_size) = maps.max_batch_size {
                self.maps.max_batch_size = max_batch_size;
            }
            if let Some(max_concurrent_requests) = maps.max_concurrent_requests {
                self.maps.max_concurrent_requests = max_concurrent_requests;
            }
        }

        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
            if let Some(graceful_shutdown_secs) = server.graceful_shutdown_secs {
                self.server.graceful_shutdown_secs = graceful_shutdown_secs;
            }
            if let Some(allowed_origins) = server.allowed_origins {
                self.server.allowed_origins = allowed_origins;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("TRIPSTAY_CATALOG_PATH") {
            self.catalog.path = PathBuf::from(value);
        }

        let api_key = read_env("TRIPSTAY_MAPS_API_KEY").or_else(|| read_env("GOOGLE_MAPS_API_KEY"));
        if let Some(value) = api_key {
            self.maps.api_key = Some(secret_value(value));
        }
        if let Some(value) = read_env("TRIPSTAY_MAPS_GEOCODE_URL") {
            self.maps.geocode_url = value;
        }
        if let Some(value) = read_env("TRIPSTAY_MAPS_DISTANCE_MATRIX_URL") {
            self.maps.distance_matrix_url = value;
        }
        if let Some(value) = read_env("TRIPSTAY_MAPS_TIMEOUT_SECS") {
            self.maps.timeout_secs = parse_u64("TRIPSTAY_MAPS_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = read_env("TRIPSTAY_MAPS_MAX_BATCH_SIZE") {
            self.maps.max_batch_size = parse_usize("TRIPSTAY_MAPS_MAX_BATCH_SIZE", &value)?;
        }
        if let Some(value) = read_env("TRIPSTAY_MAPS_MAX_CONCURRENT_REQUESTS") {
            self.maps.max_concurrent_requests =
                parse_usize("TRIPSTAY_MAPS_MAX_CONCURRENT_REQUESTS", &value)?;
        }

        if let Some(value) = read_env("TRIPSTAY_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        // `PORT` is what most container platforms inject.
        if let Some((key, value)) = read_env("TRIPSTAY_SERVER_PORT")
            .map(|value| ("TRIPSTAY_SERVER_PORT", value))
            .or_else(|| read_env("PORT").map(|value| ("PORT", value)))
        {
            self.server.port = parse_u16(key, &value)?;
        }
        if let Some(value) = read_env("TRIPSTAY_SERVER_GRACEFUL_SHUTDOWN_SECS") {
            self.server.graceful_shutdown_secs =
                parse_u64("TRIPSTAY_SERVER_GRACEFUL_SHUTDOWN_SECS", &value)?;
        }
        if let Some(value) = read_env("TRIPSTAY_SERVER_ALLOWED_ORIGINS") {
            self.server.allowed_origins = value
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect();
        }

        let log_level =
            read_env("TRIPSTAY_LOGGING_LEVEL").or_else(|| read_env("TRIPSTAY_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("TRIPSTAY_LOGGING_FORMAT").or_else(|| read_env("TRIPSTAY_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(catalog_path) = overrides.catalog_path {
            self.catalog.path = catalog_path;
        }
        if let Some(maps_api_key) = overrides.maps_api_key {
            self.maps.api_key = Some(secret_value(maps_api_key));
        }
        if let Some(bind_address) = overrides.bind_address {
            self.server.bind_address = bind_address;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    /// A missing maps key is not a validation failure: filtering still works
    /// and distance lookups report `NOT_CONFIGURED`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_catalog(&self.catalog)?;
        validate_maps(&self.maps)?;
        validate_server(&self.server)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from("config").join(DEFAULT_CONFIG_FILE)]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_catalog(catalog: &CatalogConfig) -> Result<(), ConfigError> {
    if catalog.path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "catalog.path must point at the hotel catalog JSON file".to_string(),
        ));
    }
    Ok(())
}

fn validate_maps(maps: &MapsConfig) -> Result<(), ConfigError> {
    for (key, url) in
        [("maps.geocode_url", &maps.geocode_url), ("maps.distance_matrix_url", &maps.distance_matrix_url)]
    {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::Validation(format!(
                "{key} must start with http:// or https://"
            )));
        }
    }

    if maps.timeout_secs == 0 || maps.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "maps.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    if maps.max_batch_size == 0 || maps.max_batch_size > PROVIDER_MAX_BATCH_SIZE {
        return Err(ConfigError::Validation(format!(
            "maps.max_batch_size must be in range 1..={PROVIDER_MAX_BATCH_SIZE} (provider limit)"
        )));
    }

    if maps.max_concurrent_requests == 0 {
        return Err(ConfigError::Validation(
            "maps.max_concurrent_requests must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.port == 0 {
        return Err(ConfigError::Validation("server.port must be greater than zero".to_string()));
    }

    if server.graceful_shutdown_secs == 0 {
        return Err(ConfigError::Validation(
            "server.graceful_shutdown_secs must be greater than zero".to_string(),
        ));
    }

    if let Some(origin) = server
        .allowed_origins
        .iter()
        .find(|origin| !origin.starts_with("http://") && !origin.starts_with("https://"))
    {
        return Err(ConfigError::Validation(format!(
            "server.allowed_origins entry `{origin}` must start with http:// or https://"
        )));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.trim().parse::<u16>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.trim().parse::<usize>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    catalog: Option<CatalogPatch>,
    maps: Option<MapsPatch>,
    server: Option<ServerPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogPatch {
    path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct MapsPatch {
    api_key: Option<String>,
    geocode_url: Option<String>,
    distance_matrix_url: Option<String>,
    timeout_secs: Option<u64>,
    max_batch_size: Option<usize>,
    max_concurrent_requests: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    port: Option<u16>,
    graceful_shutdown_secs: Option<u64>,
    allowed_origins: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
