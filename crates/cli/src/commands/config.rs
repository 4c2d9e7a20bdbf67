use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::ExposeSecret;
use toml::Value;
use tripstay_core::config::{AppConfig, LoadOptions, DEFAULT_CONFIG_FILE};

struct ConfigField {
    key: &'static str,
    value: String,
    env_keys: &'static [&'static str],
}

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for field in fields(&config) {
        let source = field_source(
            field.key,
            field.env_keys,
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        );
        lines.push(render_line(field.key, &field.value, source));
    }

    lines.join("\n")
}

fn fields(config: &AppConfig) -> Vec<ConfigField> {
    let api_key = config
        .maps
        .api_key
        .as_ref()
        .map(|key| redact_key(key.expose_secret()))
        .unwrap_or_else(|| "<unset>".to_string());
    let allowed_origins = if config.server.allowed_origins.is_empty() {
        "<any>".to_string()
    } else {
        config.server.allowed_origins.join(",")
    };

    vec![
        ConfigField {
            key: "catalog.path",
            value: config.catalog.path.display().to_string(),
            env_keys: &["TRIPSTAY_CATALOG_PATH"],
        },
        ConfigField {
            key: "maps.api_key",
            value: api_key,
            env_keys: &["TRIPSTAY_MAPS_API_KEY", "GOOGLE_MAPS_API_KEY"],
        },
        ConfigField {
            key: "maps.geocode_url",
            value: config.maps.geocode_url.clone(),
            env_keys: &["TRIPSTAY_MAPS_GEOCODE_URL"],
        },
        ConfigField {
            key: "maps.distance_matrix_url",
            value: config.maps.distance_matrix_url.clone(),
            env_keys: &["TRIPSTAY_MAPS_DISTANCE_MATRIX_URL"],
        },
        ConfigField {
            key: "maps.timeout_secs",
            value: config.maps.timeout_secs.to_string(),
            env_keys: &["TRIPSTAY_MAPS_TIMEOUT_SECS"],
        },
        ConfigField {
            key: "maps.max_batch_size",
            value: config.maps.max_batch_size.to_string(),
            env_keys: &["TRIPSTAY_MAPS_MAX_BATCH_SIZE"],
        },
        ConfigField {
            key: "maps.max_concurrent_requests",
            value: config.maps.max_concurrent_requests.to_string(),
            env_keys: &["TRIPSTAY_MAPS_MAX_CONCURRENT_REQUESTS"],
        },
        ConfigField {
            key: "server.bind_address",
            value: config.server.bind_address.clone(),
            env_keys: &["TRIPSTAY_SERVER_BIND_ADDRESS"],
        },
        ConfigField {
            key: "server.port",
            value: config.server.port.to_string(),
            env_keys: &["TRIPSTAY_SERVER_PORT", "PORT"],
        },
        ConfigField {
            key: "server.graceful_shutdown_secs",
            value: config.server.graceful_shutdown_secs.to_string(),
            env_keys: &["TRIPSTAY_SERVER_GRACEFUL_SHUTDOWN_SECS"],
        },
        ConfigField {
            key: "server.allowed_origins",
            value: allowed_origins,
            env_keys: &["TRIPSTAY_SERVER_ALLOWED_ORIGINS"],
        },
        ConfigField {
            key: "logging.level",
            value: config.logging.level.clone(),
            env_keys: &["TRIPSTAY_LOGGING_LEVEL", "TRIPSTAY_LOG_LEVEL"],
        },
        ConfigField {
            key: "logging.format",
            value: format!("{:?}", config.logging.format),
            env_keys: &["TRIPSTAY_LOGGING_FORMAT", "TRIPSTAY_LOG_FORMAT"],
        },
    ]
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from("config").join(DEFAULT_CONFIG_FILE)]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

/// The first env key that is set wins, matching the loader's alias order.
fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

/// Keeps at most the first four characters so operators can tell keys apart.
fn redact_key(key: &str) -> String {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    let chars: Vec<char> = trimmed.chars().collect();
    if chars.len() <= 8 {
        return "<redacted>".to_string();
    }
    format!("{}***", chars[..4].iter().collect::<String>())
}
