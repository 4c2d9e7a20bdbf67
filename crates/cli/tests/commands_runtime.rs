use std::env;
use std::io::Write;
use std::sync::{Mutex, OnceLock};

use serde_json::Value;
use tempfile::NamedTempFile;
use tripstay_cli::commands::{
    config, distances, distances::DistanceArgs, doctor, filter, filter::FilterArgs, geocode,
};

const CATALOG: &str = r#"[
    {"name":"Lotus Inn","address":"1 Janpath","latitude":28.61,"longitude":77.21,"rating":4.5,
     "room":"Deluxe|Suite","price":"3000|6000","facilities":"WiFi, Pool"},
    {"name":"Budget Stay","latitude":28.65,"longitude":77.23,"rating":3.2,"room":"Dormitory","price":"400"},
    {"name":"Far Palace","latitude":28.90,"longitude":77.50,"rating":4.8,"room":"Deluxe","price":"5000"}
]"#;

#[test]
fn filter_prints_matching_hotels_as_json() {
    let catalog = catalog_file();
    with_env(&[("TRIPSTAY_CATALOG_PATH", path_of(&catalog))], || {
        let result = filter::run(FilterArgs {
            room: Some("deluxe".to_string()),
            price_range: Some("1000-4000".to_string()),
            ..FilterArgs::default()
        });
        assert_eq!(result.exit_code, 0, "expected filter success: {}", result.output);

        let hotels = parse_payload(&result.output);
        assert_eq!(hotels.as_array().map(Vec::len), Some(1));
        assert_eq!(hotels[0]["name"], "Lotus Inn");
        assert_eq!(hotels[0]["rooms"], serde_json::json!(["Deluxe"]));
        assert_eq!(hotels[0]["prices"], serde_json::json!([3000.0]));
    });
}

#[test]
fn filter_requires_every_listed_facility() {
    let catalog = catalog_file();
    with_env(&[("TRIPSTAY_CATALOG_PATH", path_of(&catalog))], || {
        let result = filter::run(FilterArgs {
            facilities: vec!["wifi".to_string(), "pool".to_string()],
            ..FilterArgs::default()
        });
        assert_eq!(result.exit_code, 0);

        let hotels = parse_payload(&result.output);
        let names: Vec<&str> = hotels
            .as_array()
            .map(|hotels| hotels.iter().filter_map(|hotel| hotel["name"].as_str()).collect())
            .unwrap_or_default();
        assert_eq!(names, vec!["Lotus Inn"]);
    });
}

#[test]
fn filter_reports_missing_catalog() {
    with_env(&[("TRIPSTAY_CATALOG_PATH", "/nonexistent/tripstay/hotels.json")], || {
        let result = filter::run(FilterArgs::default());
        assert_eq!(result.exit_code, 3);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "filter");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "catalog_load");
    });
}

#[test]
fn invalid_config_is_reported_before_any_work() {
    with_env(&[("TRIPSTAY_MAPS_MAX_BATCH_SIZE", "40")], || {
        let result = filter::run(FilterArgs::default());
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn distances_without_places_is_an_invalid_request() {
    let catalog = catalog_file();
    with_env(&[("TRIPSTAY_CATALOG_PATH", path_of(&catalog))], || {
        let result = distances::run(DistanceArgs {
            places: vec!["   ".to_string()],
            ..DistanceArgs::default()
        });
        assert_eq!(result.exit_code, 2);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "distances");
        assert_eq!(payload["error_class"], "invalid_request");
        assert_eq!(payload["message"], "tourist_places is required");
    });
}

#[test]
fn distances_without_maps_key_fails_fast() {
    let catalog = catalog_file();
    with_env(&[("TRIPSTAY_CATALOG_PATH", path_of(&catalog))], || {
        let result = distances::run(DistanceArgs {
            places: vec!["India Gate".to_string()],
            ..DistanceArgs::default()
        });
        assert_eq!(result.exit_code, 4);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "maps_not_configured");
    });
}

#[test]
fn geocode_rejects_blank_place_list() {
    with_env(&[], || {
        let result = geocode::run(" , ,");
        assert_eq!(result.exit_code, 2);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "geocode");
        assert_eq!(payload["error_class"], "invalid_request");
    });
}

#[test]
fn geocode_without_maps_key_fails_fast() {
    with_env(&[], || {
        let result = geocode::run("India Gate, Red Fort");
        assert_eq!(result.exit_code, 4);
        assert_eq!(parse_payload(&result.output)["error_class"], "maps_not_configured");
    });
}

#[test]
fn config_redacts_maps_key_and_attributes_sources() {
    with_env(
        &[("GOOGLE_MAPS_API_KEY", "AIzaSyExampleSecretValue"), ("PORT", "9090")],
        || {
            let output = config::run();

            assert!(output.starts_with("effective config (source precedence: env > file > default):"));
            assert!(output.contains("- maps.api_key = AIza*** (source: env (GOOGLE_MAPS_API_KEY))"));
            assert!(output.contains("- server.port = 9090 (source: env (PORT))"));
            assert!(output.contains("- maps.max_batch_size = 25 (source: default)"));
            assert!(!output.contains("ExampleSecret"), "api key must never be printed");
        },
    );
}

#[test]
fn doctor_json_reports_each_check() {
    let catalog = catalog_file();
    with_env(&[("TRIPSTAY_CATALOG_PATH", path_of(&catalog))], || {
        let payload = parse_payload(&doctor::run(true));

        assert_eq!(payload["overall_status"], "fail");
        assert_eq!(payload["checks"][0]["name"], "config_validation");
        assert_eq!(payload["checks"][0]["status"], "pass");
        assert_eq!(payload["checks"][1]["name"], "catalog_load");
        assert_eq!(payload["checks"][1]["status"], "pass");
        assert_eq!(payload["checks"][2]["name"], "maps_key_readiness");
        assert_eq!(payload["checks"][2]["status"], "fail");
    });
}

#[test]
fn doctor_passes_with_catalog_and_key() {
    let catalog = catalog_file();
    with_env(
        &[("TRIPSTAY_CATALOG_PATH", path_of(&catalog)), ("TRIPSTAY_MAPS_API_KEY", "AIzaTestKey123")],
        || {
            let output = doctor::run(false);
            assert!(output.starts_with("doctor: all readiness checks passed"));
            assert!(output.contains("- [ok] catalog_load: loaded 3 hotels"));
        },
    );
}

#[test]
fn doctor_skips_checks_when_config_fails() {
    with_env(&[("TRIPSTAY_SERVER_PORT", "not-a-port")], || {
        let payload = parse_payload(&doctor::run(true));

        assert_eq!(payload["checks"][0]["status"], "fail");
        assert_eq!(payload["checks"][1]["status"], "skipped");
        assert_eq!(payload["checks"][2]["status"], "skipped");
    });
}

fn catalog_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp catalog");
    file.write_all(CATALOG.as_bytes()).expect("write catalog");
    file
}

fn path_of(file: &NamedTempFile) -> &str {
    file.path().to_str().expect("utf-8 temp path")
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "TRIPSTAY_CATALOG_PATH",
        "TRIPSTAY_MAPS_API_KEY",
        "GOOGLE_MAPS_API_KEY",
        "TRIPSTAY_MAPS_GEOCODE_URL",
        "TRIPSTAY_MAPS_DISTANCE_MATRIX_URL",
        "TRIPSTAY_MAPS_TIMEOUT_SECS",
        "TRIPSTAY_MAPS_MAX_BATCH_SIZE",
        "TRIPSTAY_MAPS_MAX_CONCURRENT_REQUESTS",
        "TRIPSTAY_SERVER_BIND_ADDRESS",
        "TRIPSTAY_SERVER_PORT",
        "PORT",
        "TRIPSTAY_SERVER_GRACEFUL_SHUTDOWN_SECS",
        "TRIPSTAY_SERVER_ALLOWED_ORIGINS",
        "TRIPSTAY_LOGGING_LEVEL",
        "TRIPSTAY_LOGGING_FORMAT",
        "TRIPSTAY_LOG_LEVEL",
        "TRIPSTAY_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
