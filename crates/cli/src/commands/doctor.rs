use serde::Serialize;
use tripstay_core::{
    catalog::Catalog,
    config::{AppConfig, LoadOptions},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> String {
    let report = build_report();

    if json_output {
        return serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
            )
        });
    }

    render_human(&report)
}

fn build_report() -> DoctorReport {
    let checks = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => vec![
            DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            },
            check_catalog(&config),
            check_maps_key(&config),
        ],
        Err(error) => vec![
            DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            },
            skipped("catalog_load"),
            skipped("maps_key_readiness"),
        ],
    };

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn skipped(name: &'static str) -> DoctorCheck {
    DoctorCheck {
        name,
        status: CheckStatus::Skipped,
        details: "skipped because configuration did not load".to_string(),
    }
}

fn check_catalog(config: &AppConfig) -> DoctorCheck {
    match Catalog::load(&config.catalog.path) {
        Ok(catalog) if catalog.is_empty() => DoctorCheck {
            name: "catalog_load",
            status: CheckStatus::Fail,
            details: format!("catalog `{}` contains no hotels", config.catalog.path.display()),
        },
        Ok(catalog) => DoctorCheck {
            name: "catalog_load",
            status: CheckStatus::Pass,
            details: format!(
                "loaded {} hotels from `{}`",
                catalog.len(),
                config.catalog.path.display()
            ),
        },
        Err(error) => {
            DoctorCheck { name: "catalog_load", status: CheckStatus::Fail, details: error.to_string() }
        }
    }
}

/// Only checks that a key is present; no request is sent to the provider.
fn check_maps_key(config: &AppConfig) -> DoctorCheck {
    if config.maps.has_api_key() {
        DoctorCheck {
            name: "maps_key_readiness",
            status: CheckStatus::Pass,
            details: "maps api key configured".to_string(),
        }
    } else {
        DoctorCheck {
            name: "maps_key_readiness",
            status: CheckStatus::Fail,
            details: "no maps api key; set TRIPSTAY_MAPS_API_KEY or GOOGLE_MAPS_API_KEY"
                .to_string(),
        }
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = vec![report.summary.clone()];

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}
