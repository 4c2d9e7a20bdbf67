pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use commands::{distances::DistanceArgs, filter::FilterArgs};

#[derive(Debug, Parser)]
#[command(
    name = "tripstay",
    about = "Tripstay operator CLI",
    long_about = "Query the hotel catalog, rank hotels by distance to tourist places, and inspect runtime readiness.",
    after_help = "Examples:\n  tripstay filter --room Deluxe --price-range 1000-4000\n  tripstay distances --place \"India Gate\" --place \"Qutub Minar\" --limit 5\n  tripstay geocode \"India Gate, Red Fort\"\n  tripstay doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Filter the hotel catalog and print the matching hotels as JSON")]
    Filter(FilterArgs),
    #[command(about = "Rank hotels by total distance to one or more tourist places")]
    Distances(DistanceArgs),
    #[command(about = "Resolve comma-separated place names to coordinates")]
    Geocode {
        #[arg(value_name = "PLACES", help = "Place names separated by commas")]
        places: String,
    },
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, catalog loading, and maps key readiness")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Filter(args) => commands::filter::run(args),
        Command::Distances(args) => commands::distances::run(args),
        Command::Geocode { places } => commands::geocode::run(&places),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, Command};

    #[test]
    fn distances_accepts_repeated_places_and_filter_flags() {
        let cli = Cli::try_parse_from([
            "tripstay",
            "distances",
            "--place",
            "India Gate",
            "--place",
            "Qutub Minar",
            "--room",
            "Deluxe",
            "--facility",
            "WiFi",
            "--limit",
            "3",
        ])
        .expect("arguments should parse");

        let Command::Distances(args) = cli.command else {
            panic!("expected distances command");
        };
        assert_eq!(args.places, vec!["India Gate", "Qutub Minar"]);
        assert_eq!(args.filter.room.as_deref(), Some("Deluxe"));
        assert_eq!(args.filter.facilities, vec!["WiFi"]);
        assert_eq!(args.limit, Some(3));
    }

    #[test]
    fn distances_requires_a_place() {
        assert!(Cli::try_parse_from(["tripstay", "distances", "--room", "Deluxe"]).is_err());
    }
}
