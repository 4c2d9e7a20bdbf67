use std::process::ExitCode;

fn main() -> ExitCode {
    tripstay_cli::run()
}
