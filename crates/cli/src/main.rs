use std::process::ExitCode;

fn main() -> ExitCode {
    demandlens_cli::run()
}
