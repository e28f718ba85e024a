use std::process::ExitCode;

use ariel_selftest::{exit_signal, logging, run, Args};
use clap::Parser;
use tracing::error;

const INTERRUPTED: u8 = 130;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.verbose);

    let mut stdout = std::io::stdout();
    tokio::select!(
        _ = exit_signal() => {
            println!("Interrupted");
            ExitCode::from(INTERRUPTED)
        },
        result = run(&args, &mut stdout) => match result {
            Ok(verdict) => ExitCode::from(verdict.exit_code()),
            Err(e) => {
                error!(error = %e, "self-test aborted");
                ExitCode::FAILURE
            }
        },
    )
}
