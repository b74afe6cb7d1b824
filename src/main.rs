use clap::Parser;
use cellbox::cli::{run, Cli};
use cellbox::{init_logging, BUILD_DATE, VERSION};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    tracing::debug!("cellbox {} built {}", VERSION, BUILD_DATE);

    let invocation: Vec<String> = std::env::args().collect();
    match run(cli, &invocation) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
