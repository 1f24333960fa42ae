//! job-board-register CLI entry point.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use job_board_register::cli::Cli;
use job_board_register::environment::Environment;
use job_board_register::logging::LogfmtFormat;
use job_board_register::registrar::Registrar;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("job_board_register=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("job_board_register=info"))
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .event_format(LogfmtFormat)
                .with_writer(io::stderr),
        )
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("job-board-register starting with args: {:?}", cli);

    let registrar = Registrar::new(cli.tarball, Environment::from_process());
    let outcome = registrar.run(&mut io::stdout().lock());

    ExitCode::from(outcome.exit_code as u8)
}
