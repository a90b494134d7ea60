//! Writes every output form of the demo values to disk.

use std::process::ExitCode;

use dump::{DumpError, FsOptions, write_files};
use dump_demo::ast::Program;
use dump_demo::car::Car;
use dump_demo::{Full, Sparse};
use tracing::{error, info};
use tracing_subscriber::filter::Targets;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn init_tracing() {
    let filter = std::env::var("DUMP_LOG")
        .ok()
        .and_then(|s| s.parse::<Targets>().ok())
        .unwrap_or_else(|| Targets::new().with_default(tracing::Level::INFO));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .with(filter)
        .init();
}

fn run(options: &FsOptions) -> Result<(), DumpError> {
    let car = Car::sample();
    let program = Program::sample();

    let mut written = write_files(options, "demo", "car", "full", &Full, &car)?;
    written.extend(write_files(options, "demo", "car", "sparse", &Sparse, &car)?);
    written.extend(write_files(options, "demo", "program", "full", &Full, &program)?);

    for path in &written {
        println!("{}", path.display());
    }
    info!(files = written.len(), directory = %options.directory().display(), "done");
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();

    let mut options = FsOptions::new().with_stderr(true);
    if let Some(directory) = std::env::args_os().nth(1) {
        options = options.with_directory(directory);
    }

    match run(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "dump failed");
            ExitCode::FAILURE
        }
    }
}
