//! easybuild CLI - minimal parallel build tool for C, C++ and assembly.

mod build;
mod colors;
mod options;
mod progress;

use std::process::ExitCode;

use clap::Parser;

use options::BuildArgs;

#[derive(Parser)]
#[command(name = "eb")]
#[command(about = "Build C, C++ and assembly sources in parallel and link them")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    build: BuildArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.build.verbose {
        tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing::Level::DEBUG.into())
    } else {
        tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match build::execute(&cli.build) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Core errors carry a category exit code and a recovery hint
            let (message, code) = match err.downcast_ref::<easybuild_core::Error>() {
                Some(core_err) => (core_err.with_hint(), core_err.exit_code()),
                None => (format!("{:#}", err), 1),
            };
            eprintln!("{}error:{} {}", colors::RED, colors::RESET, message);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}
