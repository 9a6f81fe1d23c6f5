use anyhow::Result;
use clap::Parser;
use smellcorr::cli::{Cli, Commands};
use smellcorr::commands::{self, AnalyzeConfig, ExtractConfig};
use tracing_subscriber::EnvFilter;

/// Install the subscriber; `RUST_LOG` wins over `-v`.
fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.command.verbosity());

    match cli.command {
        Commands::Analyze {
            config,
            projects,
            delimiter,
            vulnerability_column,
            format,
            output,
            charts,
            plain,
            verbosity: _,
        } => commands::handle_analyze(AnalyzeConfig {
            config,
            projects,
            delimiter,
            vulnerability_column,
            format,
            output,
            charts,
            plain,
        }),
        Commands::Extract {
            input,
            output_dir,
            delimiter,
            verbosity: _,
        } => commands::handle_extract(ExtractConfig {
            input,
            output_dir,
            delimiter,
        }),
        Commands::Init { force } => commands::init_config(force),
    }
}
