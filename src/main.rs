//! Modkeeper CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use modkeeper::cli::{Cli, CommandDispatcher, Commands};
use modkeeper::config::{load_config, ModkeeperConfig};
use modkeeper::shell::is_ci;
use modkeeper::ui::{create_ui, OutputMode};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("modkeeper=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("modkeeper=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("Modkeeper starting with args: {:?}", cli);

    // Handle --no-color
    if cli.no_color {
        std::env::set_var("NO_COLOR", "1");
    }

    let flag_mode = if cli.quiet {
        Some(OutputMode::Quiet)
    } else if cli.verbose {
        Some(OutputMode::Verbose)
    } else {
        None
    };
    let is_interactive = !cli.non_interactive && !is_ci();

    // Completions must work even with a broken config file
    let loaded = match &cli.command {
        Some(Commands::Completions(_)) => Ok(ModkeeperConfig::default()),
        _ => load_config(cli.config.as_deref()),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            let mut ui = create_ui(is_interactive, flag_mode.unwrap_or_default());
            ui.error(&format!("Error: {}", e));
            return ExitCode::from(2);
        }
    };

    let output_mode = flag_mode.unwrap_or_else(|| config.settings.default_output.into());
    let mut ui = create_ui(is_interactive, output_mode);

    let dispatcher = CommandDispatcher::new(config, cli.yes);

    match dispatcher.dispatch(&cli, ui.as_mut()) {
        Ok(result) => ExitCode::from(result.exit_code as u8),
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            if e.is_usage_error() {
                ExitCode::from(2)
            } else {
                ExitCode::from(1)
            }
        }
    }
}
