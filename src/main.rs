use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tokio::runtime::Runtime;
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*, reload};

use commit_wizard::cli::Cli;
use commit_wizard::commands::{self, CommitOptions};
use commit_wizard::config;
use commit_wizard::error::WizardError;
use commit_wizard::git::repository::GitRepository;
use commit_wizard::ui;

fn main() -> Result<()> {
    human_panic::setup_panic!();

    let cli = Cli::parse();
    let colored = std::io::stdout().is_terminal();

    match run(cli) {
        Ok(()) => Ok(()),
        Err(e) => {
            report(&e, colored);
            std::process::exit(e.exit_code());
        }
    }
}

fn run(cli: Cli) -> std::result::Result<(), WizardError> {
    // installed before config loading so skipped config files are reported
    let log_filter = init_tracing(cli.verbose);
    let repo = GitRepository::open(None)?;

    // apply CLI overrides, then the snapshot stays fixed for the run
    let mut config = config::load_config(Some(repo.workdir()))?;
    config.dry_run |= cli.dry_run;
    config.split_commits |= cli.split;

    if config.debug && !cli.verbose {
        let _ = log_filter.reload(log_filter_for(true));
    }
    tracing::debug!("Loaded configuration: model={}", config.openai.model);

    config.validate()?;

    let options = CommitOptions::from_cli(&cli, &config);
    let rt = Runtime::new()?;
    let outcome = rt.block_on(commands::run(&options, &config, &repo))?;
    tracing::debug!("Run finished: {:?}", outcome);
    Ok(())
}

fn log_filter_for(verbose: bool) -> EnvFilter {
    let log_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    EnvFilter::from_default_env().add_directive(log_level.into())
}

fn init_tracing(verbose: bool) -> reload::Handle<EnvFilter, Registry> {
    let (filter, handle) = reload::Layer::new(log_filter_for(verbose));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
    handle
}

fn report(e: &WizardError, colored: bool) {
    if matches!(e, WizardError::UserCancelled) {
        return;
    }
    ui::error(&e.to_string(), colored);
    if let Some(suggestion) = e.suggestion() {
        println!();
        ui::info(suggestion, colored);
    }
}
