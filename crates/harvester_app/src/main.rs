mod cli;
mod logging;
mod summary;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use engine_logging::engine_error;
use harvester_engine::{
    load_channels, EngineHandle, NullProgress, ProgressSink, TerminalProgress,
};

use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::initialize(cli.log.into(), cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            engine_error!("{:#}", err);
            eprintln!("{}", format!("error: {err:#}").red());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut loaded = load_channels(&cli.config)
        .with_context(|| format!("could not load {}", cli.config.display()))?;
    if let Some(limit) = cli.scan_limit {
        loaded.pipeline.scan_limit = limit;
    }

    let engine = EngineHandle::new(loaded.fetch, loaded.pipeline)?;
    let progress: Box<dyn ProgressSink> = if cli.quiet {
        Box::new(NullProgress)
    } else {
        Box::new(TerminalProgress::new())
    };

    if cli.dry_run {
        let round = engine.select(&loaded.channels, progress.as_ref());
        summary::print_selection(&round, &loaded.rejected);
        return Ok(());
    }

    let mut report = engine.run(&loaded.channels, progress.as_ref());
    report.rejected_configs = loaded.rejected;
    summary::print_report(&report);
    Ok(())
}
