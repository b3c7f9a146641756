use std::{
    fs,
    io::{self, Read as _},
    process::ExitCode,
};

use anyhow::Context as _;
use clap::Parser as _;
use fleetops::{
    checklist::normalize_checklist,
    cli::{Cli, Command, NormalizeArgs, StatsArgs},
    commands::{date_range, write_stats_csv},
    observation::observation_stats,
    state::AppState,
};
use serde_json::Value;

fn main() -> ExitCode {
    if let Err(err) = try_main() {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn try_main() -> anyhow::Result<()> {
    fleetops::logging::init().context("init logging")?;

    let cli = Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        Command::Normalize(args) => normalize(args).context("normalize")?,
        Command::Stats(args) => {
            let state = AppState::new(cli.data_dir)?;
            stats(&state, args).context("stats")?;
        }
        Command::Serve => {
            let state = AppState::new(cli.data_dir)?;
            fleetops::bridge::serve(&state, io::stdin().lock(), io::stdout().lock())
                .context("serve")?;
        }
    }

    Ok(())
}

fn normalize(args: NormalizeArgs) -> anyhow::Result<()> {
    let text = match &args.input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read checklist file {:?}", path))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read checklist from stdin")?;
            buf
        }
    };
    // text that is not JSON at all is passed through as a bare string
    let raw: Value = serde_json::from_str(&text).unwrap_or_else(|_| Value::String(text));
    let sections = normalize_checklist(&raw);
    println!("{}", serde_json::to_string_pretty(&sections)?);
    Ok(())
}

fn stats(state: &AppState, args: StatsArgs) -> anyhow::Result<()> {
    let range = date_range(args.from, args.to)?;
    let records = state.records.observations()?;
    let stats = observation_stats(&records, range);
    if let Some(path) = &args.csv {
        write_stats_csv(&stats, path)?;
    }
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
