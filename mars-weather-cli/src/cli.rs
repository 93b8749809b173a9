use std::{
    io::{self, Write},
    path::PathBuf,
    sync::Arc,
    time::Duration,
};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::Text;
use mars_weather_core::{
    Config, ReportFetcher, ReportProvider, SolWeather, ViewState, config::DEMO_API_KEY,
    provider::file::FileProvider, provider_from_config,
};
use tokio::time::{Instant, MissedTickBehavior};

use crate::render;

const SPLASH_TICK: Duration = Duration::from_millis(250);

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "mars-weather", version, about = "Mars weather reports from the InSight lander")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the NASA API key and endpoint.
    Configure,

    /// Show the latest sol reports.
    Show {
        /// Read the report payload from a file instead of the API.
        #[arg(long)]
        input: Option<PathBuf>,

        /// Print the rows as JSON.
        #[arg(long)]
        json: bool,

        /// Skip the splash screen.
        #[arg(long)]
        no_splash: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { input, json, no_splash } => show(input, json, no_splash).await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Text::new("NASA API key:")
        .with_initial_value(config.api_key.as_deref().unwrap_or_default())
        .with_help_message(&format!(
            "Get one at https://api.nasa.gov; leave blank to use {DEMO_API_KEY}"
        ))
        .prompt()
        .context("Failed to read API key")?;
    config.set_api_key(&api_key);

    let endpoint = Text::new("Endpoint:")
        .with_initial_value(config.endpoint_or_default())
        .prompt()
        .context("Failed to read endpoint")?;
    config.set_endpoint(&endpoint);

    // Validate before saving so a typo doesn't persist.
    provider_from_config(&config)?;

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}

async fn show(input: Option<PathBuf>, json: bool, no_splash: bool) -> anyhow::Result<()> {
    let config = Config::load()?;

    let provider: Box<dyn ReportProvider> = match input {
        Some(path) => Box::new(FileProvider::new(path)),
        None => provider_from_config(&config)?,
    };

    let fetcher = Arc::new(ReportFetcher::new(provider));
    let mut state_rx = fetcher.subscribe();
    let fetch = fetcher.spawn_activation();

    // The splash runs on its own timer; the fetch may finish before or after it.
    if !json && !no_splash {
        play_splash(config.splash_duration()).await?;
    }

    if state_rx.borrow().is_loading() {
        tracing::debug!("Report still loading, waiting for the fetcher");
        if !json {
            print!("{}", render::view(&ViewState::Loading));
        }
        state_rx.changed().await.context("Fetcher stopped before publishing a result")?;
    }
    let state = state_rx.borrow_and_update().clone();
    fetch.await.context("Fetch task failed")?;

    if matches!(state, ViewState::Failed { .. }) {
        bail!("{}", render::view(&state).trim_end());
    }

    if json {
        let records: &[SolWeather] = match &state {
            ViewState::Loaded { records, .. } => records.as_slice(),
            _ => &[],
        };
        println!("{}", serde_json::to_string_pretty(records)?);
    } else {
        print!("{}", render::view(&state));
    }

    Ok(())
}

async fn play_splash(duration: Duration) -> anyhow::Result<()> {
    let mut stdout = io::stdout();
    writeln!(stdout, "{}", render::PLANET)?;
    write!(stdout, "{:>20}", render::TITLE)?;
    stdout.flush()?;

    let Some(deadline) = Instant::now().checked_add(duration) else {
        writeln!(stdout, "\n")?;
        return Ok(());
    };
    let mut ticks = tokio::time::interval(SPLASH_TICK);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

    while Instant::now() < deadline {
        tokio::select! {
            _ = ticks.tick() => {
                write!(stdout, ".")?;
                stdout.flush()?;
            }
            _ = tokio::time::sleep_until(deadline) => break,
        }
    }

    writeln!(stdout, "\n")?;
    Ok(())
}
