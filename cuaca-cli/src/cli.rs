use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use cuaca_core::{
    CacheStore, Config, FileStorage, NoStorage, Phase, Session, StoragePort, WeatherError,
    WeatherService, WeatherSnapshot, provider_from_config,
};
use inquire::{Confirm, InquireError, Password, PasswordDisplayMode, Text};
use tracing::warn;

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "cuaca", version, about = "Perkiraan cuaca dari terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show weather for a city.
    Show {
        /// City name, e.g. "Jakarta".
        city: String,

        /// Skip the cached snapshot and always fetch.
        #[arg(long)]
        fresh: bool,
    },

    /// Show weather for explicit coordinates.
    Locate {
        /// Latitude in decimal degrees.
        #[arg(allow_negative_numbers = true)]
        lat: f64,

        /// Longitude in decimal degrees.
        #[arg(allow_negative_numbers = true)]
        lon: f64,
    },

    /// Store the OpenWeatherMap API key.
    Configure,

    /// Print or change the color theme.
    Theme {
        /// With no value, prints the active theme.
        #[arg(value_enum)]
        mode: Option<ThemeMode>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ThemeMode {
    Dark,
    Light,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Command::Show { city, fresh }) => {
                oneshot(Query::Name { city, use_cache: !fresh }).await
            }
            Some(Command::Locate { lat, lon }) => oneshot(Query::Coords { lat, lon }).await,
            Some(Command::Configure) => configure(),
            Some(Command::Theme { mode }) => theme(mode),
            None => interactive().await,
        }
    }
}

/// One lookup request, either by free-text name or by coordinates.
enum Query {
    Name { city: String, use_cache: bool },
    Coords { lat: f64, lon: f64 },
}

fn open_cache() -> CacheStore {
    let storage: Box<dyn StoragePort> = match FileStorage::in_user_cache() {
        Ok(storage) => Box::new(storage),
        Err(err) => {
            warn!(error = %err, "cache directory unavailable, state will not persist");
            Box::new(NoStorage)
        }
    };

    CacheStore::new(storage, render::system_prefers_dark())
}

async fn run_query(
    service: &WeatherService,
    query: &Query,
) -> Result<WeatherSnapshot, WeatherError> {
    match query {
        Query::Name { city, use_cache } => service.by_name(city, *use_cache).await,
        Query::Coords { lat, lon } => service.by_coords(*lat, *lon).await,
    }
}

/// Run a single query and exit: snapshot to stdout, failure card to stderr.
async fn oneshot(query: Query) -> anyhow::Result<()> {
    let cache = open_cache();
    let dark = cache.dark_mode();
    let config = Config::load()?;

    let outcome = match provider_from_config(&config) {
        Ok(provider) => run_query(&WeatherService::new(provider, cache), &query).await,
        Err(err) => Err(err),
    };

    match outcome {
        Ok(snapshot) => {
            render::snapshot(&snapshot, dark);
            Ok(())
        }
        Err(err) => {
            render::failure(&err, dark);
            process::exit(1);
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let key = Password::new("Kunci API OpenWeatherMap:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()?;

    let mut config = Config::load()?;
    config.set_api_key(key.trim().to_string());
    config.save()?;

    println!("Kunci API tersimpan di {}", Config::config_file_path()?.display());
    Ok(())
}

fn theme(mode: Option<ThemeMode>) -> anyhow::Result<()> {
    let cache = open_cache();

    match mode {
        Some(mode) => cache.set_dark_mode(matches!(mode, ThemeMode::Dark)),
        None => {
            let label = if cache.dark_mode() { "dark" } else { "light" };
            println!("{label}");
        }
    }

    Ok(())
}

/// The prompt loop. Starts from the last searched city when one is stored,
/// then keeps asking for a city name or a "lat, lon" pair until the user
/// cancels.
async fn interactive() -> anyhow::Result<()> {
    let cache = open_cache();
    let dark = cache.dark_mode();
    let config = Config::load()?;

    let provider = match provider_from_config(&config) {
        Ok(provider) => provider,
        Err(err) => {
            render::failure(&err, dark);
            eprintln!("Jalankan `cuaca configure` untuk menyimpan kunci API.");
            process::exit(1);
        }
    };

    let service = WeatherService::new(provider, cache);
    let mut session = Session::new();

    render::banner(dark);

    if let Some(city) = service.last_city() {
        attempt(&service, &mut session, &Query::Name { city, use_cache: true }, dark).await;
        settle(&service, &mut session, dark).await?;
    }

    loop {
        let input = match Text::new("Kota:")
            .with_help_message("nama kota atau \"lat, lon\"; Ctrl-C untuk keluar")
            .prompt()
        {
            Ok(input) => input,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err.into()),
        };

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let query = match parse_coords(input) {
            Some((lat, lon)) => {
                println!("Lokasi Sekarang: {lat}, {lon}");
                Query::Coords { lat, lon }
            }
            None => Query::Name { city: input.to_string(), use_cache: false },
        };

        attempt(&service, &mut session, &query, dark).await;
        settle(&service, &mut session, dark).await?;
    }

    Ok(())
}

async fn attempt(service: &WeatherService, session: &mut Session, query: &Query, dark: bool) {
    let ticket = session.begin();
    render::phase(session.phase(), dark);

    let outcome = run_query(service, query).await;
    session.finish(ticket, outcome);
}

/// Render the settled phase and, after a failure, offer to replay the last
/// successful city until the user declines or a lookup succeeds.
async fn settle(
    service: &WeatherService,
    session: &mut Session,
    dark: bool,
) -> anyhow::Result<()> {
    render::phase(session.phase(), dark);

    loop {
        if !matches!(session.phase(), Phase::Failed(_)) {
            return Ok(());
        }
        let Some(city) = session.retry_city().map(str::to_string) else {
            return Ok(());
        };

        match Confirm::new("Coba Lagi?").with_default(true).prompt() {
            Ok(true) => {
                attempt(service, session, &Query::Name { city, use_cache: false }, dark).await;
                render::phase(session.phase(), dark);
            }
            Ok(false)
            | Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        }
    }
}

/// Accepts "lat, lon" in decimal degrees within the valid ranges.
fn parse_coords(input: &str) -> Option<(f64, f64)> {
    let (lat, lon) = input.split_once(',')?;
    let lat: f64 = lat.trim().parse().ok()?;
    let lon: f64 = lon.trim().parse().ok()?;

    ((-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon)).then_some((lat, lon))
}
