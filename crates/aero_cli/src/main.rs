mod report;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::info;

use aero_core::config::{self, NotionConfig, PushoverConfig, RainConfig, StationConfig};
use aero_core::types::{IndoorReading, WeatherReading};
use aero_core::Result;
use aero_notify::{
    advise, mirror_command, window_should_be_open, HumidityTemp, MirrorCache, NotionClient,
    Notifier, PushoverClient, ShellRunner, Thresholds, WindowAdvice,
};
use aero_scrapers::{RainScraper, StationScraper};
use aero_sensor::{poll_once, FilePayloadLink, RetryPolicy};
use aero_storage::{CsvSeriesStore, JsonSnapshotStore, StateFile};

use report::print_report;

/// Window state older than this is treated as unknown.
const WINDOW_STATE_STALE_AFTER: Duration = Duration::from_secs(8 * 60 * 60);

#[derive(Parser)]
#[command(author, version, about = "home air & weather utilities", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape the weather station status page into the weather snapshot
    Weather {
        /// station config, ~/.config/aero/station.json
        #[arg(short, long, value_name = "FILE", default_value = "~/.config/aero/station.json")]
        config: String,
        /// raw page cache, ~/.cache/aero/weather.html
        #[arg(long, value_name = "FILE", default_value = "~/.cache/aero/weather.html")]
        page_cache: String,
        /// weather snapshot, ~/.cache/aero/weather.json
        #[arg(short, long, value_name = "FILE", default_value = "~/.cache/aero/weather.json")]
        out: String,
        /// refetch the page when the cache is older than this many minutes
        #[arg(long, value_name = "MINUTES", default_value_t = 10)]
        max_age: u64,
    },
    /// Scrape the rain-gauge climate report and append to the rain series
    Rain {
        /// rain config, ~/.config/aero/rain.json
        #[arg(short, long, value_name = "FILE", default_value = "~/.config/aero/rain.json")]
        config: String,
        /// precipitation series, ~/.cache/aero/rain.csv
        #[arg(short, long, value_name = "FILE", default_value = "~/.cache/aero/rain.csv")]
        out: String,
    },
    /// Decode a sensor payload into the indoor snapshot
    Indoor {
        /// current-values payload (raw bytes or hex) from the BLE reader
        #[arg(short, long, value_name = "FILE")]
        payload: String,
        /// indoor snapshot, ~/.cache/aero/waveplus.json
        #[arg(short, long, value_name = "FILE", default_value = "~/.cache/aero/waveplus.json")]
        out: String,
        /// reconnect attempts before giving up
        #[arg(long, value_name = "N", default_value_t = 3)]
        attempts: u32,
        /// seconds between reconnect attempts
        #[arg(long, value_name = "SECONDS", default_value_t = 10)]
        retry_delay: u64,
    },
    /// Compare indoor and outdoor readings, nudge about the windows
    Notify {
        /// pushover config, ~/.config/aero/pushover.json
        #[arg(short, long, value_name = "FILE", default_value = "~/.config/aero/pushover.json")]
        pushover: String,
        /// weather snapshot written by `aero weather`
        #[arg(short, long, value_name = "FILE", default_value = "~/.cache/aero/weather.json")]
        weather: String,
        /// indoor snapshot written by `aero indoor`
        #[arg(short, long, value_name = "FILE", default_value = "~/.cache/aero/waveplus.json")]
        indoor: String,
        /// window state file
        #[arg(long, value_name = "FILE", default_value = "~/.cache/aero/open_windows.state")]
        window_state: String,
        /// don't send the notification or write the window state
        #[arg(long)]
        dry_run: bool,
        /// minimum pleasant outdoor temperature
        #[arg(long, value_name = "VALUE", default_value_t = 50.0)]
        min_temp: f64,
        /// maximum pleasant outdoor temperature
        #[arg(long, value_name = "VALUE", default_value_t = 90.0)]
        max_temp: f64,
    },
    /// Mirror a command's output to a Notion page when it changes
    Mirror {
        /// name for the output cache file
        #[arg(short, long, value_name = "NAME")]
        name: String,
        /// notion config, ~/.config/aero/notion.json
        #[arg(short, long, value_name = "FILE", default_value = "~/.config/aero/notion.json")]
        config: String,
        /// cache directory for mirrored output
        #[arg(long, value_name = "DIR", default_value = "~/.cache/aero")]
        cache_dir: String,
        /// the command to run, with arguments
        #[arg(trailing_var_arg = true, required = true)]
        command: Vec<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Weather {
            config,
            page_cache,
            out,
            max_age,
        } => weather(&config, &page_cache, &out, max_age).await,
        Commands::Rain { config, out } => rain(&config, &out).await,
        Commands::Indoor {
            payload,
            out,
            attempts,
            retry_delay,
        } => indoor(&payload, &out, attempts, retry_delay).await,
        Commands::Notify {
            pushover,
            weather,
            indoor,
            window_state,
            dry_run,
            min_temp,
            max_temp,
        } => {
            notify(
                &pushover,
                &weather,
                &indoor,
                &window_state,
                dry_run,
                Thresholds { min_temp, max_temp },
            )
            .await
        }
        Commands::Mirror {
            name,
            config,
            cache_dir,
            command,
        } => mirror(&name, &config, &cache_dir, &command).await,
    }
}

fn expanded(path: &str) -> Result<PathBuf> {
    Ok(PathBuf::from(config::expand_path(path)?))
}

async fn weather(config_path: &str, page_cache: &str, out: &str, max_age: u64) -> Result<()> {
    let station_config = StationConfig::load(config_path)?;
    let scraper = StationScraper::new(&station_config, expanded(page_cache)?)
        .with_max_age(Duration::from_secs(max_age * 60));
    let store = JsonSnapshotStore::<WeatherReading>::new(expanded(out)?);

    let (reading, status) = scraper.scrape(&store).await?;
    info!("🌡️ observation from {}: {:?}", reading.observed_at, status);
    println!(
        "temperature {}°F, humidity {}%, barometer {} ({:?})",
        reading.temperature, reading.humidity, reading.barometer, status
    );
    Ok(())
}

async fn rain(config_path: &str, out: &str) -> Result<()> {
    let rain_config = RainConfig::load(config_path)?;
    let scraper = RainScraper::new(&rain_config)?;
    let store = CsvSeriesStore::new(expanded(out)?);

    let (rain_report, appended) = scraper.scrape(&store).await?;
    println!(
        "{}: high {}°F, low {}°F, precipitation {} in{}",
        rain_report.report_date,
        rain_report.high_temp,
        rain_report.low_temp,
        rain_report.precipitation,
        if appended { "" } else { " (already recorded)" }
    );
    Ok(())
}

async fn indoor(payload: &str, out: &str, attempts: u32, retry_delay: u64) -> Result<()> {
    let link = FilePayloadLink::new(expanded(payload)?);
    let policy = RetryPolicy {
        max_attempts: attempts,
        delay: Duration::from_secs(retry_delay),
    };
    let store = JsonSnapshotStore::<IndoorReading>::new(expanded(out)?);

    let (reading, status) = poll_once(&link, &policy, &store).await?;
    println!(
        "humidity {} %rH, temperature {}°F, radon {}/{} Bq/m3, co2 {} ppm, voc {} ppb ({:?})",
        reading.humidity,
        reading.temperature,
        reading.radon_st_avg,
        reading.radon_lt_avg,
        reading.co2,
        reading.voc,
        status
    );
    Ok(())
}

async fn notify(
    pushover_path: &str,
    weather_path: &str,
    indoor_path: &str,
    window_state_path: &str,
    dry_run: bool,
    thresholds: Thresholds,
) -> Result<()> {
    // Fail fast on credentials before reading anything else.
    let pushover_config = PushoverConfig::load(pushover_path)?;

    let weather_store = JsonSnapshotStore::<WeatherReading>::new(expanded(weather_path)?);
    let outdoor_reading = weather_store.load()?.ok_or_else(|| {
        aero_core::Error::Storage(format!("no weather snapshot at {}", weather_path))
    })?;
    let indoor_store = JsonSnapshotStore::<IndoorReading>::new(expanded(indoor_path)?);
    let indoor_reading = indoor_store.load()?.ok_or_else(|| {
        aero_core::Error::Storage(format!("no indoor snapshot at {}", indoor_path))
    })?;

    let indoor = HumidityTemp {
        humidity: indoor_reading.humidity,
        temp: indoor_reading.temperature,
    };
    let outdoor = HumidityTemp {
        humidity: outdoor_reading.humidity as f64,
        temp: outdoor_reading.temperature,
    };

    let state = StateFile::new(expanded(window_state_path)?, WINDOW_STATE_STALE_AFTER);
    let last_known_open = state.load();
    let should_be_open = window_should_be_open(indoor, outdoor, &thresholds);
    print_report(indoor, outdoor, should_be_open, last_known_open);

    let client = PushoverClient::new(pushover_config, dry_run);
    match advise(should_be_open, last_known_open) {
        WindowAdvice::OpenWindows => {
            client
                .send(&format!(
                    "open the windows 🪟 outdoor temp: {} indoor temp: {} outdoor humidity: {} indoor humidity: {}",
                    outdoor.temp, indoor.temp, outdoor.humidity, indoor.humidity
                ))
                .await?;
            if !dry_run {
                state.save(should_be_open)?;
            }
        }
        WindowAdvice::CloseWindows => {
            client
                .send(&format!(
                    "close the windows 🪟 outdoor temp: {} indoor temp: {} outdoor humidity: {} indoor humidity: {}",
                    outdoor.temp, indoor.temp, outdoor.humidity, indoor.humidity
                ))
                .await?;
            if !dry_run {
                state.save(should_be_open)?;
            }
        }
        WindowAdvice::NoChange => {
            println!("no notification");
        }
    }
    Ok(())
}

async fn mirror(name: &str, config_path: &str, cache_dir: &str, command: &[String]) -> Result<()> {
    let notion_config = NotionConfig::load(config_path)?;
    let (program, args) = command.split_first().ok_or_else(|| {
        aero_core::Error::Command("no command provided".to_string())
    })?;

    let cache = MirrorCache::new(expanded(cache_dir)?.join(format!("{}.txt", name)));
    let client = NotionClient::new(notion_config);

    let updated = mirror_command(&ShellRunner, &cache, &client, program, args).await?;
    if updated {
        println!("notion page replaced");
    } else {
        println!("no changes in output, notion page update skipped");
    }
    Ok(())
}
