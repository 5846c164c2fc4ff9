use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use game_core::model::{LevelId, LevelTable};
use log::info;
use services::similarity_oracle::{API_KEY_VAR, API_URL_VAR, MAX_RETRIES_VAR, TIMEOUT_VAR};
use services::{Clock, GameService, HttpSimilarityOracle, OracleConfig};
use ui::{App, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidNumber { flag: &'static str, raw: String },
    InvalidLevel { raw: String },
    InvalidApiUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidNumber { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
            ArgsError::InvalidLevel { raw } => write!(f, "invalid --start-level value: {raw}"),
            ArgsError::InvalidApiUrl { raw } => write!(f, "invalid --api-url value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_number<T: std::str::FromStr>(flag: &'static str, raw: String) -> Result<T, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidNumber { flag, raw })
}

struct DesktopApp {
    game: Arc<GameService>,
}

impl UiApp for DesktopApp {
    fn game(&self) -> Arc<GameService> {
        Arc::clone(&self.game)
    }
}

/// Command-line overrides; anything left unset falls back to the environment.
#[derive(Debug, Default)]
struct Args {
    api_url: Option<String>,
    timeout_secs: Option<u64>,
    retries: Option<u32>,
    start_level: Option<LevelId>,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!(
        "  cargo run -p app -- [--api-url <url>] [--timeout-secs <n>] [--retries <n>] [--start-level <n>]"
    );
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --timeout-secs 30");
    eprintln!("  --retries 2");
    eprintln!("  --start-level 1");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  {API_KEY_VAR} (required), {API_URL_VAR}, {TIMEOUT_VAR}, {MAX_RETRIES_VAR}");
    eprintln!("  RUST_LOG (log filter, defaults to info)");
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--api-url" => {
                    let value = require_value(args, "--api-url")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidApiUrl { raw: value });
                    }
                    parsed.api_url = Some(value.trim().to_string());
                }
                "--timeout-secs" => {
                    let value = require_value(args, "--timeout-secs")?;
                    parsed.timeout_secs = Some(parse_number("--timeout-secs", value)?);
                }
                "--retries" => {
                    let value = require_value(args, "--retries")?;
                    parsed.retries = Some(parse_number("--retries", value)?);
                }
                "--start-level" => {
                    let value = require_value(args, "--start-level")?;
                    let level = value
                        .parse::<LevelId>()
                        .map_err(|_| ArgsError::InvalidLevel { raw: value.clone() })?;
                    parsed.start_level = Some(level);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(parsed)
    }

    fn apply(&self, mut config: OracleConfig) -> OracleConfig {
        if let Some(api_url) = &self.api_url {
            config = config.with_api_url(api_url.clone());
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if let Some(retries) = self.retries {
            config = config.with_max_retries(retries);
        }
        config
    }
}

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let parsed = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    // The game cannot score anything without a key, so refuse to open the window.
    let config = parsed.apply(OracleConfig::from_env()?);
    info!(
        "similarity oracle at {} (timeout {:?}, {} retries)",
        config.api_url, config.timeout, config.max_retries
    );
    let oracle = HttpSimilarityOracle::new(config)?;

    let mut game = GameService::new(Clock::system(), LevelTable::standard(), Arc::new(oracle));
    if let Some(level) = parsed.start_level {
        game = game.with_start_level(level);
    }
    // Fail before launch when the start level is outside the table.
    game.new_session()?;

    let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
        game: Arc::new(game),
    });
    let context = build_app_context(&app);

    // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Semantic Similarity Game")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

#[tokio::main]
async fn main() {
    init_logging();
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
