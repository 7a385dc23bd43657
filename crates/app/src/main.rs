use std::fmt;
use std::sync::Arc;

use aware_core::DayZone;
use aware_core::model::{LoginProvider, Section};
use aware_core::time::format_day;
use log::info;
use services::{
    ApiClient, ApiConfig, AwarenessApi, ControllerConfig, EducationController, Navigation,
    RetryPolicy, Route, Screen, SessionError, SessionStore,
};
use storage::repository::Storage;
use tokio::io::{AsyncBufReadExt, BufReader};

mod render;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
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

struct Args {
    db_url: String,
    api_url: Option<String>,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- learn  [--api <base_url>] [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- status [--api <base_url>] [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- reset  [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --api http://127.0.0.1:5000/");
    eprintln!("  --db sqlite://aware.sqlite3");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  AWARE_API_BASE_URL, AWARE_DB_URL, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Learn,
    Status,
    Reset,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "learn" => Some(Self::Learn),
            "status" => Some(Self::Status),
            "reset" => Some(Self::Reset),
            _ => None,
        }
    }
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("AWARE_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://aware.sqlite3".into(), normalize_sqlite_url);
        let mut api_url = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--api" => {
                    api_url = Some(require_value(args, "--api")?);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { db_url, api_url })
    }

    fn api_config(&self) -> Result<ApiConfig, services::ConfigError> {
        match &self.api_url {
            Some(url) => ApiConfig::new(url),
            None => ApiConfig::from_env(),
        }
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    let cmd = match argv.first().map(String::as_str) {
        None => Command::Learn,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Learn,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };
    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    prepare_sqlite_file(&parsed.db_url)?;
    let storage = Storage::sqlite(&parsed.db_url).await?;
    let store = SessionStore::new(Arc::clone(&storage.local));

    if cmd == Command::Reset {
        store.clear().await?;
        println!("Cleared saved session and quiz markers.");
        return Ok(());
    }

    let api_config = parsed.api_config()?;
    info!("content service at {}", api_config.base_url);
    let api: Arc<dyn AwarenessApi> = Arc::new(ApiClient::new(api_config, RetryPolicy::default()));

    match cmd {
        Command::Status => status(api, store).await,
        Command::Learn => learn(api, store).await,
        Command::Reset => Ok(()),
    }
}

async fn status(
    api: Arc<dyn AwarenessApi>,
    store: SessionStore,
) -> Result<(), Box<dyn std::error::Error>> {
    let refreshed = match api.latest_refresh().await {
        Ok(refresh) => format_day(refresh.timestamp_millis(), DayZone::Local),
        Err(_) => "Unknown".to_string(),
    };
    println!("Content refreshed: {refreshed}");

    let navigation = Navigation::new(Arc::clone(&api), store.clone());
    match navigation.signed_in_username().await {
        Some(username) => println!("Signed in as {username}"),
        None => println!("Not signed in"),
    }
    if let Ok(count) = api.quiz_count().await {
        println!("Quizzes completed: {}", count.count);
    }

    match store.load().await? {
        Some(snapshot) if snapshot.is_quiz_complete() => println!(
            "Saved session: quiz finished{}",
            if store.is_submitted().await? { ", score submitted" } else { "" }
        ),
        Some(snapshot) if !snapshot.questions.is_empty() => println!(
            "Saved session: question {} of {}",
            snapshot.current_question + 1,
            snapshot.questions.len()
        ),
        Some(snapshot) if !snapshot.slides.is_empty() => println!(
            "Saved session: slide {} of {}",
            snapshot.current_slide + 1,
            snapshot.slides.len()
        ),
        _ => println!("No saved session"),
    }
    println!("Theme: {}", store.theme().await?.as_str());
    Ok(())
}

fn print_learn_help() {
    println!("Commands: n(ext) p(revious) a-d (answer) c(ontinue) w (hide welcome) r(etry)");
    println!("          login google|microsoft  leave  theme  logout  q(uit)");
}

async fn learn(
    api: Arc<dyn AwarenessApi>,
    store: SessionStore,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut controller = EducationController::new(api, store, ControllerConfig::default());

    let route = controller
        .navigation()
        .startup(Route::new(Section::Home), false)
        .await?;
    if !route.section.shows_education() {
        println!("Last visited {}; opening the education view.", route.url_path());
    }
    print!("{}", render::screen(&controller.enter().await?));
    print_learn_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim().to_lowercase();
        let mut words = input.split_whitespace();
        let on_screen = single_letter(&input).filter(|label| {
            controller
                .question_view()
                .is_some_and(|view| view.option_by_label(*label).is_some())
        });
        let outcome = if let Some(label) = on_screen {
            controller.answer_label(label).await.map(Some)
        } else {
            match (words.next(), words.next()) {
                (None, _) => continue,
                (Some("q" | "quit"), _) => {
                    controller.suspend().await?;
                    break;
                }
                (Some("n" | "next"), _) => controller.next_slide().await.map(Some),
                (Some("p" | "prev" | "previous"), _) => controller.previous_slide().await.map(Some),
                (Some("c" | "continue"), _) => controller.continue_after_results().await.map(Some),
                (Some("r" | "retry"), _) => controller.enter().await.map(Some),
                (Some("w"), _) => controller.dismiss_welcome().await,
                (Some("leave"), _) => {
                    controller.suspend().await?;
                    controller.navigation().visit(Section::Leaderboard).await?;
                    println!("Left the education view; come back with `learn`.");
                    break;
                }
                (Some("theme"), _) => {
                    let theme = controller.navigation().toggle_theme().await?;
                    println!("Theme: {}", theme.as_str());
                    continue;
                }
                (Some("logout"), _) => {
                    controller.logout().await?;
                    println!("Logged out.");
                    break;
                }
                (Some("login"), provider) => {
                    let Some(provider) = provider.and_then(LoginProvider::parse) else {
                        println!("login google|microsoft");
                        continue;
                    };
                    let path = controller.prepare_login(provider).await?;
                    println!("Continue signing in at {path}");
                    break;
                }
                (Some(other), _) => Err(SessionError::UnknownOption(other.to_string())),
            }
        };

        match outcome {
            Ok(Some(screen)) => {
                print!("{}", render::screen(&screen));
                if matches!(screen, Screen::Unavailable { .. }) {
                    println!("r: retry");
                }
            }
            Ok(None) => {}
            Err(SessionError::Storage(err)) => return Err(err.into()),
            Err(err) => {
                println!("{err}");
                print_learn_help();
            }
        }
    }
    Ok(())
}

fn single_letter(word: &str) -> Option<char> {
    let mut chars = word.chars();
    match (chars.next(), chars.next()) {
        (Some(letter), None) if letter.is_ascii_alphabetic() => Some(letter),
        _ => None,
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
