//! CLI entrypoint for tablepick
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use tablepick_application::{
    AnswersDocument, IngestAnswersUseCase, NoProgress, ProgressNotifier, RecommendInput,
    RecommendUseCase, RoomDirectory, RoomPublisher, RoomScript, SimulateRoomUseCase,
};
use tablepick_domain::{ConfigIssue, GeoPoint, OutputFormat, RoomCode};
use tablepick_infrastructure::{
    ConfigLoader, ConfiguredTagMappings, FileConfig, JsonQuestionCatalog, JsonRestaurantCatalog,
    JsonlRoomPublisher, VenueClassifier,
};
use tablepick_presentation::{Cli, Command, ConsoleFormatter, ProgressReporter};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

type Recommender = RecommendUseCase<JsonRestaurantCatalog, ConfiguredTagMappings>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    // === Configuration ===
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };

    let _guard = init_logging(cli.verbose, &config);

    info!("Starting tablepick");

    let issues = config.validate();
    if !issues.is_empty() {
        eprintln!("{}", ConsoleFormatter::format_issues(&issues));
    }
    if ConfigIssue::any_errors(&issues) {
        bail!("Configuration has errors");
    }

    if !config.output.color {
        colored::control::set_override(false);
    }

    // CLI flag > config file > default
    let format: OutputFormat = cli
        .output
        .map(Into::into)
        .or(config.output.format)
        .unwrap_or_default();

    let Some(command) = cli.command else {
        bail!("No command given. Run `tablepick --help` for usage.");
    };

    // === Dependency Injection ===
    let venues = VenueClassifier::new(&config.catalog.drink_categories);
    let restaurants = Arc::new(JsonRestaurantCatalog::new(
        &config.catalog.restaurants,
        venues,
    ));
    let questions = Arc::new(JsonQuestionCatalog::new(&config.catalog.questions));
    let tags = Arc::new(ConfiguredTagMappings::from_path(
        config.catalog.tag_mappings.clone(),
    ));
    let recommend = Arc::new(RecommendUseCase::new(
        restaurants,
        tags,
        config.to_recommend_params(),
    ));
    let ingest = IngestAnswersUseCase::new(Arc::clone(&questions));

    match command {
        Command::Recommend {
            answers,
            room,
            mode,
            lat,
            lng,
        } => {
            let mode = mode.or_else(|| config.catalog.question_mode.clone());
            let document: AnswersDocument = read_json(&answers).await?;
            let ingested = ingest.execute(&document, mode.as_deref()).await?;

            let mut members: Vec<_> = ingested.into_iter().map(|i| i.answers).collect();
            let mut input = if members.len() == 1 {
                RecommendInput::solo(members.remove(0))
            } else {
                RecommendInput::group(members)
            };
            if let Some(room) = room {
                input = input.with_room(RoomCode::new(room)?);
            }
            if let (Some(lat), Some(lng)) = (lat, lng) {
                input = input.with_user_location(GeoPoint::new(lat, lng));
            }

            let result = recommend.execute(input).await?;
            println!("{}", ConsoleFormatter::format_recommendations(&result, format));
        }
        Command::Simulate { script } => {
            let script: RoomScript = read_json(&script).await?;
            let rooms = Arc::new(room_directory(&config, recommend));
            let simulate = SimulateRoomUseCase::new(Arc::clone(&rooms), questions);

            let progress: Box<dyn ProgressNotifier> = if cli.quiet {
                Box::new(NoProgress)
            } else {
                Box::new(ProgressReporter::new())
            };
            let report = simulate
                .execute_with_progress(&script, progress.as_ref())
                .await;
            rooms.shutdown();

            println!("{}", ConsoleFormatter::format_report(&report?, format));
        }
        Command::Questions { mode } => {
            let mode = mode.or_else(|| config.catalog.question_mode.clone());
            let questionnaire = ingest.questionnaire(mode.as_deref()).await?;
            println!(
                "{}",
                ConsoleFormatter::format_questionnaire(&questionnaire, format)
            );
        }
    }

    Ok(())
}

/// Initialize tracing; `-v` raises the level, `[logging] file` redirects to a file
fn init_logging(verbose: u8, config: &FileConfig) -> Option<WorkerGuard> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let log_file = config.logging.file_path().and_then(|path| {
        let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let name = path.file_name()?.to_owned();
        std::fs::create_dir_all(&dir).ok()?;
        Some(tracing_appender::rolling::never(dir, name))
    });

    match log_file {
        Some(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
            None
        }
    }
}

/// Room directory with the configured publisher; Ctrl-C abandons open rooms
fn room_directory(
    config: &FileConfig,
    recommend: Arc<Recommender>,
) -> RoomDirectory<JsonRestaurantCatalog, ConfiguredTagMappings> {
    let token = CancellationToken::new();
    let ctrl_c = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, abandoning open rooms");
            ctrl_c.cancel();
        }
    });

    let mut rooms = RoomDirectory::new(recommend, config.to_room_params()).with_cancellation(token);
    if let Some(publisher) = config
        .logging
        .publications_path()
        .and_then(JsonlRoomPublisher::new)
    {
        info!("Publishing room events to {}", publisher.path().display());
        rooms = rooms.with_publisher(Arc::new(publisher) as Arc<dyn RoomPublisher>);
    }
    rooms
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid JSON in {}", path.display()))
}
