use std::{
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use anyhow::Result;
use clap::{Parser, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::fs;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use viralvantage_core::{
    AnalysisController, AnalysisState, GeminiClient, Platform, ProviderConfig, Thumbnail,
    format_report_readable,
    progress::COMPLETE_STATUS,
    provider::{API_KEY_ENV_VAR, DEFAULT_API_URL, DEFAULT_MODEL},
    types::DEFAULT_NICHE,
};

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.0}m {:.0}s", (secs / 60.0).floor(), secs % 60.0)
    }
}

/// CLI wrapper for Platform enum (needed for clap ValueEnum)
#[derive(Clone, Default, ValueEnum)]
enum CliPlatform {
    #[default]
    Tiktok,
    Youtube,
    Instagram,
}

impl From<CliPlatform> for Platform {
    fn from(cli: CliPlatform) -> Self {
        match cli {
            CliPlatform::Tiktok => Platform::TikTok,
            CliPlatform::Youtube => Platform::YouTube,
            CliPlatform::Instagram => Platform::Instagram,
        }
    }
}

#[derive(Parser)]
#[command(name = "viralvantage")]
#[command(about = "Score a video or draft for virality and get an action plan from Gemini")]
struct Cli {
    /// Video URL (grounded analysis) or draft title
    title: String,

    /// Target platform
    #[arg(short, long, default_value = "tiktok")]
    platform: CliPlatform,

    /// Content niche (e.g. "Education", "Lifestyle/Vlog", "Tech/Gadgets", "Finance")
    #[arg(short, long, default_value = DEFAULT_NICHE)]
    niche: String,

    /// Draft description or caption
    #[arg(short, long, default_value = "")]
    description: String,

    /// Hashtag to include; repeat for more
    #[arg(long = "hashtag")]
    hashtags: Vec<String>,

    /// Thumbnail image to evaluate
    #[arg(short, long)]
    thumbnail: Option<PathBuf>,

    /// Gemini model
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Gemini API base URL
    #[arg(long, default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Gemini API key
    #[arg(long, env = API_KEY_ENV_VAR, hide_env_values = true, default_value = "")]
    api_key: String,

    /// Print the report as JSON instead of the readable summary
    #[arg(long)]
    json: bool,

    /// Also write the report as JSON to this file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn mime_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => Thumbnail::DEFAULT_MIME_TYPE,
    }
}

fn create_progress_bar() -> Result<ProgressBar> {
    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} [{bar:30.cyan/blue}] {pos:>3}% {msg}")?
            .progress_chars("=> "),
    );
    pb.enable_steady_tick(Duration::from_millis(80));
    Ok(pb)
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "viralvantage=warn,viralvantage_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = ProviderConfig::new(cli.api_key)
        .with_model(cli.model)
        .with_api_url(cli.api_url);
    let controller = AnalysisController::new(GeminiClient::new(config));

    controller.update_metadata(|metadata| {
        metadata.title = cli.title;
        metadata.description = cli.description;
        metadata.hashtags = cli.hashtags;
        metadata.niche = cli.niche;
        metadata.platform = cli.platform.into();
    });

    if let Some(path) = &cli.thumbnail {
        let bytes = fs::read(path).await?;
        controller.set_thumbnail(Some(Thumbnail::from_bytes(mime_type_for(path), &bytes)));
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "loaded thumbnail");
    }

    let metadata = controller.metadata();
    println!(
        "\n{}  {}\n",
        style("viralvantage").cyan().bold(),
        style("Virality Analyzer").dim()
    );
    println!(
        "{} {} {}",
        style("✓").green().bold(),
        metadata.platform.display_name(),
        style(format!("[{}]", metadata.niche)).dim()
    );
    println!("{}", style("─".repeat(60)).dim());

    let pb = create_progress_bar()?;
    let mut states = controller.subscribe();
    let watcher = tokio::spawn({
        let pb = pb.clone();
        async move {
            while states.changed().await.is_ok() {
                let state = states.borrow_and_update().clone();
                if let AnalysisState::Analyzing {
                    progress,
                    status_text,
                } = state
                {
                    pb.set_position(u64::from(progress));
                    pb.set_message(status_text);
                }
            }
        }
    });

    let started = Instant::now();
    let outcome = controller.analyze().await;
    watcher.abort();

    let report = match outcome {
        AnalysisState::Succeeded { report } => {
            pb.set_position(100);
            pb.finish_with_message(format!(
                "{} {} {}",
                style("✓").green().bold(),
                COMPLETE_STATUS,
                style(format!("[{}]", format_duration(started.elapsed()))).dim()
            ));
            report
        }
        AnalysisState::Failed { message } => {
            pb.abandon();
            eprintln!("{} {}", style("Error:").red().bold(), message);
            std::process::exit(1);
        }
        AnalysisState::Idle | AnalysisState::Analyzing { .. } => {
            pb.abandon();
            anyhow::bail!("analysis did not finish");
        }
    };

    if let Some(path) = &cli.output {
        fs::write(path, serde_json::to_string_pretty(&report)?).await?;
        println!(
            "\n{} {}",
            style("Saved:").dim(),
            style(path.display()).cyan()
        );
    }

    println!("{}", style("─".repeat(60)).dim());

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", format_report_readable(&report));
    }

    Ok(())
}
