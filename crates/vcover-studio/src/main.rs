//! V-Cover command line front end.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vcover_models::{DesignStyle, JobOutcome, VideoSource};
use vcover_studio::{CoverSession, StudioConfig};

#[derive(Parser, Debug)]
#[command(name = "vcover", version, about = "Turn a vertical video into an AI magazine cover")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a cover from a video.
    Generate(GenerateArgs),
    /// List the available design styles.
    Styles,
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Input video file.
    #[arg(long)]
    video: PathBuf,

    /// Design style id (see `vcover styles`).
    #[arg(long, default_value_t = DesignStyle::default())]
    style: DesignStyle,

    /// Extra artistic instruction, e.g. a title word or "film grain".
    #[arg(long, default_value = "")]
    instruction: String,

    /// Directory the cover is written to.
    #[arg(long, default_value = ".")]
    out: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Install rustls crypto provider (required for TLS/HTTPS)
    let _ = rustls::crypto::ring::default_provider().install_default();

    // Load environment variables
    dotenvy::dotenv().ok();

    init_tracing()?;

    let cli = Cli::parse();
    match cli.cmd {
        Command::Generate(args) => cmd_generate(args).await,
        Command::Styles => {
            cmd_styles();
            Ok(())
        }
    }
}

fn init_tracing() -> anyhow::Result<()> {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("vcover=info,vcover_studio=info,vcover_media=info,vcover_genai=info"))
        .context("invalid log filter")?;

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
    Ok(())
}

fn cmd_styles() {
    for preset in DesignStyle::catalog() {
        println!(
            "{:<18} {:<18} {}",
            preset.style.as_str(),
            preset.label,
            preset.description
        );
    }
}

async fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let config = StudioConfig::from_env();
    if !config.gemini.has_api_key() {
        warn!("GEMINI_API_KEY is not set; the service will reject requests");
    }

    let session = CoverSession::from_config(&config);

    let mut states = session.subscribe();
    tokio::spawn(async move {
        while states.changed().await.is_ok() {
            let state = *states.borrow_and_update();
            info!("State: {}", state);
        }
    });

    let bytes = tokio::fs::read(&args.video)
        .await
        .with_context(|| format!("failed to read {}", args.video.display()))?;
    let mut source = VideoSource::new(bytes);
    if let Some(name) = args.video.file_name() {
        source = source.with_file_name(name.to_string_lossy());
    }

    if let Err(e) = session.load_video(source).await {
        anyhow::bail!("{} ({})", e.user_message().unwrap_or("error"), e);
    }

    session.select_style(args.style).await;
    session.set_instruction(args.instruction).await;

    match session.generate().await? {
        JobOutcome::Success(_) => {
            let path = session.save_cover(&args.out).await?;
            println!("{}", path.display());
            Ok(())
        }
        JobOutcome::Failure(kind) => anyhow::bail!("{}", kind.user_message()),
    }
}
