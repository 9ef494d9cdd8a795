use std::{future::IntoFuture, path::PathBuf, str::FromStr, sync::Arc, time::Duration};

use anyhow::Context;
use apalis::{
    layers::{retry::RetryPolicy, sentry::SentryLayer},
    prelude::*,
};
use apalis_cron::{CronStream, Tick};
use blog_cast::{
    tracing::init_tracing_subscriber,
    web::{create_router, AppState},
    GoogleTts, InteractionController, LlmConfig, PipelineCoordinator, PipelineRequest,
    SpeechOptions, TextSynthesizer,
};
use cast_store::{AssetStore, LocalAssetStore};
use clap::{Parser, Subcommand};
use cron::Schedule;
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(name = "blog-cast", about = "Blog post to podcast generator")]
struct Cli {
    /// Google AI Studio API key, checked on the first model call
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Primary language model
    #[arg(long, env = "LLM_MODEL", default_value = "gemini-2.0-flash")]
    model: String,

    /// Models tried in order when the primary one fails
    #[arg(
        long,
        env = "LLM_FALLBACK_MODELS",
        value_delimiter = ',',
        default_value = "gemini-1.5-flash"
    )]
    fallback_models: Vec<String>,

    /// OpenAI-compatible chat completions base url
    #[arg(long, env = "LLM_BASE_URL", default_value = blog_cast::llm::client::DEFAULT_BASE_URL)]
    llm_base_url: String,

    #[arg(long, env = "LLM_TEMPERATURE", default_value = "0.7")]
    temperature: f32,

    /// Transport retries for transient model failures
    #[arg(long, env = "LLM_NUM_RETRIES", default_value = "3")]
    num_retries: u32,

    /// Per-request model timeout in seconds
    #[arg(long, env = "LLM_TIMEOUT_SECS", default_value = "120")]
    timeout_secs: u64,

    /// Google Translate domain used for speech, e.g. `com` or `co.uk`
    #[arg(long, env = "TTS_TLD", default_value = "com")]
    tts_tld: String,

    /// Working directory for audio files
    #[arg(long, env = "BLOG_CAST_WORKDIR", default_value = "/var/tmp/blog-cast")]
    workdir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the web UI and sweep old audio on a schedule
    Serve {
        #[arg(long, env = "HOST", default_value = "127.0.0.1")]
        host: String,

        #[arg(long, env = "PORT", default_value = "7860")]
        port: u16,

        /// Audio older than this many seconds is removed by the sweep
        #[arg(long, env = "AUDIO_RETENTION_SECS", default_value = "3600")]
        retention_secs: u64,

        /// Cron schedule expression for the sweep
        #[arg(long, env = "AUDIO_SWEEP_SCHEDULE", default_value = "0 */10 * * * *")]
        sweep_schedule: String,
    },
    /// Summarize a single post and exit
    Summarize {
        url: String,

        /// Also synthesize the summary and print the mp3 path
        #[arg(long)]
        speak: bool,
    },
}

impl Cli {
    fn llm_config(&self) -> LlmConfig {
        LlmConfig {
            api_key: self.api_key.clone(),
            base_url: self.llm_base_url.clone(),
            model: self.model.clone(),
            fallback_models: self.fallback_models.clone(),
            temperature: self.temperature,
            num_retries: self.num_retries,
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

#[derive(Clone)]
struct SweepConfig {
    store: Arc<LocalAssetStore>,
    retention: Duration,
}

async fn handle_tick(_tick: Tick, config: Data<SweepConfig>) -> anyhow::Result<()> {
    let result = config.store.sweep(config.retention).await?;

    for failure in &result.failed_removals {
        tracing::warn!(name = %failure.name, reason = %failure.reason, "Failed to remove audio asset");
    }
    tracing::info!(
        removed = result.removed.len(),
        failed = result.failed_removals.len(),
        "Swept expired audio"
    );

    Ok(())
}

async fn serve(
    cli: &Cli,
    host: &str,
    port: u16,
    retention: Duration,
    schedule: Schedule,
) -> anyhow::Result<()> {
    let store = Arc::new(LocalAssetStore::init(&cli.workdir)?.purge_on_drop(true));

    let controller = InteractionController::new(
        PipelineCoordinator::from_config(cli.llm_config())?,
        TextSynthesizer::new(GoogleTts::new(&cli.tts_tld)?, Arc::clone(&store))
            .with_options(SpeechOptions::default()),
    );
    let router = create_router(AppState::new(controller));

    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
            }
            tracing::info!("Shutdown requested");
            shutdown.cancel();
        }
    });

    let sweeper = WorkerBuilder::new("blog-cast-sweep")
        .backend(CronStream::new(schedule))
        .retry(RetryPolicy::retries(1))
        .layer(SentryLayer::new())
        .data(SweepConfig {
            store: Arc::clone(&store),
            retention,
        })
        .build(handle_tick);

    let listener = tokio::net::TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind {host}:{port}"))?;
    tracing::info!(address = %listener.local_addr()?, "Serving web UI");

    let server = axum::serve(listener, router).with_graceful_shutdown({
        let shutdown = shutdown.clone();
        async move { shutdown.cancelled().await }
    });

    tokio::select! {
        res = server.into_future() => res.context("Web server failed")?,
        res = sweeper.run() => {
            res.context("Sweep worker stopped")?;
            shutdown.cancel();
        }
    }

    Ok(())
}

async fn summarize(cli: &Cli, url: &str, speak: bool) -> anyhow::Result<()> {
    let request = PipelineRequest::new(url);
    let coordinator = PipelineCoordinator::from_config(cli.llm_config())?;
    let summary = coordinator.run(request.validated_url()?).await?;
    println!("{}", summary.markdown_text);

    if speak {
        let store = LocalAssetStore::init(&cli.workdir)?;
        let synthesizer = TextSynthesizer::new(GoogleTts::new(&cli.tts_tld)?, store);
        let audio = synthesizer.synthesize(&summary.markdown_text).await?;
        println!("{}", audio.file_path.display());
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let _guard = sentry::init((
        std::env::var("SENTRY_DSN").unwrap_or_default(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: Some("production".into()),
            ..Default::default()
        },
    ));

    let cli = Cli::parse();
    init_tracing_subscriber()?;

    match &cli.command {
        Command::Serve {
            host,
            port,
            retention_secs,
            sweep_schedule,
        } => {
            tracing::info!(%sweep_schedule, retention_secs, "Starting blog-cast server...");
            let schedule = Schedule::from_str(sweep_schedule)?;
            serve(&cli, host, *port, Duration::from_secs(*retention_secs), schedule).await?;
        }
        Command::Summarize { url, speak } => {
            tracing::info!(%url, speak, "Summarizing post...");
            summarize(&cli, url, *speak).await?;
        }
    }

    Ok(())
}
