//! CLI entrypoint for docchat
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use docchat_application::{ConversationLogger, NoConversationLogger, UploadDocumentsUseCase};
use docchat_infrastructure::{
    ConfigLoader, FileConfig, FsAttachmentSource, HttpUploadGateway, JsonlConversationLogger,
    WebSocketConnector,
};
use docchat_presentation::{ChatRepl, Cli, ConsoleFormatter, ReplConfig, TypingIndicator};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Install the tracing subscriber.
///
/// With `--log-dir` diagnostics go to a daily rolling file so they do not
/// interleave with the chat; the returned guard must live until exit.
fn init_logging(cli: &Cli) -> Result<Option<WorkerGuard>> {
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let Some(dir) = &cli.log_dir else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Could not create log directory {}", dir.display()))?;
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, "docchat.log"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .init();
    Ok(Some(guard))
}

/// Merge config files and environment, then apply CLI flags on top.
fn load_config(cli: &Cli) -> Result<FileConfig> {
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        if let Some(path) = &cli.config
            && !path.exists()
        {
            bail!("Config file not found: {}", path.display());
        }
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    if let Some(endpoint) = &cli.endpoint {
        config.connection.endpoint = endpoint.clone();
    }
    if let Some(url) = &cli.upload_url {
        config.upload.url = url.clone();
    }

    let issues = config.validate();
    if !issues.is_empty() {
        let details: Vec<String> = issues.iter().map(|i| format!("  - {}", i)).collect();
        bail!("Invalid configuration:\n{}", details.join("\n"));
    }
    Ok(config)
}

fn conversation_logger(config: &FileConfig) -> Arc<dyn ConversationLogger> {
    let Some(path) = &config.logging.conversation_log else {
        return Arc::new(NoConversationLogger);
    };
    match JsonlConversationLogger::open(path) {
        Some(logger) => {
            info!("Writing transcript to {}", logger.path().display());
            Arc::new(logger)
        }
        None => {
            warn!("Transcript logging disabled");
            Arc::new(NoConversationLogger)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging(&cli)?;

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    let config = load_config(&cli)?;

    if cli.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    info!("Starting docchat");
    let endpoint = config.endpoint()?;

    // === Dependency Injection ===
    let gateway = HttpUploadGateway::new(config.upload.url.clone(), config.upload.timeout())?;
    let uploader = Arc::new(UploadDocumentsUseCase::new(
        Arc::new(FsAttachmentSource::new()),
        Arc::new(gateway),
    ));

    let mut uploaded = Vec::new();
    if !cli.upload.is_empty() {
        let mut indicator = TypingIndicator::new(!cli.quiet);
        indicator.start(&format!("Uploading {} file(s)...", cli.upload.len()));
        let result = uploader.execute(&cli.upload).await;
        indicator.stop();

        let output = result.context("Upload failed")?;
        println!("{}", ConsoleFormatter::upload(&output));
        uploaded = output.uploaded;
    }

    let repl_config = ReplConfig {
        show_progress: config.repl.show_progress && !cli.quiet,
        show_timestamps: config.repl.show_timestamps,
        history_file: config.repl.history_file.as_deref().map(PathBuf::from),
    };

    let mut repl = ChatRepl::new(Arc::new(WebSocketConnector::new()), endpoint)
        .with_config(repl_config)
        .with_conversation_logger(conversation_logger(&config))
        .with_uploader(uploader)
        .with_uploaded(uploaded);

    repl.run().await?;
    Ok(())
}
