//! CLI entrypoint for duet
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use duet_application::{
    ConversationRepository, CredentialsUseCase, DispatchError, DispatchProgress,
    DispatchQueryUseCase, HistoryUseCase, NoProgress, NoView, ProviderClient, ResponseView,
    ShutdownOutcome, WorkerPool,
};
use duet_domain::ProviderId;
use duet_infrastructure::{
    ConfigLoader, CredentialFile, FileConfig, HttpChatGateway, InMemoryConversationStore,
    JsonlConversationStore,
};
use duet_presentation::{
    Cli, Command, ConsoleFormatter, ConsolePanel, OutputFormat, ProgressReporter, SimpleProgress,
    formatter_for,
};
use indicatif::MultiProgress;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    info!("Starting duet");

    if cli.command == Command::Config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    // Load configuration
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    config.validate().context("Invalid configuration")?;

    // === Dependency Injection ===
    let repository: Arc<dyn ConversationRepository> = if cli.no_history {
        Arc::new(InMemoryConversationStore::new())
    } else {
        Arc::new(JsonlConversationStore::open(config.storage.history_path())?)
    };
    let history = HistoryUseCase::new(repository.clone());
    let formatter = formatter_for(cli.output);

    match &cli.command {
        Command::History { limit } => {
            print!("{}", formatter.format_history(&history.recent(*limit)));
            if cli.output == OutputFormat::Json {
                println!();
            }
        }
        Command::Show { id } => {
            println!("{}", formatter.format_record(&history.find(id)?));
        }
        Command::Export { path, limit } => {
            let written = history.export(path, *limit)?;
            println!("Exported {} conversation(s) to {}", written, path.display());
        }
        Command::SetKey { provider, secret } => {
            let (primary, secondary) = build_clients(&config)?;
            let credentials = CredentialsUseCase::new(
                Arc::new(CredentialFile::new(config.storage.credentials_path())),
                primary,
                secondary,
            );
            credentials.store(*provider, secret)?;
            println!("Saved API key for {}", provider.display_name());
        }
        Command::Ask { .. } => {
            let query = match cli.command.query_text() {
                Some(text) => text,
                None => read_stdin()?,
            };
            ask(&cli, &config, repository, &query).await?;
        }
        Command::Config => {}
    }

    Ok(())
}

/// Install the tracing subscriber.
///
/// Logs go to stderr at a level chosen by `-v`; `--log-file` adds a
/// non-blocking file writer. The returned guard flushes it on drop.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let directory = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .with_context(|| format!("Invalid log file path: {}", path.display()))?;
            std::fs::create_dir_all(directory)
                .with_context(|| format!("Could not create {}", directory.display()))?;

            let appender = tracing_appender::rolling::never(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(guard)
}

fn read_stdin() -> Result<String> {
    let mut query = String::new();
    std::io::stdin()
        .read_to_string(&mut query)
        .context("Failed to read the query from stdin")?;
    Ok(query)
}

/// Build both provider clients with keys from config or environment.
fn build_clients(config: &FileConfig) -> Result<(Arc<ProviderClient>, Arc<ProviderClient>)> {
    let gateway = Arc::new(HttpChatGateway::new(
        config.http.connect_timeout(),
        config.http.read_timeout(),
    )?);
    let retry = config.retry.to_retry_policy();

    let build = |id: ProviderId| {
        let settings = config.providers.get(id);
        let client = ProviderClient::new(settings.to_profile(id), gateway.clone())
            .with_retry_policy(retry.clone());
        if let Some(key) = settings.resolve_api_key(id, |name| std::env::var(name).ok()) {
            client.set_credential(key);
        }
        Arc::new(client)
    };

    Ok((build(ProviderId::Primary), build(ProviderId::SearchAugmented)))
}

async fn ask(
    cli: &Cli,
    config: &FileConfig,
    repository: Arc<dyn ConversationRepository>,
    query: &str,
) -> Result<()> {
    let (primary, secondary) = build_clients(config)?;

    let credentials = CredentialsUseCase::new(
        Arc::new(CredentialFile::new(config.storage.credentials_path())),
        primary.clone(),
        secondary.clone(),
    );
    let loaded = credentials.load_into_clients();
    if !loaded.is_empty() {
        info!("Using stored API keys for {:?}", loaded);
    }

    let behavior = config.workers.to_behavior();
    let pool = WorkerPool::new(behavior.pool_size);
    let max_attempts = primary.retry_policy().attempts();

    let mut use_case = DispatchQueryUseCase::new(primary, secondary, repository, pool.clone());

    let panels = cli.output == OutputFormat::Panels;
    if panels {
        let (primary_panel, secondary_panel) = if cli.quiet {
            (
                Arc::new(ConsolePanel::quiet(ProviderId::Primary)),
                Arc::new(ConsolePanel::quiet(ProviderId::SearchAugmented)),
            )
        } else {
            let multi = MultiProgress::new();
            (
                Arc::new(ConsolePanel::new(ProviderId::Primary, multi.clone())),
                Arc::new(ConsolePanel::new(ProviderId::SearchAugmented, multi)),
            )
        };

        let progress: Arc<dyn DispatchProgress> = if cli.quiet {
            Arc::new(NoProgress)
        } else {
            Arc::new(ProgressReporter::new(
                primary_panel.clone(),
                secondary_panel.clone(),
                max_attempts,
            ))
        };

        use_case = use_case
            .with_views(
                primary_panel as Arc<dyn ResponseView>,
                secondary_panel as Arc<dyn ResponseView>,
            )
            .with_progress(progress);
    } else {
        let progress: Arc<dyn DispatchProgress> = if cli.quiet {
            Arc::new(NoProgress)
        } else {
            Arc::new(SimpleProgress::new(max_attempts))
        };
        use_case = use_case
            .with_views(Arc::new(NoView), Arc::new(NoView))
            .with_progress(progress);
    }

    let query = query.trim();
    if panels && !query.is_empty() {
        println!("\nQuestion: {}", query);
    }

    let submit = use_case.submit(query);
    tokio::pin!(submit);

    let result = tokio::select! {
        result = &mut submit => result,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, cancelling provider calls");
            pool.shutdown(Duration::ZERO).await;
            submit.await
        }
    };

    let record = match result {
        Ok(record) => record,
        Err(DispatchError::MissingCredentials(missing)) => {
            let names: Vec<&str> = missing.iter().map(|id| id.display_name()).collect();
            bail!(
                "API keys are not configured for: {}\n\
                 Set them with `duet set-key <provider> <key>` or the \
                 OPENAI_API_KEY / PERPLEXITY_API_KEY environment variables.",
                names.join(", ")
            );
        }
        Err(e) => bail!(e),
    };

    if panels {
        println!(
            "\nsaved as {} at {}",
            record.id,
            ConsoleFormatter::format_time(record.timestamp)
        );
    } else {
        println!("{}", formatter_for(cli.output).format_record(&record));
    }

    if pool.shutdown(behavior.shutdown_grace).await == ShutdownOutcome::Cancelled {
        warn!("Provider calls were still running at exit and have been cancelled");
    }

    Ok(())
}
