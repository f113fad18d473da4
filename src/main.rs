use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use shopify_webhooks::config::Config;
use shopify_webhooks::resource::{self, Presence, WebhookRecord, WebhookSpec};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Format applied when a declaration leaves it out
const DEFAULT_FORMAT: &str = "json";

/// Reconcile a Shopify webhook subscription against a local state file
#[derive(Parser, Debug)]
#[command(name = "shopify-webhooks", version, about, long_about = None)]
struct Args {
    /// Store domain (the part before .myshopify.com)
    #[arg(long, global = true)]
    domain: Option<String>,

    /// Admin API access token
    #[arg(long, global = true)]
    access_token: Option<String>,

    /// Admin API version, e.g. 2023-10
    #[arg(long, global = true)]
    api_version: Option<String>,

    /// Base endpoint overriding https://<domain>.myshopify.com/
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// State file holding the observed record
    #[arg(long, global = true, default_value = "webhook.state.json")]
    state: PathBuf,

    /// Log level for debugging
    #[arg(long, global = true, value_enum, default_value = "off")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the webhook declared in a JSON or YAML file
    Create {
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Refresh the state file from Shopify
    Read,
    /// Apply a changed declaration to the existing webhook
    Update {
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Delete the webhook recorded in the state file
    Delete,
    /// Adopt an existing webhook by id
    Import { id: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("Could not create log directory {:?}: {}", parent, e);
            return None;
        }
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Could not open log file {:?}: {}", log_path, e);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("shopify-webhooks started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("shopify-webhooks").join("shopify-webhooks.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".shopify-webhooks").join("shopify-webhooks.log");
    }
    PathBuf::from("shopify-webhooks.log")
}

/// Read a declaration; YAML by extension, JSON otherwise
fn load_spec(path: &Path) -> Result<WebhookSpec> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read declaration {:?}", path))?;

    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let mut spec: WebhookSpec = if is_yaml {
        serde_yaml::from_str(&content).context("Failed to parse YAML declaration")?
    } else {
        serde_json::from_str(&content).context("Failed to parse JSON declaration")?
    };

    if spec.format.is_empty() {
        spec.format = DEFAULT_FORMAT.to_string();
    }
    if spec.topic.is_empty() || spec.address.is_empty() {
        bail!("A webhook declaration needs both 'topic' and 'address'");
    }

    Ok(spec)
}

fn load_state(path: &Path) -> Result<WebhookRecord> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("No state at {:?}; create or import a webhook first", path))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse state {:?}", path))
}

fn save_state(path: &Path, record: &WebhookRecord) -> Result<()> {
    let content = serde_json::to_string_pretty(record)?;
    std::fs::write(path, content).with_context(|| format!("Failed to write state {:?}", path))?;
    println!("{}", serde_json::to_string_pretty(record)?);
    Ok(())
}

fn remove_state(path: &Path) -> Result<()> {
    if path.exists() {
        std::fs::remove_file(path).with_context(|| format!("Failed to remove state {:?}", path))?;
    }
    Ok(())
}

/// Save the record when it is still present, drop the state file otherwise
fn settle(path: &Path, record: &WebhookRecord, presence: Presence) -> Result<()> {
    match presence {
        Presence::Present => save_state(path, record),
        Presence::Absent => {
            println!("webhook no longer exists");
            remove_state(path)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level);

    let cli = Config {
        domain: args.domain.clone(),
        access_token: args.access_token.clone(),
        api_version: args.api_version.clone(),
        endpoint: args.endpoint.clone(),
    };
    let config = cli.or(Config::from_env()).or(Config::load()).into_provider();
    config.validate()?;

    tracing::info!("Using store: {}", config.base_url());

    match &args.command {
        Command::Create { file } => {
            if args.state.exists() && !load_state(&args.state)?.is_absent() {
                bail!("State {:?} already tracks a webhook", args.state);
            }
            let mut record = WebhookRecord::new(load_spec(file)?);
            match resource::create(&config, &mut record).await {
                Ok(presence) => settle(&args.state, &record, presence)?,
                // Shopify accepted the webhook; keep its id so it is not orphaned
                Err(err) if !record.is_absent() => {
                    save_state(&args.state, &record)?;
                    return Err(err.into());
                }
                Err(err) => return Err(err.into()),
            }
        }
        Command::Read => {
            let mut record = load_state(&args.state)?;
            let presence = resource::read(&config, &mut record).await?;
            settle(&args.state, &record, presence)?;
        }
        Command::Update { file } => {
            let mut record = load_state(&args.state)?;
            let spec = load_spec(file)?;
            if !record.spec.topic.is_empty() && record.spec.topic != spec.topic {
                bail!(
                    "topic cannot be changed in place ('{}' -> '{}'); delete and create the webhook instead",
                    record.spec.topic,
                    spec.topic
                );
            }
            record.spec = spec;
            let presence = resource::update(&config, &mut record).await?;
            settle(&args.state, &record, presence)?;
        }
        Command::Delete => {
            let mut record = load_state(&args.state)?;
            resource::delete(&config, &mut record).await?;
            remove_state(&args.state)?;
        }
        Command::Import { id } => {
            let record = resource::import(&config, id).await?;
            save_state(&args.state, &record)?;
        }
    }

    Ok(())
}
