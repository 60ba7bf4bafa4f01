use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use campus_guide_bridge::channel::{codec, MethodCall};
use campus_guide_bridge::config::BridgeConfig;
use campus_guide_bridge::context::AppContext;
use campus_guide_bridge::error::LookupError;
use campus_guide_bridge::logging;
use campus_guide_bridge::metadata::JsonFileMetadataSource;
use campus_guide_bridge::provider::NativeKeyProvider;
use clap::{Args, Parser, Subcommand};
use serde_json::Value;

#[derive(Parser, Debug)]
#[command(
    name = "campus_bridge_cli",
    about = "Desktop harness for the campus guide native bridge"
)]
struct Cli {
    /// Bridge configuration file (defaults apply when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log at debug level to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Read a metadata key from a package record
    Lookup {
        #[command(flatten)]
        record: RecordArgs,
        /// Metadata key (defaults to the configured Google Maps key)
        #[arg(long)]
        key: Option<String>,
    },
    /// Send a method call through the channel registry and print the reply
    Call {
        #[command(flatten)]
        record: RecordArgs,
        #[arg(long)]
        method: String,
        /// Channel name (defaults to the configured api_keys channel)
        #[arg(long)]
        channel: Option<String>,
        /// JSON arguments payload
        #[arg(long)]
        args: Option<String>,
        /// Reply with error envelopes instead of null on lookup failures
        #[arg(long)]
        strict: bool,
    },
    /// List registered channels and their methods
    Channels,
}

#[derive(Args, Debug, Clone)]
struct RecordArgs {
    /// JSON package record holding `meta_data`
    #[arg(long)]
    metadata: Option<PathBuf>,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = cli
        .config
        .as_ref()
        .map(BridgeConfig::load_from_file)
        .unwrap_or_default();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    logging::init_logging(level);

    match cli.command {
        Commands::Lookup { record, key } => run_lookup(config, record, key),
        Commands::Call {
            record,
            method,
            channel,
            args,
            strict,
        } => run_call(config, record, &method, channel, args, strict),
        Commands::Channels => run_channels(config),
    }
}

fn source_for(config: &BridgeConfig, record: &RecordArgs) -> Arc<JsonFileMetadataSource> {
    let path = record
        .metadata
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.metadata_path));
    Arc::new(JsonFileMetadataSource::new(path))
}

fn run_lookup(config: BridgeConfig, record: RecordArgs, key: Option<String>) -> Result<ExitCode> {
    let key = key.unwrap_or_else(|| config.metadata_key.clone());
    let provider = NativeKeyProvider::new(source_for(&config, &record), key);

    match provider.lookup() {
        Ok(value) => {
            println!("{value}");
            Ok(ExitCode::from(0))
        }
        Err(LookupError::KeyNotFound { key }) => {
            eprintln!("Metadata key '{key}' not found");
            Ok(ExitCode::from(2))
        }
        Err(err @ LookupError::RegistryUnavailable { .. }) => {
            Err(err).context("reading package record")
        }
    }
}

fn run_call(
    mut config: BridgeConfig,
    record: RecordArgs,
    method: &str,
    channel: Option<String>,
    args: Option<String>,
    strict: bool,
) -> Result<ExitCode> {
    config.strict_errors |= strict;
    let arguments = match args {
        Some(raw) => serde_json::from_str(&raw)
            .with_context(|| format!("parsing --args as JSON: {raw}"))?,
        None => Value::Null,
    };

    let source = source_for(&config, &record);
    let channel = channel.unwrap_or_else(|| config.channel_name.clone());
    let context = AppContext::with_source(config, source);

    let message = codec::encode_method_call(&MethodCall::new(method, arguments))?;
    let Some(reply) = context.handle_platform_message(&channel, &message) else {
        bail!("no channel registered under '{channel}'");
    };

    if reply.is_empty() {
        // Not implemented
        println!("null");
    } else {
        let envelope: Value =
            serde_json::from_slice(&reply).context("decoding reply envelope")?;
        println!("{}", serde_json::to_string(&envelope)?);
    }

    Ok(ExitCode::from(0))
}

fn run_channels(config: BridgeConfig) -> Result<ExitCode> {
    let source = Arc::new(JsonFileMetadataSource::new(&config.metadata_path));
    let context = AppContext::with_source(config, source);

    for name in context.registry().channel_names() {
        let methods = context
            .registry()
            .get(name)
            .map(|channel| channel.methods().join(", "))
            .unwrap_or_default();
        println!("{name}: {methods}");
    }
    Ok(ExitCode::from(0))
}
