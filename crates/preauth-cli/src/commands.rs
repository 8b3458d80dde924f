use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use preauth_ledger::{Invocation, PreAuthRegistry, Query, RegistryConfig, WriteRequest};
use preauth_store::FileEntityStore;
use preauth_types::{EntityKind, RecordKey};

use crate::cli::*;
use crate::config;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = config::load(cli.config.as_deref())?;
    let format = cli.format;
    match cli.command {
        Command::Init(args) => cmd_init(&cli.state, config, args, format),
        Command::Write(args) => cmd_write(&cli.state, config, args, format),
        Command::Form(args) => cmd_form(&cli.state, config, args, format),
        Command::Read(args) => cmd_read(&cli.state, config, args, format),
        Command::Invoke(args) => cmd_invoke(&cli.state, config, args, format),
        Command::Query(args) => cmd_query(&cli.state, config, args, format),
    }
}

fn open_writable(state: &Path, config: RegistryConfig) -> anyhow::Result<PreAuthRegistry<FileEntityStore>> {
    let store = FileEntityStore::open(state)
        .with_context(|| format!("opening store {}", state.display()))?;
    Ok(PreAuthRegistry::with_config(store, config)?)
}

fn open_read_only(state: &Path, config: RegistryConfig) -> anyhow::Result<PreAuthRegistry<FileEntityStore>> {
    let store = FileEntityStore::open_read_only(state)
        .with_context(|| format!("opening store {}", state.display()))?;
    Ok(PreAuthRegistry::with_config(store, config)?)
}

fn parse_kind(tag: &str) -> anyhow::Result<EntityKind> {
    tag.parse::<EntityKind>()
        .with_context(|| format!("'{tag}' is not provider, member, service, payer or preauth"))
}

fn cmd_init(state: &Path, config: RegistryConfig, args: InitArgs, format: OutputFormat) -> anyhow::Result<()> {
    let mut registry = open_writable(state, config)?;
    registry.init(&[args.arg])?;
    match format {
        OutputFormat::Text => {
            println!("{} Seeded demonstration providers {}", "✓".green().bold(), "PR001..PR004".yellow());
            println!("  Store: {}", state.display());
        }
        OutputFormat::Json => println!("{}", serde_json::json!({ "initialized": true })),
    }
    Ok(())
}

fn cmd_write(state: &Path, config: RegistryConfig, args: WriteArgs, format: OutputFormat) -> anyhow::Result<()> {
    let kind = args.kind.as_deref().map(parse_kind).transpose()?;
    let mut registry = open_writable(state, config)?;
    let key = registry.write(kind, &args.args)?;
    print_written(&key, format);
    Ok(())
}

fn cmd_form(state: &Path, config: RegistryConfig, args: FormArgs, format: OutputFormat) -> anyhow::Result<()> {
    let request = WriteRequest::tagged(parse_kind(&args.kind)?, &args.args)?;
    let mut registry = open_writable(state, config)?;
    let key = registry.write_form(request)?;
    print_written(&key, format);
    Ok(())
}

fn cmd_read(state: &Path, config: RegistryConfig, args: ReadArgs, format: OutputFormat) -> anyhow::Result<()> {
    let query = match args.mode {
        Some(mode) => Query::parse(mode.as_str(), &args.args)?,
        None => Query::from_args(&args.args)?,
    };
    let registry = open_read_only(state, config)?;
    let bytes = registry.read(&query)?;
    print_record(&bytes, format)
}

fn cmd_invoke(state: &Path, config: RegistryConfig, args: InvokeArgs, format: OutputFormat) -> anyhow::Result<()> {
    let mut registry = open_writable(state, config)?;
    match registry.invoke(&args.function, &args.args)? {
        Invocation::Initialized => match format {
            OutputFormat::Text => println!("{} {}", "✓".green().bold(), "Initialized".bold()),
            OutputFormat::Json => println!("{}", serde_json::json!({ "initialized": true })),
        },
        Invocation::Written(key) => print_written(&key, format),
    }
    Ok(())
}

fn cmd_query(state: &Path, config: RegistryConfig, args: QueryArgs, format: OutputFormat) -> anyhow::Result<()> {
    let registry = open_read_only(state, config)?;
    let bytes = registry.query(&args.function, &args.args)?;
    print_record(&bytes, format)
}

fn print_written(key: &RecordKey, format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            let kind = key.kind_hint().map(|k| k.to_string()).unwrap_or_else(|| "record".into());
            println!("{} Written {} {}", "✓".green().bold(), kind, key.as_str().yellow().bold());
        }
        OutputFormat::Json => println!("{}", serde_json::json!({ "key": key })),
    }
}

fn print_record(bytes: &[u8], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", String::from_utf8_lossy(bytes)),
        OutputFormat::Text => {
            let value: serde_json::Value =
                serde_json::from_slice(bytes).context("stored record is not JSON")?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }
    Ok(())
}
