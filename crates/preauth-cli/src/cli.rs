use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "preauth",
    about = "Pre-authorization request registry over a key-value store",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Store document holding every record
    #[arg(long, global = true, default_value = "preauth-state.json")]
    pub state: PathBuf,

    /// TOML file with registry settings
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum ReadMode {
    Direct,
    Typed,
}

impl ReadMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Typed => "typed",
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Seed the store with demonstration providers
    Init(InitArgs),
    /// Write a sub-record, or a composite form routed by argument count
    Write(WriteArgs),
    /// Write a composite form for an explicit sub-record kind
    Form(FormArgs),
    /// Read a form by key, or a sub-record by kind and key
    Read(ReadArgs),
    /// Run a write operation by name (writeProvider, writePreAuth, ...)
    Invoke(InvokeArgs),
    /// Run a read operation by name (readProvider, readPreAuth, ...)
    Query(QueryArgs),
}

#[derive(Args)]
pub struct InitArgs {
    #[arg(default_value = "init")]
    pub arg: String,
}

#[derive(Args)]
pub struct WriteArgs {
    /// Sub-record kind; omit for a composite write
    #[arg(short, long)]
    pub kind: Option<String>,
    #[arg(allow_hyphen_values = true)]
    pub args: Vec<String>,
}

#[derive(Args)]
pub struct FormArgs {
    pub kind: String,
    #[arg(allow_hyphen_values = true)]
    pub args: Vec<String>,
}

#[derive(Args)]
pub struct ReadArgs {
    /// Read mode; inferred from the argument count when omitted
    #[arg(short, long)]
    pub mode: Option<ReadMode>,
    pub args: Vec<String>,
}

#[derive(Args)]
pub struct InvokeArgs {
    pub function: String,
    #[arg(allow_hyphen_values = true)]
    pub args: Vec<String>,
}

#[derive(Args)]
pub struct QueryArgs {
    pub function: String,
    pub args: Vec<String>,
}
