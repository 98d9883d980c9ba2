//! csvstream CLI: count, dump, and type-infer CSV files from the command line.
//!
//! Dialect resolution order (later wins): `CSVSTREAM_*` environment
//! variables, the `--config` YAML file, then individual flags.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use csvstream_core::config::{parse_ascii_byte, EscapePolicy, ReaderConfig, Terminator};
use csvstream_infer::{infer_columns, InferOptions};
use csvstream_io::{RowReader, TokenizerBuilder};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("config file {}: {source}", path.display())]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error(transparent)]
    Config(#[from] csvstream_core::Error),

    #[error(transparent)]
    Read(#[from] csvstream_io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            CliError::Config(e) => e.suggestions(),
            CliError::Read(e) => e.suggestions(),
            CliError::ConfigFile { .. } => vec![
                "Config keys: quote, delimiter, terminator, escape_policy, buffer_capacity".into(),
            ],
            _ => vec![],
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "csvstream")]
#[command(about = "Streaming CSV tokenizer: count, dump, and infer column types", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub dialect: DialectArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Default, Args)]
pub struct DialectArgs {
    /// YAML file with reader settings
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Field delimiter (one ASCII character, or \t)
    #[arg(short, long, global = true, value_parser = parse_ascii_byte)]
    pub delimiter: Option<u8>,

    /// Quote character
    #[arg(long, global = true, value_parser = parse_ascii_byte)]
    pub quote: Option<u8>,

    /// Row terminator: "crlf" (accept \r, \n, \r\n) or one ASCII character
    #[arg(long, global = true, value_parser = parse_terminator)]
    pub terminator: Option<Terminator>,

    /// Keep stray bytes after a closing quote instead of failing
    #[arg(long, global = true)]
    pub lenient: bool,

    /// Read buffer size in bytes
    #[arg(long, global = true)]
    pub buffer_bytes: Option<usize>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the number of rows
    Count {
        /// Input file, or '-' for stdin
        path: PathBuf,
    },

    /// Print every row as a JSON array of strings, one per line
    Dump {
        /// Input file, or '-' for stdin
        path: PathBuf,

        /// Stop after this many rows
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Infer a type for every column
    Infer {
        /// Input file, or '-' for stdin
        path: PathBuf,

        /// Treat the first row as column names
        #[arg(long)]
        header: bool,

        /// Worker threads (defaults to available parallelism)
        #[arg(long)]
        workers: Option<usize>,
    },
}

fn parse_terminator(s: &str) -> Result<Terminator, csvstream_core::Error> {
    s.parse()
}

impl DialectArgs {
    /// Overlay the config file and flags on `base`, then validate.
    pub fn resolve(&self, base: ReaderConfig) -> Result<ReaderConfig, CliError> {
        let mut cfg = match &self.config {
            Some(path) => load_config_file(path)?,
            None => base,
        };
        if let Some(d) = self.delimiter {
            cfg.delimiter = d;
        }
        if let Some(q) = self.quote {
            cfg.quote = q;
        }
        if let Some(t) = self.terminator {
            cfg.terminator = t;
        }
        if self.lenient {
            cfg.escape_policy = EscapePolicy::Lenient;
        }
        if let Some(n) = self.buffer_bytes {
            cfg.buffer_capacity = n;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

/// A config file replaces the environment-derived base entirely; keys it
/// omits fall back to the built-in defaults.
fn load_config_file(path: &Path) -> Result<ReaderConfig, CliError> {
    let text = fs::read_to_string(path)?;
    serde_yaml::from_str(&text).map_err(|source| CliError::ConfigFile {
        path: path.to_path_buf(),
        source,
    })
}

fn open_source(path: &Path) -> Result<Box<dyn Read>, CliError> {
    if path.as_os_str() == "-" {
        return Ok(Box::new(io::stdin().lock()));
    }
    let file = File::open(path).map_err(|source| csvstream_io::Error::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Box::new(file))
}

fn open_rows(path: &Path, cfg: &ReaderConfig) -> Result<RowReader<Box<dyn Read>>, CliError> {
    let tokenizer = TokenizerBuilder::with_config(cfg.clone()).from_reader(open_source(path)?)?;
    Ok(RowReader::new(tokenizer))
}

/// Execute `cli`, writing command output to `out`.
pub fn run(cli: &Cli, out: &mut dyn Write) -> Result<(), CliError> {
    let cfg = cli.dialect.resolve(ReaderConfig::from_env())?;
    debug!(?cfg, "resolved reader config");

    match &cli.command {
        Commands::Count { path } => {
            let mut reader = open_rows(path, &cfg)?;
            let mut count = 0u64;
            while reader.next_row()?.is_some() {
                count += 1;
            }
            info!(rows = count, bytes = reader.byte_position(), "counted rows");
            writeln!(out, "{count}")?;
        }
        Commands::Dump { path, limit } => {
            let mut reader = open_rows(path, &cfg)?;
            let mut written = 0usize;
            while limit.map_or(true, |l| written < l) {
                let Some(row) = reader.next_row()? else { break };
                serde_json::to_writer(&mut *out, &row.to_strings())?;
                writeln!(out)?;
                written += 1;
            }
        }
        Commands::Infer {
            path,
            header,
            workers,
        } => {
            let table = open_rows(path, &cfg)?.read_all()?;
            let opts = InferOptions {
                skip_header: *header,
                max_workers: *workers,
            };
            let types = infer_columns(&table, &opts)?;
            let names = match table.rows.first() {
                Some(first) if *header => first.to_strings(),
                _ => Vec::new(),
            };
            for (i, ty) in types.iter().enumerate() {
                match names.get(i) {
                    Some(name) => writeln!(out, "{name}: {ty}")?,
                    None => writeln!(out, "column {}: {ty}", i + 1)?,
                }
            }
        }
    }
    out.flush()?;
    Ok(())
}
