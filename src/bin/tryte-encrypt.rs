//! tryte-encrypt CLI - passphrase encryption for tryte strings
//!
//! Command-line interface for encrypting and decrypting IOTA-style seeds
//! with scrypt key derivation and AES-256-CTR.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::error::Error as StdError;
use std::path::PathBuf;
use std::process;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tryte_encrypt::config::DEFAULT_MAX_MEMORY_BYTES;
use tryte_encrypt::file_ops::{self, Source};
use tryte_encrypt::passphrase::{
    CachingPassphraseReader, PassphraseReader, ReaderPassphraseReader, TerminalPassphraseReader,
};
use tryte_encrypt::{CryptoEngine, EngineConfig, Result, TuningOptions, TuningParams};

#[derive(Parser)]
#[command(name = "tryte-encrypt")]
#[command(version)]
#[command(about = "Passphrase-based encryption of tryte strings.", long_about = None)]
struct Cli {
    /// Read passphrase from stdin instead of from terminal (read verbatim,
    /// including any trailing newline)
    #[arg(long, global = true)]
    passphrase_stdin: bool,

    /// Log progress and timing to stderr (repeat for more detail)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Refuse tuning whose scrypt working memory would exceed this many bytes
    #[arg(
        long,
        global = true,
        value_name = "BYTES",
        env = "TRYTE_ENCRYPT_MAX_MEMORY",
        default_value_t = DEFAULT_MAX_MEMORY_BYTES
    )]
    max_memory: u64,

    #[command(flatten)]
    tuning: TuningArgs,

    #[command(subcommand)]
    command: Commands,
}

/// scrypt tuning. Anything left out uses the defaults (N=2^14, r=8, p=8).
#[derive(Args)]
struct TuningArgs {
    /// log2 of the scrypt iteration count (N)
    #[arg(short = 'n', long, global = true, env = "TRYTE_ENCRYPT_LOG_ITERATIONS")]
    log_iterations: Option<u32>,

    /// scrypt memory cost (r)
    #[arg(short = 'r', long, global = true, env = "TRYTE_ENCRYPT_MEMORY_COST")]
    memory_cost: Option<u32>,

    /// scrypt parallelism (p)
    #[arg(short = 'p', long, global = true, env = "TRYTE_ENCRYPT_PARALLELISM")]
    parallelism: Option<u32>,

    /// Raise (or lower, if negative) all three parameters by the same amount
    #[arg(
        short = 't',
        long,
        global = true,
        allow_negative_numbers = true,
        env = "TRYTE_ENCRYPT_TOUGHNESS",
        conflicts_with = "suffix"
    )]
    toughness: Option<i64>,

    /// Tuning given as an artifact suffix, e.g. "T1" or "N16P2"
    #[arg(long, global = true, value_name = "SUFFIX")]
    suffix: Option<String>,
}

impl TuningArgs {
    /// Explicit fields win over `--toughness` / `--suffix`.
    fn options(&self, engine: &CryptoEngine) -> Result<TuningOptions> {
        let base = match (&self.suffix, self.toughness) {
            (Some(suffix), _) => engine.codec().parse(suffix)?,
            (None, Some(toughness)) => TuningOptions::toughness(toughness, engine.defaults())?,
            (None, None) => TuningOptions::none(),
        };
        let explicit = TuningOptions {
            log_iterations: self.log_iterations,
            memory_cost: self.memory_cost,
            parallelism: self.parallelism,
        };
        Ok(explicit.or(base))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a seed
    #[command(alias = "e")]
    Encrypt {
        /// The seed to encrypt
        #[arg(required_unless_present = "input")]
        seed: Option<String>,

        /// Read the seed from this file instead
        #[arg(short, long, value_name = "FILE", conflicts_with = "seed")]
        input: Option<PathBuf>,

        /// Write the encrypted seed to this file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Decrypt an encrypted seed. Tuning options only apply to what the
    /// encrypted seed's suffix does not specify.
    #[command(alias = "d")]
    Decrypt {
        /// The encrypted seed
        #[arg(required_unless_present = "input")]
        artifact: Option<String>,

        /// Read the encrypted seed from this file instead
        #[arg(short, long, value_name = "FILE", conflicts_with = "artifact")]
        input: Option<PathBuf>,

        /// Write the decrypted seed to this file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Re-encrypt an encrypted seed with the given tuning, keeping the
    /// passphrase.
    #[command(alias = "r")]
    Retune {
        /// The encrypted seed
        #[arg(required_unless_present = "input")]
        artifact: Option<String>,

        /// Read the encrypted seed from this file instead
        #[arg(short, long, value_name = "FILE", conflicts_with = "artifact")]
        input: Option<PathBuf>,

        /// Write the result to this file instead of stdout (may be the input file)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Tuning the input was encrypted with, if it has no suffix
        #[arg(long, value_name = "SUFFIX")]
        from: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", error_chain(&e));
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = EngineConfig::new(TuningParams::CANONICAL).with_max_memory_bytes(cli.max_memory);
    let engine = CryptoEngine::new(config);
    let options = cli.tuning.options(&engine)?;
    let confirm = !matches!(cli.command, Commands::Decrypt { .. });
    let mut reader = get_passphrase_reader(cli.passphrase_stdin, confirm);

    let start = Instant::now();
    match cli.command {
        Commands::Encrypt {
            seed,
            input,
            output,
        } => {
            let source = input_source(seed.as_deref(), input.as_deref());
            file_ops::encrypt_seed(source, output.as_deref(), &mut *reader, &engine, &options)
                .await?;
            info!(elapsed = ?start.elapsed(), "encrypted");
        }
        Commands::Decrypt {
            artifact,
            input,
            output,
        } => {
            let source = input_source(artifact.as_deref(), input.as_deref());
            file_ops::decrypt_artifact(source, output.as_deref(), &mut *reader, &engine, &options)
                .await?;
            info!(elapsed = ?start.elapsed(), "decrypted");
        }
        Commands::Retune {
            artifact,
            input,
            output,
            from,
        } => {
            let source = input_source(artifact.as_deref(), input.as_deref());
            let current = match from {
                Some(suffix) => engine.codec().parse(&suffix)?,
                None => TuningOptions::none(),
            };
            file_ops::retune_artifact(
                source,
                output.as_deref(),
                &mut *reader,
                &engine,
                &current,
                &options,
            )
            .await?;
            info!(elapsed = ?start.elapsed(), "re-encrypted");
        }
    }
    Ok(())
}

fn input_source<'a>(text: Option<&'a str>, input: Option<&'a std::path::Path>) -> Source<'a> {
    match input {
        Some(path) => Source::File(path),
        None => Source::Text(text.unwrap_or_default()),
    }
}

/// Interactive prompts ask twice whenever something gets encrypted.
fn get_passphrase_reader(use_stdin: bool, confirm: bool) -> Box<dyn PassphraseReader> {
    let upstream: Box<dyn PassphraseReader> = match (use_stdin, confirm) {
        (true, _) => Box::new(ReaderPassphraseReader::new(std::io::stdin())),
        (false, true) => Box::new(TerminalPassphraseReader::confirming()),
        (false, false) => Box::new(TerminalPassphraseReader::once()),
    };
    Box::new(CachingPassphraseReader::new(upstream))
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// "outer: inner: innermost", skipping causes whose text is already shown.
fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut out = err.to_string();
    let mut current = err.source();
    while let Some(cause) = current {
        let text = cause.to_string();
        if !out.contains(&text) {
            out.push_str(": ");
            out.push_str(&text);
        }
        current = cause.source();
    }
    out
}
