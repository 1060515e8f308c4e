//! Seed and artifact I/O for the command-line tool
//!
//! Inputs come from the command line or a file; outputs go to stdout or to a
//! file that is replaced atomically and readable only by its owner.

use crate::engine::CryptoEngine;
use crate::error::{ErrorCategory, ErrorKind, Result, TryteCryptError};
use crate::params::TuningOptions;
use crate::passphrase::PassphraseReader;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tracing::info;
use zeroize::Zeroizing;

/// Where a seed or artifact is read from.
#[derive(Debug, Clone, Copy)]
pub enum Source<'a> {
    /// Given directly, e.g. as a command-line argument.
    Text(&'a str),
    /// Read from a file; surrounding whitespace is ignored.
    File(&'a Path),
}

impl Source<'_> {
    fn read(&self) -> Result<Zeroizing<String>> {
        let raw = match self {
            Source::Text(text) => Zeroizing::new((*text).to_owned()),
            Source::File(path) => {
                Zeroizing::new(fs::read_to_string(path).map_err(|e| read_error(path, e))?)
            }
        };
        Ok(Zeroizing::new(raw.trim().to_owned()))
    }
}

/// Encrypt a seed and write the resulting artifact to `output` (stdout if `None`).
pub async fn encrypt_seed(
    source: Source<'_>,
    output: Option<&Path>,
    passphrase_reader: &mut dyn PassphraseReader,
    engine: &CryptoEngine,
    options: &TuningOptions,
) -> Result<()> {
    let seed = source.read()?;
    let passphrase = passphrase_reader.read_passphrase()?;
    let artifact = engine
        .encrypt(&seed, &passphrase, options)
        .await
        .map_err(|e| e.with_context("encryption failed"))?;
    write_output(output, &artifact)
}

/// Decrypt an artifact and write the seed to `output` (stdout if `None`).
///
/// `options` only matter for fields the artifact's suffix leaves out.
pub async fn decrypt_artifact(
    source: Source<'_>,
    output: Option<&Path>,
    passphrase_reader: &mut dyn PassphraseReader,
    engine: &CryptoEngine,
    options: &TuningOptions,
) -> Result<()> {
    let artifact = source.read()?;
    let passphrase = passphrase_reader.read_passphrase()?;
    let seed = Zeroizing::new(
        engine
            .decrypt(&artifact, &passphrase, options)
            .await
            .map_err(|e| e.with_context("decryption failed"))?,
    );
    write_output(output, &seed)
}

/// Re-encrypt an artifact under new tuning, keeping the passphrase.
///
/// The passphrase is requested once for decryption and once for encryption;
/// wrap the reader in a [`crate::passphrase::CachingPassphraseReader`] to
/// prompt only once.
///
/// Since artifacts are not authenticated, a mistyped passphrase is not
/// detected here: the output would be garbage encrypted under the mistyped
/// passphrase. Callers that prompt interactively should ask twice.
pub async fn retune_artifact(
    source: Source<'_>,
    output: Option<&Path>,
    passphrase_reader: &mut dyn PassphraseReader,
    engine: &CryptoEngine,
    current: &TuningOptions,
    target: &TuningOptions,
) -> Result<()> {
    let artifact = source.read()?;

    let passphrase = passphrase_reader.read_passphrase()?;
    let seed = Zeroizing::new(
        engine
            .decrypt(&artifact, &passphrase, current)
            .await
            .map_err(|e| e.with_context("decryption failed"))?,
    );

    let passphrase = passphrase_reader.read_passphrase()?;
    let retuned = engine
        .encrypt(&seed, &passphrase, target)
        .await
        .map_err(|e| e.with_context("encryption failed"))?;

    info!("re-encrypted artifact with new tuning");
    write_output(output, &retuned)
}

fn write_output(output: Option<&Path>, text: &str) -> Result<()> {
    match output {
        Some(path) => write_file_secure(path, format!("{}\n", text).as_bytes())
            .map_err(|e| e.with_context(format!("failed to write to {}", path.display()))),
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", text)
                .and_then(|()| stdout.flush())
                .map_err(|e| {
                    TryteCryptError::with_kind_and_source(
                        ErrorCategory::Internal,
                        ErrorKind::Io,
                        "failed to write to stdout",
                        e,
                    )
                })
        }
    }
}

/// Atomically replace `path` with `contents` (tempfile + fsync + rename),
/// with mode 0o600 on Unix.
///
/// Either the old file or the new file exists afterwards, never a partial one.
fn write_file_secure(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp_file = tempfile::NamedTempFile::new_in(dir).map_err(|e| {
        TryteCryptError::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::Io,
            "failed to create tempfile",
            e,
        )
    })?;

    temp_file.write_all(contents).map_err(|e| {
        TryteCryptError::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::Io,
            "failed to write to tempfile",
            e,
        )
    })?;
    // Flush and fsync() such that the rename later, if it succeeds, will
    // always point to a valid file.
    temp_file.flush().map_err(|e| {
        TryteCryptError::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::Io,
            "failed to flush tempfile",
            e,
        )
    })?;
    temp_file.as_file().sync_all().map_err(|e| {
        TryteCryptError::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::Io,
            "failed to sync file prior to rename",
            e,
        )
    })?;

    // NamedTempFile is created 0o600 on Unix already; make it explicit.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        temp_file
            .as_file()
            .set_permissions(fs::Permissions::from_mode(0o600))
            .map_err(|e| {
                TryteCryptError::with_kind_and_source(
                    ErrorCategory::Internal,
                    ErrorKind::Io,
                    "failed to set tempfile permissions",
                    e,
                )
            })?;
    }

    temp_file.persist(path).map_err(|e| {
        TryteCryptError::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::Io,
            format!("failed to rename to target file {}", path.display()),
            e,
        )
    })?;
    Ok(())
}

fn read_error(path: &Path, err: io::Error) -> TryteCryptError {
    let category = if err.kind() == io::ErrorKind::NotFound {
        ErrorCategory::User
    } else {
        ErrorCategory::Internal
    };
    TryteCryptError::with_kind_and_source(
        category,
        ErrorKind::Io,
        format!("failed to read from {}", path.display()),
        err,
    )
}
