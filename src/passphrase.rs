//! Passphrase sources
//!
//! Passphrases are hashed and fed to scrypt as UTF-8, so every reader hands
//! out a `Zeroizing<String>` and rejects input that is not valid UTF-8.

use crate::error::{ErrorCategory, ErrorKind, Result, TryteCryptError};
use std::io::{self, IsTerminal, Read, Write};
use zeroize::Zeroizing;

const PROMPT: &str = "Passphrase (tryte-encrypt): ";
const CONFIRM_PROMPT: &str = "Repeat passphrase: ";

pub trait PassphraseReader {
    fn read_passphrase(&mut self) -> Result<Zeroizing<String>>;
}

/// Always returns the same passphrase. Useful in tests and embedding code.
pub struct ConstantPassphraseReader {
    passphrase: Zeroizing<String>,
}

impl ConstantPassphraseReader {
    pub fn new(passphrase: impl Into<String>) -> Self {
        Self {
            passphrase: Zeroizing::new(passphrase.into()),
        }
    }
}

impl PassphraseReader for ConstantPassphraseReader {
    fn read_passphrase(&mut self) -> Result<Zeroizing<String>> {
        Ok(self.passphrase.clone())
    }
}

/// Drains a reader (typically stdin) and uses its entire content, including
/// any trailing newline, as the passphrase.
pub struct ReaderPassphraseReader<R> {
    reader: R,
}

impl<R: Read> ReaderPassphraseReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: Read> PassphraseReader for ReaderPassphraseReader<R> {
    fn read_passphrase(&mut self) -> Result<Zeroizing<String>> {
        let mut raw = Zeroizing::new(Vec::new());
        self.reader
            .read_to_end(&mut raw)
            .map_err(|e| io_error("error reading passphrase", e))?;

        match std::str::from_utf8(&raw) {
            Ok(text) => Ok(Zeroizing::new(text.to_owned())),
            Err(e) => Err(TryteCryptError::with_kind_and_source(
                ErrorCategory::User,
                ErrorKind::PassphraseUnavailable,
                "passphrase is not valid UTF-8",
                e,
            )),
        }
    }
}

/// Prompts on the controlling terminal and reads without echo.
///
/// With confirmation enabled the passphrase is asked for twice. Artifacts
/// carry no integrity check, so a typo when encrypting would otherwise only
/// show up as a wrong seed on some later decryption.
pub struct TerminalPassphraseReader {
    confirm: bool,
}

impl TerminalPassphraseReader {
    /// Ask once. Enough for decryption.
    pub fn once() -> Self {
        Self { confirm: false }
    }

    /// Ask twice and fail if the answers differ.
    pub fn confirming() -> Self {
        Self { confirm: true }
    }

    fn prompt(text: &str) -> Result<Zeroizing<String>> {
        let mut stderr = io::stderr().lock();
        stderr
            .write_all(text.as_bytes())
            .and_then(|()| stderr.flush())
            .map_err(|e| io_error("failed to write prompt", e))?;
        drop(stderr);

        rpassword::read_password().map(Zeroizing::new).map_err(|e| {
            TryteCryptError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::PassphraseUnavailable,
                "failure reading passphrase from terminal",
                e,
            )
        })
    }
}

impl PassphraseReader for TerminalPassphraseReader {
    fn read_passphrase(&mut self) -> Result<Zeroizing<String>> {
        if !io::stdin().is_terminal() {
            return Err(TryteCryptError::with_kind(
                ErrorCategory::User,
                ErrorKind::PassphraseUnavailable,
                "stdin is not a terminal; use --passphrase-stdin to pipe a passphrase",
            ));
        }

        let passphrase = Self::prompt(PROMPT)?;
        if self.confirm {
            let repeated = Self::prompt(CONFIRM_PROMPT)?;
            ensure_same(&passphrase, &repeated)?;
        }
        Ok(passphrase)
    }
}

fn ensure_same(first: &str, second: &str) -> Result<()> {
    if first == second {
        Ok(())
    } else {
        Err(TryteCryptError::with_kind(
            ErrorCategory::User,
            ErrorKind::PassphraseUnavailable,
            "passphrases do not match",
        ))
    }
}

/// Asks `upstream` at most once successfully and replays that answer.
///
/// Failed reads are not remembered, so the next call asks again.
pub struct CachingPassphraseReader {
    upstream: Box<dyn PassphraseReader>,
    cached: Option<Zeroizing<String>>,
}

impl CachingPassphraseReader {
    pub fn new(upstream: Box<dyn PassphraseReader>) -> Self {
        Self {
            upstream,
            cached: None,
        }
    }
}

impl PassphraseReader for CachingPassphraseReader {
    fn read_passphrase(&mut self) -> Result<Zeroizing<String>> {
        if let Some(passphrase) = &self.cached {
            return Ok(passphrase.clone());
        }
        let passphrase = self.upstream.read_passphrase()?;
        Ok(self.cached.insert(passphrase).clone())
    }
}

fn io_error(msg: &str, err: io::Error) -> TryteCryptError {
    TryteCryptError::with_kind_and_source(ErrorCategory::Internal, ErrorKind::Io, msg, err)
}
