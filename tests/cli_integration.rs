//! CLI integration tests
//!
//! Tests the command-line interface end-to-end. Tuning is lowered with
//! `--toughness -4` (N=2^10, r=4, p=4) to keep scrypt fast.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

const SEED: &str =
    "A9TEST9SEED99RMDKUTQVGFMYPYGAQVOTGJCEFIEELKHRBCZYKAOQQWFRYNGYDAEIKTHQJINZDPYNYOS9";

/// Get path to the tryte-encrypt binary
fn tryte_encrypt_bin() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // Remove test binary name
    path.pop(); // Remove deps/
    path.push("tryte-encrypt");
    path
}

/// Run tryte-encrypt with passphrase from stdin
fn run_with_passphrase(args: &[&str], passphrase: &str) -> Output {
    let mut child = Command::new(tryte_encrypt_bin())
        .arg("--passphrase-stdin")
        .args(args)
        .env_remove("TRYTE_ENCRYPT_MAX_MEMORY")
        .env_remove("TRYTE_ENCRYPT_LOG_ITERATIONS")
        .env_remove("TRYTE_ENCRYPT_MEMORY_COST")
        .env_remove("TRYTE_ENCRYPT_PARALLELISM")
        .env_remove("TRYTE_ENCRYPT_TOUGHNESS")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn tryte-encrypt");

    {
        let stdin = child.stdin.as_mut().expect("failed to open stdin");
        // Ignore BrokenPipe errors - the command may exit before reading stdin
        // if it encounters an error (e.g., an invalid seed)
        let _ = stdin.write_all(passphrase.as_bytes());
    }

    child.wait_with_output().expect("failed to wait for tryte-encrypt")
}

fn stdout_of(output: &Output) -> String {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).unwrap().trim().to_owned()
}

#[test]
fn test_encrypt_decrypt_roundtrip_stdout() {
    let encrypted = stdout_of(&run_with_passphrase(
        &["--toughness", "-4", "encrypt", SEED],
        "hello",
    ));
    assert!(encrypted.ends_with(":T-4"), "got {}", encrypted);

    // No tuning flags: the suffix carries it.
    let decrypted = stdout_of(&run_with_passphrase(&["decrypt", &encrypted], "hello"));
    assert_eq!(decrypted, SEED);
}

#[test]
fn test_encrypt_decrypt_roundtrip_files() {
    let temp_dir = TempDir::new().unwrap();
    let seed_path = temp_dir.path().join("seed.txt");
    let encrypted_path = temp_dir.path().join("seed.enc");
    let decrypted_path = temp_dir.path().join("seed.dec");
    fs::write(&seed_path, format!("{}\n", SEED)).unwrap();

    let result = run_with_passphrase(
        &[
            "-n",
            "10",
            "-r",
            "2",
            "-p",
            "1",
            "encrypt",
            "-i",
            seed_path.to_str().unwrap(),
            "-o",
            encrypted_path.to_str().unwrap(),
        ],
        "Ƥāssφräsę",
    );
    assert!(
        result.status.success(),
        "encrypt failed: {}",
        String::from_utf8_lossy(&result.stderr)
    );
    let encrypted = fs::read_to_string(&encrypted_path).unwrap();
    assert!(encrypted.trim_end().ends_with(":N10R2P1"), "got {}", encrypted);

    let result = run_with_passphrase(
        &[
            "decrypt",
            "-i",
            encrypted_path.to_str().unwrap(),
            "-o",
            decrypted_path.to_str().unwrap(),
        ],
        "Ƥāssφräsę",
    );
    assert!(
        result.status.success(),
        "decrypt failed: {}",
        String::from_utf8_lossy(&result.stderr)
    );
    assert_eq!(fs::read_to_string(&decrypted_path).unwrap().trim(), SEED);
}

#[test]
fn test_suffix_flag_matches_explicit_flags() {
    let via_suffix = stdout_of(&run_with_passphrase(
        &["--suffix", "N10R2P1", "encrypt", "HAGDCD9DBFFA"],
        "hello",
    ));
    let via_flags = stdout_of(&run_with_passphrase(
        &["-n", "10", "-r", "2", "-p", "1", "encrypt", "HAGDCD9DBFFA"],
        "hello",
    ));
    assert_eq!(via_suffix, via_flags);
}

#[test]
fn test_retune_in_place() {
    let temp_dir = TempDir::new().unwrap();
    let encrypted_path = temp_dir.path().join("seed.enc");

    let result = run_with_passphrase(
        &[
            "--toughness",
            "-4",
            "encrypt",
            SEED,
            "-o",
            encrypted_path.to_str().unwrap(),
        ],
        "hello",
    );
    assert!(result.status.success());

    // The passphrase is needed twice but only provided once on stdin.
    let result = run_with_passphrase(
        &[
            "--toughness",
            "-3",
            "retune",
            "-i",
            encrypted_path.to_str().unwrap(),
            "-o",
            encrypted_path.to_str().unwrap(),
        ],
        "hello",
    );
    assert!(
        result.status.success(),
        "retune failed: {}",
        String::from_utf8_lossy(&result.stderr)
    );
    let retuned = fs::read_to_string(&encrypted_path).unwrap();
    assert!(retuned.trim_end().ends_with(":T-3"), "got {}", retuned);

    let decrypted = stdout_of(&run_with_passphrase(&["decrypt", retuned.trim()], "hello"));
    assert_eq!(decrypted, SEED);
}

#[test]
fn test_invalid_seed_reports_position() {
    let result = run_with_passphrase(&["-t", "-4", "encrypt", "ABCdEF"], "hello");
    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("position 3"), "stderr: {}", stderr);
}

#[test]
fn test_malformed_suffix_rejected() {
    let result = run_with_passphrase(&["decrypt", "ABC:N"], "hello");
    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("malformed tuning suffix"), "stderr: {}", stderr);
}

#[test]
fn test_memory_ceiling() {
    let result = run_with_passphrase(
        &["--max-memory", "1048576", "encrypt", "HAGDCD9DBFFA"],
        "hello",
    );
    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("bytes of memory"), "stderr: {}", stderr);
}

#[test]
fn test_missing_seed_is_usage_error() {
    let result = run_with_passphrase(&["encrypt"], "hello");
    assert!(!result.status.success());
}

#[test]
fn test_out_of_range_toughness_rejected() {
    for args in [
        &["--toughness", "9223372036854775807", "encrypt", "ABC"][..],
        &["decrypt", "ABC:T-9223372036854775807"][..],
    ] {
        let result = run_with_passphrase(args, "hello");
        assert!(!result.status.success());
        let stderr = String::from_utf8_lossy(&result.stderr);
        assert!(stderr.contains("out of range"), "stderr: {}", stderr);
    }
}
