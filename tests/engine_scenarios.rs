//! End-to-end encryption scenarios using the canonical defaults
//!
//! These run real scrypt at (or near) the default cost, so they are slower
//! than the unit tests, which use cheap injected defaults.

use tryte_encrypt::{CryptoEngine, ErrorKind, TuningOptions, TuningParams, artifact};

const SEED: &str =
    "A999TEST999SEED99999999999999999999999999999999999999999999999999999999999999999Z";

fn cipher_part(encrypted: &str) -> &str {
    artifact::unwrap(encrypted).0
}

#[tokio::test]
async fn test_short_seed_with_parallelism_one() {
    let options = TuningOptions::parallelism_only(1);
    let encrypted = tryte_encrypt::encrypt("9999", "hello", &options)
        .await
        .unwrap();
    assert!(encrypted.ends_with(":P1"), "got {}", encrypted);

    let decrypted = tryte_encrypt::decrypt(&encrypted, "hello", &options)
        .await
        .unwrap();
    assert_eq!(decrypted, "9999");
}

#[tokio::test]
async fn test_different_passphrases_differ() {
    let options = TuningOptions::parallelism_only(1);
    let mut ciphertexts = Vec::new();
    for passphrase in ["hello", " hello ", "Hæl lø"] {
        let encrypted = tryte_encrypt::encrypt("HAGDCD9DBFFA", passphrase, &options)
            .await
            .unwrap();
        assert_eq!(
            tryte_encrypt::decrypt(&encrypted, passphrase, &options)
                .await
                .unwrap(),
            "HAGDCD9DBFFA"
        );
        ciphertexts.push(encrypted);
    }
    assert_ne!(ciphertexts[0], ciphertexts[1]);
    assert_ne!(ciphertexts[0], ciphertexts[2]);
    assert_ne!(ciphertexts[1], ciphertexts[2]);
}

#[tokio::test]
async fn test_different_log_iterations_differ_and_round_trip() {
    let engine = CryptoEngine::default();
    let low = TuningOptions::parallelism_only(1).with_log_iterations(12);
    let high = TuningOptions::parallelism_only(1).with_log_iterations(13);

    let a = engine.encrypt("HAGDCD9DBFFA", "hello", &low).await.unwrap();
    let b = engine.encrypt("HAGDCD9DBFFA", "hello", &high).await.unwrap();
    assert_ne!(cipher_part(&a), cipher_part(&b));

    // Each carries its own tuning, so no options are needed to decrypt.
    let none = TuningOptions::none();
    assert_eq!(engine.decrypt(&a, "hello", &none).await.unwrap(), "HAGDCD9DBFFA");
    assert_eq!(engine.decrypt(&b, "hello", &none).await.unwrap(), "HAGDCD9DBFFA");
}

#[test]
fn test_default_tuning_has_no_suffix() {
    let engine = CryptoEngine::default();
    let encrypted = engine
        .encrypt_blocking(SEED, "Passφräsę", &TuningOptions::from(TuningParams::CANONICAL))
        .unwrap();
    assert!(!encrypted.contains(':'));

    let implicit = engine
        .encrypt_blocking(SEED, "Passφräsę", &TuningOptions::none())
        .unwrap();
    assert_eq!(encrypted, implicit);

    assert_eq!(
        engine
            .decrypt_blocking(&encrypted, "Passφräsę", &TuningOptions::none())
            .unwrap(),
        SEED
    );
}

#[test]
fn test_toughness_shorthand_and_explicit_triple_agree() {
    let engine = CryptoEngine::default();
    let explicit = TuningOptions::none()
        .with_log_iterations(10)
        .with_memory_cost(4)
        .with_parallelism(4);
    let shorthand = TuningOptions::toughness(-4, &TuningParams::CANONICAL).unwrap();

    let from_explicit = engine.encrypt_blocking(SEED, "Ƥāssφräsę", &explicit).unwrap();
    let from_shorthand = engine.encrypt_blocking(SEED, "Ƥāssφräsę", &shorthand).unwrap();
    assert_eq!(from_explicit, from_shorthand);
    assert!(from_explicit.ends_with(":T-4"), "got {}", from_explicit);

    for options in [&explicit, &shorthand, &TuningOptions::none()] {
        assert_eq!(
            engine
                .decrypt_blocking(&from_explicit, "Ƥāssφräsę", options)
                .unwrap(),
            SEED
        );
    }
}

#[test]
fn test_suffix_overrides_caller_options() {
    let engine = CryptoEngine::default();
    let encrypted = engine
        .encrypt_blocking(SEED, "hello", &TuningOptions::parallelism_only(1).with_log_iterations(11))
        .unwrap();

    // Options that disagree with the suffix are ignored for the fields it sets.
    let misleading = TuningOptions::none()
        .with_log_iterations(12)
        .with_parallelism(2);
    assert_eq!(
        engine.decrypt_blocking(&encrypted, "hello", &misleading).unwrap(),
        SEED
    );
}

#[test]
fn test_wrong_passphrase_is_not_an_error() {
    let engine = CryptoEngine::default();
    let options = TuningOptions::parallelism_only(1);
    let encrypted = engine.encrypt_blocking(SEED, "right", &options).unwrap();
    let garbage = engine.decrypt_blocking(&encrypted, "wrong", &options).unwrap();
    assert_ne!(garbage, SEED);
    assert!(tryte_encrypt::trytes::validate(&garbage).is_ok());
}

#[tokio::test]
async fn test_invalid_seed_reports_character_and_position() {
    let err = tryte_encrypt::encrypt("A9TEST9seed", "hello", &TuningOptions::none())
        .await
        .expect_err("expected invalid seed");
    assert_eq!(err.kind, Some(ErrorKind::InvalidTryte));
    let detail = err.invalid_tryte().unwrap();
    assert_eq!((detail.character, detail.position), ('s', 7));
}
