use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn textbook_rsa() -> Command {
    Command::cargo_bin("textbook-rsa").unwrap()
}

#[test]
fn test_keygen_prints_keys() {
    textbook_rsa()
        .args(["keygen", "--bits", "64"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Public key {e, n}"))
        .stdout(predicate::str::contains("Private key {d, n}"));
}

#[test]
fn test_keygen_saves_json() {
    let dir = tempdir().unwrap();
    let keys = dir.path().join("keys.json");

    textbook_rsa()
        .args(["keygen", "--bits", "64", "--hex", "--out"])
        .arg(&keys)
        .assert()
        .success();

    let json = fs::read_to_string(&keys).unwrap();
    assert!(json.contains("\"n\""));
    assert!(json.contains("\"d\""));
}

#[test]
fn test_encrypt_decrypt_with_key_file() {
    let dir = tempdir().unwrap();
    let keys = dir.path().join("keys.json");
    let plain = dir.path().join("a.bin");
    let cipher = dir.path().join("ciphertext");
    let output = dir.path().join("a1.bin");
    let payload: Vec<u8> = (0..=255u8).cycle().take(700).collect();
    fs::write(&plain, &payload).unwrap();

    textbook_rsa()
        .args(["keygen", "--bits", "96", "--out"])
        .arg(&keys)
        .assert()
        .success();

    textbook_rsa()
        .arg("encrypt")
        .arg("-i")
        .arg(&plain)
        .arg("-o")
        .arg(&cipher)
        .arg("--keys")
        .arg(&keys)
        .assert()
        .success();

    textbook_rsa()
        .arg("decrypt")
        .arg("-i")
        .arg(&cipher)
        .arg("-o")
        .arg(&output)
        .arg("--keys")
        .arg(&keys)
        .assert()
        .success();

    assert_eq!(fs::read(&output).unwrap(), payload);
}

#[test]
fn test_textbook_override_keys() {
    let dir = tempdir().unwrap();
    let plain = dir.path().join("a.txt");
    let cipher = dir.path().join("ciphertext");
    fs::write(&plain, "A").unwrap();

    textbook_rsa()
        .arg("encrypt")
        .arg("-i")
        .arg(&plain)
        .arg("-o")
        .arg(&cipher)
        .args(["--key", "17 3233"])
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&cipher).unwrap(), "2790 0");
}

#[test]
fn test_decrypt_malformed_fails() {
    let dir = tempdir().unwrap();
    let cipher = dir.path().join("ciphertext");
    let output = dir.path().join("out.bin");
    fs::write(&cipher, "2790 zz 0").unwrap();

    textbook_rsa()
        .arg("decrypt")
        .arg("-i")
        .arg(&cipher)
        .arg("-o")
        .arg(&output)
        .args(["--key", "2753 3233"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed ciphertext"));

    assert!(!output.exists());
}

#[test]
fn test_roundtrip_command() {
    let dir = tempdir().unwrap();
    let plain = dir.path().join("a.png");
    fs::write(&plain, b"\x89PNG\r\n\x1a\nnot really an image").unwrap();

    textbook_rsa()
        .arg("roundtrip")
        .arg("-i")
        .arg(&plain)
        .args(["--bits", "64"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Round trip OK"));

    assert!(dir.path().join("a.png.cipher").exists());
    assert_eq!(
        fs::read(dir.path().join("a.png.out")).unwrap(),
        fs::read(&plain).unwrap()
    );
}

#[test]
fn test_encrypt_requires_key() {
    textbook_rsa()
        .args(["encrypt", "-i", "a", "-o", "b"])
        .assert()
        .failure();
}
