#![allow(missing_docs)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_vigenere-cli"))
}

#[test]
fn test_encrypt_and_decrypt_text() {
    cli()
        .args(["encrypt", "--key", "KEY", "Hello"])
        .assert()
        .success()
        .stdout("RIJVS\n");

    cli()
        .args(["decrypt", "-k", "key", "RIJVS"])
        .assert()
        .success()
        .stdout("HELLO\n");
}

#[test]
fn test_encrypt_reads_standard_input() {
    cli()
        .args(["encrypt", "--key", "KEY"])
        .write_stdin("he, llo!")
        .assert()
        .success()
        .stdout("RIJVS\n");
}

#[test]
fn test_punctuation_key_is_rejected() {
    cli()
        .args(["encrypt", "--key", "!!!", "Hello"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid key"));
}

#[test]
fn test_full_file_workflow() {
    // 1. Setup temporary files
    let temp_dir = tempdir().unwrap();
    let input_path = temp_dir.path().join("input.txt");
    let encrypted_path = temp_dir.path().join("encrypted.txt");
    let decrypted_path = temp_dir.path().join("decrypted.txt");

    let input_content = "Meet me at the usual place at ten rather than eight o'clock.\n".repeat(50);
    fs::write(&input_path, &input_content).unwrap();

    // 2. Encrypt the file
    cli()
        .arg("encrypt")
        .arg("--key")
        .arg("SCHOOL")
        .arg("--input")
        .arg(&input_path)
        .arg("--output")
        .arg(&encrypted_path)
        .assert()
        .success();

    let ciphertext = fs::read_to_string(&encrypted_path).unwrap();
    assert!(ciphertext.bytes().all(|b| b.is_ascii_uppercase()));
    assert_ne!(ciphertext, input_content);

    // 3. Decrypt it again
    cli()
        .arg("decrypt")
        .arg("--key")
        .arg("SCHOOL")
        .arg("--input")
        .arg(&encrypted_path)
        .arg("--output")
        .arg(&decrypted_path)
        .assert()
        .success();

    // 4. Verify against the normalized input
    let decrypted = fs::read_to_string(&decrypted_path).unwrap();
    assert_eq!(decrypted, vigenere_core::normalize(&input_content).as_str());
}

#[test]
fn test_frequency_chart() {
    cli()
        .args(["frequency", "AAB"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Letters analyzed: 3"))
        .stdout(predicate::str::contains("A:     2 ( 66.7%)"))
        .stdout(predicate::str::contains("Z:     0 (  0.0%)"));

    cli()
        .args(["frequency", "1234"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No letters found to analyze."));
}

#[test]
fn test_chart_width_is_bounded() {
    cli()
        .args(["frequency", "--width", "18446744073709551615", "AAB"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--width"));

    cli()
        .args(["columns", "-l", "2", "--width", "0", "ABAB"])
        .assert()
        .failure();

    cli()
        .args(["frequency", "--width", "500", "AAB"])
        .assert()
        .success()
        .stdout(predicate::str::contains(&"#".repeat(500)));
}

#[test]
fn test_frequency_json() {
    let output = cli().args(["frequency", "--json", "AAB"]).output().unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["total"], 3);
    assert_eq!(json["counts"]["A"], 2);
    assert_eq!(json["counts"]["B"], 1);
}

#[test]
fn test_kasiski_hints() {
    cli()
        .args(["kasiski", "--max-pattern-len", "3", "ABCXYZABC"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"ABC\""))
        .stdout(predicate::str::contains("Key length candidates: 2, 3"));

    cli()
        .args(["kasiski", "ABCDEABC"])
        .assert()
        .success()
        .stdout(predicate::str::contains("none"));
}

#[test]
fn test_kasiski_without_repeats() {
    cli()
        .args(["kasiski", "ABCDEFGHIJ"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No repeating pattern found"));
}

#[test]
fn test_kasiski_rejects_inverted_window() {
    cli()
        .args(["kasiski", "--min-pattern-len", "8", "ABCABCABC"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("pattern length"));
}

#[test]
fn test_columns_for_key_length_guess() {
    cli()
        .args(["columns", "--key-length", "3", "ABCABCAB"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Key letter #1 (letters: 3, most frequent: A)"))
        .stdout(predicate::str::contains("Key letter #3 (letters: 2, most frequent: C)"));

    cli()
        .args(["columns", "-l", "21", "ABCABCAB"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("key_length"));
}

#[test]
fn test_challenge_and_verify() {
    // 1. Generate a reproducible challenge
    let output = cli()
        .args(["challenge", "--seed", "11", "--length", "500", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let challenge: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let ciphertext = challenge["ciphertext"].as_str().unwrap();
    let key = challenge["key"].as_str().unwrap();
    let plaintext = challenge["plaintext"].as_str().unwrap();
    assert_eq!(ciphertext.len(), 500);
    assert_eq!(key.len(), 3);

    // 2. The same seed gives the same ciphertext
    cli()
        .args(["challenge", "--seed", "11", "--length", "500"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(ciphertext));

    // 3. The answer verifies, a wrong one does not
    cli()
        .args(["verify", "--ciphertext", ciphertext, "--key", key, "--plaintext", plaintext])
        .assert()
        .success()
        .stdout(predicate::str::contains("Correct!"));

    cli()
        .args(["verify", "--ciphertext", ciphertext, "--key", key, "--plaintext", "WRONG"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Incorrect."));
}

#[test]
fn test_challenge_rejects_long_word_key() {
    cli()
        .args(["challenge", "--key-style", "word", "--key-length", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("key_length"));
}
