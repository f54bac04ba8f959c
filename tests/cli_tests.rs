mod common;

use regex::Regex;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

use common::{accuracy, corpus_symbols, TEST_SQUARE, CORPUS};

use adfgvx::cipher::text::decode_plain;

struct TestContext {
    dir: TempDir,
    corpus_path: PathBuf,
}

impl TestContext {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let corpus_path = dir.path().join("corpus.txt");
        fs::write(&corpus_path, CORPUS).unwrap();
        Self { dir, corpus_path }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

fn adfgvx(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_adfgvx"))
        .args(args)
        .output()
        .expect("Failed to execute binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn test_cli_model_writes_table() {
    let ctx = TestContext::new();
    let table = ctx.path("quads.tsv");
    let out = adfgvx(&[
        "model",
        "-c",
        ctx.corpus_path.to_str().unwrap(),
        "-o",
        table.to_str().unwrap(),
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let content = fs::read_to_string(&table).unwrap();
    let row = Regex::new(r"^[A-Z0-9]{4}\t\d+$").unwrap();
    assert!(content.lines().count() > 1000);
    assert!(content.lines().all(|l| row.is_match(l)), "bad row in table");
}

#[test]
fn test_cli_encrypt_then_solve() {
    let ctx = TestContext::new();
    let table = ctx.path("quads.tsv");
    let out = adfgvx(&[
        "model",
        "-c",
        ctx.corpus_path.to_str().unwrap(),
        "-o",
        table.to_str().unwrap(),
    ]);
    assert!(out.status.success());

    let plain = decode_plain(&corpus_symbols()[1000..1400]);
    let out = adfgvx(&[
        "encrypt",
        &plain,
        "--square",
        TEST_SQUARE,
        "--key",
        "3,6,0,5,1,7,2,4",
    ]);
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("Key: 3,6,0,5,1,7,2,4"));
    let re = Regex::new(r"Ciphertext: ([ADFGVX]+)").unwrap();
    let cipher = re.captures(&text).expect("no ciphertext printed")[1].to_string();
    assert_eq!(cipher.len(), 800);

    let out = adfgvx(&[
        "--model",
        table.to_str().unwrap(),
        "solve",
        &cipher,
        "--key-length",
        "8",
        "--restarts",
        "6",
        "-S",
        "42",
        "--json",
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let json: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    let found = json["plaintext"].as_str().unwrap();
    assert!(accuracy(&plain, found) >= 0.9, "{}", found);
    assert_eq!(json["key_length"], 8);
    assert_eq!(json["pairs"].as_array().unwrap().len(), 4);
}

#[test]
fn test_cli_solve_reads_input_file_and_prints_table() {
    let ctx = TestContext::new();
    let cipher_path = ctx.path("cipher.txt");
    fs::write(&cipher_path, "ADFG VXAD\nFGVX ADFG\n").unwrap();

    let out = adfgvx(&[
        "-m",
        ctx.corpus_path.to_str().unwrap(),
        "solve",
        "-i",
        cipher_path.to_str().unwrap(),
        "--key-length",
        "4",
        "--restarts",
        "1",
        "-S",
        "1",
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let text = stdout(&out);
    assert!(text.contains("RECOVERED"));
    assert!(text.contains("Plaintext: "));
}

#[test]
fn test_cli_solve_without_model_fails() {
    let out = adfgvx(&["solve", "ADFGVXADFGVX", "--key-length", "4"]);
    assert!(!out.status.success());
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn test_cli_rejects_odd_key_length() {
    let ctx = TestContext::new();
    let out = adfgvx(&[
        "-m",
        ctx.corpus_path.to_str().unwrap(),
        "solve",
        "ADFGVXADFGVXADFGVX",
        "--key-length",
        "3",
    ]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("even"));
}

#[test]
fn test_cli_selftest_grouping_json() {
    let ctx = TestContext::new();
    let out = adfgvx(&[
        "selftest",
        "-c",
        ctx.corpus_path.to_str().unwrap(),
        "-t",
        "3",
        "-l",
        "grouping",
        "-S",
        "9",
        "--json",
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let json: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(json["trials"], 3);
    assert_eq!(json["level"], "Grouping");
    assert_eq!(json["reports"].as_array().unwrap().len(), 3);
}

#[test]
fn test_cli_selftest_compares_strategies() {
    let ctx = TestContext::new();
    let out = adfgvx(&[
        "selftest",
        "-c",
        ctx.corpus_path.to_str().unwrap(),
        "--substitution",
        "-t",
        "2",
        "--restarts",
        "1",
        "--max-evaluations",
        "3000",
        "-S",
        "4",
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let text = stdout(&out);
    assert!(text.contains("hill_climb"));
    assert!(text.contains("anneal"));
    assert_eq!(text.matches("Mappings recovered").count(), 2);
}
