use std::process::Command;
use tempfile::tempdir;

const KEY_HEX: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";
const IV_HEX: &str = "f0f1f2f3f4f5f6f7f8f9fafbfcfdfeff";

fn bin() -> String {
    env!("CARGO_BIN_EXE_magicblock").to_string()
}

#[test]
fn cli_encode_decode_roundtrip() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input.txt");
    let block = dir.path().join("input.mb");
    let output = dir.path().join("output.txt");

    std::fs::write(&input, b"abcde12345abcde12345".repeat(40)).unwrap();

    let st = Command::new(bin())
        .args(["encode", "--mode", "lzma"])
        .arg(&input)
        .arg(&block)
        .status()
        .unwrap();
    assert!(st.success());

    let st = Command::new(bin())
        .arg("decode")
        .arg(&block)
        .arg(&output)
        .status()
        .unwrap();
    assert!(st.success());
    assert_eq!(
        std::fs::read(&output).unwrap(),
        std::fs::read(&input).unwrap()
    );
}

#[test]
fn cli_cipher_roundtrip_with_hex_key() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("secret.bin");
    let block = dir.path().join("secret.mb");
    let output = dir.path().join("secret.out");

    let data: Vec<u8> = (0..=255u8).cycle().take(3000).collect();
    std::fs::write(&input, &data).unwrap();

    let st = Command::new(bin())
        .args(["encode", "--mode", "deflate-cipher", "--key", KEY_HEX, "--iv", IV_HEX])
        .arg(&input)
        .arg(&block)
        .status()
        .unwrap();
    assert!(st.success());

    // Without a key the block cannot be opened.
    let out = Command::new(bin())
        .arg("decode")
        .arg(&block)
        .arg(&output)
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).starts_with("magicblock: "));

    let st = Command::new(bin())
        .args(["--force", "decode", "--key", KEY_HEX, "--iv", IV_HEX])
        .arg(&block)
        .arg(&output)
        .status()
        .unwrap();
    assert!(st.success());
    assert_eq!(std::fs::read(&output).unwrap(), data);
}

#[test]
fn cli_refuses_to_overwrite_without_force() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.txt");
    let block = dir.path().join("in.mb");
    std::fs::write(&input, b"payload").unwrap();
    std::fs::write(&block, b"existing").unwrap();

    let out = Command::new(bin())
        .arg("encode")
        .arg(&input)
        .arg(&block)
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert_eq!(std::fs::read(&block).unwrap(), b"existing");

    let st = Command::new(bin())
        .args(["--force", "encode"])
        .arg(&input)
        .arg(&block)
        .status()
        .unwrap();
    assert!(st.success());
    assert_ne!(std::fs::read(&block).unwrap(), b"existing");
}

#[test]
fn cli_header_text_and_json() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("hello.txt");
    let block = dir.path().join("hello.mb");
    std::fs::write(&input, b"Hello, World!").unwrap();

    let st = Command::new(bin())
        .args(["encode", "--mode", "raw"])
        .arg(&input)
        .arg(&block)
        .status()
        .unwrap();
    assert!(st.success());

    let out = Command::new(bin())
        .arg("header")
        .arg(&block)
        .output()
        .unwrap();
    assert!(out.status.success());
    let text = String::from_utf8(out.stdout).unwrap();
    assert!(text.contains("magic:            0x1A43444D"));
    assert!(text.contains("mode:             raw (0)"));
    assert!(text.contains("compressed_len:   13"));

    let out = Command::new(bin())
        .args(["--json", "header"])
        .arg(&block)
        .output()
        .unwrap();
    assert!(out.status.success());
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["mode"], "raw");
    assert_eq!(json["compressed_len"], 13);
    assert_eq!(json["uncompressed_len"], 13);
    assert_eq!(json["extra_len"], 0);
    assert_eq!(json["total_len"], 37);
}

#[test]
fn cli_header_rejects_foreign_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("foreign.bin");
    std::fs::write(&input, [0u8; 64]).unwrap();

    let out = Command::new(bin())
        .arg("header")
        .arg(&input)
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("invalid magic"));
}

#[test]
fn cli_bad_key_is_reported() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.txt");
    std::fs::write(&input, b"payload").unwrap();

    let out = Command::new(bin())
        .args(["encode", "--mode", "cipher", "--key", "abcd", "--iv", IV_HEX])
        .arg(&input)
        .arg(dir.path().join("out.mb"))
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("--key"));
}

#[test]
fn cli_config_works() {
    let out = Command::new(bin()).arg("config").output().unwrap();
    assert!(out.status.success());
    let text = String::from_utf8_lossy(&out.stderr);
    assert!(text.contains("MAGIC=0x1A43444D"));
    assert!(text.contains("HEADER_SIZE=24"));
}
