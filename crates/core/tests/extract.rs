mod common;

use plr_core::config::ExtractConfig;
use plr_core::extractor::extract_zip;
use std::fs;

#[test]
fn extracts_nested_entries() {
    let temp = tempfile::tempdir().unwrap();
    let zip_path = temp.path().join("pack.zip");
    common::write_zip(
        &zip_path,
        &[
            ("license.txt", b"PLR"),
            ("ebook/guide.pdf", b"pdf bytes"),
            ("bonus/graphics/cover.png", b"png"),
        ],
    );
    let out = temp.path().join("library/pack");

    let summary = extract_zip(&zip_path, &out, &ExtractConfig::default()).unwrap();
    assert_eq!(summary.files, 3);
    assert_eq!(fs::read_to_string(out.join("license.txt")).unwrap(), "PLR");
    assert_eq!(fs::read_to_string(out.join("ebook/guide.pdf")).unwrap(), "pdf bytes");
    assert!(out.join("bonus/graphics/cover.png").is_file());
}

#[test]
fn traversal_entry_fails_wholesale() {
    let temp = tempfile::tempdir().unwrap();
    let zip_path = temp.path().join("evil.zip");
    common::write_zip(
        &zip_path,
        &[("readme.txt", b"hello"), ("../../evil.txt", b"pwned")],
    );
    let out = temp.path().join("out");
    fs::create_dir_all(&out).unwrap();

    let err = extract_zip(&zip_path, &out, &ExtractConfig::default()).unwrap_err();
    assert_eq!(err.kind(), "security");
    assert_eq!(common::count_files(&out), 0);
    assert!(!temp.path().join("evil.txt").exists());
}

#[test]
fn corrupt_archive_is_a_format_error() {
    let temp = tempfile::tempdir().unwrap();
    let zip_path = temp.path().join("broken.zip");
    fs::write(&zip_path, "not a zip at all").unwrap();
    let err = extract_zip(&zip_path, &temp.path().join("out"), &ExtractConfig::default())
        .unwrap_err();
    assert_eq!(err.kind(), "format");
    assert!(!temp.path().join("out").exists());
}

#[test]
fn limits_are_enforced_before_writing() {
    let temp = tempfile::tempdir().unwrap();
    let zip_path = temp.path().join("big.zip");
    common::write_zip(&zip_path, &[("a.bin", &[0u8; 600]), ("b.bin", &[0u8; 600])]);
    let out = temp.path().join("out");

    let limits = ExtractConfig {
        max_entries: 10,
        max_total_bytes: 1000,
        ..ExtractConfig::default()
    };
    assert_eq!(extract_zip(&zip_path, &out, &limits).unwrap_err().kind(), "limit");

    let limits = ExtractConfig {
        max_entries: 1,
        max_total_bytes: 10_000,
        ..ExtractConfig::default()
    };
    assert_eq!(extract_zip(&zip_path, &out, &limits).unwrap_err().kind(), "limit");
    assert!(!out.exists());
}

#[test]
fn existing_files_are_not_overwritten_by_default() {
    let temp = tempfile::tempdir().unwrap();
    let zip_path = temp.path().join("pack.zip");
    common::write_zip(
        &zip_path,
        &[("fresh.txt", b"new"), ("notes/edited.txt", b"from archive")],
    );
    let out = temp.path().join("out");
    fs::create_dir_all(out.join("notes")).unwrap();
    fs::write(out.join("notes/edited.txt"), "my edits").unwrap();

    let err = extract_zip(&zip_path, &out, &ExtractConfig::default()).unwrap_err();
    assert_eq!(err.kind(), "collision");
    assert_eq!(fs::read_to_string(out.join("notes/edited.txt")).unwrap(), "my edits");
    assert!(!out.join("fresh.txt").exists());

    let limits = ExtractConfig {
        allow_overwrite: true,
        ..ExtractConfig::default()
    };
    let summary = extract_zip(&zip_path, &out, &limits).unwrap();
    assert_eq!(summary.files, 2);
    assert_eq!(
        fs::read_to_string(out.join("notes/edited.txt")).unwrap(),
        "from archive"
    );
}
