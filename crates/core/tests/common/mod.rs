#![allow(dead_code)]

use std::fs;
use std::io::Write;
use std::path::Path;

pub fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
    let file = fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::FileOptions::default();
    for (name, data) in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(data).unwrap();
    }
    zip.finish().unwrap();
}

/// The three-file library from the product walkthrough.
pub fn sample_library(dir: &Path) {
    fs::write(dir.join("a.pdf"), vec![b'x'; 1200]).unwrap();
    write_zip(
        &dir.join("b.zip"),
        &[
            ("license.txt", b"You may resell this product."),
            ("ebook.pdf", &[b'y'; 2048]),
        ],
    );
    fs::write(dir.join("c.txt"), "notes").unwrap();
}

pub fn count_files(dir: &Path) -> usize {
    walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .count()
}
