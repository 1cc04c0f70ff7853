//! Lists zip members without extracting them.

use crate::error::{PlrError, PlrResult};
use crate::models::ArchiveEntry;
use std::fs;
use std::path::Path;

pub fn open(path: &Path) -> PlrResult<zip::ZipArchive<fs::File>> {
    let file = fs::File::open(path).map_err(|e| PlrError::access(path, e))?;
    zip::ZipArchive::new(file).map_err(|e| PlrError::format(path, e))
}

/// Member files of a zip archive, in central-directory order. Directory
/// records are skipped; sizes are uncompressed.
pub fn list_entries(path: &Path) -> PlrResult<Vec<ArchiveEntry>> {
    let mut archive = open(path)?;
    let mut entries = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let entry = archive.by_index(i).map_err(|e| PlrError::format(path, e))?;
        if entry.is_dir() {
            continue;
        }
        let member_path = entry.name().replace('\\', "/");
        let name = member_path
            .rsplit('/')
            .next()
            .unwrap_or(member_path.as_str())
            .to_string();
        entries.push(ArchiveEntry {
            name,
            path: member_path,
            size: entry.size(),
        });
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
        let file = fs::File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options = zip::write::FileOptions::default();
        for (name, data) in entries {
            zip.start_file(*name, options).unwrap();
            zip.write_all(data).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn lists_nested_members_with_uncompressed_size() {
        let temp = tempfile::tempdir().unwrap();
        let zip_path = temp.path().join("pack.zip");
        write_zip(
            &zip_path,
            &[("license.txt", b"PLR rights"), ("ebook/guide.pdf", &[7u8; 4096])],
        );

        let entries = list_entries(&zip_path).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "license.txt");
        assert_eq!(entries[1].name, "guide.pdf");
        assert_eq!(entries[1].path, "ebook/guide.pdf");
        assert_eq!(entries[1].size, 4096);
    }

    #[test]
    fn empty_archive_lists_nothing() {
        let temp = tempfile::tempdir().unwrap();
        let zip_path = temp.path().join("empty.zip");
        write_zip(&zip_path, &[]);
        assert!(list_entries(&zip_path).unwrap().is_empty());
    }

    #[test]
    fn corrupt_archive_is_a_format_error() {
        let temp = tempfile::tempdir().unwrap();
        let zip_path = temp.path().join("broken.zip");
        fs::write(&zip_path, b"PK\x03\x04 this is not really a zip").unwrap();
        let err = list_entries(&zip_path).unwrap_err();
        assert_eq!(err.kind(), "format");
    }
}
