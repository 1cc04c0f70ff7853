//! Content hashing and coarse type classification.

use crate::error::{PlrError, PlrResult};
use crate::models::FileCategory;
use std::fs;
use std::io::Read;
use std::path::Path;

const HASH_BUF: usize = 64 * 1024;

/// Full-file blake3 digest, read in fixed-size chunks.
pub fn hash_file(path: &Path) -> PlrResult<String> {
    let mut file = fs::File::open(path).map_err(|e| PlrError::access(path, e))?;
    let mut hasher = blake3::Hasher::new();
    let mut buf = vec![0u8; HASH_BUF];
    loop {
        let n = file.read(&mut buf).map_err(|e| PlrError::access(path, e))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finalize().to_hex().to_string())
}

/// Lowercased extension without the dot.
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

pub fn category_for_extension(ext: &str) -> FileCategory {
    match ext.to_ascii_lowercase().as_str() {
        "pdf" | "doc" | "docx" | "odt" | "rtf" | "txt" | "md" | "epub" | "mobi" | "azw"
        | "azw3" | "ppt" | "pptx" | "odp" | "key" | "pages" => FileCategory::Document,
        "zip" | "rar" | "7z" | "tar" | "gz" | "tgz" | "bz2" | "xz" => FileCategory::Archive,
        "xls" | "xlsx" | "xlsm" | "ods" | "csv" | "tsv" | "numbers" => FileCategory::Spreadsheet,
        "jpg" | "jpeg" | "png" | "gif" | "bmp" | "svg" | "webp" | "tif" | "tiff" | "heic"
        | "psd" | "ai" | "eps" => FileCategory::Image,
        "mp4" | "mov" | "avi" | "mkv" | "wmv" | "flv" | "webm" | "m4v" => FileCategory::Video,
        "mp3" | "wav" | "aac" | "flac" | "ogg" | "m4a" | "wma" => FileCategory::Audio,
        "html" | "htm" | "css" | "js" | "ts" | "php" | "py" | "json" | "xml" | "sh" | "rs" => {
            FileCategory::Code
        }
        _ => FileCategory::Other,
    }
}

/// Extension-only classification. No I/O.
pub fn category_for_path(path: &Path) -> FileCategory {
    extension_of(path)
        .map(|ext| category_for_extension(&ext))
        .unwrap_or(FileCategory::Other)
}

/// Like [`category_for_path`], but falls back to magic bytes when the
/// extension is missing or unknown.
pub fn sniff_category(path: &Path) -> FileCategory {
    let by_ext = category_for_path(path);
    if by_ext != FileCategory::Other {
        return by_ext;
    }
    match infer::get_from_path(path) {
        Ok(Some(kind)) => category_for_matcher(kind.matcher_type(), kind.extension()),
        _ => FileCategory::Other,
    }
}

fn category_for_matcher(matcher: infer::MatcherType, ext: &str) -> FileCategory {
    use infer::MatcherType;
    match matcher {
        MatcherType::Archive => FileCategory::Archive,
        MatcherType::Audio => FileCategory::Audio,
        MatcherType::Video => FileCategory::Video,
        MatcherType::Image => FileCategory::Image,
        MatcherType::Book => FileCategory::Document,
        MatcherType::Text => FileCategory::Code,
        // office formats are zip containers; infer reports the real extension
        MatcherType::Doc => category_for_extension(ext),
        _ => FileCategory::Other,
    }
}

/// True when the file should be opened with the zip reader.
pub fn is_zip(path: &Path) -> bool {
    if extension_of(path).as_deref() == Some("zip") {
        return true;
    }
    matches!(infer::get_from_path(path), Ok(Some(kind)) if kind.mime_type() == "application/zip")
}
