//! Unpacks zip packages into a target directory.

use crate::archive;
use crate::config::ExtractConfig;
use crate::error::{PlrError, PlrResult};
use serde::Serialize;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractSummary {
    pub files: usize,
    pub directories: usize,
}

/// Relative path an entry may be written to, or `None` when its name could
/// land outside the target (parent components, absolute paths, drive
/// prefixes).
pub fn safe_entry_path(name: &str) -> Option<PathBuf> {
    let normalized = name.replace('\\', "/");
    if normalized.starts_with('/') {
        return None;
    }
    let mut out = PathBuf::new();
    for component in Path::new(&normalized).components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    if out.as_os_str().is_empty() {
        return None;
    }
    Some(out)
}

struct PlannedEntry {
    index: usize,
    relative: PathBuf,
    is_dir: bool,
}

/// Extracts every entry of `zip_path` below `target_dir`, keeping relative
/// paths. All entries are checked before anything is written: one unsafe
/// name, an exceeded limit, or a file entry whose destination already exists
/// (unless `allow_overwrite`) fails the whole archive and leaves the target
/// untouched.
pub fn extract_zip(
    zip_path: &Path,
    target_dir: &Path,
    limits: &ExtractConfig,
) -> PlrResult<ExtractSummary> {
    let mut archive = archive::open(zip_path)?;
    if archive.len() > limits.max_entries {
        return Err(PlrError::Limit(format!(
            "{} entries, limit is {}",
            archive.len(),
            limits.max_entries
        )));
    }

    let mut plan = Vec::with_capacity(archive.len());
    let mut total: u64 = 0;
    for index in 0..archive.len() {
        let entry = archive
            .by_index(index)
            .map_err(|e| PlrError::format(zip_path, e))?;
        let relative = match (entry.enclosed_name(), safe_entry_path(entry.name())) {
            (Some(_), Some(relative)) => relative,
            _ => {
                warn!(archive = %zip_path.display(), entry = entry.name(), "rejecting unsafe entry");
                return Err(PlrError::Security {
                    entry: entry.name().to_string(),
                });
            }
        };
        total = total.saturating_add(entry.size());
        if total > limits.max_total_bytes {
            return Err(PlrError::Limit(format!(
                "uncompressed size exceeds {} bytes",
                limits.max_total_bytes
            )));
        }
        let is_dir = entry.is_dir();
        if !is_dir && !limits.allow_overwrite {
            let destination = target_dir.join(&relative);
            if destination.exists() {
                return Err(PlrError::Collision(destination));
            }
        }
        plan.push(PlannedEntry {
            index,
            relative,
            is_dir,
        });
    }

    fs::create_dir_all(target_dir).map_err(|e| PlrError::access(target_dir, e))?;
    let mut summary = ExtractSummary::default();
    for planned in plan {
        let out_path = target_dir.join(&planned.relative);
        if planned.is_dir {
            fs::create_dir_all(&out_path).map_err(|e| PlrError::access(&out_path, e))?;
            summary.directories += 1;
            continue;
        }
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).map_err(|e| PlrError::access(parent, e))?;
        }
        let mut entry = archive
            .by_index(planned.index)
            .map_err(|e| PlrError::format(zip_path, e))?;
        let mut out_file = fs::File::create(&out_path).map_err(|e| PlrError::access(&out_path, e))?;
        std::io::copy(&mut entry, &mut out_file).map_err(|e| PlrError::format(zip_path, e))?;
        summary.files += 1;
    }

    info!(
        archive = %zip_path.display(),
        target = %target_dir.display(),
        files = summary.files,
        "extracted archive"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_paths_stay_relative() {
        assert_eq!(
            safe_entry_path("ebook/chapter1.pdf"),
            Some(PathBuf::from("ebook/chapter1.pdf"))
        );
        assert_eq!(safe_entry_path("./a.txt"), Some(PathBuf::from("a.txt")));
        assert_eq!(safe_entry_path("dir/"), Some(PathBuf::from("dir")));
    }

    #[test]
    fn traversal_and_absolute_names_are_rejected() {
        assert_eq!(safe_entry_path("../../evil.txt"), None);
        assert_eq!(safe_entry_path("a/../../evil.txt"), None);
        assert_eq!(safe_entry_path("/etc/passwd"), None);
        assert_eq!(safe_entry_path("..\\evil.txt"), None);
        assert_eq!(safe_entry_path("\\\\server\\share\\x"), None);
        assert_eq!(safe_entry_path(""), None);
    }
}
