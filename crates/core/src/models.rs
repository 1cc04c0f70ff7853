use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Coarse file category. Closed vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Document,
    Archive,
    Spreadsheet,
    Image,
    Video,
    Audio,
    Code,
    Other,
}

impl FileCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileCategory::Document => "document",
            FileCategory::Archive => "archive",
            FileCategory::Spreadsheet => "spreadsheet",
            FileCategory::Image => "image",
            FileCategory::Video => "video",
            FileCategory::Audio => "audio",
            FileCategory::Code => "code",
            FileCategory::Other => "other",
        }
    }
}

/// Usage rights attached to a purchased package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LicenseType {
    #[serde(rename = "PLR")]
    Plr,
    #[serde(rename = "MRR")]
    Mrr,
    #[serde(rename = "RR")]
    Rr,
    #[serde(rename = "Personal-Use")]
    PersonalUse,
    #[serde(rename = "Unrestricted")]
    Unrestricted,
    #[serde(rename = "Unknown")]
    Unknown,
}

impl LicenseType {
    pub fn label(&self) -> &'static str {
        match self {
            LicenseType::Plr => "PLR",
            LicenseType::Mrr => "MRR",
            LicenseType::Rr => "RR",
            LicenseType::PersonalUse => "Personal-Use",
            LicenseType::Unrestricted => "Unrestricted",
            LicenseType::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceBand {
    None,
    Low,
    Medium,
    High,
}

/// One regular file found under a scanned root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub path: String,
    pub name: String,
    pub size: u64,
    pub modified: DateTime<Utc>,
    #[serde(rename = "type")]
    pub file_type: FileCategory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveEntry {
    pub name: String,
    pub path: String,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub path: String,
    pub filename: String,
    pub size: u64,
    pub modified: DateTime<Utc>,
    pub hash: String,
    #[serde(rename = "type")]
    pub file_type: FileCategory,
    pub plr_score: u8,
    pub confidence: ConfidenceBand,
    pub suggested_niche: String,
    pub suggested_license: LicenseType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contents: Option<Vec<ArchiveEntry>>,
    /// Set when the file looked like an archive but could not be read as one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive_error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Move,
    Copy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizeOperation {
    #[serde(rename = "type")]
    pub kind: OperationKind,
    pub source: PathBuf,
    pub target: PathBuf,
}

impl OrganizeOperation {
    pub fn new(kind: OperationKind, source: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            source: source.into(),
            target: target.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizeResult {
    pub success: bool,
    pub source: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OrganizeResult {
    pub fn ok(source: PathBuf, target: PathBuf) -> Self {
        Self {
            success: true,
            source,
            target: Some(target),
            error: None,
        }
    }

    pub fn failed(source: PathBuf, error: impl ToString) -> Self {
        Self {
            success: false,
            source,
            target: None,
            error: Some(error.to_string()),
        }
    }
}

/// Emitted once per finished organize operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrganizeProgress {
    pub completed: usize,
    pub total: usize,
    pub source: PathBuf,
    pub success: bool,
}
