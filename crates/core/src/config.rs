use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub organize: OrganizeConfig,
    #[serde(default)]
    pub extract: ExtractConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Roots offered when folders are selected without user input.
    #[serde(default)]
    pub include: Vec<String>,
    /// Glob patterns; matching entries are skipped and not descended into.
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Dot-prefixed entries below a root are skipped when false.
    #[serde(default = "default_true")]
    pub include_hidden: bool,
    #[serde(default = "default_true")]
    pub follow_links: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            include: Vec::new(),
            exclude: Vec::new(),
            include_hidden: true,
            follow_links: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_analysis_concurrency")]
    pub concurrency: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            concurrency: default_analysis_concurrency(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizeConfig {
    #[serde(default)]
    pub allow_overwrite: bool,
    #[serde(default)]
    pub copy_then_delete: bool,
    #[serde(default = "default_organize_concurrency")]
    pub concurrency: usize,
    #[serde(default)]
    pub allow_paths: Vec<String>,
    #[serde(default)]
    pub deny_paths: Vec<String>,
}

impl Default for OrganizeConfig {
    fn default() -> Self {
        Self {
            allow_overwrite: false,
            copy_then_delete: false,
            concurrency: default_organize_concurrency(),
            allow_paths: Vec::new(),
            deny_paths: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
    #[serde(default = "default_max_total_bytes")]
    pub max_total_bytes: u64,
    /// Replace files already present in the target directory.
    #[serde(default)]
    pub allow_overwrite: bool,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            max_total_bytes: default_max_total_bytes(),
            allow_overwrite: false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_analysis_concurrency() -> usize {
    4
}

fn default_organize_concurrency() -> usize {
    2
}

fn default_max_entries() -> usize {
    10_000
}

fn default_max_total_bytes() -> u64 {
    4 * 1024 * 1024 * 1024
}

/// Loads config from the given file (or `config/default` if present), then `PLR_*` env overrides.
pub fn load(path: Option<&str>) -> anyhow::Result<AppConfig> {
    let mut settings = config::Config::builder();
    if let Some(p) = path {
        settings = settings.add_source(config::File::with_name(p));
    } else {
        settings = settings.add_source(config::File::with_name("config/default").required(false));
    }
    settings = settings.add_source(
        config::Environment::with_prefix("PLR")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );
    let cfg = settings.build()?;
    Ok(cfg.try_deserialize()?)
}
