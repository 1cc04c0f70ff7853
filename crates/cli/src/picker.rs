use async_trait::async_trait;

/// Source of folder selections for `select-folders`. A desktop shell would
/// open a native dialog; headless callers answer from configuration.
#[async_trait]
pub trait FolderPicker: Send + Sync {
    /// `None` means the user canceled.
    async fn pick(&self) -> Option<Vec<String>>;
}

/// Answers with a fixed list; an empty list counts as canceled.
#[derive(Debug, Clone, Default)]
pub struct PresetFolders {
    paths: Vec<String>,
}

impl PresetFolders {
    pub fn new(paths: Vec<String>) -> Self {
        Self { paths }
    }
}

#[async_trait]
impl FolderPicker for PresetFolders {
    async fn pick(&self) -> Option<Vec<String>> {
        if self.paths.is_empty() {
            None
        } else {
            Some(self.paths.clone())
        }
    }
}
