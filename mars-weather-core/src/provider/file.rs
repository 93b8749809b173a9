use std::path::PathBuf;

use async_trait::async_trait;

use crate::FetchError;

use super::ReportProvider;

/// Reads a previously saved report payload from disk.
#[derive(Debug, Clone)]
pub struct FileProvider {
    path: PathBuf,
}

impl FileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ReportProvider for FileProvider {
    async fn fetch_payload(&self) -> Result<Vec<u8>, FetchError> {
        tracing::info!("Reading report from: {}", self.path.display());

        tokio::fs::read(&self.path)
            .await
            .map_err(|source| FetchError::Io { path: self.path.clone(), source })
    }
}
