use crate::domain::ports::ConfigStore;
use crate::domain::rates::RateConfig;
use crate::error::{QuoteError, Result};
use async_trait::async_trait;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;

/// Rate configuration kept in a JSON document on disk.
///
/// Every read parses and validates the file, so edits made by another process
/// are picked up by the next quote. Writes go to a temporary file in the same
/// directory and are renamed over the target.
#[derive(Debug, Clone)]
pub struct JsonFileConfigStore {
    path: PathBuf,
}

impl JsonFileConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ConfigStore for JsonFileConfigStore {
    async fn get_config(&self) -> Result<Arc<RateConfig>> {
        let bytes = tokio::fs::read(&self.path).await?;
        let config = RateConfig::from_reader(bytes.as_slice())?;
        Ok(Arc::new(config))
    }

    async fn put_config(&self, config: RateConfig) -> Result<()> {
        config.validate()?;
        let json = serde_json::to_vec_pretty(&config)?;
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || replace_file(&path, &json))
            .await
            .map_err(|e| QuoteError::InternalError(Box::new(e)))?
    }
}

fn replace_file(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(contents)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| QuoteError::IoError(e.error))?;
    Ok(())
}
