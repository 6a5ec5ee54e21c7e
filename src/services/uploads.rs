use std::path::{Path, PathBuf};

use thiserror::Error;
use uuid::Uuid;

use crate::config::ServerConfig;

pub const ALLOWED_EXTENSIONS: [&str; 2] = [".pdf", ".docx"];

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Please upload a file")]
    Missing,

    #[error("Please upload document file")]
    UnsupportedType,

    #[error("Please upload file less than 2mb")]
    TooLarge,

    #[error("Resume write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Resume files on local disk under the configured upload directory
#[derive(Debug, Clone)]
pub struct ResumeStore {
    dir: PathBuf,
    max_size: usize,
}

impl ResumeStore {
    pub fn new(dir: impl Into<PathBuf>, max_size: usize) -> Self {
        Self {
            dir: dir.into(),
            max_size,
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(&config.file_upload_path, config.max_file_size)
    }

    /// Checks name and size of an uploaded file and returns its lowercased extension.
    pub fn validate(&self, file_name: &str, size: usize) -> Result<&'static str, UploadError> {
        if file_name.trim().is_empty() || size == 0 {
            return Err(UploadError::Missing);
        }

        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e.to_lowercase()))
            .ok_or(UploadError::UnsupportedType)?;
        let ext = ALLOWED_EXTENSIONS
            .iter()
            .copied()
            .find(|allowed| *allowed == ext)
            .ok_or(UploadError::UnsupportedType)?;

        if size > self.max_size {
            return Err(UploadError::TooLarge);
        }
        Ok(ext)
    }

    /// Writes the file and returns the path it was stored at.
    pub async fn save(&self, name: &str, bytes: &[u8]) -> Result<PathBuf, UploadError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(name);
        tokio::fs::write(&path, bytes).await?;
        tracing::debug!("Stored resume {}", path.display());
        Ok(path)
    }

    /// Deletes resume files in the background. Failures are logged, never reported.
    pub fn remove_detached(&self, names: Vec<String>) {
        if names.is_empty() {
            return;
        }
        let dir = self.dir.clone();
        tokio::spawn(async move {
            for name in names {
                let path = dir.join(&name);
                if let Err(e) = tokio::fs::remove_file(&path).await {
                    tracing::warn!("Could not remove resume {}: {}", path.display(), e);
                }
            }
        });
    }
}

/// `<userId>_<userName>_<jobId><ext>`, with the user name reduced to characters
/// that are safe in a file name.
pub fn stored_name(user_id: Uuid, user_name: &str, job_id: Uuid, ext: &str) -> String {
    let safe_name: String = user_name
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    format!("{}_{}_{}{}", user_id, safe_name, job_id, ext)
}
