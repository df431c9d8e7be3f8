use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::PathBuf;
use tracing::warn;

/// Holds the single bearer token of the console session.
pub trait TokenStore {
    fn get(&self) -> Option<String>;
    fn set(&self, token: &str) -> Result<(), StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    #[serde(default)]
    access_token: Option<String>,
}

/// Token persisted as `{"access_token": "..."}`. Without a path (no home
/// directory) reads yield nothing and writes are ignored.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: Option<PathBuf>,
}

impl FileTokenStore {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    fn read(&self) -> Result<Option<SessionFile>, StoreError> {
        let Some(path) = &self.path else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        let data = std::fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&data)?))
    }

    fn write(&self, session: &SessionFile) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp_path = path.with_extension("tmp");
        let mut file = std::fs::File::create(&tmp_path)?;
        file.write_all(serde_json::to_string_pretty(session)?.as_bytes())?;
        file.flush()?;
        std::fs::rename(tmp_path, path)?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Option<String> {
        match self.read() {
            Ok(session) => session.and_then(|s| s.access_token),
            Err(err) => {
                warn!("unreadable session file: {}", err);
                None
            }
        }
    }

    fn set(&self, token: &str) -> Result<(), StoreError> {
        self.write(&SessionFile {
            access_token: Some(token.to_string()),
        })
    }

    fn clear(&self) -> Result<(), StoreError> {
        match &self.path {
            Some(path) if path.exists() => Ok(std::fs::remove_file(path)?),
            _ => Ok(()),
        }
    }
}
