//! First-visit flag and the onboarding guide

use alert_admin_common::{Message, MessageKey};
use serde_json::{Map, Value};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::collaborators::{InfoBox, Notifier};
use crate::config::EditorConfig;

#[cfg(test)]
use mockall::automock;

/// Value stored under the onboarding key once the guide was shown
pub const VISITED: &str = "X";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Storage file is not a JSON object: {0}")]
    Json(#[from] serde_json::Error),
}

/// Local key-value storage of the browser profile
#[cfg_attr(test, automock)]
pub trait VisitStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Key-value store kept as one JSON object in a file
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Map<String, Value>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };

        if raw.trim().is_empty() {
            return Ok(Map::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }
}

impl VisitStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .load()?
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), Value::String(value.to_string()));
        fs::write(&self.path, serde_json::to_string_pretty(&entries)?)?;
        debug!(path = %self.path.display(), key, "Stored onboarding flag");
        Ok(())
    }
}

/// Show the guide on the first visit and remember that it was shown.
///
/// Returns true when this was the first visit.
pub fn check_first_visit(
    store: &dyn VisitStore,
    notifier: &dyn Notifier,
    config: &EditorConfig,
) -> Result<bool, StoreError> {
    if store.get(&config.onboarding_key)?.as_deref() == Some(VISITED) {
        return Ok(false);
    }

    store.put(&config.onboarding_key, VISITED)?;
    info!("First visit, showing the onboarding guide");

    notifier.inform(InfoBox {
        title: Message::new(MessageKey::GuideTitle),
        message: Message::new(MessageKey::GuideMessage),
        details: config
            .guide_url
            .as_ref()
            .map(|url| Message::with_args(MessageKey::GuideDetails, [url.as_str()])),
    });
    Ok(true)
}
