use std::collections::HashMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::config::CourseConfig;

/// Identifier wrapper for courses, matching the per-course record keys in
/// the extension's storage layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CourseId(pub String);

impl CourseId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

/// Persistence seam so the engine can be exercised without a browser
/// storage backend. The engine itself never writes configuration; only
/// the service's explicit save path does.
pub trait CourseConfigStore: Send + Sync {
    fn fetch(&self, course: &CourseId) -> Result<Option<CourseConfig>, StoreError>;
    fn save(&self, course: &CourseId, config: CourseConfig) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("configuration store unavailable: {0}")]
    Unavailable(String),
}

/// In-memory store for tests and embedded hosts.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    entries: Mutex<HashMap<CourseId, CourseConfig>>,
}

impl CourseConfigStore for MemoryConfigStore {
    fn fetch(&self, course: &CourseId) -> Result<Option<CourseConfig>, StoreError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::Unavailable("store mutex poisoned".to_string()))?;
        Ok(entries.get(course).cloned())
    }

    fn save(&self, course: &CourseId, config: CourseConfig) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::Unavailable("store mutex poisoned".to_string()))?;
        entries.insert(course.clone(), config);
        Ok(())
    }
}
