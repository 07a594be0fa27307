use crate::domain::CoverRef;
use crate::ports::{CoverStore, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

/// In-memory implementation of CoverStore
///
/// Keeps the saved bytes so tests can assert what was stored.
#[derive(Default)]
pub struct InMemoryCoverStore {
    covers: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryCoverStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes stored under a reference, if any
    pub fn get(&self, cover: &CoverRef) -> Option<Vec<u8>> {
        self.covers.lock().ok()?.get(cover.as_str()).cloned()
    }

    pub fn len(&self) -> usize {
        self.covers.lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CoverStore for InMemoryCoverStore {
    async fn save(&self, bytes: Vec<u8>, extension: &str) -> Result<CoverRef> {
        let reference = format!("memory://covers/{}.{}", Uuid::new_v4(), extension);
        self.covers
            .lock()
            .map_err(|e| format!("cover store poisoned: {e}"))?
            .insert(reference.clone(), bytes);
        Ok(CoverRef::new(reference))
    }

    async fn remove(&self, cover: &CoverRef) -> Result<()> {
        self.covers
            .lock()
            .map_err(|e| format!("cover store poisoned: {e}"))?
            .remove(cover.as_str());
        Ok(())
    }
}
