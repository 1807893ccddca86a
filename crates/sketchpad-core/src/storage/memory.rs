//! In-memory backend for tests and ephemeral canvases.

use std::sync::Mutex;

use crate::error::{Error, Result};
use crate::models::Stroke;

use super::StrokeStorage;

/// Stroke log kept only in process memory.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    strokes: Mutex<Vec<Stroke>>,
    fail_writes: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the backend with an existing log.
    pub fn with_strokes(strokes: Vec<Stroke>) -> Self {
        Self {
            strokes: Mutex::new(strokes),
            fail_writes: false,
        }
    }

    /// Make every subsequent `save` fail, for exercising storage errors.
    #[must_use]
    pub fn rejecting_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }
}

impl StrokeStorage for MemoryStorage {
    fn load(&self) -> Result<Vec<Stroke>> {
        let guard = self
            .strokes
            .lock()
            .map_err(|_| Error::Storage("memory storage lock poisoned".to_string()))?;
        Ok(guard.clone())
    }

    fn save(&self, strokes: &[Stroke]) -> Result<()> {
        if self.fail_writes {
            return Err(Error::Storage("memory storage is read-only".to_string()));
        }
        let mut guard = self
            .strokes
            .lock()
            .map_err(|_| Error::Storage("memory storage lock poisoned".to_string()))?;
        *guard = strokes.to_vec();
        Ok(())
    }
}
