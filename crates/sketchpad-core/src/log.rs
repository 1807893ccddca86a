//! In-memory view of the stroke log backed by a [`StrokeStorage`].
//!
//! Every mutation is persisted first and only then applied in memory, so a
//! failed write leaves both the durable log and readers' view untouched.

use crate::error::Result;
use crate::filter;
use crate::models::Stroke;
use crate::storage::StrokeStorage;

pub struct StrokeLog {
    storage: Box<dyn StrokeStorage>,
    strokes: Vec<Stroke>,
    /// Highest timestamp ever issued, kept across resets.
    high_water: i64,
}

impl StrokeLog {
    /// Open the log, loading whatever the storage already holds.
    pub fn open(storage: Box<dyn StrokeStorage>) -> Result<Self> {
        let strokes = storage.load()?;
        let high_water = strokes
            .iter()
            .map(|stroke| stroke.timestamp)
            .max()
            .unwrap_or(0);
        tracing::debug!(strokes = strokes.len(), high_water, "Loaded stroke log");
        Ok(Self {
            storage,
            strokes,
            high_water,
        })
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Strokes appended after `watermark`, cloned for the response.
    pub fn since(&self, watermark: i64) -> Vec<Stroke> {
        filter::since(watermark, &self.strokes).cloned().collect()
    }

    /// Stamp and append a stroke, persisting the new log.
    ///
    /// Timestamps strictly increase in append order so that a client's
    /// watermark never hides a later stroke.
    pub fn append(&mut self, stroke: Stroke, now_millis: i64) -> Result<Stroke> {
        let timestamp = now_millis.max(self.high_water.saturating_add(1));
        let stroke = stroke.stamped(timestamp);

        let mut next = Vec::with_capacity(self.strokes.len() + 1);
        next.extend_from_slice(&self.strokes);
        next.push(stroke.clone());
        self.storage.save(&next)?;

        self.strokes = next;
        self.high_water = timestamp;
        Ok(stroke)
    }

    /// Truncate the log to empty.
    pub fn clear(&mut self) -> Result<usize> {
        self.storage.save(&[])?;
        let removed = self.strokes.len();
        self.strokes.clear();
        Ok(removed)
    }
}
