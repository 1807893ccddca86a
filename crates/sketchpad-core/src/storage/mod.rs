//! Durable stroke log storage.
//!
//! Backends only load and overwrite the full ordered sequence; ordering and
//! timestamping belong to [`crate::log::StrokeLog`].

mod file;
mod memory;

pub use file::JsonFileStorage;
pub use memory::MemoryStorage;

use crate::error::Result;
use crate::models::Stroke;

/// Backing store for the stroke log.
///
/// # Invariants
///
/// - `load` treats a missing or empty resource as an empty log, never an error
/// - `save` replaces the whole log atomically; on failure the previous
///   contents stay readable
pub trait StrokeStorage: Send + Sync {
    /// Read the whole log in append order.
    fn load(&self) -> Result<Vec<Stroke>>;

    /// Atomically overwrite the log.
    fn save(&self, strokes: &[Stroke]) -> Result<()>;
}
