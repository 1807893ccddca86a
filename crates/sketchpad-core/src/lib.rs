//! sketchpad-core - Core library for Sketchpad
//!
//! This crate holds the synchronization core of the shared canvas: presence
//! tracking, reset broadcasting, incremental stroke filtering and the stroke
//! log. The HTTP surface lives in `sketchpad-api`.

pub mod canvas;
pub mod error;
pub mod filter;
pub mod log;
pub mod metrics;
pub mod models;
pub mod presence;
pub mod reset;
pub mod storage;
pub mod util;

pub use canvas::{Canvas, PollOutcome, DEFAULT_PRESENCE_TIMEOUT};
pub use error::{Error, Result};
pub use metrics::CanvasMetricsSnapshot;
pub use models::{SessionId, Stroke};
