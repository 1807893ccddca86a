//! Data models for Sketchpad

mod session;
mod stroke;

pub use session::SessionId;
pub use stroke::Stroke;
