//! Moves the buffers and images of glTF documents in and out of their files.

pub use error::{Error, Result};

pub mod conversion;
mod error;
pub mod format;
