//! # Storage Layer
//!
//! The working document is mirrored into a durable store after every state
//! change and read back once at startup. The [`StateStore`] trait keeps the
//! rest of the crate ignorant of where that mirror lives:
//!
//! - [`fs::FileStore`]: production storage, `autosave.json` under the app
//!   data directory.
//! - [`memory::InMemoryStore`]: no persistence, for tests.
//!
//! Stores are expected to be absent on first run (load returns `None`) and
//! may hold corrupt content after a crash or a hand edit; distinguishing the
//! two is the command layer's job — a corrupt autosave is reported and
//! ignored, never a hard failure.

use crate::document::SavedDocument;
use crate::error::Result;

pub mod fs;
pub mod memory;

/// Abstract interface for the autosave mirror.
pub trait StateStore {
    /// Read the saved document, or `None` when nothing has been saved yet.
    fn load(&self) -> Result<Option<SavedDocument>>;

    /// Replace the saved document.
    fn save(&mut self, doc: &SavedDocument) -> Result<()>;

    /// Drop the saved document entirely (the "clear all" path).
    fn clear(&mut self) -> Result<()>;
}
