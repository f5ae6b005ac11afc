//! Business logic, one module per operation. Commands operate on a
//! [`StateStore`], apply pure [`crate::outline::Outline`] transformations,
//! mirror the result back into the store, and report through [`CmdResult`] —
//! no stdout, no terminal assumptions.
//!
//! Storage degradation policy (shared by every command via [`load_state`] /
//! [`persist`]): an absent autosave is a first run, a corrupt autosave is a
//! warning plus an empty document, an unavailable backend is a warning plus
//! memory-only operation. None of these abort the command.

use crate::document::SavedDocument;
use crate::error::AtomaError;
use crate::index::DisplayNode;
use crate::model::{Node, Theme};
use crate::store::StateStore;
use chrono::{DateTime, Utc};
use std::path::PathBuf;

pub mod add;
pub mod clear;
pub mod delete;
pub mod export;
pub mod import;
pub mod link;
pub mod list;
pub mod note;
pub mod reindent;
pub mod task;
pub mod theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_nodes: Vec<Node>,
    pub listed_nodes: Vec<DisplayNode>,
    pub written_files: Vec<PathBuf>,
    pub theme: Option<Theme>,
    pub saved_at: Option<DateTime<Utc>>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_nodes(mut self, nodes: Vec<Node>) -> Self {
        self.affected_nodes = nodes;
        self
    }

    pub fn with_listed_nodes(mut self, nodes: Vec<DisplayNode>) -> Self {
        self.listed_nodes = nodes;
        self
    }
}

/// Read the saved document, degrading per the storage policy above.
pub(crate) fn load_state<S: StateStore>(store: &S, result: &mut CmdResult) -> SavedDocument {
    match store.load() {
        Ok(Some(doc)) => doc,
        Ok(None) => SavedDocument::default(),
        Err(AtomaError::Serialization(e)) => {
            result.add_message(CmdMessage::warning(format!(
                "Ignoring corrupt autosave ({}); starting from an empty list",
                e
            )));
            SavedDocument::default()
        }
        Err(e) => {
            result.add_message(CmdMessage::warning(format!(
                "Storage unavailable ({}); working in memory only",
                e
            )));
            SavedDocument::default()
        }
    }
}

/// Mirror the document into the store. An unavailable backend degrades to a
/// warning; the command itself still succeeds.
pub(crate) fn persist<S: StateStore>(store: &mut S, doc: &SavedDocument, result: &mut CmdResult) {
    if let Err(e) = store.save(doc) {
        result.add_message(CmdMessage::warning(format!(
            "Storage unavailable ({}); changes were not saved",
            e
        )));
    }
}
