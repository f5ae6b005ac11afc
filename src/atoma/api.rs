//! # API Facade
//!
//! The single entry point for every atoma operation, regardless of the UI
//! driving it. The facade parses selectors and dispatches; business logic
//! lives in `commands/*.rs`, persistence behind [`StateStore`]. Nothing in
//! here touches stdout or assumes a terminal.
//!
//! Generic over the store so the whole surface runs against
//! `InMemoryStore` in tests.

use crate::commands;
use crate::document::SaveFormat;
use crate::error::Result;
use crate::index::NodeSelector;
use crate::model::Theme;
use crate::store::StateStore;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub struct AtomaApi<S: StateStore> {
    store: S,
    export_dir: PathBuf,
}

impl<S: StateStore> AtomaApi<S> {
    pub fn new(store: S, export_dir: PathBuf) -> Self {
        Self { store, export_dir }
    }

    pub fn add(
        &mut self,
        content: &str,
        context: Option<&str>,
        level: Option<usize>,
    ) -> Result<commands::CmdResult> {
        let selector = context.map(parse_selector);
        commands::add::run(&mut self.store, content, selector.as_ref(), level)
    }

    /// Insert under a node already resolved to an id — the interactive
    /// session inserts under the navigator's context node directly.
    pub fn add_under_node(
        &mut self,
        content: &str,
        context: Option<Uuid>,
        level: Option<usize>,
    ) -> Result<commands::CmdResult> {
        commands::add::run_with_context_id(&mut self.store, content, context, level)
    }

    pub fn list(&self) -> Result<commands::CmdResult> {
        commands::list::run(&self.store)
    }

    pub fn indent(&mut self, selector: &str) -> Result<commands::CmdResult> {
        commands::reindent::indent(&mut self.store, &parse_selector(selector))
    }

    pub fn outdent(&mut self, selector: &str) -> Result<commands::CmdResult> {
        commands::reindent::outdent(&mut self.store, &parse_selector(selector))
    }

    pub fn delete(&mut self, selector: &str) -> Result<commands::CmdResult> {
        commands::delete::run(&mut self.store, &parse_selector(selector))
    }

    pub fn toggle_task(&mut self, selector: &str) -> Result<commands::CmdResult> {
        commands::task::toggle(&mut self.store, &parse_selector(selector))
    }

    pub fn toggle_completed(&mut self, selector: &str) -> Result<commands::CmdResult> {
        commands::task::complete(&mut self.store, &parse_selector(selector))
    }

    pub fn note(&mut self, selector: &str, text: Option<&str>) -> Result<commands::CmdResult> {
        commands::note::run(&mut self.store, &parse_selector(selector), text)
    }

    pub fn link(&mut self, selector: &str) -> Result<commands::CmdResult> {
        let dir = self.export_dir.clone();
        commands::link::run(&mut self.store, &parse_selector(selector), &dir)
    }

    pub fn export(&self, format: SaveFormat) -> Result<commands::CmdResult> {
        commands::export::run(&self.store, format, &self.export_dir)
    }

    pub fn import(&mut self, path: &Path) -> Result<commands::CmdResult> {
        commands::import::run(&mut self.store, path)
    }

    pub fn clear(&mut self) -> Result<commands::CmdResult> {
        commands::clear::run(&mut self.store)
    }

    pub fn theme(&mut self, theme: Option<Theme>) -> Result<commands::CmdResult> {
        commands::theme::run(&mut self.store, theme)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }
}

fn parse_selector(input: &str) -> NodeSelector {
    match input.parse::<usize>() {
        Ok(n) => NodeSelector::Index(n),
        Err(_) => NodeSelector::Content(input.to_string()),
    }
}

pub use crate::commands::{CmdMessage, CmdResult, MessageLevel};
