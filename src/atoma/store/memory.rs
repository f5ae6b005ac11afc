use super::StateStore;
use crate::document::SavedDocument;
use crate::error::Result;

/// In-memory store for tests: same contract as [`super::fs::FileStore`],
/// nothing touches the filesystem.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    doc: Option<SavedDocument>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for InMemoryStore {
    fn load(&self) -> Result<Option<SavedDocument>> {
        Ok(self.doc.clone())
    }

    fn save(&mut self, doc: &SavedDocument) -> Result<()> {
        self.doc = Some(doc.clone());
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.doc = None;
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::error::AtomaError;
    use crate::model::{Node, Theme};
    use crate::outline::Outline;

    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        /// Seed the store with an outline described as (content, level) pairs.
        pub fn with_outline(mut self, entries: &[(&str, usize)]) -> Self {
            let nodes: Vec<Node> = entries
                .iter()
                .map(|(content, level)| Node::new(*content, *level))
                .collect();
            let doc = SavedDocument::new(&Outline::from_nodes(nodes), Theme::default(), 0);
            self.store.save(&doc).unwrap();
            self
        }

        pub fn with_theme(mut self, theme: Theme) -> Self {
            let mut doc = self.store.load().unwrap().unwrap_or_default();
            doc.theme = theme;
            self.store.save(&doc).unwrap();
            self
        }
    }

    /// A store whose backend is gone: every operation fails with a
    /// `Store` error. Exercises the memory-only degradation path.
    #[derive(Debug, Default)]
    pub struct UnavailableStore;

    impl StateStore for UnavailableStore {
        fn load(&self) -> Result<Option<SavedDocument>> {
            Err(AtomaError::Store("No storage backend available".to_string()))
        }

        fn save(&mut self, _doc: &SavedDocument) -> Result<()> {
            Err(AtomaError::Store("No storage backend available".to_string()))
        }

        fn clear(&mut self) -> Result<()> {
            Err(AtomaError::Store("No storage backend available".to_string()))
        }
    }
}
