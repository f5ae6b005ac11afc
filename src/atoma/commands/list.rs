use crate::commands::{load_state, CmdMessage, CmdResult};
use crate::error::Result;
use crate::index;
use crate::store::StateStore;

pub fn run<S: StateStore>(store: &S) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let doc = load_state(store, &mut result);
    let outline = doc.outline();

    if outline.is_empty() {
        result.add_message(CmdMessage::info("No nodes yet. Add one with `atoma add`."));
        return Ok(result);
    }

    result.theme = Some(doc.theme);
    result.saved_at = Some(doc.timestamp);
    Ok(result.with_listed_nodes(index::index_nodes(&outline)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::memory::InMemoryStore;

    #[test]
    fn lists_nodes_in_sequence_order() {
        let fixture = StoreFixture::new().with_outline(&[("A", 0), ("B", 1), ("C", 0)]);
        let result = run(&fixture.store).unwrap();

        let contents: Vec<&str> = result
            .listed_nodes
            .iter()
            .map(|dn| dn.node.content.as_str())
            .collect();
        assert_eq!(contents, vec!["A", "B", "C"]);
        assert_eq!(result.listed_nodes[1].index, 2);
        assert!(result.saved_at.is_some());
    }

    #[test]
    fn empty_store_lists_nothing() {
        let store = InMemoryStore::new();
        let result = run(&store).unwrap();
        assert!(result.listed_nodes.is_empty());
        assert_eq!(result.messages.len(), 1);
    }
}
