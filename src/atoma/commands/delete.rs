use crate::commands::{load_state, persist, CmdMessage, CmdResult};
use crate::error::{AtomaError, Result};
use crate::index::{self, NodeSelector};
use crate::store::StateStore;
use chrono::Utc;

/// Remove one node. No cascade: positional children stay in place and
/// re-attach to whatever precedes them.
pub fn run<S: StateStore>(store: &mut S, selector: &NodeSelector) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let mut doc = load_state(store, &mut result);
    let outline = doc.outline();

    let id = index::resolve(&outline, selector)?;
    let node = outline.get(id).cloned().ok_or(AtomaError::NodeNotFound(id))?;
    let outline = outline.delete(id)?;

    doc.nodes = outline.into_nodes();
    doc.timestamp = Utc::now();
    persist(store, &doc, &mut result);

    result.add_message(CmdMessage::success(format!("Deleted \"{}\"", node.content)));
    Ok(result.with_affected_nodes(vec![node]))
}
