use crate::commands::{load_state, persist, CmdMessage, CmdResult};
use crate::error::{AtomaError, Result};
use crate::index::{self, NodeSelector};
use crate::store::StateStore;
use chrono::Utc;

pub fn indent<S: StateStore>(store: &mut S, selector: &NodeSelector) -> Result<CmdResult> {
    run(store, selector, 1)
}

pub fn outdent<S: StateStore>(store: &mut S, selector: &NodeSelector) -> Result<CmdResult> {
    run(store, selector, -1)
}

fn run<S: StateStore>(store: &mut S, selector: &NodeSelector, delta: i32) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let mut doc = load_state(store, &mut result);
    let outline = doc.outline();

    let id = index::resolve(&outline, selector)?;
    let outline = outline.reindent(id, delta)?;
    let node = outline.get(id).cloned().ok_or(AtomaError::NodeNotFound(id))?;

    doc.nodes = outline.into_nodes();
    doc.timestamp = Utc::now();
    persist(store, &doc, &mut result);

    result.add_message(CmdMessage::success(format!(
        "\"{}\" is now at level {}",
        node.content, node.level
    )));
    Ok(result.with_affected_nodes(vec![node]))
}
