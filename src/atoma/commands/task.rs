use crate::commands::{load_state, persist, CmdMessage, CmdResult};
use crate::error::{AtomaError, Result};
use crate::index::{self, NodeSelector};
use crate::store::StateStore;
use chrono::Utc;

/// Flip a node's task flag. Completion resets either way.
pub fn toggle<S: StateStore>(store: &mut S, selector: &NodeSelector) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let mut doc = load_state(store, &mut result);
    let outline = doc.outline();

    let id = index::resolve(&outline, selector)?;
    let outline = outline.toggle_task(id)?;
    let node = outline.get(id).cloned().ok_or(AtomaError::NodeNotFound(id))?;

    doc.nodes = outline.into_nodes();
    doc.timestamp = Utc::now();
    persist(store, &doc, &mut result);

    let verb = if node.is_task {
        "is now a task"
    } else {
        "is no longer a task"
    };
    result.add_message(CmdMessage::success(format!("\"{}\" {}", node.content, verb)));
    Ok(result.with_affected_nodes(vec![node]))
}

/// Flip a task's completion. The model allows the flag on any node; the
/// command is the surface that keeps it meaningful, so non-tasks are
/// refused here.
pub fn complete<S: StateStore>(store: &mut S, selector: &NodeSelector) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let mut doc = load_state(store, &mut result);
    let outline = doc.outline();

    let id = index::resolve(&outline, selector)?;
    let target = outline.get(id).ok_or(AtomaError::NodeNotFound(id))?;
    if !target.is_task {
        return Err(AtomaError::Api(format!(
            "\"{}\" is not a task; mark it with `atoma task` first",
            target.content
        )));
    }

    let outline = outline.toggle_completed(id)?;
    let node = outline.get(id).cloned().ok_or(AtomaError::NodeNotFound(id))?;

    doc.nodes = outline.into_nodes();
    doc.timestamp = Utc::now();
    persist(store, &doc, &mut result);

    let verb = if node.is_completed { "done" } else { "reopened" };
    result.add_message(CmdMessage::success(format!("\"{}\": {}", node.content, verb)));
    Ok(result.with_affected_nodes(vec![node]))
}
