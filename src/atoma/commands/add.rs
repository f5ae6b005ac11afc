use crate::commands::{load_state, persist, CmdMessage, CmdResult};
use crate::error::Result;
use crate::index::{self, NodeSelector};
use crate::store::StateStore;
use chrono::Utc;

/// Commit one line as a new node.
///
/// With a context selector the node becomes that node's last child; without
/// one it is appended at `level` (or the document's current indent level, so
/// consecutive adds chain as siblings). Either way the current indent level
/// is updated to the new node's level afterwards.
pub fn run<S: StateStore>(
    store: &mut S,
    content: &str,
    context: Option<&NodeSelector>,
    level: Option<usize>,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let doc = load_state(store, &mut result);
    let outline = doc.outline();

    let context_id = match context {
        Some(selector) => Some(index::resolve(&outline, selector)?),
        None => None,
    };
    commit(store, doc, result, content, context_id, level)
}

/// Same operation with the context already resolved to an id (the
/// interactive session inserts under the navigator's context node).
pub fn run_with_context_id<S: StateStore>(
    store: &mut S,
    content: &str,
    context: Option<uuid::Uuid>,
    level: Option<usize>,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let doc = load_state(store, &mut result);
    commit(store, doc, result, content, context, level)
}

fn commit<S: StateStore>(
    store: &mut S,
    mut doc: crate::document::SavedDocument,
    mut result: CmdResult,
    content: &str,
    context_id: Option<uuid::Uuid>,
    level: Option<usize>,
) -> Result<CmdResult> {
    let outline = doc.outline();
    let fallback_level = level.unwrap_or(doc.current_indent_level);

    let (outline, id) = outline.insert_as_child(context_id, content, fallback_level)?;
    let position = outline
        .position(id)
        .ok_or(crate::error::AtomaError::NodeNotFound(id))?;
    let node = outline.nodes()[position].clone();

    doc.nodes = outline.into_nodes();
    doc.current_indent_level = node.level;
    doc.timestamp = Utc::now();
    persist(store, &doc, &mut result);

    result.add_message(CmdMessage::success(format!(
        "Added \"{}\" at position {}, level {}",
        node.content,
        position + 1,
        node.level
    )));
    Ok(result.with_affected_nodes(vec![node]))
}
