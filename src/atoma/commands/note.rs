use crate::commands::{load_state, persist, CmdMessage, CmdResult};
use crate::error::{AtomaError, Result};
use crate::index::{self, NodeSelector};
use crate::store::StateStore;
use chrono::Utc;

/// Replace a node's note, or show it when no text is given.
pub fn run<S: StateStore>(
    store: &mut S,
    selector: &NodeSelector,
    text: Option<&str>,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let mut doc = load_state(store, &mut result);
    let outline = doc.outline();

    let id = index::resolve(&outline, selector)?;

    match text {
        None => {
            let node = outline.get(id).cloned().ok_or(AtomaError::NodeNotFound(id))?;
            if node.has_note() {
                result.add_message(CmdMessage::info(node.note.trim().to_string()));
            } else {
                result.add_message(CmdMessage::info(format!(
                    "\"{}\" has no note",
                    node.content
                )));
            }
            Ok(result.with_affected_nodes(vec![node]))
        }
        Some(text) => {
            let outline = outline.set_note(id, text)?;
            let node = outline.get(id).cloned().ok_or(AtomaError::NodeNotFound(id))?;

            doc.nodes = outline.into_nodes();
            doc.timestamp = Utc::now();
            persist(store, &doc, &mut result);

            result.add_message(CmdMessage::success(format!(
                "Note saved on \"{}\"",
                node.content
            )));
            Ok(result.with_affected_nodes(vec![node]))
        }
    }
}
