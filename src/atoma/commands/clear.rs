use crate::commands::{load_state, CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::StateStore;

/// Drop the whole document and its autosave. Confirmation is the caller's
/// job (the CLI prompts, the interactive session uses the clear modal).
pub fn run<S: StateStore>(store: &mut S) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let doc = load_state(store, &mut result);
    let count = doc.nodes.len();

    if let Err(e) = store.clear() {
        result.add_message(CmdMessage::warning(format!(
            "Storage unavailable ({}); the autosave may remain",
            e
        )));
    }

    if count == 0 {
        result.add_message(CmdMessage::info("The list was already empty."));
    } else {
        result.add_message(CmdMessage::success(format!("Cleared {} nodes.", count)));
    }
    Ok(result)
}
