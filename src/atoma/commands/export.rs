use crate::commands::{load_state, CmdMessage, CmdResult};
use crate::document::{self, SaveFormat};
use crate::error::{AtomaError, Result};
use crate::store::StateStore;
use std::fs;
use std::path::Path;

/// Write the working document to a file in `out_dir`.
///
/// Markdown is the flat human-readable rendition; html and json embed the
/// full payload and can be imported back. The filename is derived from the
/// first level-0 node's content.
pub fn run<S: StateStore>(store: &S, format: SaveFormat, out_dir: &Path) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let doc = load_state(store, &mut result);
    let outline = doc.outline();

    if outline.is_empty() {
        result.add_message(CmdMessage::info("Nothing to export."));
        return Ok(result);
    }

    let content = match format {
        SaveFormat::Markdown => document::render_markdown(&outline),
        SaveFormat::Html => document::render_html(&doc)?,
        SaveFormat::Json => document::render_json(&doc)?,
    };

    let list_name = outline.first_root().map(|n| n.content.as_str());
    let filename = document::export_filename(list_name, format);
    let path = out_dir.join(filename);
    fs::write(&path, content).map_err(AtomaError::Io)?;

    result.add_message(CmdMessage::success(format!(
        "Exported {} nodes to {}",
        outline.len(),
        path.display()
    )));
    result.written_files.push(path);
    Ok(result)
}
