use crate::commands::{load_state, persist, CmdMessage, CmdResult};
use crate::document::{self, SaveFormat, MAX_IMPORT_BYTES};
use crate::error::{AtomaError, Result};
use crate::store::StateStore;
use chrono::Utc;
use std::fs;
use std::path::Path;

/// Replace the working document with an imported save file.
///
/// All-or-nothing: the size and container checks run before the file is
/// read, the payload is validated in full before anything is adopted, and
/// the store is only written after validation succeeds — a failed import
/// leaves both the in-memory and the persisted state exactly as they were.
pub fn run<S: StateStore>(store: &mut S, path: &Path) -> Result<CmdResult> {
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let format = SaveFormat::from_filename(&filename)
        .filter(SaveFormat::is_container)
        .ok_or_else(|| {
            AtomaError::Validation(format!(
                "\"{}\" is not an atoma save file (expected .html or .json)",
                filename
            ))
        })?;

    let size = fs::metadata(path).map_err(AtomaError::Io)?.len();
    if size > MAX_IMPORT_BYTES {
        return Err(AtomaError::Validation(format!(
            "\"{}\" is too large ({} bytes; the limit is {} bytes)",
            filename, size, MAX_IMPORT_BYTES
        )));
    }

    let content = fs::read_to_string(path).map_err(AtomaError::Io)?;
    let imported = document::parse_document(&content, format)?;

    let mut result = CmdResult::default();
    let mut doc = load_state(store, &mut result);
    doc.nodes = imported.nodes;
    doc.theme = imported.theme;
    doc.current_indent_level = imported.current_indent_level;
    doc.timestamp = Utc::now();
    persist(store, &doc, &mut result);

    result.add_message(CmdMessage::success(format!(
        "Imported {} nodes from {}",
        doc.nodes.len(),
        filename
    )));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{render_json, SavedDocument};
    use crate::model::{Node, Theme};
    use crate::outline::Outline;
    use crate::store::memory::fixtures::StoreFixture;

    fn write_save(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn json_import_replaces_state() {
        let outline = Outline::from_nodes(vec![Node::new("From file", 0)]);
        let saved = SavedDocument::new(&outline, Theme::Sunset, 1);
        let dir = tempfile::tempdir().unwrap();
        let path = write_save(dir.path(), "save.json", &render_json(&saved).unwrap());

        let mut fixture = StoreFixture::new().with_outline(&[("Old", 0)]);
        run(&mut fixture.store, &path).unwrap();

        let doc = fixture.store.load().unwrap().unwrap();
        assert_eq!(doc.nodes.len(), 1);
        assert_eq!(doc.nodes[0].content, "From file");
        assert_eq!(doc.theme, Theme::Sunset);
        assert_eq!(doc.current_indent_level, 1);
    }

    #[test]
    fn wrong_extension_is_rejected_before_reading() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_save(dir.path(), "save.txt", "whatever");

        let mut fixture = StoreFixture::new().with_outline(&[("Old", 0)]);
        let err = run(&mut fixture.store, &path).unwrap_err();
        assert!(matches!(err, AtomaError::Validation(_)));
    }

    #[test]
    fn markdown_is_not_an_import_container() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_save(dir.path(), "save.md", "- A");

        let mut fixture = StoreFixture::new();
        assert!(run(&mut fixture.store, &path).is_err());
    }

    #[test]
    fn invalid_payload_leaves_state_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_save(dir.path(), "save.json", r#"{"nodes": "not-an-array"}"#);

        let mut fixture = StoreFixture::new().with_outline(&[("Old", 0)]);
        let err = run(&mut fixture.store, &path).unwrap_err();
        assert!(matches!(err, AtomaError::Validation(_)));

        let doc = fixture.store.load().unwrap().unwrap();
        assert_eq!(doc.nodes[0].content, "Old");
    }

    #[test]
    fn oversize_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let big = "x".repeat((MAX_IMPORT_BYTES + 1) as usize);
        let path = write_save(dir.path(), "save.json", &big);

        let mut fixture = StoreFixture::new();
        let err = run(&mut fixture.store, &path).unwrap_err();
        assert!(err.to_string().contains("too large"));
    }
}
