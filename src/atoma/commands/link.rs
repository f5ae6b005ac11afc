use crate::commands::{load_state, persist, CmdMessage, CmdResult};
use crate::document::{self, SaveFormat};
use crate::error::{AtomaError, Result};
use crate::index::{self, NodeSelector};
use crate::store::StateStore;
use chrono::Utc;
use std::fs;
use std::path::Path;

/// Split the outline at a node: export the current list (annotated with a
/// pointer to the new one) and continue working in the node's positional
/// subtree as a fresh document.
///
/// Ordering matters and is explicit: the annotated original is written to
/// disk first, and only if that write succeeds does the working state switch
/// to the branch. A failed export leaves the persisted state untouched —
/// nothing is saved until the very end.
///
/// The two documents share no live reference afterwards; the "link" is the
/// pair of filenames each one carries in a note.
pub fn run<S: StateStore>(store: &mut S, selector: &NodeSelector, out_dir: &Path) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let mut doc = load_state(store, &mut result);
    let outline = doc.outline();

    let id = index::resolve(&outline, selector)?;
    let seed_content = outline
        .get(id)
        .map(|n| n.content.clone())
        .ok_or(AtomaError::NodeNotFound(id))?;

    let original_name = outline.first_root().map(|n| n.content.as_str());
    let original_filename = document::export_filename(original_name, SaveFormat::Markdown);
    let branch_filename = document::export_filename(Some(&seed_content), SaveFormat::Markdown);

    // Annotate the original: the seed node points forward at the branch file.
    let annotated = outline.with_updated(id, |node| {
        node.is_linked = true;
        node.note = append_note_line(&node.note, &format!("Linked to: {}", branch_filename));
    })?;

    // Export before switching; this is the step that must not be reordered.
    let original_path = out_dir.join(&original_filename);
    fs::write(&original_path, document::render_markdown(&annotated)).map_err(AtomaError::Io)?;

    // Extract the branch from the annotated outline, so the seed keeps the
    // forward pointer alongside the back-reference it gains here.
    let (branch, seed_id) = annotated.extract_branch(id)?;
    let branch = branch.with_updated(seed_id, |node| {
        node.note = append_note_line(&node.note, &format!("Inherited from: {}", original_filename));
    })?;

    let branch_len = branch.len();
    doc.nodes = branch.into_nodes();
    doc.current_indent_level = 0;
    doc.timestamp = Utc::now();
    persist(store, &doc, &mut result);

    result.add_message(CmdMessage::success(format!(
        "Exported current list to {}",
        original_path.display()
    )));
    result.add_message(CmdMessage::success(format!(
        "Now editing \"{}\" ({} nodes)",
        seed_content, branch_len
    )));
    result.written_files.push(original_path);
    Ok(result)
}

fn append_note_line(existing: &str, line: &str) -> String {
    if existing.trim().is_empty() {
        line.to_string()
    } else {
        format!("{}\n\n{}", existing, line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::StoreFixture;

    #[test]
    fn branch_keeps_subtree_and_rebases_levels() {
        let mut fixture =
            StoreFixture::new().with_outline(&[("Home", 0), ("Garage", 1), ("Shelves", 2), ("Garden", 1)]);
        let dir = tempfile::tempdir().unwrap();

        run(&mut fixture.store, &NodeSelector::Index(2), dir.path()).unwrap();

        let doc = fixture.store.load().unwrap().unwrap();
        assert_eq!(doc.nodes.len(), 2);
        assert_eq!(doc.nodes[0].content, "Garage");
        assert_eq!(doc.nodes[0].level, 0);
        assert_eq!(doc.nodes[1].content, "Shelves");
        assert_eq!(doc.nodes[1].level, 1);
        assert_eq!(doc.current_indent_level, 0);
    }

    #[test]
    fn sibling_at_same_level_stays_in_the_original() {
        // [(A,0),(B,1),(C,1),(D,0)]: branching B takes B alone.
        let mut fixture =
            StoreFixture::new().with_outline(&[("A", 0), ("B", 1), ("C", 1), ("D", 0)]);
        let dir = tempfile::tempdir().unwrap();

        let result = run(&mut fixture.store, &NodeSelector::Index(2), dir.path()).unwrap();

        let doc = fixture.store.load().unwrap().unwrap();
        assert_eq!(doc.nodes.len(), 1);
        assert_eq!(doc.nodes[0].content, "B");

        // C and D went untouched into the exported original.
        let exported = fs::read_to_string(&result.written_files[0]).unwrap();
        assert!(exported.contains("- C"));
        assert!(exported.contains("- D"));
    }

    #[test]
    fn both_documents_carry_cross_references() {
        let mut fixture = StoreFixture::new().with_outline(&[("List", 0), ("Topic", 1)]);
        let dir = tempfile::tempdir().unwrap();

        let result = run(&mut fixture.store, &NodeSelector::Index(2), dir.path()).unwrap();

        // Original: seed annotated with the branch filename and marked linked.
        let exported = fs::read_to_string(&result.written_files[0]).unwrap();
        assert!(exported.contains("> Linked to: atoma-topic-"));

        // Branch: seed points back at the original filename, link flag reset.
        let doc = fixture.store.load().unwrap().unwrap();
        assert!(doc.nodes[0].note.contains("Inherited from: atoma-list-"));
        assert!(doc.nodes[0].note.contains("Linked to: atoma-topic-"));
        assert!(!doc.nodes[0].is_linked);
    }

    #[test]
    fn branch_nodes_get_fresh_ids() {
        let mut fixture = StoreFixture::new().with_outline(&[("A", 0), ("B", 1)]);
        let original = fixture.store.load().unwrap().unwrap();
        let original_ids: Vec<_> = original.nodes.iter().map(|n| n.id).collect();
        let dir = tempfile::tempdir().unwrap();

        run(&mut fixture.store, &NodeSelector::Index(1), dir.path()).unwrap();

        let doc = fixture.store.load().unwrap().unwrap();
        for node in &doc.nodes {
            assert!(!original_ids.contains(&node.id));
        }
    }

    #[test]
    fn failed_export_leaves_state_untouched() {
        let mut fixture = StoreFixture::new().with_outline(&[("A", 0)]);
        let missing_dir = Path::new("/definitely/not/a/real/dir");

        let err = run(&mut fixture.store, &NodeSelector::Index(1), missing_dir).unwrap_err();
        assert!(matches!(err, AtomaError::Io(_)));

        let doc = fixture.store.load().unwrap().unwrap();
        assert_eq!(doc.nodes[0].content, "A");
        assert!(!doc.nodes[0].is_linked);
    }
}
