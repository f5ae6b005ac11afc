//! # Document Serialization
//!
//! Three renditions of one outline:
//!
//! - **Markdown** — the flat human-readable form. Hierarchy is conveyed only
//!   by indentation order: `"  " * level + "- " + content`, with note lines
//!   quoted underneath as `"  " * level + "  > " + line`.
//! - **HTML** — the self-contained container: the full [`SavedDocument`]
//!   payload embedded as JSON under a `window.ATOMA_DATA =` marker, plus the
//!   markdown rendition in a `<pre>` so the file reads fine in a browser.
//! - **JSON** — the bare payload, no wrapper.
//!
//! Import is all-or-nothing. [`parse_document`] checks the container shape,
//! extracts the payload, and walks the node list verifying every entry has a
//! string `content` and a non-negative integer `level` before anything is
//! deserialized for real. A payload that fails any step rejects the whole
//! import with a descriptive error; there is no best-effort acceptance.

use crate::error::{AtomaError, Result};
use crate::model::{Node, Theme};
use crate::outline::Outline;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Filename prefix for every exported file.
pub const FILE_PREFIX: &str = "atoma";

/// Marker line the HTML container embeds its payload under.
pub const DATA_MARKER: &str = "window.ATOMA_DATA =";

/// Hard ceiling for imported files.
pub const MAX_IMPORT_BYTES: u64 = 5 * 1024 * 1024;

const SLUG_MAX_LEN: usize = 30;

/// The serialized unit: everything needed to restore a working session.
/// Doubles as the autosave payload and the embedded export payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedDocument {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub current_indent_level: usize,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl SavedDocument {
    pub fn new(outline: &Outline, theme: Theme, current_indent_level: usize) -> Self {
        Self {
            nodes: outline.nodes().to_vec(),
            theme,
            current_indent_level,
            timestamp: Utc::now(),
        }
    }

    pub fn outline(&self) -> Outline {
        Outline::from_nodes(self.nodes.clone())
    }
}

impl Default for SavedDocument {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            theme: Theme::default(),
            current_indent_level: 0,
            timestamp: Utc::now(),
        }
    }
}

/// Export file format, detected from the filename extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveFormat {
    Markdown,
    Html,
    Json,
}

impl SaveFormat {
    pub fn from_filename(filename: &str) -> Option<Self> {
        let lower = filename.to_lowercase();
        if lower.ends_with(".md") || lower.ends_with(".markdown") {
            Some(SaveFormat::Markdown)
        } else if lower.ends_with(".html") || lower.ends_with(".htm") {
            Some(SaveFormat::Html)
        } else if lower.ends_with(".json") {
            Some(SaveFormat::Json)
        } else {
            None
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            SaveFormat::Markdown => "md",
            SaveFormat::Html => "html",
            SaveFormat::Json => "json",
        }
    }

    /// Whether the format embeds the full document payload and can be
    /// imported back. Markdown is a one-way rendition.
    pub fn is_container(&self) -> bool {
        !matches!(self, SaveFormat::Markdown)
    }
}

impl std::fmt::Display for SaveFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

pub fn render_markdown(outline: &Outline) -> String {
    outline
        .nodes()
        .iter()
        .map(|node| {
            let indent = "  ".repeat(node.level);
            let mut block = format!("{}- {}", indent, node.content);
            if node.has_note() {
                for line in node.note.trim().lines() {
                    block.push('\n');
                    block.push_str(&format!("{}  > {}", indent, line));
                }
            }
            block
        })
        .collect::<Vec<String>>()
        .join("\n")
}

pub fn render_html(doc: &SavedDocument) -> Result<String> {
    let payload = serde_json::to_string_pretty(doc)?;
    let markdown = render_markdown(&doc.outline());
    Ok(format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n\
         \x20   <meta charset=\"UTF-8\">\n\
         \x20   <title>Atoma Save</title>\n\
         \x20   <script>\n\
         \x20       {} {};\n\
         \x20   </script>\n\
         </head>\n\
         <body>\n\
         \x20   <h1>Atoma</h1>\n\
         \x20   <p>Saved on: {}</p>\n\
         \x20   <p>To continue editing, import this file back into atoma.</p>\n\
         \x20   <pre>{}</pre>\n\
         </body>\n\
         </html>",
        DATA_MARKER,
        payload,
        doc.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
        escape_html(&markdown),
    ))
}

pub fn render_json(doc: &SavedDocument) -> Result<String> {
    Ok(serde_json::to_string_pretty(doc)?)
}

/// Parse and validate an imported document.
///
/// Markdown is rejected outright — it does not embed the payload. For the
/// container formats the payload is validated field by field before being
/// accepted; on any failure the error describes the first violation and the
/// caller's state is untouched.
pub fn parse_document(content: &str, format: SaveFormat) -> Result<SavedDocument> {
    let payload = match format {
        SaveFormat::Markdown => {
            return Err(AtomaError::Validation(
                "Markdown exports are one-way; import an .html or .json save".to_string(),
            ))
        }
        SaveFormat::Html => extract_html_payload(content)?,
        SaveFormat::Json => content.to_string(),
    };

    let value: serde_json::Value = serde_json::from_str(&payload)
        .map_err(|e| AtomaError::Parse(format!("Invalid save data: {}", e)))?;
    validate_payload(&value)?;

    let mut doc: SavedDocument = serde_json::from_value(value)?;
    dedupe_ids(&mut doc.nodes);
    Ok(doc)
}

fn extract_html_payload(content: &str) -> Result<String> {
    if !content.contains("<!DOCTYPE html>") || !content.contains("<html") {
        return Err(AtomaError::Validation(
            "Not an atoma save file: missing HTML document structure".to_string(),
        ));
    }
    let start = content.find(DATA_MARKER).ok_or_else(|| {
        AtomaError::Validation("Not an atoma save file: embedded save data not found".to_string())
    })?;
    let rest = &content[start + DATA_MARKER.len()..];

    // Read exactly one JSON value from the marker onward; the deserializer
    // stops at the value boundary, so trailing HTML never confuses it.
    let mut stream = serde_json::Deserializer::from_str(rest).into_iter::<serde_json::Value>();
    match stream.next() {
        Some(Ok(value)) => Ok(value.to_string()),
        Some(Err(e)) => Err(AtomaError::Parse(format!("Invalid save data: {}", e))),
        None => Err(AtomaError::Validation(
            "Not an atoma save file: embedded save data is empty".to_string(),
        )),
    }
}

fn validate_payload(value: &serde_json::Value) -> Result<()> {
    let obj = value
        .as_object()
        .ok_or_else(|| AtomaError::Validation("Save data is not an object".to_string()))?;

    let nodes = match obj.get("nodes") {
        None | Some(serde_json::Value::Null) => return Ok(()),
        Some(nodes) => nodes
            .as_array()
            .ok_or_else(|| AtomaError::Validation("'nodes' is not an array".to_string()))?,
    };

    for (i, node) in nodes.iter().enumerate() {
        let obj = node.as_object().ok_or_else(|| {
            AtomaError::Validation(format!("Node {} is not an object", i + 1))
        })?;
        if !obj.get("content").is_some_and(|c| c.is_string()) {
            return Err(AtomaError::Validation(format!(
                "Node {} is missing string 'content'",
                i + 1
            )));
        }
        if !obj.get("level").is_some_and(|l| l.is_u64()) {
            return Err(AtomaError::Validation(format!(
                "Node {} is missing a non-negative integer 'level'",
                i + 1
            )));
        }
    }
    Ok(())
}

// Ids must stay unique within one document. Missing ids were already filled
// in by serde; a hand-edited file can still repeat one, so later duplicates
// get fresh ids.
fn dedupe_ids(nodes: &mut [Node]) {
    let mut seen = HashSet::new();
    for node in nodes {
        if !seen.insert(node.id) {
            node.id = Uuid::new_v4();
            seen.insert(node.id);
        }
    }
}

/// Filename slug: lowercase, ASCII alphanumerics and spaces only, spaces to
/// hyphens, runs collapsed, trimmed, capped at 30 chars.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let filtered: String = lowered
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect();

    let mut slug = String::new();
    for word in filtered.split_whitespace() {
        if !slug.is_empty() {
            slug.push('-');
        }
        slug.push_str(word);
    }
    slug.chars().take(SLUG_MAX_LEN).collect::<String>()
        .trim_matches('-')
        .to_string()
}

/// Short random suffix keeping repeated exports of the same list distinct.
pub fn short_uid() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// `atoma-<slug>-<uid>.<ext>`, with `untitled` when there is no name source.
pub fn export_filename(list_name: Option<&str>, format: SaveFormat) -> String {
    let slug = match list_name.map(slugify) {
        Some(s) if !s.is_empty() => s,
        _ => "untitled".to_string(),
    };
    format!("{}-{}-{}.{}", FILE_PREFIX, slug, short_uid(), format.extension())
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_outline() -> Outline {
        let mut nodes = vec![
            Node::new("Groceries", 0),
            Node::new("Dairy", 1),
            Node::new("Milk", 2),
            Node::new("Call plumber", 0),
        ];
        nodes[2].is_task = true;
        nodes[3].note = "ask about the\nwater heater".to_string();
        Outline::from_nodes(nodes)
    }

    #[test]
    fn markdown_renders_indentation_and_notes() {
        let md = render_markdown(&sample_outline());
        let expected = "- Groceries\n\
                        \x20 - Dairy\n\
                        \x20   - Milk\n\
                        - Call plumber\n\
                        \x20 > ask about the\n\
                        \x20 > water heater";
        assert_eq!(md, expected);
    }

    #[test]
    fn markdown_is_idempotent_for_a_fixed_outline() {
        let outline = sample_outline();
        assert_eq!(render_markdown(&outline), render_markdown(&outline));
    }

    #[test]
    fn html_document_roundtrips() {
        let outline = sample_outline();
        let doc = SavedDocument::new(&outline, Theme::Ocean, 2);
        let html = render_html(&doc).unwrap();

        let parsed = parse_document(&html, SaveFormat::Html).unwrap();
        assert_eq!(parsed.nodes, doc.nodes);
        assert_eq!(parsed.theme, Theme::Ocean);
        assert_eq!(parsed.current_indent_level, 2);
    }

    #[test]
    fn json_document_roundtrips() {
        let outline = sample_outline();
        let doc = SavedDocument::new(&outline, Theme::Midnight, 0);
        let json = render_json(&doc).unwrap();

        let parsed = parse_document(&json, SaveFormat::Json).unwrap();
        assert_eq!(parsed.nodes, doc.nodes);
        assert_eq!(parsed.theme, Theme::Midnight);
    }

    #[test]
    fn html_payload_survives_markdownish_note_content() {
        let mut nodes = vec![Node::new("A", 0)];
        nodes[0].note = "tricky: }; </pre> &".to_string();
        let doc = SavedDocument::new(&Outline::from_nodes(nodes), Theme::default(), 0);
        let html = render_html(&doc).unwrap();

        let parsed = parse_document(&html, SaveFormat::Html).unwrap();
        assert_eq!(parsed.nodes[0].note, "tricky: }; </pre> &");
    }

    #[test]
    fn markdown_import_is_rejected() {
        assert!(matches!(
            parse_document("- A", SaveFormat::Markdown),
            Err(AtomaError::Validation(_))
        ));
    }

    #[test]
    fn import_rejects_non_object_payload() {
        assert!(matches!(
            parse_document("[1, 2, 3]", SaveFormat::Json),
            Err(AtomaError::Validation(_))
        ));
    }

    #[test]
    fn import_rejects_non_array_nodes() {
        let err = parse_document(r#"{"nodes": "not-an-array"}"#, SaveFormat::Json).unwrap_err();
        assert!(matches!(err, AtomaError::Validation(_)));
        assert!(err.to_string().contains("'nodes'"));
    }

    #[test]
    fn import_rejects_node_without_content() {
        let err = parse_document(r#"{"nodes": [{"level": 0}]}"#, SaveFormat::Json).unwrap_err();
        assert!(err.to_string().contains("content"));
    }

    #[test]
    fn import_rejects_fractional_or_negative_level() {
        for payload in [
            r#"{"nodes": [{"content": "A", "level": 1.5}]}"#,
            r#"{"nodes": [{"content": "A", "level": -1}]}"#,
        ] {
            assert!(matches!(
                parse_document(payload, SaveFormat::Json),
                Err(AtomaError::Validation(_))
            ));
        }
    }

    #[test]
    fn import_tolerates_missing_nodes_key() {
        let parsed = parse_document(r#"{"theme": "latte"}"#, SaveFormat::Json).unwrap();
        assert!(parsed.nodes.is_empty());
        assert_eq!(parsed.theme, Theme::Latte);
    }

    #[test]
    fn import_regenerates_duplicate_ids() {
        let payload = r#"{"nodes": [
            {"id": "c5e9e2f4-8e2e-4f6a-9b1a-000000000001", "content": "A", "level": 0},
            {"id": "c5e9e2f4-8e2e-4f6a-9b1a-000000000001", "content": "B", "level": 0}
        ]}"#;
        let parsed = parse_document(payload, SaveFormat::Json).unwrap();
        assert_ne!(parsed.nodes[0].id, parsed.nodes[1].id);
    }

    #[test]
    fn html_import_requires_container_shape() {
        let err = parse_document("just text", SaveFormat::Html).unwrap_err();
        assert!(matches!(err, AtomaError::Validation(_)));

        let no_marker = "<!DOCTYPE html>\n<html><body>hi</body></html>";
        let err = parse_document(no_marker, SaveFormat::Html).unwrap_err();
        assert!(err.to_string().contains("save data"));
    }

    #[test]
    fn slugify_matches_export_rules() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  spaced   out  "), "spaced-out");
        assert_eq!(slugify("Déjà vu!"), "dj-vu");
        assert_eq!(slugify("!!!"), "");
        let long = slugify("a very long list name that goes on and on forever");
        assert!(long.len() <= 30);
        assert!(!long.ends_with('-'));
    }

    #[test]
    fn export_filename_shape() {
        let name = export_filename(Some("Weekend Plans"), SaveFormat::Markdown);
        assert!(name.starts_with("atoma-weekend-plans-"));
        assert!(name.ends_with(".md"));

        let anon = export_filename(None, SaveFormat::Html);
        assert!(anon.starts_with("atoma-untitled-"));
        assert!(anon.ends_with(".html"));
    }

    #[test]
    fn format_detection_from_filename() {
        assert_eq!(SaveFormat::from_filename("a.MD"), Some(SaveFormat::Markdown));
        assert_eq!(SaveFormat::from_filename("a.html"), Some(SaveFormat::Html));
        assert_eq!(SaveFormat::from_filename("a.json"), Some(SaveFormat::Json));
        assert_eq!(SaveFormat::from_filename("a.txt"), None);
    }
}
