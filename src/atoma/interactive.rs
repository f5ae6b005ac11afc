//! The interactive session: a terminal adapter over the navigation state
//! machine. Keys are decoded into canonical [`InputEvent`]s, effects are
//! applied through the API, and the screen is rebuilt after every event —
//! the same loop the model expects from any frontend.
//!
//! The prompt line is the app's single text input. While it has focus,
//! printable keys edit it, Tab/Shift-Tab adjust the current indent level and
//! Enter commits the line as a node; Escape hands control to navigation.

use atoma::api::AtomaApi;
use atoma::document::SavedDocument;
use atoma::error::{AtomaError, Result};
use atoma::model::{Node, Theme};
use atoma::nav::{InputEvent, Key as NavKey, Modal, Mode, NavEffect, Navigator};
use atoma::outline::Outline;
use atoma::store::StateStore;
use console::{Key, Style, Term};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use uuid::Uuid;

static ACCENTS: Lazy<HashMap<Theme, Style>> = Lazy::new(|| {
    let mut map = HashMap::new();
    map.insert(Theme::Matcha, Style::new().green());
    map.insert(Theme::Latte, Style::new().color256(179));
    map.insert(Theme::Ocean, Style::new().blue());
    map.insert(Theme::Sunset, Style::new().red());
    map.insert(Theme::Midnight, Style::new().color256(105));
    map.insert(Theme::Plum, Style::new().magenta());
    map.insert(Theme::Chess, Style::new().white());
    map.insert(Theme::Espresso, Style::new().color256(130));
    map
});

fn accent(theme: Theme) -> Style {
    ACCENTS.get(&theme).cloned().unwrap_or_default()
}

pub fn run<S: StateStore>(api: &mut AtomaApi<S>) -> Result<()> {
    let term = Term::stdout();
    if !term.is_term() {
        return Err(AtomaError::Api(
            "Interactive mode needs a terminal; use the subcommands instead".to_string(),
        ));
    }

    let mut session = Session::new(load_doc(api).current_indent_level);
    loop {
        let doc = load_doc(api);
        let outline = doc.outline();
        session.render(&term, &doc, &outline)?;

        let key = term.read_key().map_err(AtomaError::Io)?;
        if session.step(api, key, &outline)? == Step::Quit {
            break;
        }
    }
    term.clear_screen().map_err(AtomaError::Io)?;
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum Step {
    Continue,
    Quit,
}

struct Session {
    nav: Navigator,
    prompt: String,
    indent: usize,
    status: Option<(bool, String)>, // (is_error, text)
}

impl Session {
    fn new(indent: usize) -> Self {
        Self {
            nav: Navigator::new(),
            prompt: String::new(),
            indent,
            status: None,
        }
    }

    fn step<S: StateStore>(
        &mut self,
        api: &mut AtomaApi<S>,
        key: Key,
        outline: &Outline,
    ) -> Result<Step> {
        self.status = None;

        if self.nav.prompt_focused() {
            match key {
                Key::Escape => {
                    self.nav.handle(InputEvent::PromptFocus(false), outline);
                }
                Key::Enter => self.commit_line(api, outline),
                Key::Backspace => {
                    self.prompt.pop();
                }
                Key::Tab => self.indent += 1,
                Key::BackTab => self.indent = self.indent.saturating_sub(1),
                Key::Char(c) => self.prompt.push(c),
                _ => {}
            }
            return Ok(Step::Continue);
        }

        match self.nav.mode().clone() {
            Mode::NoteEditing { draft, .. } => {
                match key {
                    // Closing the overlay commits the draft; there is no
                    // separate cancel, matching the model's contract.
                    Key::Enter | Key::Escape => {
                        let effect = self.nav.handle(InputEvent::CloseNote, outline);
                        self.apply(api, effect, outline);
                    }
                    Key::Backspace => {
                        let mut draft = draft;
                        draft.pop();
                        self.nav.handle(InputEvent::NoteDraft(draft), outline);
                    }
                    Key::Char(c) => {
                        let mut draft = draft;
                        draft.push(c);
                        self.nav.handle(InputEvent::NoteDraft(draft), outline);
                    }
                    _ => {}
                }
            }
            Mode::Modal(_) => match key {
                Key::Char('y') | Key::Enter => {
                    let effect = self.nav.handle(InputEvent::Confirm, outline);
                    self.apply(api, effect, outline);
                }
                Key::Char('n') | Key::Escape => {
                    self.nav.handle(InputEvent::Cancel, outline);
                }
                _ => {}
            },
            _ => match key {
                Key::Char('q') => return Ok(Step::Quit),
                Key::Char('?') => self.nav.open_about(),
                // Completion is a presentation action, like the checkbox in
                // a pointer UI; non-tasks are refused with a message.
                Key::Char('c') => {
                    if let Some(id) = self.nav.context_node() {
                        self.run_on_node(api, outline, id, |api, sel| api.toggle_completed(sel));
                    }
                }
                _ => {
                    if let Some(nav_key) = map_key(&key) {
                        let effect = self.nav.handle(InputEvent::Key(nav_key), outline);
                        self.apply(api, effect, outline);
                    }
                }
            },
        }
        Ok(Step::Continue)
    }

    fn commit_line<S: StateStore>(&mut self, api: &mut AtomaApi<S>, outline: &Outline) {
        if self.prompt.trim().is_empty() {
            return;
        }
        let context = self.nav.context_node();
        let level = if context.is_none() {
            Some(self.indent)
        } else {
            None
        };

        let content = self.prompt.clone();
        match api.add_under_node(&content, context, level) {
            Ok(result) => {
                self.prompt.clear();
                self.indent = load_doc(api).current_indent_level;
                self.set_status_from(&result);
            }
            Err(e) => self.status = Some((true, e.to_string())),
        }
    }

    fn apply<S: StateStore>(
        &mut self,
        api: &mut AtomaApi<S>,
        effect: Option<NavEffect>,
        outline: &Outline,
    ) {
        let Some(effect) = effect else { return };

        match effect {
            NavEffect::FocusPrompt => {
                self.nav.handle(InputEvent::PromptFocus(true), outline);
            }
            NavEffect::Reindent { node, delta } => {
                if delta > 0 {
                    self.run_on_node(api, outline, node, |api, sel| api.indent(sel));
                } else {
                    self.run_on_node(api, outline, node, |api, sel| api.outdent(sel));
                }
            }
            NavEffect::ToggleTask(node) => {
                self.run_on_node(api, outline, node, |api, sel| api.toggle_task(sel));
            }
            NavEffect::Delete(node) => {
                self.run_on_node(api, outline, node, |api, sel| api.delete(sel));
            }
            NavEffect::SetNote { node, text } => {
                self.run_on_node(api, outline, node, |api, sel| api.note(sel, Some(&text)));
            }
            NavEffect::PerformLink(node) => {
                self.run_on_node(api, outline, node, |api, sel| api.link(sel));
                self.indent = 0;
            }
            NavEffect::ClearAll => {
                match api.clear() {
                    Ok(result) => self.set_status_from(&result),
                    Err(e) => self.status = Some((true, e.to_string())),
                }
                self.indent = 0;
            }
        }

        // The operation may have moved or removed nodes out from under the
        // navigator; re-sync against the stored outline.
        let fresh = load_doc(api).outline();
        self.nav.reconcile(&fresh);
    }

    fn run_on_node<S: StateStore>(
        &mut self,
        api: &mut AtomaApi<S>,
        outline: &Outline,
        node: Uuid,
        op: impl FnOnce(&mut AtomaApi<S>, &str) -> Result<atoma::commands::CmdResult>,
    ) {
        let Some(position) = outline.position(node) else {
            return;
        };
        let selector = (position + 1).to_string();
        match op(api, &selector) {
            Ok(result) => self.set_status_from(&result),
            Err(e) => self.status = Some((true, e.to_string())),
        }
    }

    fn set_status_from(&mut self, result: &atoma::commands::CmdResult) {
        if let Some(message) = result.messages.last() {
            self.status = Some((false, message.content.clone()));
        }
    }

    fn render(&self, term: &Term, doc: &SavedDocument, outline: &Outline) -> Result<()> {
        term.clear_screen().map_err(AtomaError::Io)?;
        let accent = accent(doc.theme);
        let dim = Style::new().dim();
        let mut lines: Vec<String> = Vec::new();

        lines.push(format!(
            "{}  {}",
            accent.clone().bold().apply_to("atoma"),
            dim.apply_to(format!("{} · {} nodes", doc.theme, outline.len()))
        ));
        lines.push(String::new());

        if outline.is_empty() {
            lines.push(
                dim.apply_to("Type a line and press Enter to start.")
                    .to_string(),
            );
        }
        for node in outline.nodes() {
            lines.push(self.render_node(node, &accent, &dim));
            if node.has_note() {
                let indent = "  ".repeat(node.level);
                for line in node.note.trim().lines() {
                    lines.push(format!("  {}  {}", indent, dim.apply_to(format!("> {}", line))));
                }
            }
        }

        lines.push(String::new());
        self.render_footer(&mut lines, outline, &accent, &dim);

        term.write_line(&lines.join("\n")).map_err(AtomaError::Io)?;
        Ok(())
    }

    fn render_node(&self, node: &Node, accent: &Style, dim: &Style) -> String {
        let cursor = if self.nav.active_node() == Some(node.id) {
            accent.clone().bold().apply_to("❯ ").to_string()
        } else if self.nav.selected_node() == Some(node.id) {
            accent.clone().apply_to("● ").to_string()
        } else {
            "  ".to_string()
        };

        let indent = "  ".repeat(node.level);
        let marker = if node.is_task {
            if node.is_completed {
                "[x] "
            } else {
                "[ ] "
            }
        } else {
            ""
        };

        let content = if node.is_completed {
            dim.clone().strikethrough().apply_to(&node.content).to_string()
        } else {
            node.content.clone()
        };

        let link = if node.is_linked {
            format!(" {}", dim.apply_to("↪"))
        } else {
            String::new()
        };

        format!("{}{}- {}{}{}", cursor, indent, marker, content, link)
    }

    fn render_footer(&self, lines: &mut Vec<String>, outline: &Outline, accent: &Style, dim: &Style) {
        match self.nav.mode() {
            Mode::NoteEditing { node, draft } => {
                let content = outline
                    .get(*node)
                    .map(|n| n.content.as_str())
                    .unwrap_or_default();
                lines.push(format!(
                    "{} {}",
                    accent.clone().apply_to(format!("Note for \"{}\":", content)),
                    draft
                ));
                lines.push(dim.apply_to("enter/esc saves the note").to_string());
                return;
            }
            Mode::Modal(Modal::ClearConfirm) => {
                lines.push("Clear every node? [y/n]".to_string());
                return;
            }
            Mode::Modal(Modal::LinkConfirm(node)) => {
                let content = outline
                    .get(*node)
                    .map(|n| n.content.as_str())
                    .unwrap_or_default();
                lines.push(format!(
                    "Branch \"{}\" into a new linked list? The current list is exported first. [y/n]",
                    content
                ));
                return;
            }
            Mode::Modal(Modal::About) => {
                lines.push(format!(
                    "atoma {} — lines become nodes, nodes become lists. [esc]",
                    env!("CARGO_PKG_VERSION")
                ));
                return;
            }
            _ => {}
        }

        if let Some((is_error, text)) = &self.status {
            let style = if *is_error {
                Style::new().red()
            } else {
                dim.clone()
            };
            lines.push(style.apply_to(text).to_string());
        }

        if self.nav.prompt_focused() {
            let level_tag = if self.indent > 0 {
                dim.apply_to(format!("[lvl {}] ", self.indent)).to_string()
            } else {
                String::new()
            };
            lines.push(format!(
                "{}{}{}▏",
                level_tag,
                accent.clone().bold().apply_to("❯ "),
                self.prompt
            ));
            lines.push(
                dim.apply_to("tab indents · enter adds · esc navigates")
                    .to_string(),
            );
        } else {
            lines.push(
                dim.apply_to(
                    "j/k move · h/l indent · enter select · t task · c done · f note · x link · d delete · esc prompt · q quit",
                )
                .to_string(),
            );
        }
    }
}

fn map_key(key: &Key) -> Option<NavKey> {
    match key {
        Key::ArrowUp => Some(NavKey::Up),
        Key::ArrowDown => Some(NavKey::Down),
        Key::ArrowLeft => Some(NavKey::Left),
        Key::ArrowRight => Some(NavKey::Right),
        Key::Enter => Some(NavKey::Enter),
        Key::Escape => Some(NavKey::Escape),
        Key::Backspace => Some(NavKey::Backspace),
        Key::Del => Some(NavKey::Delete),
        Key::Char(c) => Some(NavKey::Char(*c)),
        _ => None,
    }
}

fn load_doc<S: StateStore>(api: &AtomaApi<S>) -> SavedDocument {
    api.store().load().ok().flatten().unwrap_or_default()
}
