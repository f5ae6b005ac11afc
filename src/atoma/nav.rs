//! # Navigation State Machine
//!
//! Tracks which node the user is acting on and translates canonical input
//! events into outline operations. The interaction state is one tagged
//! union, [`Mode`] — active-vs-selected-vs-note-editing-vs-modal are
//! mutually exclusive by construction, so "navigating while a dialog is
//! open" is unrepresentable rather than guarded case by case.
//!
//! The machine owns no outline data and performs no I/O. `handle` borrows
//! the outline to resolve positions and returns at most one [`NavEffect`];
//! the caller applies the effect to the model, then calls [`Navigator::
//! reconcile`] so references to removed nodes are dropped. Every transition
//! is synchronous — one event in, one state out, nothing queued.
//!
//! Two gates sit outside the union:
//!
//! - `prompt_focused`: while the text prompt has focus, key events do not
//!   reach the machine at all (pointer and gesture events still do).
//! - Modal and note-editing modes swallow key events; they are driven by
//!   their own event kinds (`Confirm`/`Cancel`, `NoteDraft`/`CloseNote`).

use crate::outline::Outline;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Left,
    Right,
}

/// Canonical key set. Adapters map their native key events (terminal keys,
/// browser codes) onto these; vim keys are handled here, not in adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Escape,
    Backspace,
    Delete,
    Char(char),
}

/// Exclusive overlays that suspend navigation entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    ClearConfirm,
    LinkConfirm(Uuid),
    About,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Idle,
    /// Keyboard-driven: one node is active and follows arrow movement.
    Navigating(Uuid),
    /// Pointer-driven: one node is selected, surfacing its action menu.
    Selected(Uuid),
    /// The note overlay holds a draft; nothing is written to the node until
    /// the overlay is closed.
    NoteEditing { node: Uuid, draft: String },
    Modal(Modal),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key(Key),
    Tap(Uuid),
    LongPress(Uuid),
    Swipe(Uuid, SwipeDirection),
    PromptFocus(bool),
    /// Replace the note overlay's draft text.
    NoteDraft(String),
    /// Close the note overlay, committing the draft.
    CloseNote,
    /// Confirm the open modal.
    Confirm,
    /// Dismiss the open modal.
    Cancel,
}

/// What the caller must do to the model (or the prompt) after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEffect {
    Reindent { node: Uuid, delta: i32 },
    ToggleTask(Uuid),
    Delete(Uuid),
    SetNote { node: Uuid, text: String },
    PerformLink(Uuid),
    ClearAll,
    FocusPrompt,
}

#[derive(Debug, Clone)]
pub struct Navigator {
    mode: Mode,
    prompt_focused: bool,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    /// A fresh session starts with the prompt focused, as the app does.
    pub fn new() -> Self {
        Self {
            mode: Mode::Idle,
            prompt_focused: true,
        }
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn prompt_focused(&self) -> bool {
        self.prompt_focused
    }

    /// The node new lines should be inserted under: the active or selected
    /// node, if any.
    pub fn context_node(&self) -> Option<Uuid> {
        match &self.mode {
            Mode::Navigating(id) | Mode::Selected(id) => Some(*id),
            _ => None,
        }
    }

    pub fn active_node(&self) -> Option<Uuid> {
        match &self.mode {
            Mode::Navigating(id) => Some(*id),
            _ => None,
        }
    }

    pub fn selected_node(&self) -> Option<Uuid> {
        match &self.mode {
            Mode::Selected(id) => Some(*id),
            _ => None,
        }
    }

    pub fn handle(&mut self, event: InputEvent, outline: &Outline) -> Option<NavEffect> {
        match event {
            InputEvent::PromptFocus(focused) => {
                self.prompt_focused = focused;
                None
            }
            InputEvent::Tap(node) | InputEvent::LongPress(node) => self.toggle_select(node),
            InputEvent::Swipe(node, direction) => {
                if self.overlay_open() {
                    return None;
                }
                let delta = match direction {
                    SwipeDirection::Right => 1,
                    SwipeDirection::Left => -1,
                };
                Some(NavEffect::Reindent { node, delta })
            }
            InputEvent::NoteDraft(text) => {
                if let Mode::NoteEditing { draft, .. } = &mut self.mode {
                    *draft = text;
                }
                None
            }
            InputEvent::CloseNote => match std::mem::replace(&mut self.mode, Mode::Idle) {
                Mode::NoteEditing { node, draft } => Some(NavEffect::SetNote { node, text: draft }),
                other => {
                    self.mode = other;
                    None
                }
            },
            InputEvent::Confirm => match std::mem::replace(&mut self.mode, Mode::Idle) {
                Mode::Modal(Modal::ClearConfirm) => Some(NavEffect::ClearAll),
                Mode::Modal(Modal::LinkConfirm(node)) => Some(NavEffect::PerformLink(node)),
                Mode::Modal(Modal::About) => None,
                other => {
                    // Not a modal: put the state back, nothing to confirm.
                    self.mode = other;
                    None
                }
            },
            InputEvent::Cancel => {
                if matches!(self.mode, Mode::Modal(_)) {
                    self.mode = Mode::Idle;
                }
                None
            }
            InputEvent::Key(key) => self.handle_key(key, outline),
        }
    }

    /// Open the note overlay for a node (the pointer menu's "focus" action).
    pub fn open_note(&mut self, node: Uuid, outline: &Outline) {
        if self.overlay_open() {
            return;
        }
        if let Some(n) = outline.get(node) {
            self.mode = Mode::NoteEditing {
                node,
                draft: n.note.clone(),
            };
        }
    }

    /// Open the link confirmation for a node (the pointer menu's "link").
    pub fn request_link(&mut self, node: Uuid) {
        if !self.overlay_open() {
            self.mode = Mode::Modal(Modal::LinkConfirm(node));
        }
    }

    pub fn request_clear(&mut self) {
        if !self.overlay_open() {
            self.mode = Mode::Modal(Modal::ClearConfirm);
        }
    }

    pub fn open_about(&mut self) {
        if !self.overlay_open() {
            self.mode = Mode::Modal(Modal::About);
        }
    }

    pub fn clear_selection(&mut self) {
        if matches!(self.mode, Mode::Selected(_)) {
            self.mode = Mode::Idle;
        }
    }

    /// Drop references to nodes that no longer exist. Call after applying
    /// any operation that was not routed through `handle` (menu actions,
    /// CLI commands, imports).
    pub fn reconcile(&mut self, outline: &Outline) {
        let referenced = match &self.mode {
            Mode::Navigating(id) | Mode::Selected(id) => Some(*id),
            Mode::NoteEditing { node, .. } => Some(*node),
            Mode::Modal(Modal::LinkConfirm(node)) => Some(*node),
            _ => None,
        };
        if let Some(id) = referenced {
            if outline.position(id).is_none() {
                self.mode = Mode::Idle;
            }
        }
    }

    fn overlay_open(&self) -> bool {
        matches!(self.mode, Mode::Modal(_) | Mode::NoteEditing { .. })
    }

    fn toggle_select(&mut self, node: Uuid) -> Option<NavEffect> {
        if self.overlay_open() {
            return None;
        }
        self.mode = match &self.mode {
            Mode::Selected(current) if *current == node => Mode::Idle,
            _ => Mode::Selected(node),
        };
        None
    }

    fn handle_key(&mut self, key: Key, outline: &Outline) -> Option<NavEffect> {
        // The global key handler is gated while the prompt has focus or an
        // overlay is open; overlays are driven by their own events.
        if self.prompt_focused || self.overlay_open() {
            return None;
        }

        match self.mode.clone() {
            Mode::Idle => {
                if is_directional(key) && !outline.is_empty() {
                    self.mode = Mode::Navigating(outline.nodes()[0].id);
                }
                None
            }
            Mode::Navigating(active) => self.handle_nav_key(key, active, outline),
            Mode::Selected(selected) => match key {
                // A directional key converts selection into navigation and
                // applies the movement in the same keystroke.
                _ if is_directional(key) => {
                    self.mode = Mode::Navigating(selected);
                    self.handle_nav_key(key, selected, outline)
                }
                Key::Enter => {
                    self.mode = Mode::Navigating(selected);
                    None
                }
                Key::Escape => {
                    self.mode = Mode::Idle;
                    Some(NavEffect::FocusPrompt)
                }
                _ => self.handle_action_key(key, selected, outline),
            },
            Mode::NoteEditing { .. } | Mode::Modal(_) => None,
        }
    }

    fn handle_nav_key(&mut self, key: Key, active: Uuid, outline: &Outline) -> Option<NavEffect> {
        let index = outline.position(active)?;

        match key {
            Key::Up | Key::Char('k') => {
                if index > 0 {
                    self.mode = Mode::Navigating(outline.nodes()[index - 1].id);
                }
                None
            }
            Key::Down | Key::Char('j') => {
                if index + 1 < outline.len() {
                    self.mode = Mode::Navigating(outline.nodes()[index + 1].id);
                }
                None
            }
            Key::Left | Key::Char('h') => Some(NavEffect::Reindent {
                node: active,
                delta: -1,
            }),
            Key::Right | Key::Char('l') => Some(NavEffect::Reindent {
                node: active,
                delta: 1,
            }),
            Key::Enter => {
                self.mode = Mode::Selected(active);
                None
            }
            Key::Escape => {
                self.mode = Mode::Idle;
                Some(NavEffect::FocusPrompt)
            }
            _ => self.handle_action_key(key, active, outline),
        }
    }

    /// Keys that act on a target node regardless of whether it was reached
    /// by keyboard or pointer.
    fn handle_action_key(&mut self, key: Key, target: Uuid, outline: &Outline) -> Option<NavEffect> {
        match key {
            Key::Char('t') => Some(NavEffect::ToggleTask(target)),
            Key::Char('f') => {
                if let Some(node) = outline.get(target) {
                    self.mode = Mode::NoteEditing {
                        node: target,
                        draft: node.note.clone(),
                    };
                }
                None
            }
            Key::Char('x') => {
                self.mode = Mode::Modal(Modal::LinkConfirm(target));
                None
            }
            Key::Delete | Key::Backspace | Key::Char('d') => {
                let index = outline.position(target)?;
                // Retarget before the delete lands: the next node at this
                // index, the previous one at the end, Idle when the outline
                // empties.
                self.mode = if outline.len() > 1 {
                    let next = if index + 1 < outline.len() {
                        outline.nodes()[index + 1].id
                    } else {
                        outline.nodes()[index - 1].id
                    };
                    Mode::Navigating(next)
                } else {
                    Mode::Idle
                };
                Some(NavEffect::Delete(target))
            }
            _ => None,
        }
    }
}

fn is_directional(key: Key) -> bool {
    matches!(
        key,
        Key::Up | Key::Down | Key::Char('k') | Key::Char('j')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Node;

    fn outline(entries: &[(&str, usize)]) -> Outline {
        Outline::from_nodes(
            entries
                .iter()
                .map(|(content, level)| Node::new(*content, *level))
                .collect(),
        )
    }

    fn unfocused() -> Navigator {
        let mut nav = Navigator::new();
        nav.handle(InputEvent::PromptFocus(false), &Outline::new());
        nav
    }

    fn id_at(o: &Outline, i: usize) -> Uuid {
        o.nodes()[i].id
    }

    #[test]
    fn directional_key_enters_navigation_at_first_node() {
        let o = outline(&[("A", 0), ("B", 0)]);
        let mut nav = unfocused();

        let effect = nav.handle(InputEvent::Key(Key::Down), &o);
        assert_eq!(effect, None);
        assert_eq!(nav.mode(), &Mode::Navigating(id_at(&o, 0)));
    }

    #[test]
    fn directional_key_on_empty_outline_is_a_noop() {
        let o = Outline::new();
        let mut nav = unfocused();
        nav.handle(InputEvent::Key(Key::Down), &o);
        assert_eq!(nav.mode(), &Mode::Idle);
    }

    #[test]
    fn keys_are_gated_while_prompt_focused() {
        let o = outline(&[("A", 0)]);
        let mut nav = Navigator::new();
        assert!(nav.prompt_focused());

        nav.handle(InputEvent::Key(Key::Down), &o);
        assert_eq!(nav.mode(), &Mode::Idle);
    }

    #[test]
    fn movement_clamps_at_both_ends() {
        let o = outline(&[("A", 0), ("B", 0)]);
        let mut nav = unfocused();
        nav.handle(InputEvent::Key(Key::Down), &o);

        nav.handle(InputEvent::Key(Key::Char('k')), &o);
        assert_eq!(nav.mode(), &Mode::Navigating(id_at(&o, 0)));

        nav.handle(InputEvent::Key(Key::Char('j')), &o);
        nav.handle(InputEvent::Key(Key::Char('j')), &o);
        assert_eq!(nav.mode(), &Mode::Navigating(id_at(&o, 1)));
    }

    #[test]
    fn horizontal_keys_emit_reindent() {
        let o = outline(&[("A", 0)]);
        let mut nav = unfocused();
        nav.handle(InputEvent::Key(Key::Up), &o);

        assert_eq!(
            nav.handle(InputEvent::Key(Key::Left), &o),
            Some(NavEffect::Reindent {
                node: id_at(&o, 0),
                delta: -1
            })
        );
        assert_eq!(
            nav.handle(InputEvent::Key(Key::Char('l')), &o),
            Some(NavEffect::Reindent {
                node: id_at(&o, 0),
                delta: 1
            })
        );
    }

    #[test]
    fn enter_selects_and_escape_returns_to_prompt() {
        let o = outline(&[("A", 0)]);
        let mut nav = unfocused();
        nav.handle(InputEvent::Key(Key::Down), &o);

        nav.handle(InputEvent::Key(Key::Enter), &o);
        assert_eq!(nav.mode(), &Mode::Selected(id_at(&o, 0)));

        let effect = nav.handle(InputEvent::Key(Key::Escape), &o);
        assert_eq!(effect, Some(NavEffect::FocusPrompt));
        assert_eq!(nav.mode(), &Mode::Idle);
    }

    #[test]
    fn task_key_emits_toggle() {
        let o = outline(&[("A", 0)]);
        let mut nav = unfocused();
        nav.handle(InputEvent::Key(Key::Down), &o);

        assert_eq!(
            nav.handle(InputEvent::Key(Key::Char('t')), &o),
            Some(NavEffect::ToggleTask(id_at(&o, 0)))
        );
    }

    #[test]
    fn note_key_captures_draft_and_close_commits() {
        let o = {
            let mut nodes = vec![Node::new("A", 0)];
            nodes[0].note = "existing".to_string();
            Outline::from_nodes(nodes)
        };
        let mut nav = unfocused();
        nav.handle(InputEvent::Key(Key::Down), &o);
        nav.handle(InputEvent::Key(Key::Char('f')), &o);

        assert!(matches!(nav.mode(), Mode::NoteEditing { draft, .. } if draft == "existing"));

        // Keys are swallowed while the overlay is open.
        assert_eq!(nav.handle(InputEvent::Key(Key::Char('t')), &o), None);
        assert!(matches!(nav.mode(), Mode::NoteEditing { .. }));

        nav.handle(InputEvent::NoteDraft("rewritten".to_string()), &o);
        let effect = nav.handle(InputEvent::CloseNote, &o);
        assert_eq!(
            effect,
            Some(NavEffect::SetNote {
                node: id_at(&o, 0),
                text: "rewritten".to_string()
            })
        );
        assert_eq!(nav.mode(), &Mode::Idle);
    }

    #[test]
    fn link_key_opens_confirm_and_confirm_performs() {
        let o = outline(&[("A", 0)]);
        let mut nav = unfocused();
        nav.handle(InputEvent::Key(Key::Down), &o);
        nav.handle(InputEvent::Key(Key::Char('x')), &o);
        assert_eq!(nav.mode(), &Mode::Modal(Modal::LinkConfirm(id_at(&o, 0))));

        // Navigation keys are inert while the modal is up.
        assert_eq!(nav.handle(InputEvent::Key(Key::Down), &o), None);

        let effect = nav.handle(InputEvent::Confirm, &o);
        assert_eq!(effect, Some(NavEffect::PerformLink(id_at(&o, 0))));
        assert_eq!(nav.mode(), &Mode::Idle);
    }

    #[test]
    fn cancel_dismisses_modal_without_effect() {
        let o = outline(&[("A", 0)]);
        let mut nav = unfocused();
        nav.request_clear();
        assert_eq!(nav.handle(InputEvent::Cancel, &o), None);
        assert_eq!(nav.mode(), &Mode::Idle);
    }

    #[test]
    fn confirm_on_clear_modal_emits_clear_all() {
        let o = outline(&[("A", 0)]);
        let mut nav = unfocused();
        nav.request_clear();
        assert_eq!(nav.handle(InputEvent::Confirm, &o), Some(NavEffect::ClearAll));
    }

    #[test]
    fn delete_retargets_to_same_index() {
        let o = outline(&[("A", 0), ("B", 0), ("C", 0)]);
        let mut nav = unfocused();
        nav.handle(InputEvent::Key(Key::Down), &o);
        nav.handle(InputEvent::Key(Key::Char('j')), &o); // active: B

        let effect = nav.handle(InputEvent::Key(Key::Char('d')), &o);
        assert_eq!(effect, Some(NavEffect::Delete(id_at(&o, 1))));
        // C slides into B's index once the delete lands.
        assert_eq!(nav.mode(), &Mode::Navigating(id_at(&o, 2)));
    }

    #[test]
    fn delete_at_end_retargets_to_previous() {
        let o = outline(&[("A", 0), ("B", 0)]);
        let mut nav = unfocused();
        nav.handle(InputEvent::Key(Key::Down), &o);
        nav.handle(InputEvent::Key(Key::Char('j')), &o); // active: B (last)

        nav.handle(InputEvent::Key(Key::Delete), &o);
        assert_eq!(nav.mode(), &Mode::Navigating(id_at(&o, 0)));
    }

    #[test]
    fn deleting_the_last_remaining_node_returns_to_idle() {
        let o = outline(&[("A", 0)]);
        let mut nav = unfocused();
        nav.handle(InputEvent::Key(Key::Down), &o);

        let effect = nav.handle(InputEvent::Key(Key::Backspace), &o);
        assert_eq!(effect, Some(NavEffect::Delete(id_at(&o, 0))));
        assert_eq!(nav.mode(), &Mode::Idle);
    }

    #[test]
    fn tap_toggles_selection() {
        let o = outline(&[("A", 0), ("B", 0)]);
        let mut nav = Navigator::new();

        nav.handle(InputEvent::Tap(id_at(&o, 0)), &o);
        assert_eq!(nav.mode(), &Mode::Selected(id_at(&o, 0)));

        // Tapping another node moves the selection.
        nav.handle(InputEvent::Tap(id_at(&o, 1)), &o);
        assert_eq!(nav.mode(), &Mode::Selected(id_at(&o, 1)));

        // Tapping the selected node deselects.
        nav.handle(InputEvent::Tap(id_at(&o, 1)), &o);
        assert_eq!(nav.mode(), &Mode::Idle);
    }

    #[test]
    fn swipe_reindents_without_changing_mode() {
        let o = outline(&[("A", 0)]);
        let mut nav = Navigator::new();

        let effect = nav.handle(InputEvent::Swipe(id_at(&o, 0), SwipeDirection::Right), &o);
        assert_eq!(
            effect,
            Some(NavEffect::Reindent {
                node: id_at(&o, 0),
                delta: 1
            })
        );
        assert_eq!(nav.mode(), &Mode::Idle);
    }

    #[test]
    fn context_node_follows_active_and_selected() {
        let o = outline(&[("A", 0)]);
        let mut nav = unfocused();
        assert_eq!(nav.context_node(), None);

        nav.handle(InputEvent::Key(Key::Down), &o);
        assert_eq!(nav.context_node(), Some(id_at(&o, 0)));

        nav.handle(InputEvent::Key(Key::Enter), &o);
        assert_eq!(nav.context_node(), Some(id_at(&o, 0)));
    }

    #[test]
    fn reconcile_drops_dangling_references() {
        let o = outline(&[("A", 0), ("B", 0)]);
        let mut nav = unfocused();
        nav.handle(InputEvent::Key(Key::Down), &o);

        let shrunk = o.delete(id_at(&o, 0)).unwrap();
        nav.reconcile(&shrunk);
        assert_eq!(nav.mode(), &Mode::Idle);
    }

    #[test]
    fn selected_mode_accepts_action_keys() {
        let o = outline(&[("A", 0), ("B", 0)]);
        let mut nav = Navigator::new();
        nav.handle(InputEvent::Tap(id_at(&o, 1)), &o);
        nav.handle(InputEvent::PromptFocus(false), &o);

        assert_eq!(
            nav.handle(InputEvent::Key(Key::Char('t')), &o),
            Some(NavEffect::ToggleTask(id_at(&o, 1)))
        );
    }

    #[test]
    fn directional_key_converts_selection_into_navigation() {
        let o = outline(&[("A", 0), ("B", 0)]);
        let mut nav = Navigator::new();
        nav.handle(InputEvent::Tap(id_at(&o, 0)), &o);
        nav.handle(InputEvent::PromptFocus(false), &o);

        nav.handle(InputEvent::Key(Key::Down), &o);
        assert_eq!(nav.mode(), &Mode::Navigating(id_at(&o, 1)));
    }
}
