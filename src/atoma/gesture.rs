//! Touch gesture decoding: turns raw touch samples into the canonical
//! events the [`crate::nav`] machine consumes.
//!
//! Two interpretations compete for one touch sequence and are mutually
//! exclusive:
//!
//! - **long press** — held ≥ 500 ms with at most 10 px of movement; selects
//!   the node. Any movement past the slop before the hold threshold cancels
//!   the pending selection.
//! - **swipe** — released within 300 ms after ≥ 50 px of horizontally
//!   dominant movement; reindents the node (right = deeper).
//!
//! The recognizer has no clock. Timestamps ride on the samples and the host
//! polls for the hold threshold, so tests (and non-realtime hosts) drive
//! time explicitly.

use crate::nav::{InputEvent, SwipeDirection};
use uuid::Uuid;

pub const LONG_PRESS_MS: u64 = 500;
pub const TOUCH_SLOP_PX: f32 = 10.0;
pub const SWIPE_MIN_PX: f32 = 50.0;
pub const SWIPE_MAX_MS: u64 = 300;

/// One touch sample: position plus the host's millisecond timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub x: f32,
    pub y: f32,
    pub millis: u64,
}

impl TouchPoint {
    pub fn new(x: f32, y: f32, millis: u64) -> Self {
        Self { x, y, millis }
    }
}

#[derive(Debug, Clone)]
struct Press {
    node: Uuid,
    origin: TouchPoint,
    hold_cancelled: bool,
    hold_fired: bool,
}

/// Decodes one touch sequence at a time. `touch_start` begins a sequence,
/// `touch_move` feeds movement, `poll` lets the hold threshold fire, and
/// `touch_end` resolves the swipe interpretation.
#[derive(Debug, Clone, Default)]
pub struct GestureRecognizer {
    press: Option<Press>,
}

impl GestureRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn touch_start(&mut self, node: Uuid, at: TouchPoint) {
        self.press = Some(Press {
            node,
            origin: at,
            hold_cancelled: false,
            hold_fired: false,
        });
    }

    /// Movement past the slop cancels a pending long press. Swipe detection
    /// is unaffected; it is resolved from the release point.
    pub fn touch_move(&mut self, at: TouchPoint) {
        if let Some(press) = &mut self.press {
            let dx = (at.x - press.origin.x).abs();
            let dy = (at.y - press.origin.y).abs();
            if dx > TOUCH_SLOP_PX || dy > TOUCH_SLOP_PX {
                press.hold_cancelled = true;
            }
        }
    }

    /// Fire the long press once the hold threshold elapses. Returns the
    /// select event at most once per sequence.
    pub fn poll(&mut self, now_millis: u64) -> Option<InputEvent> {
        let press = self.press.as_mut()?;
        if press.hold_fired || press.hold_cancelled {
            return None;
        }
        if now_millis.saturating_sub(press.origin.millis) >= LONG_PRESS_MS {
            press.hold_fired = true;
            return Some(InputEvent::LongPress(press.node));
        }
        None
    }

    pub fn touch_end(&mut self, at: TouchPoint) -> Option<InputEvent> {
        let press = self.press.take()?;
        if press.hold_fired {
            return None;
        }

        let dx = at.x - press.origin.x;
        let dy = at.y - press.origin.y;
        let duration = at.millis.saturating_sub(press.origin.millis);

        if dx.abs() > dy.abs() && dx.abs() >= SWIPE_MIN_PX && duration < SWIPE_MAX_MS {
            let direction = if dx > 0.0 {
                SwipeDirection::Right
            } else {
                SwipeDirection::Left
            };
            return Some(InputEvent::Swipe(press.node, direction));
        }
        None
    }
}
