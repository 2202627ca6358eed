// Copyright 2025 the Labelcraft Authors
// SPDX-License-Identifier: Apache-2.0

//! Device-independent pointer events.
//!
//! Mouse and touch input are both normalized into `PointerEvent` before
//! they reach the interaction controller. Positions are viewport pixels,
//! exactly as the host reports them; mapping into the scene happens in the
//! controller through `GeometryTransform`.

use kurbo::Point;

// ===== Pointer Event =====

/// Stage of a pointer gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    /// The pointer left the canvas; treated like `Up`
    Leave,
}

/// Which adapter produced an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerSource {
    Mouse,
    Touch,
}

/// Modifier keys held during the event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Suppresses the aspect lock while resizing an image
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Self = Self { shift: false };
    pub const SHIFT: Self = Self { shift: true };
}

/// A single pointer event in viewport pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub position: Point,
    pub source: PointerSource,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    /// A mouse event
    pub fn mouse(phase: PointerPhase, position: impl Into<Point>, modifiers: Modifiers) -> Self {
        Self {
            phase,
            position: position.into(),
            source: PointerSource::Mouse,
            modifiers,
        }
    }

    /// A touch event. Touches never carry modifiers.
    pub fn touch(phase: PointerPhase, position: impl Into<Point>) -> Self {
        Self {
            phase,
            position: position.into(),
            source: PointerSource::Touch,
            modifiers: Modifiers::NONE,
        }
    }

    /// True for `Up` and `Leave`, which both end a gesture
    pub fn ends_gesture(&self) -> bool {
        matches!(self.phase, PointerPhase::Up | PointerPhase::Leave)
    }
}

// ===== Touch Adapter =====

/// Stage of a touch sequence as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Start,
    Move,
    End,
    Cancel,
}

/// One touch point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub id: u64,
    pub position: Point,
}

/// Turns single-finger touch sequences into pointer events.
///
/// Only the first finger of a gesture is tracked. Touch starts that arrive
/// while more than one finger is down, and moves of any other finger, are
/// dropped.
#[derive(Debug, Clone, Default)]
pub struct TouchAdapter {
    /// Finger currently driving the gesture
    tracking: Option<u64>,
}

impl TouchAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a finger is driving a gesture
    pub fn is_tracking(&self) -> bool {
        self.tracking.is_some()
    }

    /// Translate one touch callback.
    ///
    /// `touches` holds every finger still on the surface and `changed` the
    /// fingers this callback is about, mirroring what browsers report.
    pub fn translate(
        &mut self,
        phase: TouchPhase,
        touches: &[TouchPoint],
        changed: &[TouchPoint],
    ) -> Option<PointerEvent> {
        match phase {
            TouchPhase::Start => {
                if self.tracking.is_some() || touches.len() != 1 {
                    tracing::debug!(
                        "[TouchAdapter::translate] ignoring start with {} touches",
                        touches.len()
                    );
                    return None;
                }
                let touch = touches[0];
                self.tracking = Some(touch.id);
                Some(PointerEvent::touch(PointerPhase::Down, touch.position))
            }
            TouchPhase::Move => {
                let id = self.tracking?;
                let touch = touches.iter().find(|t| t.id == id)?;
                Some(PointerEvent::touch(PointerPhase::Move, touch.position))
            }
            TouchPhase::End => {
                let id = self.tracking?;
                let lifted = changed.iter().find(|t| t.id == id)?;
                self.tracking = None;
                Some(PointerEvent::touch(PointerPhase::Up, lifted.position))
            }
            TouchPhase::Cancel => {
                self.tracking.take()?;
                let position = changed.first().map(|t| t.position).unwrap_or(Point::ZERO);
                Some(PointerEvent::touch(PointerPhase::Leave, position))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(id: u64, x: f64, y: f64) -> TouchPoint {
        TouchPoint {
            id,
            position: Point::new(x, y),
        }
    }

    #[test]
    fn single_finger_maps_to_down_move_up() {
        let mut adapter = TouchAdapter::new();
        let a = touch(7, 10.0, 20.0);
        let down = adapter.translate(TouchPhase::Start, &[a], &[a]).unwrap();
        assert_eq!(down.phase, PointerPhase::Down);
        assert_eq!(down.source, PointerSource::Touch);

        let moved = touch(7, 15.0, 25.0);
        let mv = adapter.translate(TouchPhase::Move, &[moved], &[moved]).unwrap();
        assert_eq!(mv.position, Point::new(15.0, 25.0));

        let up = adapter.translate(TouchPhase::End, &[], &[moved]).unwrap();
        assert_eq!(up.phase, PointerPhase::Up);
        assert!(!adapter.is_tracking());
    }

    #[test]
    fn second_finger_is_ignored() {
        let mut adapter = TouchAdapter::new();
        let a = touch(1, 10.0, 10.0);
        let b = touch(2, 90.0, 90.0);
        adapter.translate(TouchPhase::Start, &[a], &[a]).unwrap();
        assert!(adapter.translate(TouchPhase::Start, &[a, b], &[b]).is_none());

        // Lifting the second finger does not end the gesture
        assert!(adapter.translate(TouchPhase::End, &[a], &[b]).is_none());
        assert!(adapter.is_tracking());

        let mv = adapter
            .translate(TouchPhase::Move, &[touch(1, 12.0, 12.0)], &[])
            .unwrap();
        assert_eq!(mv.position, Point::new(12.0, 12.0));
    }

    #[test]
    fn pinch_start_is_dropped() {
        let mut adapter = TouchAdapter::new();
        let a = touch(1, 10.0, 10.0);
        let b = touch(2, 90.0, 90.0);
        assert!(adapter.translate(TouchPhase::Start, &[a, b], &[a, b]).is_none());
        assert!(adapter.translate(TouchPhase::Move, &[a, b], &[a]).is_none());
    }

    #[test]
    fn cancel_becomes_leave() {
        let mut adapter = TouchAdapter::new();
        let a = touch(3, 5.0, 5.0);
        adapter.translate(TouchPhase::Start, &[a], &[a]).unwrap();
        let leave = adapter.translate(TouchPhase::Cancel, &[], &[a]).unwrap();
        assert_eq!(leave.phase, PointerPhase::Leave);
        assert!(leave.ends_gesture());
        assert!(adapter.translate(TouchPhase::Cancel, &[], &[a]).is_none());
    }
}
