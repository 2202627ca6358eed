// Copyright 2025 the Labelcraft Authors
// SPDX-License-Identifier: Apache-2.0

//! Pointer-driven selection, drag, resize and pan.
//!
//! Every gesture starts with a pointer-down, which is checked against the
//! scene in a fixed order:
//!
//! 1. the delete affordance of the selected image
//! 2. a resize handle of the selected image
//! 3. text layers, topmost first
//! 4. image layers, topmost first
//! 5. empty canvas: pan when zoomed in, otherwise deselect
//!
//! All hit testing happens in layer space, the space live layer geometry
//! is stored in. That is the logical canvas in the flat view and the
//! scaled-down canvas in the bottle view.

use super::{CursorHint, PointerEvent, PointerPhase};
use crate::config::ImageConfig;
use crate::geometry::GeometryTransform;
use crate::model::{LayerId, LayerRef, ResizeHandle, ResizeLimits, Scene};
use crate::settings;
use crate::text::TextMeasurer;
use kurbo::{Point, Rect, Vec2};

// ============================================================================
// STATE
// ============================================================================

/// What the pointer is doing right now
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum InteractionState {
    #[default]
    Idle,
    /// Moving a layer; the offset is pointer minus layer origin at grab time
    DraggingLayer { layer: LayerRef, grab_offset: Vec2 },
    /// Dragging a corner of the selected image
    ResizingImage {
        id: LayerId,
        handle: ResizeHandle,
        start_rect: Rect,
        start_pointer: Point,
    },
    /// Panning the zoomed canvas; tracks the last viewport position
    PanningCanvas { last_client: Point },
}

/// What a single event did, for the host to act on
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InteractionOutcome {
    /// The scene or view changed and should be redrawn
    pub redraw: bool,
    pub selection_changed: bool,
    /// A layer removed through its delete affordance
    pub removed: Option<LayerRef>,
    /// A layer whose drag or resize just finished
    pub committed: Option<LayerRef>,
    pub cursor: CursorHint,
}

impl InteractionOutcome {
    fn cursor(cursor: CursorHint) -> Self {
        Self {
            cursor,
            ..Self::default()
        }
    }

    fn redraw(cursor: CursorHint) -> Self {
        Self {
            redraw: true,
            cursor,
            ..Self::default()
        }
    }
}

// ============================================================================
// CONTROLLER
// ============================================================================

/// The pointer state machine for one editor
#[derive(Debug, Clone)]
pub struct InteractionController {
    state: InteractionState,
    images: ImageConfig,
}

impl InteractionController {
    pub fn new(images: ImageConfig) -> Self {
        Self {
            state: InteractionState::Idle,
            images,
        }
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == InteractionState::Idle
    }

    /// Drop any gesture in progress without committing it.
    pub fn cancel(&mut self) {
        if !self.is_idle() {
            tracing::debug!("[InteractionController::cancel] dropping {:?}", self.state);
        }
        self.state = InteractionState::Idle;
    }

    /// Feed one pointer event through the state machine.
    pub fn handle(
        &mut self,
        event: &PointerEvent,
        scene: &mut Scene,
        transform: &GeometryTransform,
        measurer: &dyn TextMeasurer,
    ) -> InteractionOutcome {
        let point = transform.to_layer_space(event.position);
        match event.phase {
            PointerPhase::Down => self.pointer_down(event, point, scene, measurer),
            PointerPhase::Move => self.pointer_move(event, point, scene, transform, measurer),
            PointerPhase::Up | PointerPhase::Leave => {
                self.pointer_up(event, point, scene, measurer)
            }
        }
    }

    // ========================================================================
    // POINTER DOWN
    // ========================================================================

    fn pointer_down(
        &mut self,
        event: &PointerEvent,
        point: Point,
        scene: &mut Scene,
        measurer: &dyn TextMeasurer,
    ) -> InteractionOutcome {
        tracing::debug!(
            "[InteractionController::pointer_down] client={:?} layer_space=({:.1}, {:.1})",
            event.position,
            point.x,
            point.y
        );

        // Stray down without an up; start over
        self.state = InteractionState::Idle;

        if let Some(outcome) = self.handle_delete_affordance(point, scene) {
            return outcome;
        }

        if let Some(outcome) = self.handle_resize_handle(point, scene) {
            return outcome;
        }

        if let Some(id) = scene.texts.layer_at_point(point, measurer) {
            let anchor = scene.texts.get(id).map(|l| l.anchor()).unwrap_or(point);
            return self.begin_drag(LayerRef::Text(id), point - anchor, scene);
        }

        if let Some(id) = scene.images.layer_at_point(point) {
            let origin = scene.images.get(id).map(|l| l.bounds().origin()).unwrap_or(point);
            return self.begin_drag(LayerRef::Image(id), point - origin, scene);
        }

        if scene.view.is_zoomed_in() {
            tracing::debug!("[InteractionController::pointer_down] start pan");
            self.state = InteractionState::PanningCanvas {
                last_client: event.position,
            };
            return InteractionOutcome::cursor(CursorHint::Grabbing);
        }

        let had_selection = !scene.selection.is_empty();
        scene.selection.clear();
        InteractionOutcome {
            redraw: had_selection,
            selection_changed: had_selection,
            ..InteractionOutcome::default()
        }
    }

    fn handle_delete_affordance(&mut self, point: Point, scene: &mut Scene) -> Option<InteractionOutcome> {
        let id = scene.selection.image()?;
        if !scene.images.get(id)?.hit_test_delete_icon(point) {
            return None;
        }

        tracing::debug!("[InteractionController] delete affordance on {:?}", id);
        // The id was just looked up, so removal cannot miss
        scene.remove_image(id).ok()?;
        Some(InteractionOutcome {
            redraw: true,
            selection_changed: true,
            removed: Some(LayerRef::Image(id)),
            committed: None,
            cursor: CursorHint::Default,
        })
    }

    fn handle_resize_handle(&mut self, point: Point, scene: &Scene) -> Option<InteractionOutcome> {
        let id = scene.selection.image()?;
        let layer = scene.images.get(id)?;
        let handle = layer.hit_test_handle(point, settings::image::HANDLE_TOLERANCE)?;

        tracing::debug!(
            "[InteractionController] resize {:?} from {:?} at {:?}",
            id,
            handle,
            layer.bounds()
        );
        self.state = InteractionState::ResizingImage {
            id,
            handle,
            start_rect: layer.bounds(),
            start_pointer: point,
        };
        Some(InteractionOutcome::cursor(CursorHint::Resize(handle)))
    }

    fn begin_drag(&mut self, layer: LayerRef, grab_offset: Vec2, scene: &mut Scene) -> InteractionOutcome {
        let changed = !scene.selection.contains(layer);
        scene.selection.select(layer);
        self.state = InteractionState::DraggingLayer { layer, grab_offset };
        tracing::debug!(
            "[InteractionController] drag {:?}, grab offset ({:.1}, {:.1})",
            layer,
            grab_offset.x,
            grab_offset.y
        );
        InteractionOutcome {
            redraw: true,
            selection_changed: changed,
            ..InteractionOutcome::cursor(CursorHint::Grabbing)
        }
    }

    // ========================================================================
    // POINTER MOVE
    // ========================================================================

    fn pointer_move(
        &mut self,
        event: &PointerEvent,
        point: Point,
        scene: &mut Scene,
        transform: &GeometryTransform,
        measurer: &dyn TextMeasurer,
    ) -> InteractionOutcome {
        let bounds = scene.display_size();
        match self.state {
            InteractionState::Idle => InteractionOutcome::cursor(hover_cursor(point, scene, measurer)),
            InteractionState::DraggingLayer { layer, grab_offset } => {
                let target = point - grab_offset;
                let moved = match layer {
                    LayerRef::Text(id) => {
                        let margin = settings::text::EDGE_MARGIN * scene.view.layer_scale();
                        scene.texts.move_to(id, target, bounds, margin, measurer)
                    }
                    LayerRef::Image(id) => scene.images.move_to(id, target, bounds),
                };
                match moved {
                    Ok(_) => InteractionOutcome::redraw(CursorHint::Grabbing),
                    Err(err) => self.abandon(err),
                }
            }
            InteractionState::ResizingImage {
                id,
                handle,
                start_rect,
                start_pointer,
            } => {
                let limits = ResizeLimits {
                    min_size: self.images.min_size * scene.view.layer_scale(),
                    bounds,
                };
                let keep_aspect = !event.modifiers.shift;
                let delta = point - start_pointer;
                match scene.images.resize(id, start_rect, handle, delta, keep_aspect, limits) {
                    Ok(_) => InteractionOutcome::redraw(CursorHint::Resize(handle)),
                    Err(err) => self.abandon(err),
                }
            }
            InteractionState::PanningCanvas { last_client } => {
                let delta = transform.client_delta_to_display(event.position - last_client);
                self.state = InteractionState::PanningCanvas {
                    last_client: event.position,
                };
                scene.view.pan_by(delta, bounds);
                InteractionOutcome::redraw(CursorHint::Grabbing)
            }
        }
    }

    /// The layer under a gesture went away; return to idle.
    fn abandon(&mut self, err: crate::error::EditorError) -> InteractionOutcome {
        tracing::debug!("[InteractionController] abandoning {:?}: {}", self.state, err);
        self.state = InteractionState::Idle;
        InteractionOutcome::redraw(CursorHint::Default)
    }

    // ========================================================================
    // POINTER UP / LEAVE
    // ========================================================================

    fn pointer_up(
        &mut self,
        event: &PointerEvent,
        point: Point,
        scene: &Scene,
        measurer: &dyn TextMeasurer,
    ) -> InteractionOutcome {
        let committed = match std::mem::take(&mut self.state) {
            InteractionState::DraggingLayer { layer, .. } => Some(layer),
            InteractionState::ResizingImage { id, .. } => Some(LayerRef::Image(id)),
            InteractionState::PanningCanvas { .. } | InteractionState::Idle => None,
        };
        if let Some(layer) = committed {
            tracing::debug!(
                "[InteractionController::pointer_up] commit {:?} on {:?}",
                layer,
                event.phase
            );
        }

        let cursor = if event.phase == PointerPhase::Leave {
            CursorHint::Default
        } else {
            hover_cursor(point, scene, measurer)
        };
        InteractionOutcome {
            redraw: committed.is_some(),
            committed,
            cursor,
            ..InteractionOutcome::default()
        }
    }
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(ImageConfig::default())
    }
}

/// Cursor for a pointer hovering with no gesture in progress
fn hover_cursor(point: Point, scene: &Scene, measurer: &dyn TextMeasurer) -> CursorHint {
    if let Some(layer) = scene.selection.image().and_then(|id| scene.images.get(id)) {
        if layer.hit_test_delete_icon(point) {
            return CursorHint::Pointer;
        }
        if let Some(handle) = layer.hit_test_handle(point, settings::image::HANDLE_TOLERANCE) {
            return CursorHint::Resize(handle);
        }
    }
    let over_layer = scene.texts.layer_at_point(point, measurer).is_some()
        || scene.images.layer_at_point(point).is_some();
    if over_layer || scene.view.is_zoomed_in() {
        CursorHint::Grab
    } else {
        CursorHint::Default
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ZoomConfig;
    use crate::editing::Modifiers;
    use crate::geometry::SurfaceLayout;
    use crate::model::asset::solid_asset;
    use crate::model::{SourceId, TextLayer};
    use crate::text::FontBook;
    use kurbo::Size;

    const CANVAS: Size = Size::new(400.0, 600.0);

    struct Harness {
        scene: Scene,
        controller: InteractionController,
        fonts: FontBook,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                scene: Scene::new(CANVAS),
                controller: InteractionController::default(),
                fonts: FontBook::new(),
            }
        }

        fn add_image(&mut self, rect: Rect) -> LayerId {
            self.scene.images.add(solid_asset(2, 2, [0, 0, 0, 255]), Some(SourceId(1)), rect)
        }

        fn add_text(&mut self, text: &str, x: f64, y: f64) -> LayerId {
            let mut layer = TextLayer::new(x, y);
            layer.text = text.into();
            self.scene.texts.add(layer, CANVAS, &self.fonts)
        }

        fn send(&mut self, phase: PointerPhase, x: f64, y: f64, modifiers: Modifiers) -> InteractionOutcome {
            let layout = SurfaceLayout::for_display(Point::ZERO, self.scene.display_size(), 1.0);
            let transform = GeometryTransform::new(layout, &self.scene.view, self.scene.canvas_size());
            let event = PointerEvent::mouse(phase, (x, y), modifiers);
            self.controller.handle(&event, &mut self.scene, &transform, &self.fonts)
        }

        fn down(&mut self, x: f64, y: f64) -> InteractionOutcome {
            self.send(PointerPhase::Down, x, y, Modifiers::NONE)
        }

        fn drag_to(&mut self, x: f64, y: f64) -> InteractionOutcome {
            self.send(PointerPhase::Move, x, y, Modifiers::NONE)
        }

        fn up(&mut self, x: f64, y: f64) -> InteractionOutcome {
            self.send(PointerPhase::Up, x, y, Modifiers::NONE)
        }

        fn image_rect(&self, id: LayerId) -> Rect {
            self.scene.images.get(id).unwrap().bounds()
        }
    }

    #[test]
    fn click_selects_and_drags_image() {
        let mut h = Harness::new();
        let id = h.add_image(Rect::new(100.0, 100.0, 250.0, 250.0));

        let down = h.down(120.0, 130.0);
        assert!(down.selection_changed);
        assert_eq!(h.scene.selection.image(), Some(id));
        assert!(matches!(h.controller.state(), InteractionState::DraggingLayer { .. }));

        h.drag_to(220.0, 330.0);
        assert_eq!(h.image_rect(id).origin(), Point::new(200.0, 300.0));

        let up = h.up(220.0, 330.0);
        assert_eq!(up.committed, Some(LayerRef::Image(id)));
        assert!(h.controller.is_idle());
    }

    #[test]
    fn image_drag_stays_on_canvas() {
        let mut h = Harness::new();
        let id = h.add_image(Rect::new(100.0, 100.0, 250.0, 250.0));
        h.down(110.0, 110.0);
        h.drag_to(400.0, 600.0);
        assert_eq!(h.image_rect(id), Rect::new(250.0, 450.0, 400.0, 600.0));
    }

    #[test]
    fn corner_resize_keeps_aspect_and_anchor() {
        let mut h = Harness::new();
        let id = h.add_image(Rect::new(100.0, 100.0, 250.0, 250.0));
        h.down(150.0, 150.0);
        h.up(150.0, 150.0);

        let down = h.down(250.0, 250.0);
        assert_eq!(down.cursor, CursorHint::Resize(ResizeHandle::BottomRight));
        h.drag_to(300.0, 300.0);
        assert_eq!(h.image_rect(id), Rect::new(100.0, 100.0, 300.0, 300.0));
        assert_eq!(h.up(300.0, 300.0).committed, Some(LayerRef::Image(id)));
    }

    #[test]
    fn shift_releases_aspect_lock() {
        let mut h = Harness::new();
        let id = h.add_image(Rect::new(100.0, 100.0, 250.0, 250.0));
        h.down(150.0, 150.0);
        h.up(150.0, 150.0);

        h.down(250.0, 250.0);
        h.send(PointerPhase::Move, 300.0, 260.0, Modifiers::SHIFT);
        assert_eq!(h.image_rect(id), Rect::new(100.0, 100.0, 300.0, 260.0));
    }

    #[test]
    fn handles_only_work_on_selected_image() {
        let mut h = Harness::new();
        let id = h.add_image(Rect::new(100.0, 100.0, 250.0, 250.0));
        h.down(250.0, 250.0);
        // First click on the corner selects and drags rather than resizing
        assert!(matches!(h.controller.state(), InteractionState::DraggingLayer { .. }));
        assert_eq!(h.scene.selection.image(), Some(id));
    }

    #[test]
    fn delete_affordance_removes_selected_image() {
        let mut h = Harness::new();
        let id = h.add_image(Rect::new(100.0, 100.0, 250.0, 250.0));
        h.down(150.0, 150.0);
        h.up(150.0, 150.0);

        let out = h.down(232.0, 118.0);
        assert_eq!(out.removed, Some(LayerRef::Image(id)));
        assert!(h.scene.images.is_empty());
        assert!(h.scene.selection.is_empty());
        assert!(h.controller.is_idle());
    }

    #[test]
    fn text_above_image_wins() {
        let mut h = Harness::new();
        let image = h.add_image(Rect::new(100.0, 100.0, 250.0, 250.0));
        let text = h.add_text("HELLO", 175.0, 175.0);
        h.down(175.0, 175.0);
        assert_eq!(h.scene.selection.text(), Some(text));
        assert_ne!(h.scene.selection.image(), Some(image));
    }

    #[test]
    fn text_drag_follows_pointer_minus_grab_offset() {
        let mut h = Harness::new();
        let text = h.add_text("HELLO", 200.0, 300.0);
        h.down(210.0, 305.0);
        h.drag_to(110.0, 405.0);
        let layer = h.scene.texts.get(text).unwrap();
        assert_eq!(layer.anchor(), Point::new(100.0, 400.0));
        assert_eq!(h.up(110.0, 405.0).committed, Some(LayerRef::Text(text)));
    }

    #[test]
    fn empty_click_deselects() {
        let mut h = Harness::new();
        let id = h.add_image(Rect::new(100.0, 100.0, 250.0, 250.0));
        h.scene.select(LayerRef::Image(id)).unwrap();
        let out = h.down(20.0, 580.0);
        assert!(out.selection_changed);
        assert!(h.scene.selection.is_empty());
        assert!(h.controller.is_idle());
    }

    #[test]
    fn empty_click_when_zoomed_pans() {
        let mut h = Harness::new();
        h.scene.view.zoom_to_level(2.0, None, CANVAS, &ZoomConfig::default());
        h.down(20.0, 20.0);
        assert!(matches!(h.controller.state(), InteractionState::PanningCanvas { .. }));
        h.drag_to(50.0, 40.0);
        h.drag_to(60.0, 40.0);
        assert_eq!(h.scene.view.pan, Vec2::new(40.0, 20.0));
        let up = h.up(60.0, 40.0);
        assert_eq!(up.committed, None);
        assert!(h.controller.is_idle());
    }

    #[test]
    fn leave_commits_like_up() {
        let mut h = Harness::new();
        let id = h.add_image(Rect::new(100.0, 100.0, 250.0, 250.0));
        h.down(120.0, 120.0);
        h.drag_to(130.0, 120.0);
        let out = h.send(PointerPhase::Leave, 130.0, 120.0, Modifiers::NONE);
        assert_eq!(out.committed, Some(LayerRef::Image(id)));
        assert_eq!(out.cursor, CursorHint::Default);
        assert!(h.controller.is_idle());
    }

    #[test]
    fn hover_reports_cursor() {
        let mut h = Harness::new();
        let id = h.add_image(Rect::new(100.0, 100.0, 250.0, 250.0));
        assert_eq!(h.drag_to(150.0, 150.0).cursor, CursorHint::Grab);
        assert_eq!(h.drag_to(20.0, 20.0).cursor, CursorHint::Default);

        h.scene.select(LayerRef::Image(id)).unwrap();
        assert_eq!(
            h.drag_to(101.0, 249.0).cursor,
            CursorHint::Resize(ResizeHandle::BottomLeft)
        );
        assert_eq!(h.drag_to(232.0, 118.0).cursor, CursorHint::Pointer);
    }

    #[test]
    fn bottle_view_hits_in_layer_space() {
        let mut h = Harness::new();
        let id = h.add_image(Rect::new(100.0, 100.0, 250.0, 250.0));
        h.scene.view.bottle_scale = Some(0.5);
        h.scene.scale_layers(0.5);

        // Display is 200x300; the image now spans 50..125
        h.down(60.0, 60.0);
        assert_eq!(h.scene.selection.image(), Some(id));
        h.drag_to(70.0, 80.0);
        assert_eq!(h.image_rect(id).origin(), Point::new(60.0, 70.0));
    }

    #[test]
    fn removed_layer_mid_drag_returns_to_idle() {
        let mut h = Harness::new();
        let id = h.add_image(Rect::new(100.0, 100.0, 250.0, 250.0));
        h.down(120.0, 120.0);
        h.scene.remove_image(id).unwrap();
        h.drag_to(130.0, 130.0);
        assert!(h.controller.is_idle());
    }
}
