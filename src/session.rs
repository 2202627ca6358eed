// Copyright 2025 the Labelcraft Authors
// SPDX-License-Identifier: Apache-2.0

//! The editor session: one open label editor and everything it owns.
//!
//! Hosts hold an `EditorSession` and talk to it directly; there is no
//! ambient editor instance. Signals for the host (redraws, selection,
//! step requests, user-facing failures) go out through the event bus.
//!
//! Geometry passed in by the host (text patches, image rects) is always
//! in flat design space. While the bottle view is active the session
//! translates it for the live, scaled layers.

use crate::config::EditorConfig;
use crate::editing::{
    InteractionController, InteractionOutcome, KeyCommand, PointerEvent, TouchAdapter,
    TouchPhase, TouchPoint,
};
use crate::error::{EditorError, Result};
use crate::events::{EditorEvent, EventBus};
use crate::export::{ExportPipeline, ExportedImage, Uploader};
use crate::geometry::{GeometryTransform, SurfaceLayout};
use crate::loader::{AssetLoader, LoadCompletion, LoadPurpose, LoadSource};
use crate::model::{ImageAsset, LayerId, LayerRef, Scene, SourceId, TextLayer, TextPatch};
use crate::render::{PixmapSurface, RenderOptions, SceneRenderer};
use crate::settings;
use crate::store::ImageLayerStore;
use crate::text::FontBook;
use crate::view_mode::{LayoutProfile, ViewMode, ViewModeController};
use chrono::Local;
use image::RgbaImage;
use kurbo::{Affine, Point, Rect, Size, Vec2};
use std::sync::Arc;
use std::sync::mpsc::Receiver;

/// One open editor
pub struct EditorSession {
    config: EditorConfig,
    scene: Scene,
    fonts: FontBook,
    controller: InteractionController,
    view_mode: ViewModeController,
    export: ExportPipeline,
    loader: AssetLoader,
    events: EventBus,
    touch: TouchAdapter,
    mockup: Option<Arc<ImageAsset>>,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditorSession {
    pub fn new(config: EditorConfig) -> Self {
        tracing::info!(
            "Opening editor, canvas {}x{}",
            config.canvas.width,
            config.canvas.height
        );
        Self {
            scene: Scene::new(config.canvas.size()),
            fonts: FontBook::new(),
            controller: InteractionController::new(config.images),
            view_mode: ViewModeController::new(&config),
            export: ExportPipeline::new(config.export),
            loader: AssetLoader::new(),
            events: EventBus::new(),
            touch: TouchAdapter::new(),
            mockup: None,
            config,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    /// Register faces here before adding text that uses them.
    pub fn fonts_mut(&mut self) -> &mut FontBook {
        &mut self.fonts
    }

    /// Register an observer for editor signals.
    pub fn subscribe(&mut self) -> Receiver<EditorEvent> {
        self.events.subscribe()
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode.mode()
    }

    /// Ask the host to redraw.
    pub fn redraw(&mut self) {
        self.events.publish(EditorEvent::RedrawRequested);
    }

    fn changed(&mut self, selection: bool) {
        if selection {
            self.events
                .publish(EditorEvent::SelectionChanged(self.scene.selection.layer()));
        }
        self.redraw();
    }

    /// Publish a user-facing failure and hand the error back.
    fn report(&mut self, err: EditorError) -> EditorError {
        if err.is_user_facing() {
            self.events.publish(EditorEvent::UserMessage(err.to_string()));
        }
        err
    }

    // ========================================================================
    // TEXT LAYERS
    // ========================================================================

    /// Add a text layer. Its anchor is clamped so the text stays on the
    /// canvas. The new layer is not selected.
    pub fn add_text(&mut self, layer: TextLayer) -> LayerId {
        let id = self
            .scene
            .texts
            .add(layer, self.scene.canvas_size(), &self.fonts);
        self.view_mode
            .record_added_layer(&mut self.scene, LayerRef::Text(id));
        self.redraw();
        id
    }

    /// Add a text layer with default content and styling at `anchor`.
    pub fn add_default_text(&mut self, anchor: Point) -> LayerId {
        self.add_text(TextLayer::new(anchor.x, anchor.y))
    }

    /// Apply a partial update to a text layer.
    pub fn update_text(&mut self, id: LayerId, patch: &TextPatch) -> Result<()> {
        if self.scene.texts.get(id).is_none() {
            tracing::debug!("[EditorSession::update_text] {:?} is gone", id);
            return Err(EditorError::LayerNotFound(id));
        }
        let live = self.view_mode.live_text_patch(id, patch);
        self.scene.texts.update(id, &live, &self.fonts)?;
        self.redraw();
        Ok(())
    }

    pub fn remove_text(&mut self, id: LayerId) -> Result<()> {
        let was_selected = self.scene.selection.text() == Some(id);
        self.scene.remove_text(id)?;
        self.view_mode.forget_layer(id);
        self.changed(was_selected);
        Ok(())
    }

    // ========================================================================
    // IMAGE LAYERS
    // ========================================================================

    /// Place a decoded image. Without a rect it is fitted and centered on
    /// the canvas. The new layer becomes the selection.
    pub fn add_image(
        &mut self,
        asset: Arc<ImageAsset>,
        source: Option<SourceId>,
        rect: Option<Rect>,
    ) -> LayerId {
        let canvas = self.scene.canvas_size();
        let rect = rect.unwrap_or_else(|| {
            ImageLayerStore::default_placement(&asset, canvas, &self.config.images)
        });
        let id = self.scene.images.add(asset, source, rect);
        self.view_mode
            .record_added_layer(&mut self.scene, LayerRef::Image(id));
        self.scene.selection.select(LayerRef::Image(id));
        self.changed(true);
        id
    }

    /// Remove an image layer. Returns the layer the selection moved to.
    pub fn remove_image(&mut self, id: LayerId) -> Result<Option<LayerId>> {
        let selected_before = self.scene.selection.layer();
        let next = self.scene.remove_image(id)?;
        self.view_mode.forget_layer(id);
        let selection_moved = selected_before != self.scene.selection.layer();
        self.changed(selection_moved);
        Ok(next)
    }

    /// Remove every image layer placed from `source`. Returns the count.
    pub fn remove_images_by_source(&mut self, source: SourceId) -> usize {
        let ids: Vec<LayerId> = self
            .scene
            .images
            .iter()
            .filter(|l| l.source == Some(source))
            .map(|l| l.id)
            .collect();
        let selected_before = self.scene.selection.layer();
        let removed = self.scene.remove_images_by_source(source);
        for id in ids {
            self.view_mode.forget_layer(id);
        }
        if removed > 0 {
            let selection_moved = selected_before != self.scene.selection.layer();
            self.changed(selection_moved);
        }
        removed
    }

    // ========================================================================
    // SELECTION
    // ========================================================================

    pub fn selection(&self) -> Option<LayerRef> {
        self.scene.selection.layer()
    }

    /// Select a layer, or clear the selection with `None`.
    pub fn set_selection(&mut self, layer: Option<LayerRef>) -> Result<()> {
        let before = self.scene.selection.layer();
        match layer {
            Some(layer) => self.scene.select(layer)?,
            None => self.scene.selection.clear(),
        }
        self.changed(before != layer);
        Ok(())
    }

    // ========================================================================
    // BACKGROUND
    // ========================================================================

    pub fn set_background(&mut self, background: Option<Arc<ImageAsset>>) {
        self.scene.background = background;
        self.redraw();
    }

    /// Install a theme's background and ask the host to move on to the
    /// design step.
    pub fn apply_theme_background(&mut self, background: Arc<ImageAsset>) {
        self.set_background(Some(background));
        self.events
            .publish(EditorEvent::StepChangeRequested(settings::steps::THEME_APPLIED));
    }

    /// Image the bottle preview export composites onto
    pub fn set_mockup(&mut self, mockup: Option<Arc<ImageAsset>>) {
        self.mockup = mockup;
    }

    // ========================================================================
    // RENDERING
    // ========================================================================

    /// Render the canvas for display, with selection chrome, at `dpr`
    /// surface pixels per display unit. Zoom and pan are not applied; the
    /// host positions the result with `view_transform`.
    pub fn render_display(&self, dpr: f64) -> Result<RgbaImage> {
        let display = self.scene.display_size();
        let mut surface = PixmapSurface::with_size(
            Size::new(display.width * dpr, display.height * dpr),
            &self.fonts,
        )?;
        SceneRenderer::render(
            &mut surface,
            &self.scene,
            &RenderOptions::interactive(dpr, &self.fonts),
        );
        surface.to_rgba_image()
    }

    /// Zoom about the display center followed by pan, in display units.
    pub fn view_transform(&self) -> Affine {
        let display = self.scene.display_size();
        let center = Vec2::new(display.width / 2.0, display.height / 2.0);
        Affine::translate(center + self.scene.view.pan)
            * Affine::scale(self.scene.view.zoom)
            * Affine::translate(-center)
    }

    // ========================================================================
    // ZOOM & PAN
    // ========================================================================
    //
    // None of these act while the bottle view is active.

    fn zoom_with(&mut self, f: impl FnOnce(&mut Scene, &EditorConfig) -> bool) -> bool {
        if self.view_mode.is_bottle() {
            return false;
        }
        let changed = f(&mut self.scene, &self.config);
        if changed {
            self.redraw();
        }
        changed
    }

    pub fn zoom_in(&mut self) -> bool {
        self.zoom_with(|scene, config| {
            let display = scene.display_size();
            scene.view.zoom_in(display, &config.zoom)
        })
    }

    pub fn zoom_out(&mut self) -> bool {
        self.zoom_with(|scene, config| {
            let display = scene.display_size();
            scene.view.zoom_out(display, &config.zoom)
        })
    }

    pub fn zoom_to_level(&mut self, level: f64) -> bool {
        self.zoom_with(|scene, config| {
            let display = scene.display_size();
            scene.view.zoom_to_level(level, None, display, &config.zoom)
        })
    }

    pub fn zoom_to_fit(&mut self) -> bool {
        self.zoom_with(|scene, _| scene.view.zoom_to_fit())
    }

    pub fn toggle_zoom(&mut self) -> bool {
        self.zoom_with(|scene, config| {
            let display = scene.display_size();
            scene.view.toggle_zoom(display, &config.zoom)
        })
    }

    /// One wheel notch at viewport position `client`.
    pub fn wheel_zoom(&mut self, delta_y: f64, client: Point, layout: SurfaceLayout) -> bool {
        let transform = GeometryTransform::new(layout, &self.scene.view, self.scene.canvas_size());
        let focus = transform
            .client_delta_to_display(client - layout.element_rect.origin())
            .to_point();
        self.zoom_with(|scene, config| {
            let display = scene.display_size();
            scene.view.wheel_zoom(delta_y, focus, display, &config.zoom)
        })
    }

    /// Pan by `delta` display units, clamped to the zoomed overflow.
    pub fn pan_by(&mut self, delta: Vec2) -> bool {
        self.zoom_with(|scene, _| {
            let before = scene.view.pan;
            let display = scene.display_size();
            scene.view.pan_by(delta, display);
            scene.view.pan != before
        })
    }

    // ========================================================================
    // INPUT
    // ========================================================================

    /// Feed a normalized pointer event through the interaction controller.
    pub fn handle_pointer(&mut self, event: &PointerEvent, layout: SurfaceLayout) -> InteractionOutcome {
        let transform = GeometryTransform::new(layout, &self.scene.view, self.scene.canvas_size());
        let outcome = self
            .controller
            .handle(event, &mut self.scene, &transform, &self.fonts);

        if let Some(layer) = outcome.committed {
            self.view_mode.commit_layer(&self.scene, layer);
        }
        if let Some(layer) = outcome.removed {
            self.view_mode.forget_layer(layer.id());
            self.events.publish(EditorEvent::LayerRemoved(layer));
        }
        if outcome.selection_changed {
            self.events
                .publish(EditorEvent::SelectionChanged(self.scene.selection.layer()));
        }
        if outcome.redraw {
            self.redraw();
        }
        outcome
    }

    /// Feed a raw touch callback. Returns `None` when the callback does not
    /// map to a pointer event (extra fingers, untracked touches).
    pub fn handle_touch(
        &mut self,
        phase: TouchPhase,
        touches: &[TouchPoint],
        changed: &[TouchPoint],
        layout: SurfaceLayout,
    ) -> Option<InteractionOutcome> {
        let event = self.touch.translate(phase, touches, changed)?;
        Some(self.handle_pointer(&event, layout))
    }

    /// Handle a key press. Returns true if the key did something.
    pub fn handle_key(&mut self, key: &str) -> bool {
        if self.view_mode.is_bottle() {
            return false;
        }
        let Some(command) = KeyCommand::from_key(key) else {
            return false;
        };
        tracing::debug!("[EditorSession::handle_key] {:?} -> {:?}", key, command);
        match command {
            KeyCommand::ZoomIn => self.zoom_in(),
            KeyCommand::ZoomOut => self.zoom_out(),
            KeyCommand::ZoomToFit => self.zoom_to_fit(),
            KeyCommand::ZoomToLevel(level) => self.zoom_to_level(level),
            KeyCommand::Escape => self.scene.view.is_zoomed_in() && self.zoom_to_fit(),
        }
    }

    // ========================================================================
    // VIEW MODE
    // ========================================================================

    pub fn enter_bottle(&mut self) -> bool {
        self.controller.cancel();
        if !self.view_mode.enter_bottle(&mut self.scene) {
            return false;
        }
        self.events
            .publish(EditorEvent::ViewModeChanged(ViewMode::Bottle));
        self.redraw();
        true
    }

    pub fn exit_bottle(&mut self) -> bool {
        self.controller.cancel();
        if !self.view_mode.exit_bottle(&mut self.scene, &self.fonts) {
            return false;
        }
        self.events.publish(EditorEvent::ViewModeChanged(ViewMode::Flat));
        self.redraw();
        true
    }

    /// The host's step navigation moved to `step`.
    pub fn step_changed(&mut self, step: u32) {
        let layout = LayoutProfile {
            step,
            ..self.view_mode.layout()
        };
        self.relayout(layout);
    }

    /// The viewport width changed.
    pub fn viewport_resized(&mut self, viewport_width: f64) {
        let layout = LayoutProfile {
            viewport_width,
            ..self.view_mode.layout()
        };
        self.relayout(layout);
    }

    fn relayout(&mut self, layout: LayoutProfile) {
        if self.view_mode.set_layout(layout, &mut self.scene) {
            self.redraw();
        }
    }

    // ========================================================================
    // EXPORT
    // ========================================================================

    /// Render the flat design at `quality` pixels per logical unit.
    pub fn export_image(&mut self, quality: f64) -> Result<RgbaImage> {
        self.export
            .render_to_image(&mut self.scene, &mut self.view_mode, &self.fonts, quality)
            .map_err(|e| self.report(e))
    }

    /// The downloadable design.
    pub fn export_design(&mut self) -> Result<ExportedImage> {
        let result = self.export.export_design(
            &mut self.scene,
            &mut self.view_mode,
            &self.fonts,
            Local::now(),
        );
        self.finish_export(result)
    }

    /// The design composited onto the bottle mockup.
    pub fn export_bottle_preview(&mut self) -> Result<ExportedImage> {
        let result = self.export.export_bottle_preview(
            &mut self.scene,
            &mut self.view_mode,
            &self.fonts,
            self.mockup.as_deref(),
            Local::now(),
        );
        self.finish_export(result)
    }

    /// Export the design and hand it to `uploader`. Returns the remote URL.
    pub fn post_design(&mut self, uploader: &mut dyn Uploader) -> Result<String> {
        self.export
            .post(
                &mut self.scene,
                &mut self.view_mode,
                &self.fonts,
                uploader,
                Local::now(),
            )
            .map_err(|e| self.report(e))
    }

    fn finish_export(&mut self, result: Result<ExportedImage>) -> Result<ExportedImage> {
        let export = result.map_err(|e| self.report(e))?;
        self.events.publish(EditorEvent::ExportFinished {
            file_name: export.file_name.clone(),
            width: export.width(),
            height: export.height(),
        });
        Ok(export)
    }

    // ========================================================================
    // ASSET LOADING
    // ========================================================================

    /// Decode a theme background in the background.
    pub fn load_background(&mut self, source: LoadSource) -> u64 {
        self.loader.request(source, LoadPurpose::Background)
    }

    /// Decode an image to be placed as a new layer.
    pub fn load_image(&mut self, source: LoadSource, origin: Option<SourceId>) -> u64 {
        self.loader
            .request(source, LoadPurpose::Layer { source: origin })
    }

    pub fn load_mockup(&mut self, source: LoadSource) -> u64 {
        self.loader.request(source, LoadPurpose::Mockup)
    }

    pub fn pending_loads(&self) -> usize {
        self.loader.pending()
    }

    /// Apply every load that has finished. Returns how many were applied.
    pub fn pump_loads(&mut self) -> usize {
        let done = self.loader.try_completions();
        self.apply_completions(done)
    }

    /// Block until every outstanding load is applied.
    pub fn wait_for_loads(&mut self) -> usize {
        let done = self.loader.wait_all();
        self.apply_completions(done)
    }

    fn apply_completions(&mut self, done: Vec<LoadCompletion>) -> usize {
        let mut applied = 0;
        for completion in done {
            let asset = match completion.result {
                Ok(asset) => asset,
                Err(err) => {
                    tracing::error!(
                        "Load #{} ({:?}) failed: {}",
                        completion.ticket,
                        completion.purpose,
                        err
                    );
                    self.report(err);
                    continue;
                }
            };
            match completion.purpose {
                LoadPurpose::Background => self.apply_theme_background(asset),
                LoadPurpose::Layer { source } => {
                    self.add_image(asset, source, None);
                }
                LoadPurpose::Mockup => self.set_mockup(Some(asset)),
            }
            applied += 1;
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::{Modifiers, PointerPhase};
    use crate::model::asset::solid_asset;

    const CANVAS: Size = Size::new(400.0, 600.0);

    fn layout(scene: &Scene) -> SurfaceLayout {
        SurfaceLayout::for_display(Point::ZERO, scene.display_size(), 1.0)
    }

    fn mouse(session: &mut EditorSession, phase: PointerPhase, x: f64, y: f64) -> InteractionOutcome {
        let layout = layout(session.scene());
        session.handle_pointer(&PointerEvent::mouse(phase, (x, y), Modifiers::NONE), layout)
    }

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(w, h, image::Rgba([9, 9, 9, 255]));
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn added_image_is_centered_and_selected() {
        let mut session = EditorSession::default();
        let events = session.subscribe();
        let id = session.add_image(solid_asset(300, 150, [0, 0, 0, 255]), None, None);

        let rect = session.scene().images.get(id).unwrap().bounds();
        assert_eq!(rect, Rect::new(125.0, 262.5, 275.0, 337.5));
        assert_eq!(session.selection(), Some(LayerRef::Image(id)));
        let got: Vec<_> = events.try_iter().collect();
        assert!(got.contains(&EditorEvent::SelectionChanged(Some(LayerRef::Image(id)))));
        assert!(got.contains(&EditorEvent::RedrawRequested));
    }

    #[test]
    fn selection_is_exclusive_across_kinds() {
        let mut session = EditorSession::default();
        let image = session.add_image(solid_asset(2, 2, [0, 0, 0, 255]), None, None);
        let text = session.add_default_text(Point::new(200.0, 100.0));
        session.set_selection(Some(LayerRef::Text(text))).unwrap();
        assert_eq!(session.scene().selection.image(), None);
        assert_eq!(session.scene().selection.text(), Some(text));
        assert!(!session.scene().selection.contains(LayerRef::Image(image)));
    }

    #[test]
    fn stale_ids_fail_without_user_message() {
        let mut session = EditorSession::default();
        let events = session.subscribe();
        let id = session.add_default_text(Point::new(200.0, 300.0));
        session.remove_text(id).unwrap();
        events.try_iter().count();

        let patch = TextPatch {
            text: Some("late".into()),
            ..TextPatch::default()
        };
        assert!(matches!(
            session.update_text(id, &patch),
            Err(EditorError::LayerNotFound(_))
        ));
        assert!(session.remove_image(id).is_err());
        assert!(events.try_iter().all(|e| !matches!(e, EditorEvent::UserMessage(_))));
    }

    #[test]
    fn cascade_removal_counts_layers() {
        let mut session = EditorSession::default();
        let a = SourceId(7);
        session.add_image(solid_asset(2, 2, [0, 0, 0, 255]), Some(a), None);
        session.add_image(solid_asset(2, 2, [0, 0, 0, 255]), Some(a), None);
        let keep = session.add_image(solid_asset(2, 2, [0, 0, 0, 255]), Some(SourceId(8)), None);
        assert_eq!(session.remove_images_by_source(a), 2);
        assert_eq!(session.scene().images.len(), 1);
        assert!(session.scene().images.get(keep).is_some());
        assert_eq!(session.remove_images_by_source(a), 0);
    }

    #[test]
    fn text_patch_in_bottle_view_is_scaled_and_restored() {
        let mut session = EditorSession::default();
        let id = session.add_default_text(Point::new(200.0, 300.0));
        session.enter_bottle();
        let scale = session.scene().view.layer_scale();

        let patch = TextPatch {
            x: Some(100.0),
            font_size: Some(30.0),
            ..TextPatch::default()
        };
        session.update_text(id, &patch).unwrap();
        let live = session.scene().texts.get(id).unwrap();
        assert!((live.x - 100.0 * scale).abs() < 1e-9);
        assert!((live.font_size - 30.0 * scale).abs() < 1e-9);

        session.exit_bottle();
        let flat = session.scene().texts.get(id).unwrap();
        assert_eq!((flat.x, flat.y, flat.font_size), (100.0, 300.0, 30.0));
    }

    #[test]
    fn image_added_in_bottle_view_keeps_flat_geometry() {
        let mut session = EditorSession::default();
        session.enter_bottle();
        let rect = Rect::new(40.0, 40.0, 140.0, 140.0);
        let id = session.add_image(solid_asset(2, 2, [0, 0, 0, 255]), None, Some(rect));
        assert!(session.scene().images.get(id).unwrap().bounds().width() < 100.0);
        session.exit_bottle();
        assert_eq!(session.scene().images.get(id).unwrap().bounds(), rect);
    }

    #[test]
    fn zoom_and_keys_are_ignored_in_bottle_view() {
        let mut session = EditorSession::default();
        assert!(session.handle_key("+"));
        assert!((session.scene().view.zoom - 1.5).abs() < 1e-9);
        assert!(session.handle_key("Escape"));
        assert_eq!(session.scene().view.zoom, 1.0);
        assert!(!session.handle_key("Escape"));

        session.enter_bottle();
        assert!(!session.zoom_in());
        assert!(!session.handle_key("2"));
        assert!(!session.pan_by(Vec2::new(10.0, 0.0)));
        assert_eq!(session.scene().view.zoom, 1.0);
    }

    #[test]
    fn pan_is_clamped_when_zoomed() {
        let mut session = EditorSession::default();
        assert!(!session.pan_by(Vec2::new(50.0, 0.0)));
        session.zoom_to_level(2.0);
        assert!(session.pan_by(Vec2::new(500.0, 0.0)));
        assert!((session.scene().view.pan.x - 200.0).abs() < 1e-9);
    }

    #[test]
    fn drag_through_session_moves_image() {
        let mut session = EditorSession::default();
        let id = session.add_image(
            solid_asset(2, 2, [0, 0, 0, 255]),
            None,
            Some(Rect::new(100.0, 100.0, 200.0, 200.0)),
        );
        mouse(&mut session, PointerPhase::Down, 150.0, 150.0);
        mouse(&mut session, PointerPhase::Move, 170.0, 160.0);
        let up = mouse(&mut session, PointerPhase::Up, 170.0, 160.0);
        assert_eq!(up.committed, Some(LayerRef::Image(id)));
        let rect = session.scene().images.get(id).unwrap().bounds();
        assert_eq!(rect.origin(), Point::new(120.0, 110.0));
    }

    #[test]
    fn bottle_drag_commits_to_flat_geometry() {
        let mut session = EditorSession::default();
        let id = session.add_image(
            solid_asset(2, 2, [0, 0, 0, 255]),
            None,
            Some(Rect::new(100.0, 100.0, 200.0, 200.0)),
        );
        session.enter_bottle();
        let scale = session.scene().view.layer_scale();
        let live = session.scene().images.get(id).unwrap().bounds();

        // Pointer positions are in display units of the scaled canvas
        let start = live.center();
        mouse(&mut session, PointerPhase::Down, start.x, start.y);
        mouse(&mut session, PointerPhase::Move, start.x + 5.0, start.y);
        mouse(&mut session, PointerPhase::Up, start.x + 5.0, start.y);

        session.exit_bottle();
        let flat = session.scene().images.get(id).unwrap().bounds();
        assert!((flat.x0 - (100.0 + 5.0 / scale)).abs() < 1e-6);
        assert!((flat.y0 - 100.0).abs() < 1e-6);
    }

    #[test]
    fn still_text_drag_near_edge_in_bottle_view_keeps_flat_geometry() {
        let mut session = EditorSession::default();
        let mut layer = TextLayer::new(30.0, 300.0);
        layer.text = "A".into();
        let id = session.add_text(layer);
        session.enter_bottle();

        let live = session.scene().texts.get(id).unwrap().anchor();
        mouse(&mut session, PointerPhase::Down, live.x, live.y);
        mouse(&mut session, PointerPhase::Move, live.x, live.y);
        let up = mouse(&mut session, PointerPhase::Up, live.x, live.y);
        assert_eq!(up.committed, Some(LayerRef::Text(id)));
        let after = session.scene().texts.get(id).unwrap().anchor();
        assert!((after - live).hypot() < 1e-9);

        session.exit_bottle();
        let flat = session.scene().texts.get(id).unwrap();
        assert!((flat.x - 30.0).abs() < 1e-9);
        assert!((flat.y - 300.0).abs() < 1e-9);
    }

    #[test]
    fn touch_drives_the_same_gestures() {
        let mut session = EditorSession::default();
        let id = session.add_image(
            solid_asset(2, 2, [0, 0, 0, 255]),
            None,
            Some(Rect::new(100.0, 100.0, 200.0, 200.0)),
        );
        session.set_selection(None).unwrap();
        let layout = layout(session.scene());
        let finger = |x, y| TouchPoint {
            id: 3,
            position: Point::new(x, y),
        };

        session.handle_touch(TouchPhase::Start, &[finger(150.0, 150.0)], &[finger(150.0, 150.0)], layout);
        assert_eq!(session.selection(), Some(LayerRef::Image(id)));
        session.handle_touch(TouchPhase::Move, &[finger(160.0, 150.0)], &[finger(160.0, 150.0)], layout);
        let out = session
            .handle_touch(TouchPhase::End, &[], &[finger(160.0, 150.0)], layout)
            .unwrap();
        assert_eq!(out.committed, Some(LayerRef::Image(id)));
        assert_eq!(session.scene().images.get(id).unwrap().bounds().x0, 110.0);
    }

    #[test]
    fn theme_background_requests_step_change() {
        let mut session = EditorSession::default();
        let events = session.subscribe();
        session.apply_theme_background(solid_asset(4, 6, [0, 128, 0, 255]));
        assert!(session.scene().background.is_some());
        let got: Vec<_> = events.try_iter().collect();
        assert!(got.contains(&EditorEvent::StepChangeRequested(settings::steps::THEME_APPLIED)));
    }

    #[test]
    fn compact_layout_rescales_live_bottle_view() {
        let mut session = EditorSession::default();
        let id = session.add_image(
            solid_asset(2, 2, [0, 0, 0, 255]),
            None,
            Some(Rect::new(100.0, 100.0, 200.0, 200.0)),
        );
        session.enter_bottle();
        let desktop = session.scene().images.get(id).unwrap().bounds().width();

        session.viewport_resized(500.0);
        // Not compact until the label step is active
        assert_eq!(session.scene().images.get(id).unwrap().bounds().width(), desktop);
        session.step_changed(session.config().bottle.compact_step);
        let compact = session.scene().images.get(id).unwrap().bounds().width();
        assert!(compact < desktop);

        session.exit_bottle();
        assert_eq!(
            session.scene().images.get(id).unwrap().bounds(),
            Rect::new(100.0, 100.0, 200.0, 200.0)
        );
    }

    #[test]
    fn missing_mockup_is_reported() {
        let mut session = EditorSession::default();
        let events = session.subscribe();
        assert!(matches!(
            session.export_bottle_preview(),
            Err(EditorError::MockupUnavailable)
        ));
        let got: Vec<_> = events.try_iter().collect();
        assert_eq!(
            got,
            vec![EditorEvent::UserMessage(
                "Bottle preview is not available for this product.".into()
            )]
        );
    }

    #[test]
    fn export_quality_and_event() {
        let mut session = EditorSession::default();
        let events = session.subscribe();
        let image = session.export_image(0.5).unwrap();
        assert_eq!((image.width(), image.height()), (200, 300));

        let export = session.export_design().unwrap();
        assert_eq!((export.width(), export.height()), (1600, 2400));
        assert!(events.try_iter().any(|e| matches!(
            e,
            EditorEvent::ExportFinished { width: 1600, height: 2400, .. }
        )));
    }

    #[test]
    fn display_render_matches_display_size() {
        let mut session = EditorSession::default();
        let image = session.render_display(2.0).unwrap();
        assert_eq!((image.width(), image.height()), (800, 1200));

        session.enter_bottle();
        let image = session.render_display(1.0).unwrap();
        let display = session.scene().display_size();
        assert_eq!(image.width(), display.width.round() as u32);
        assert!(display.width < CANVAS.width);
    }

    #[test]
    fn view_transform_keeps_center_fixed() {
        let mut session = EditorSession::default();
        session.zoom_to_level(2.0);
        let center = Point::new(200.0, 300.0);
        let mapped = session.view_transform() * center;
        assert!((mapped - center).hypot() < 1e-9);
        let corner = session.view_transform() * Point::ZERO;
        assert!((corner.x + 200.0).abs() < 1e-9);
    }

    #[test]
    fn loads_apply_against_current_state() {
        let mut session = EditorSession::default();
        let events = session.subscribe();
        session.load_image(LoadSource::Bytes(png_bytes(10, 20)), Some(SourceId(1)));
        session.load_mockup(LoadSource::Bytes(png_bytes(98, 446)));
        session.load_background(LoadSource::Bytes(b"not an image".to_vec()));

        // Interaction keeps going while decodes run
        session.add_default_text(Point::new(200.0, 300.0));

        assert_eq!(session.wait_for_loads(), 2);
        assert_eq!(session.pending_loads(), 0);
        assert_eq!(session.scene().images.len(), 1);
        assert_eq!(session.scene().texts.len(), 1);
        assert!(session.scene().background.is_none());
        assert!(session.export_bottle_preview().is_ok());
        assert!(events.try_iter().any(|e| matches!(e, EditorEvent::UserMessage(_))));
    }
}
