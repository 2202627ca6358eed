// Copyright 2025 the Labelcraft Authors
// SPDX-License-Identifier: Apache-2.0

//! Draw a scene onto a surface.
//!
//! Order is fixed: clear, background (cover fit), image layers bottom to
//! top, text layers bottom to top, then selection chrome when rendering
//! interactively. The resolution scale is applied as a transform so text
//! and strokes are rasterized at the target resolution.

use super::{Shadow, StrokeStyle, Surface, decorations};
use crate::model::{ImageAsset, Scene, TextLayer};
use crate::text::{GlyphRun, TextMeasurer};
use crate::theme;
use kurbo::{Affine, Point, Rect, Size, Vec2};

/// What the render is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Live view; selection chrome is drawn
    Interactive,
    /// Offline output; selection chrome is never drawn
    Export,
}

/// Per-render parameters
#[derive(Clone, Copy)]
pub struct RenderOptions<'a> {
    /// Surface pixels per logical unit
    pub resolution_scale: f64,
    pub mode: RenderMode,
    pub measurer: &'a dyn TextMeasurer,
}

impl<'a> RenderOptions<'a> {
    pub fn interactive(resolution_scale: f64, measurer: &'a dyn TextMeasurer) -> Self {
        Self {
            resolution_scale,
            mode: RenderMode::Interactive,
            measurer,
        }
    }

    pub fn export(resolution_scale: f64, measurer: &'a dyn TextMeasurer) -> Self {
        Self {
            resolution_scale,
            mode: RenderMode::Export,
            measurer,
        }
    }
}

/// Stateless scene renderer
pub struct SceneRenderer;

impl SceneRenderer {
    /// Render `scene` onto `surface`.
    pub fn render(surface: &mut dyn Surface, scene: &Scene, options: &RenderOptions<'_>) {
        surface.clear();
        surface.save();
        surface.transform(Affine::scale(options.resolution_scale));

        if let Some(background) = &scene.background {
            draw_background(surface, background, scene.display_size());
        }

        for layer in scene.images.iter() {
            let natural = layer.asset.natural_size().to_rect();
            surface.draw_image(&layer.asset, natural, layer.bounds());
        }

        for layer in scene.texts.iter() {
            draw_text_layer(surface, layer, options);
        }

        if options.mode == RenderMode::Interactive {
            decorations::draw_selection(surface, scene, options.measurer);
        }

        surface.restore();
    }
}

/// Source region of `natural` that covers `dest` when scaled uniformly:
/// `scale = max(dw / sw, dh / sh)`, centered, overflow cropped.
pub fn cover_source_rect(natural: Size, dest: Size) -> Rect {
    if natural.width <= 0.0 || natural.height <= 0.0 {
        return Rect::ZERO;
    }
    let scale = (dest.width / natural.width).max(dest.height / natural.height);
    let visible = Size::new(dest.width / scale, dest.height / scale);
    Rect::from_center_size(natural.to_rect().center(), visible)
}

fn draw_background(surface: &mut dyn Surface, background: &ImageAsset, dest: Size) {
    let src = cover_source_rect(background.natural_size(), dest);
    if src.area() > 0.0 {
        surface.draw_image(background, src, dest.to_rect());
    }
}

fn draw_text_layer(surface: &mut dyn Surface, layer: &TextLayer, options: &RenderOptions<'_>) {
    let run = GlyphRun::layout(layer, options.measurer);
    if run.is_empty() {
        return;
    }
    let font = layer.font_spec();

    surface.save();
    surface.transform(
        Affine::translate(layer.anchor().to_vec2()) * Affine::rotate(layer.rotation.to_radians()),
    );

    if layer.effects.shadow {
        use theme::text_effects::{SHADOW, SHADOW_BLUR, SHADOW_OFFSET};
        let scale = options.resolution_scale;
        surface.set_shadow(Some(Shadow {
            color: SHADOW,
            blur: SHADOW_BLUR * scale,
            offset: Vec2::new(SHADOW_OFFSET * scale, SHADOW_OFFSET * scale),
        }));
    }
    let outline = layer.effects.outline.then(|| {
        StrokeStyle::solid(
            theme::text_effects::OUTLINE,
            theme::text_effects::OUTLINE_WIDTH,
        )
    });

    match &run {
        GlyphRun::Line { text, .. } => {
            if let Some(stroke) = &outline {
                surface.stroke_text(text, &font, Point::ORIGIN, stroke);
            }
            surface.fill_text(text, &font, Point::ORIGIN, layer.color);
        }
        GlyphRun::Spaced(glyphs) | GlyphRun::Curved(glyphs) => {
            let mut buf = [0; 4];
            for glyph in glyphs {
                let ch: &str = glyph.ch.encode_utf8(&mut buf);
                surface.save();
                surface.transform(Affine::translate(glyph.offset) * Affine::rotate(glyph.rotation));
                if let Some(stroke) = &outline {
                    surface.stroke_text(ch, &font, Point::ORIGIN, stroke);
                }
                surface.fill_text(ch, &font, Point::ORIGIN, layer.color);
                surface.restore();
            }
        }
    }

    surface.restore();
}
