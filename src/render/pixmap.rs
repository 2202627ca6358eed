// Copyright 2025 the Labelcraft Authors
// SPDX-License-Identifier: Apache-2.0

//! Software rasterizing surface on tiny-skia.
//!
//! Text is drawn as glyph outlines taken from the `FontBook`, so what is
//! rasterized matches what layout measured. A string with no available
//! outlines draws nothing.

use super::{Shadow, StrokeStyle, Surface};
use crate::error::{EditorError, Result};
use crate::model::ImageAsset;
use crate::text::{FontBook, FontSpec, TextMeasurer};
use image::RgbaImage;
use kurbo::{Affine, BezPath, PathEl, Point, Rect, Shape, Size};
use peniko::Color;
use tiny_skia::{
    FillRule, FilterQuality, Paint, PathBuilder, Pattern, Pixmap, PixmapPaint, SpreadMode,
    Stroke, StrokeDash, Transform,
};

#[derive(Debug, Clone, Copy)]
struct State {
    transform: Affine,
    shadow: Option<Shadow>,
}

/// A surface backed by a premultiplied RGBA pixmap
pub struct PixmapSurface<'a> {
    pixmap: Pixmap,
    fonts: &'a FontBook,
    state: State,
    stack: Vec<State>,
}

impl<'a> PixmapSurface<'a> {
    /// Allocate a transparent surface.
    pub fn new(width: u32, height: u32, fonts: &'a FontBook) -> Result<Self> {
        let pixmap =
            Pixmap::new(width, height).ok_or(EditorError::SurfaceAllocation { width, height })?;
        Ok(Self {
            pixmap,
            fonts,
            state: State {
                transform: Affine::IDENTITY,
                shadow: None,
            },
            stack: Vec::new(),
        })
    }

    /// Allocate a surface for a fractional size, rounding to whole pixels.
    pub fn with_size(size: Size, fonts: &'a FontBook) -> Result<Self> {
        let width = size.width.round().max(0.0) as u32;
        let height = size.height.round().max(0.0) as u32;
        Self::new(width, height, fonts)
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn into_pixmap(self) -> Pixmap {
        self.pixmap
    }

    /// Copy out straight-alpha RGBA pixels.
    pub fn to_rgba_image(&self) -> Result<RgbaImage> {
        let mut data = Vec::with_capacity(self.pixmap.data().len());
        for pixel in self.pixmap.pixels() {
            let c = pixel.demultiply();
            data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        RgbaImage::from_raw(self.pixmap.width(), self.pixmap.height(), data)
            .ok_or_else(|| EditorError::Encode("pixel buffer size mismatch".into()))
    }

    /// Glyph outlines for `text` centered on `center`.
    fn text_outline(&self, text: &str, font: &FontSpec, center: Point) -> Option<BezPath> {
        let path = self.fonts.text_path(text, font)?;
        let advance = self.fonts.measure(text, font);
        let baseline = self.fonts.middle_to_baseline(font);
        Some(Affine::translate((center.x - advance / 2.0, center.y + baseline)) * path)
    }

    /// Run `draw` for the shadow (when one is set) and then for the target.
    /// `local_bounds` covers everything `draw` paints, in user space.
    fn paint_with_shadow(&mut self, local_bounds: Rect, draw: impl Fn(&mut Pixmap, Transform)) {
        if let Some(shadow) = self.state.shadow {
            self.draw_shadow(&shadow, local_bounds, &draw);
        }
        draw(&mut self.pixmap, sk_transform(self.state.transform));
    }

    /// Rasterize the shadow into a layer covering only the shape plus the
    /// blur spread, then composite it at its origin.
    fn draw_shadow(&mut self, shadow: &Shadow, local_bounds: Rect, draw: &impl Fn(&mut Pixmap, Transform)) {
        let transform = Affine::translate(shadow.offset) * self.state.transform;
        let radius = (shadow.blur / 2.0).round() as usize;
        let Some(region) = shadow_region(
            transform.transform_rect_bbox(local_bounds),
            radius,
            self.pixmap.width(),
            self.pixmap.height(),
        ) else {
            return;
        };
        let Some(mut layer) = Pixmap::new(region.width, region.height) else {
            return;
        };
        let to_layer = Affine::translate((-f64::from(region.x), -f64::from(region.y)));
        draw(&mut layer, sk_transform(to_layer * transform));
        tint(&mut layer, shadow.color);
        box_blur(&mut layer, radius);
        self.pixmap.draw_pixmap(
            region.x,
            region.y,
            layer.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }
}

impl Surface for PixmapSurface<'_> {
    fn size(&self) -> Size {
        Size::new(f64::from(self.pixmap.width()), f64::from(self.pixmap.height()))
    }

    fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
    }

    fn save(&mut self) {
        self.stack.push(self.state);
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn transform(&mut self, affine: Affine) {
        self.state.transform = self.state.transform * affine;
    }

    fn set_shadow(&mut self, shadow: Option<Shadow>) {
        self.state.shadow = shadow;
    }

    fn draw_image(&mut self, asset: &ImageAsset, src: Rect, dst: Rect) {
        if src.width() <= 0.0 || src.height() <= 0.0 {
            return;
        }
        let Some(rect) = sk_rect(dst) else {
            return;
        };
        let image_to_dst = Affine::translate(dst.origin().to_vec2())
            * Affine::scale_non_uniform(dst.width() / src.width(), dst.height() / src.height())
            * Affine::translate(-src.origin().to_vec2());

        let mut paint = Paint::default();
        paint.shader = Pattern::new(
            asset.pixmap().as_ref(),
            SpreadMode::Pad,
            FilterQuality::Bicubic,
            1.0,
            sk_transform(image_to_dst),
        );
        paint.anti_alias = true;
        self.paint_with_shadow(dst, |pixmap, ts| {
            pixmap.fill_rect(rect, &paint, ts, None);
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let bounds = rect;
        let Some(rect) = sk_rect(rect) else {
            return;
        };
        let paint = solid_paint(color);
        self.paint_with_shadow(bounds, |pixmap, ts| {
            pixmap.fill_rect(rect, &paint, ts, None);
        });
    }

    fn fill_path(&mut self, path: &BezPath, color: Color) {
        let bounds = path.bounding_box();
        let Some(path) = sk_path(path) else {
            return;
        };
        let paint = solid_paint(color);
        self.paint_with_shadow(bounds, |pixmap, ts| {
            pixmap.fill_path(&path, &paint, FillRule::Winding, ts, None);
        });
    }

    fn stroke_path(&mut self, path: &BezPath, style: &StrokeStyle) {
        // Miter joins reach up to twice the width past the path
        let reach = style.width * 2.0;
        let bounds = path.bounding_box().inflate(reach, reach);
        let Some(path) = sk_path(path) else {
            return;
        };
        let paint = solid_paint(style.color);
        let stroke = sk_stroke(style);
        self.paint_with_shadow(bounds, |pixmap, ts| {
            pixmap.stroke_path(&path, &paint, &stroke, ts, None);
        });
    }

    fn fill_text(&mut self, text: &str, font: &FontSpec, center: Point, color: Color) {
        match self.text_outline(text, font, center) {
            Some(outline) => self.fill_path(&outline, color),
            None => tracing::trace!("[fill_text] no outlines for '{}' in {}", text, font.css()),
        }
    }

    fn stroke_text(&mut self, text: &str, font: &FontSpec, center: Point, style: &StrokeStyle) {
        if let Some(outline) = self.text_outline(text, font, center) {
            self.stroke_path(&outline, style);
        }
    }
}

// ============================================================================
// CONVERSIONS
// ============================================================================

fn sk_transform(affine: Affine) -> Transform {
    let [a, b, c, d, e, f] = affine.as_coeffs();
    Transform::from_row(a as f32, b as f32, c as f32, d as f32, e as f32, f as f32)
}

fn sk_color(color: Color) -> tiny_skia::Color {
    let c = color.to_rgba8();
    tiny_skia::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn sk_rect(rect: Rect) -> Option<tiny_skia::Rect> {
    tiny_skia::Rect::from_ltrb(rect.x0 as f32, rect.y0 as f32, rect.x1 as f32, rect.y1 as f32)
}

fn solid_paint(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(sk_color(color));
    paint.anti_alias = true;
    paint
}

fn sk_stroke(style: &StrokeStyle) -> Stroke {
    let dash = if style.dash.is_empty() {
        None
    } else {
        StrokeDash::new(style.dash.iter().map(|d| *d as f32).collect(), 0.0)
    };
    Stroke {
        width: style.width as f32,
        dash,
        ..Stroke::default()
    }
}

fn sk_path(path: &BezPath) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => pb.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => pb.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(c, p) => pb.quad_to(c.x as f32, c.y as f32, p.x as f32, p.y as f32),
            PathEl::CurveTo(c0, c1, p) => pb.cubic_to(
                c0.x as f32,
                c0.y as f32,
                c1.x as f32,
                c1.y as f32,
                p.x as f32,
                p.y as f32,
            ),
            PathEl::ClosePath => pb.close(),
        }
    }
    pb.finish()
}

// ============================================================================
// SHADOW
// ============================================================================

/// Whole-pixel area of the surface a shadow layer needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PixelRegion {
    x: i32,
    y: i32,
    width: u32,
    height: u32,
}

/// Device-space `bounds` grown by how far three blur passes of `radius`
/// spread, plus a pixel for antialiasing, and clipped to the surface.
fn shadow_region(bounds: Rect, radius: usize, surface_width: u32, surface_height: u32) -> Option<PixelRegion> {
    if !bounds.is_finite() {
        return None;
    }
    let spread = (3 * radius + 1) as f64;
    let x0 = (bounds.x0 - spread).floor().max(0.0);
    let y0 = (bounds.y0 - spread).floor().max(0.0);
    let x1 = (bounds.x1 + spread).ceil().min(f64::from(surface_width));
    let y1 = (bounds.y1 + spread).ceil().min(f64::from(surface_height));
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some(PixelRegion {
        x: x0 as i32,
        y: y0 as i32,
        width: (x1 - x0) as u32,
        height: (y1 - y0) as u32,
    })
}

/// Replace every pixel's color with `color`, keeping its coverage.
fn tint(pixmap: &mut Pixmap, color: Color) {
    let c = color.to_rgba8();
    for px in pixmap.data_mut().chunks_exact_mut(4) {
        let alpha = u32::from(px[3]) * u32::from(c.a) / 255;
        px[0] = (u32::from(c.r) * alpha / 255) as u8;
        px[1] = (u32::from(c.g) * alpha / 255) as u8;
        px[2] = (u32::from(c.b) * alpha / 255) as u8;
        px[3] = alpha as u8;
    }
}

/// Three passes of a separable box blur, approximating a Gaussian with
/// standard deviation close to `radius`.
fn box_blur(pixmap: &mut Pixmap, radius: usize) {
    if radius == 0 {
        return;
    }
    let width = pixmap.width() as usize;
    let height = pixmap.height() as usize;
    let data = pixmap.data_mut();
    let mut scratch = vec![0u8; data.len()];
    for _ in 0..3 {
        blur_axis(data, &mut scratch, width, height, radius, true);
        blur_axis(&scratch, data, width, height, radius, false);
    }
}

fn blur_axis(src: &[u8], dst: &mut [u8], width: usize, height: usize, radius: usize, horizontal: bool) {
    let (lines, len) = if horizontal { (height, width) } else { (width, height) };
    let index = |line: usize, i: usize| {
        if horizontal {
            (line * width + i) * 4
        } else {
            (i * width + line) * 4
        }
    };
    let window = (2 * radius + 1) as u32;

    for line in 0..lines {
        let mut sum = [0u32; 4];
        for i in 0..radius.min(len) {
            let o = index(line, i);
            for c in 0..4 {
                sum[c] += u32::from(src[o + c]);
            }
        }
        for i in 0..len {
            if i + radius < len {
                let o = index(line, i + radius);
                for c in 0..4 {
                    sum[c] += u32::from(src[o + c]);
                }
            }
            let o = index(line, i);
            for c in 0..4 {
                dst[o + c] = ((sum[c] + window / 2) / window) as u8;
            }
            if i >= radius {
                let o = index(line, i - radius);
                for c in 0..4 {
                    sum[c] -= u32::from(src[o + c]);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::asset::solid_asset;
    use kurbo::Vec2;

    fn pixel(surface: &PixmapSurface<'_>, x: u32, y: u32) -> [u8; 4] {
        let p = surface.pixmap().pixel(x, y).unwrap().demultiply();
        [p.red(), p.green(), p.blue(), p.alpha()]
    }

    #[test]
    fn zero_size_surface_is_an_error() {
        let fonts = FontBook::new();
        let err = PixmapSurface::new(0, 10, &fonts).err().unwrap();
        assert!(matches!(err, EditorError::SurfaceAllocation { width: 0, height: 10 }));
    }

    #[test]
    fn fill_rect_honors_transform() {
        let fonts = FontBook::new();
        let mut s = PixmapSurface::new(20, 20, &fonts).unwrap();
        s.transform(Affine::scale(2.0));
        s.fill_rect(Rect::new(0.0, 0.0, 5.0, 5.0), Color::from_rgb8(255, 0, 0));
        assert_eq!(pixel(&s, 9, 9), [255, 0, 0, 255]);
        assert_eq!(pixel(&s, 11, 11)[3], 0);
    }

    #[test]
    fn clear_resets_to_transparent() {
        let fonts = FontBook::new();
        let mut s = PixmapSurface::new(4, 4, &fonts).unwrap();
        s.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0), Color::from_rgb8(0, 255, 0));
        s.clear();
        assert!(s.pixmap().pixels().iter().all(|p| p.alpha() == 0));
    }

    #[test]
    fn draw_image_scales_into_destination() {
        let fonts = FontBook::new();
        let mut s = PixmapSurface::new(20, 20, &fonts).unwrap();
        let asset = solid_asset(2, 2, [0, 0, 255, 255]);
        s.draw_image(&asset, Rect::new(0.0, 0.0, 2.0, 2.0), Rect::new(5.0, 5.0, 15.0, 15.0));
        assert_eq!(pixel(&s, 10, 10), [0, 0, 255, 255]);
        assert_eq!(pixel(&s, 2, 2)[3], 0);
        assert_eq!(pixel(&s, 17, 17)[3], 0);
    }

    #[test]
    fn shadow_spreads_beyond_shape() {
        let fonts = FontBook::new();
        let mut s = PixmapSurface::new(40, 40, &fonts).unwrap();
        s.set_shadow(Some(Shadow {
            color: Color::from_rgba8(0, 0, 0, 128),
            blur: 4.0,
            offset: Vec2::new(4.0, 4.0),
        }));
        s.fill_rect(Rect::new(10.0, 10.0, 20.0, 20.0), Color::from_rgb8(255, 255, 255));
        // Offset shadow shows below-right of the shape
        assert!(pixel(&s, 22, 22)[3] > 0);
        // And not far away from it
        assert_eq!(pixel(&s, 35, 5)[3], 0);
        // The shape itself is drawn over its shadow
        assert_eq!(pixel(&s, 15, 15), [255, 255, 255, 255]);
    }

    #[test]
    fn shadow_layer_covers_only_the_shape() {
        // A 10 px square with radius 2 on an export-sized surface
        let region = shadow_region(Rect::new(100.0, 200.0, 110.0, 210.0), 2, 1600, 2400).unwrap();
        assert_eq!(
            region,
            PixelRegion {
                x: 93,
                y: 193,
                width: 24,
                height: 24,
            }
        );
    }

    #[test]
    fn shadow_region_is_clipped_to_surface() {
        let region = shadow_region(Rect::new(-5.0, 35.0, 5.0, 45.0), 1, 40, 40).unwrap();
        assert_eq!((region.x, region.y), (0, 31));
        assert_eq!((region.width, region.height), (9, 9));
        assert!(shadow_region(Rect::new(100.0, 100.0, 110.0, 110.0), 1, 40, 40).is_none());
        assert!(shadow_region(Rect::new(f64::NAN, 0.0, 1.0, 1.0), 1, 40, 40).is_none());
    }

    #[test]
    fn shadow_under_transform_lands_offset() {
        let fonts = FontBook::new();
        let mut s = PixmapSurface::new(200, 200, &fonts).unwrap();
        s.transform(Affine::scale(4.0));
        s.set_shadow(Some(Shadow {
            color: Color::from_rgb8(0, 0, 0),
            blur: 2.0,
            offset: Vec2::new(20.0, 0.0),
        }));
        s.fill_rect(Rect::new(10.0, 10.0, 15.0, 15.0), Color::from_rgb8(255, 0, 0));
        // Shape covers 40..60 in device pixels, its shadow 60..80
        assert_eq!(pixel(&s, 50, 50), [255, 0, 0, 255]);
        assert!(pixel(&s, 70, 50)[3] > 200);
        assert_eq!(pixel(&s, 150, 150)[3], 0);
    }

    #[test]
    fn rgba_export_is_straight_alpha() {
        let fonts = FontBook::new();
        let mut s = PixmapSurface::new(2, 2, &fonts).unwrap();
        s.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0), Color::from_rgba8(200, 100, 50, 255));
        let img = s.to_rgba_image().unwrap();
        assert_eq!(img.get_pixel(1, 1).0, [200, 100, 50, 255]);
    }

    #[test]
    fn text_without_faces_draws_nothing() {
        let fonts = FontBook::new();
        let mut s = PixmapSurface::new(50, 50, &fonts).unwrap();
        s.fill_text("HELLO", &FontSpec::new("Arial", 24.0), Point::new(25.0, 25.0), Color::from_rgb8(0, 0, 0));
        assert!(s.pixmap().pixels().iter().all(|p| p.alpha() == 0));
    }

    #[test]
    fn blur_softens_edges_only() {
        let mut pm = Pixmap::new(41, 41).unwrap();
        let block = tiny_skia::Rect::from_xywh(15.0, 15.0, 11.0, 11.0).unwrap();
        pm.fill_rect(block, &solid_paint(Color::from_rgb8(255, 255, 255)), Transform::identity(), None);
        box_blur(&mut pm, 2);
        assert!(pm.pixel(20, 20).unwrap().alpha() > 200);
        let edge = pm.pixel(14, 20).unwrap().alpha();
        assert!(edge > 0 && edge < 255, "edge {edge}");
        assert_eq!(pm.pixel(2, 2).unwrap().alpha(), 0);
    }
}
