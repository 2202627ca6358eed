// Copyright 2025 the Labelcraft Authors
// SPDX-License-Identifier: Apache-2.0

//! Scene rendering.
//!
//! `SceneRenderer` draws through the `Surface` trait so the same code path
//! serves the live view, previews and high-resolution export. Two surfaces
//! are provided: `PixmapSurface` rasterizes with tiny-skia, and
//! `DisplayList` records the draw calls for inspection.

mod decorations;
pub mod display_list;
pub mod pixmap;
pub mod scene_renderer;

pub use display_list::{DisplayList, DrawCmd};
pub use pixmap::PixmapSurface;
pub use scene_renderer::{RenderMode, RenderOptions, SceneRenderer};

use crate::model::ImageAsset;
use crate::text::FontSpec;
use kurbo::{Affine, BezPath, Point, Rect, Size, Vec2};
use peniko::Color;

/// Stroke parameters for outlines and text strokes
#[derive(Debug, Clone)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f64,
    /// Dash pattern (on, off, ...); empty for a solid line
    pub dash: Vec<f64>,
}

impl StrokeStyle {
    pub fn solid(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            dash: Vec::new(),
        }
    }

    pub fn dashed(color: Color, width: f64, dash: &[f64]) -> Self {
        Self {
            color,
            width,
            dash: dash.to_vec(),
        }
    }
}

/// Drop shadow applied to subsequent text draws.
///
/// Offset and blur are in surface pixels, unaffected by the current
/// transform.
#[derive(Debug, Clone, Copy)]
pub struct Shadow {
    pub color: Color,
    pub blur: f64,
    pub offset: Vec2,
}

/// A 2D drawing target.
///
/// The surface keeps a current transform and shadow, saved and restored as
/// a stack. Text is drawn centered on `center` both horizontally and
/// vertically; there is no other alignment mode.
pub trait Surface {
    /// Pixel size of the target
    fn size(&self) -> Size;

    /// Clear every pixel to transparent, ignoring the transform.
    fn clear(&mut self);

    fn save(&mut self);

    fn restore(&mut self);

    /// Concatenate `affine` onto the current transform.
    fn transform(&mut self, affine: Affine);

    fn set_shadow(&mut self, shadow: Option<Shadow>);

    /// Draw the `src` region of `asset` (image pixels) into `dst`.
    fn draw_image(&mut self, asset: &ImageAsset, src: Rect, dst: Rect);

    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn fill_path(&mut self, path: &BezPath, color: Color);

    fn stroke_path(&mut self, path: &BezPath, style: &StrokeStyle);

    fn fill_text(&mut self, text: &str, font: &FontSpec, center: Point, color: Color);

    fn stroke_text(&mut self, text: &str, font: &FontSpec, center: Point, style: &StrokeStyle);
}
