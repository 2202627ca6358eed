// Copyright 2025 the Labelcraft Authors
// SPDX-License-Identifier: Apache-2.0

//! A surface that records draw calls instead of rasterizing them.

use super::{Shadow, StrokeStyle, Surface};
use crate::model::ImageAsset;
use crate::text::FontSpec;
use kurbo::{Affine, BezPath, Point, Rect, Size};
use peniko::Color;

/// One recorded draw call, with the transform it was issued under
#[derive(Debug, Clone)]
pub enum DrawCmd {
    Clear,
    Image {
        /// Natural size of the drawn asset
        natural: Size,
        src: Rect,
        dst: Rect,
        transform: Affine,
    },
    FillRect {
        rect: Rect,
        color: Color,
        transform: Affine,
    },
    FillPath {
        path: BezPath,
        color: Color,
        transform: Affine,
    },
    StrokePath {
        path: BezPath,
        style: StrokeStyle,
        transform: Affine,
    },
    FillText {
        text: String,
        font: FontSpec,
        center: Point,
        color: Color,
        transform: Affine,
        shadow: Option<Shadow>,
    },
    StrokeText {
        text: String,
        font: FontSpec,
        center: Point,
        style: StrokeStyle,
        transform: Affine,
        shadow: Option<Shadow>,
    },
}

#[derive(Debug, Clone, Copy)]
struct State {
    transform: Affine,
    shadow: Option<Shadow>,
}

/// Recording surface
#[derive(Debug, Clone)]
pub struct DisplayList {
    size: Size,
    commands: Vec<DrawCmd>,
    state: State,
    stack: Vec<State>,
}

impl DisplayList {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            commands: Vec::new(),
            state: State {
                transform: Affine::IDENTITY,
                shadow: None,
            },
            stack: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCmd] {
        &self.commands
    }

    /// Text strings drawn by fill calls, in order
    pub fn filled_text(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCmd::FillText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Number of image draws
    pub fn image_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|cmd| matches!(cmd, DrawCmd::Image { .. }))
            .count()
    }

    /// Depth of the save stack; zero when every save was restored
    pub fn save_depth(&self) -> usize {
        self.stack.len()
    }
}

impl Surface for DisplayList {
    fn size(&self) -> Size {
        self.size
    }

    fn clear(&mut self) {
        self.commands.push(DrawCmd::Clear);
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
        self.commands.push(DrawCmd::Image {
            natural: asset.natural_size(),
            src,
            dst,
            transform: self.state.transform,
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCmd::FillRect {
            rect,
            color,
            transform: self.state.transform,
        });
    }

    fn fill_path(&mut self, path: &BezPath, color: Color) {
        self.commands.push(DrawCmd::FillPath {
            path: path.clone(),
            color,
            transform: self.state.transform,
        });
    }

    fn stroke_path(&mut self, path: &BezPath, style: &StrokeStyle) {
        self.commands.push(DrawCmd::StrokePath {
            path: path.clone(),
            style: style.clone(),
            transform: self.state.transform,
        });
    }

    fn fill_text(&mut self, text: &str, font: &FontSpec, center: Point, color: Color) {
        self.commands.push(DrawCmd::FillText {
            text: text.to_string(),
            font: font.clone(),
            center,
            color,
            transform: self.state.transform,
            shadow: self.state.shadow,
        });
    }

    fn stroke_text(&mut self, text: &str, font: &FontSpec, center: Point, style: &StrokeStyle) {
        self.commands.push(DrawCmd::StrokeText {
            text: text.to_string(),
            font: font.clone(),
            center,
            style: style.clone(),
            transform: self.state.transform,
            shadow: self.state.shadow,
        });
    }
}
