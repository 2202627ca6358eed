// Copyright 2025 the Labelcraft Authors
// SPDX-License-Identifier: Apache-2.0

//! Selection chrome for the selected layer.

use super::{StrokeStyle, Surface};
use crate::model::{ImageLayer, ResizeHandle, Scene, Selection, TextLayer};
use crate::settings;
use crate::text::{TextBounds, TextMeasurer};
use crate::theme;
use kurbo::{BezPath, Circle, Ellipse, Rect, Shape};
use peniko::Color;

const TOLERANCE: f64 = 0.1;

/// Draw the outline, handles and affordances of whatever is selected.
pub(super) fn draw_selection(surface: &mut dyn Surface, scene: &Scene, measurer: &dyn TextMeasurer) {
    match scene.selection {
        Selection::Image(id) => {
            if let Some(layer) = scene.images.get(id) {
                draw_image_selection(surface, layer);
            }
        }
        Selection::Text(id) => {
            if let Some(layer) = scene.texts.get(id) {
                draw_text_selection(surface, layer, measurer);
            }
        }
        Selection::None => {}
    }
}

fn draw_image_selection(surface: &mut dyn Surface, layer: &ImageLayer) {
    use theme::image_selection as chrome;
    use theme::selection_stroke as stroke;

    let bounds = layer.bounds();
    let outline = bounds.inflate(chrome::OUTLINE_INSET, chrome::OUTLINE_INSET);
    surface.stroke_path(
        &outline.to_path(TOLERANCE),
        &StrokeStyle::dashed(chrome::OUTLINE, stroke::OUTLINE_WIDTH, &stroke::DASH),
    );
    let inner = bounds.inflate(chrome::INNER_INSET, chrome::INNER_INSET);
    surface.stroke_path(
        &inner.to_path(TOLERANCE),
        &StrokeStyle::solid(chrome::INNER, stroke::INNER_WIDTH),
    );

    for handle in ResizeHandle::ALL {
        draw_handle(surface, layer.handle_rect(handle), chrome::HANDLE_FILL, chrome::HANDLE_BORDER);
    }

    draw_delete_icon(surface, layer.delete_icon_rect());
}

fn draw_delete_icon(surface: &mut dyn Surface, icon: Rect) {
    use theme::delete_icon;

    let center = icon.center();
    let disc = Circle::new(center, icon.width() / 2.0).to_path(TOLERANCE);
    surface.fill_path(&disc, delete_icon::FILL);
    surface.stroke_path(
        &disc,
        &StrokeStyle::solid(delete_icon::BORDER, delete_icon::BORDER_WIDTH),
    );

    let arm = delete_icon::CROSS_SIZE / 2.0;
    let mut cross = BezPath::new();
    cross.move_to((center.x - arm, center.y - arm));
    cross.line_to((center.x + arm, center.y + arm));
    cross.move_to((center.x + arm, center.y - arm));
    cross.line_to((center.x - arm, center.y + arm));
    surface.stroke_path(
        &cross,
        &StrokeStyle::solid(delete_icon::CROSS, delete_icon::CROSS_WIDTH),
    );
}

fn draw_text_selection(surface: &mut dyn Surface, layer: &TextLayer, measurer: &dyn TextMeasurer) {
    use theme::selection_stroke as stroke;
    use theme::text_selection as chrome;

    // Bounds are derived fresh; the cached size on the layer is not trusted.
    let bounds = TextBounds::compute(layer, measurer);
    let corners = bounds.corners(0.0);

    let mut outline = BezPath::new();
    outline.move_to(corners[0]);
    for corner in &corners[1..] {
        outline.line_to(*corner);
    }
    outline.close_path();
    surface.stroke_path(
        &outline,
        &StrokeStyle::dashed(chrome::OUTLINE, stroke::OUTLINE_WIDTH, &stroke::DASH),
    );
    surface.stroke_path(&outline, &StrokeStyle::solid(chrome::INNER, stroke::INNER_WIDTH));

    if matches!(bounds, TextBounds::Curve { .. }) {
        let guide = Ellipse::from_rect(bounds.local_rect(0.0)).to_path(TOLERANCE);
        surface.stroke_path(
            &guide,
            &StrokeStyle::dashed(chrome::OUTLINE, stroke::INNER_WIDTH, &stroke::DASH),
        );
    }

    let size = settings::text::HANDLE_SIZE;
    for corner in corners {
        let square = Rect::from_center_size(corner, (size, size));
        draw_handle(surface, square, chrome::HANDLE_FILL, chrome::HANDLE_BORDER);
    }
}

fn draw_handle(surface: &mut dyn Surface, rect: Rect, fill: Color, border: Color) {
    surface.fill_rect(rect, fill);
    surface.stroke_path(
        &rect.to_path(TOLERANCE),
        &StrokeStyle::solid(border, theme::selection_stroke::HANDLE_BORDER_WIDTH),
    );
}
