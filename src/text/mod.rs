// Copyright 2025 the Labelcraft Authors
// SPDX-License-Identifier: Apache-2.0

//! Text measurement, glyph layout and bounds.
//!
//! Measurement is a pure function of the string and a `FontSpec`; there is
//! no ambient "current font" to save and restore. The same `TextMeasurer`
//! drives layout for bounds, hit testing and rendering, so the selection
//! outline always matches the drawn glyphs.

pub mod bounds;
pub mod font_book;
pub mod layout;

pub use bounds::TextBounds;
pub use font_book::FontBook;
pub use layout::{GlyphRun, PlacedGlyph};

/// Font selection for one text run
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: String,
    /// Size in px
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
}

impl FontSpec {
    /// Regular face of `family` at `size`
    pub fn new(family: impl Into<String>, size: f64) -> Self {
        Self {
            family: family.into(),
            size,
            bold: false,
            italic: false,
        }
    }

    /// CSS-style shorthand, e.g. `italic bold 24px Arial`.
    pub fn css(&self) -> String {
        let mut out = String::new();
        if self.italic {
            out.push_str("italic ");
        }
        if self.bold {
            out.push_str("bold ");
        }
        out.push_str(&format!("{}px {}", self.size, self.family));
        out
    }
}

/// Pure text measurement under an explicit font.
pub trait TextMeasurer {
    /// Horizontal advance of `text` set in `font`.
    fn measure(&self, text: &str, font: &FontSpec) -> f64;

    /// Distance from the vertical middle of the line box down to the
    /// baseline.
    fn middle_to_baseline(&self, font: &FontSpec) -> f64;
}
