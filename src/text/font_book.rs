// Copyright 2025 the Labelcraft Authors
// SPDX-License-Identifier: Apache-2.0

//! Registered font faces, keyed by family and style.
//!
//! Measurement and glyph outlines come from the same face, so the width a
//! layer is laid out with is the width that gets rasterized. When a
//! requested style is missing the book falls back to the family's regular
//! face, then to the default family, and finally to a fixed average
//! advance with no outlines at all. None of these fallbacks is an error.

use super::{FontSpec, TextMeasurer};
use crate::error::{EditorError, Result};
use crate::settings;
use kurbo::BezPath;
use peniko::Blob;
use skrifa::instance::{LocationRef, Size};
use skrifa::metrics::GlyphMetrics;
use skrifa::outline::OutlinePen;
use skrifa::{FontRef, GlyphId, MetadataProvider};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FaceKey {
    family: String,
    bold: bool,
    italic: bool,
}

impl FaceKey {
    fn new(family: &str, bold: bool, italic: bool) -> Self {
        Self {
            family: family.trim().to_lowercase(),
            bold,
            italic,
        }
    }
}

#[derive(Clone)]
struct FontFace {
    data: Blob<u8>,
    index: u32,
}

impl FontFace {
    fn font_ref(&self) -> Option<FontRef<'_>> {
        FontRef::from_index(self.data.data(), self.index).ok()
    }
}

/// A registry of font faces usable for layout and rasterization.
#[derive(Clone, Default)]
pub struct FontBook {
    faces: HashMap<FaceKey, FontFace>,
    default_family: Option<String>,
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook")
            .field("faces", &self.faces.len())
            .field("default_family", &self.default_family)
            .finish()
    }
}

impl FontBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered faces
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Register a face from font file bytes. The first family registered
    /// becomes the default fallback.
    pub fn register(
        &mut self,
        family: &str,
        bold: bool,
        italic: bool,
        bytes: Vec<u8>,
    ) -> Result<()> {
        if let Err(e) = FontRef::from_index(&bytes, 0) {
            return Err(EditorError::FontData {
                family: family.to_string(),
                reason: e.to_string(),
            });
        }

        let key = FaceKey::new(family, bold, italic);
        if self.default_family.is_none() {
            self.default_family = Some(key.family.clone());
        }
        tracing::info!(
            "Registered font '{}' (bold={}, italic={})",
            family,
            bold,
            italic
        );
        self.faces.insert(
            key,
            FontFace {
                data: Blob::from(bytes),
                index: 0,
            },
        );
        Ok(())
    }

    /// Register a face from a font file on disk.
    pub fn register_file(
        &mut self,
        family: &str,
        bold: bool,
        italic: bool,
        path: &Path,
    ) -> Result<()> {
        let bytes = std::fs::read(path).map_err(|source| EditorError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.register(family, bold, italic, bytes)
    }

    /// Find the best available face for `font`.
    fn face_for(&self, font: &FontSpec) -> Option<&FontFace> {
        let exact = FaceKey::new(&font.family, font.bold, font.italic);
        if let Some(face) = self.faces.get(&exact) {
            return Some(face);
        }

        let regular = FaceKey::new(&font.family, false, false);
        if let Some(face) = self.faces.get(&regular) {
            tracing::debug!("[face_for] no styled face for '{}', using regular", font.family);
            return Some(face);
        }

        let fallback = self
            .default_family
            .as_ref()
            .and_then(|family| {
                self.faces
                    .get(&FaceKey::new(family, font.bold, font.italic))
                    .or_else(|| self.faces.get(&FaceKey::new(family, false, false)))
            })
            .or_else(|| self.faces.values().next());
        if fallback.is_some() {
            tracing::debug!("[face_for] family '{}' not registered, using default", font.family);
        }
        fallback
    }

    fn fallback_advance(font: &FontSpec) -> f64 {
        font.size * settings::text::FALLBACK_ADVANCE_EM
    }

    /// Outline of `text` set left to right, origin at the start of the
    /// baseline, y growing downward. Returns `None` when no face is
    /// available or nothing in the string has an outline.
    pub fn text_path(&self, text: &str, font: &FontSpec) -> Option<BezPath> {
        let face = self.face_for(font)?;
        let font_ref = face.font_ref()?;
        let size = Size::new(font.size as f32);
        let charmap = font_ref.charmap();
        let metrics = GlyphMetrics::new(&font_ref, size, LocationRef::default());
        let outlines = font_ref.outline_glyphs();

        let mut pen = PathPen::default();
        for ch in text.chars() {
            let gid = charmap.map(ch).unwrap_or(GlyphId::NOTDEF);
            if let Some(glyph) = outlines.get(gid) {
                if glyph.draw(size, &mut pen).is_err() {
                    tracing::debug!("[text_path] failed to draw glyph for {:?}", ch);
                }
            }
            pen.offset_x += metrics
                .advance_width(gid)
                .map(f64::from)
                .unwrap_or_else(|| Self::fallback_advance(font));
        }

        if pen.path.elements().is_empty() {
            None
        } else {
            Some(pen.path)
        }
    }
}

impl TextMeasurer for FontBook {
    fn measure(&self, text: &str, font: &FontSpec) -> f64 {
        let face_ref = self.face_for(font).and_then(FontFace::font_ref);
        let Some(font_ref) = face_ref else {
            return text.chars().count() as f64 * Self::fallback_advance(font);
        };

        let charmap = font_ref.charmap();
        let metrics = GlyphMetrics::new(&font_ref, Size::new(font.size as f32), LocationRef::default());
        text.chars()
            .map(|ch| {
                let gid = charmap.map(ch).unwrap_or(GlyphId::NOTDEF);
                metrics
                    .advance_width(gid)
                    .map(f64::from)
                    .unwrap_or_else(|| Self::fallback_advance(font))
            })
            .sum()
    }

    fn middle_to_baseline(&self, font: &FontSpec) -> f64 {
        let face_ref = self.face_for(font).and_then(FontFace::font_ref);
        match face_ref {
            Some(font_ref) => {
                let m = font_ref.metrics(Size::new(font.size as f32), LocationRef::default());
                f64::from(m.ascent + m.descent) / 2.0
            }
            // Typical Latin proportions: ascent 0.8 em, descent 0.2 em
            None => font.size * 0.3,
        }
    }
}

/// Collects skrifa outline commands into a y-down kurbo path.
#[derive(Default)]
struct PathPen {
    path: BezPath,
    offset_x: f64,
}

impl PathPen {
    fn pt(&self, x: f32, y: f32) -> (f64, f64) {
        (self.offset_x + f64::from(x), -f64::from(y))
    }
}

impl OutlinePen for PathPen {
    fn move_to(&mut self, x: f32, y: f32) {
        let p = self.pt(x, y);
        self.path.move_to(p);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let p = self.pt(x, y);
        self.path.line_to(p);
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        let c = self.pt(cx0, cy0);
        let p = self.pt(x, y);
        self.path.quad_to(c, p);
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        let c0 = self.pt(cx0, cy0);
        let c1 = self.pt(cx1, cy1);
        let p = self.pt(x, y);
        self.path.curve_to(c0, c1, p);
    }

    fn close(&mut self) {
        self.path.close_path();
    }
}
