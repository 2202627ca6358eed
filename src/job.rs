// Copyright 2025 the Labelcraft Authors
// SPDX-License-Identifier: Apache-2.0

//! Render jobs for the command-line binary.
//!
//! A job is a TOML file describing a label: fonts to register, an optional
//! background, image and text layers, and where to write the exports.
//! Relative paths resolve against the job file's directory.
//!
//! ```toml
//! output_dir = "out"
//! mockup = "bottle.png"
//!
//! [[fonts]]
//! family = "Arial"
//! path = "fonts/Arial.ttf"
//!
//! [[texts]]
//! text = "HELLO"
//! x = 200.0
//! y = 300.0
//! ```

use crate::config::EditorConfig;
use crate::loader::LoadSource;
use crate::model::{CurveParams, ImageAsset, SourceId, TextEffects, TextLayer, parse_color};
use crate::session::EditorSession;
use anyhow::{Context, Result, bail};
use kurbo::Rect;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct FontEntry {
    pub family: String,
    pub path: PathBuf,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageEntry {
    pub path: PathBuf,
    /// `[x, y, width, height]`; fitted and centered when absent
    pub rect: Option<[f64; 4]>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextEntry {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_family: Option<String>,
    pub font_size: Option<f64>,
    /// CSS color string
    pub color: Option<String>,
    pub rotation: Option<f64>,
    pub letter_spacing: Option<f64>,
    #[serde(default)]
    pub effects: TextEffects,
    pub curve: Option<CurveParams>,
}

/// A label to render
#[derive(Debug, Clone, Deserialize)]
pub struct RenderJob {
    /// Editor configuration file
    pub config: Option<PathBuf>,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    pub background: Option<PathBuf>,
    /// Bottle mockup; a bottle preview is written when present
    pub mockup: Option<PathBuf>,
    #[serde(default)]
    pub fonts: Vec<FontEntry>,
    #[serde(default)]
    pub images: Vec<ImageEntry>,
    #[serde(default)]
    pub texts: Vec<TextEntry>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl RenderJob {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("Invalid render job")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read job file {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("In {}", path.display()))
    }

    /// Build the session this job describes. `base` is the directory
    /// relative paths resolve against.
    pub fn build_session(&self, base: &Path) -> Result<EditorSession> {
        let config = match &self.config {
            Some(path) => {
                let path = base.join(path);
                EditorConfig::load(&path)
                    .with_context(|| format!("Failed to load config {}", path.display()))?
            }
            None => EditorConfig::default(),
        };
        let mut session = EditorSession::new(config);

        for font in &self.fonts {
            let path = base.join(&font.path);
            session
                .fonts_mut()
                .register_file(&font.family, font.bold, font.italic, &path)
                .with_context(|| format!("Failed to register font {}", path.display()))?;
        }

        // Decode everything in parallel, then apply in job order
        if let Some(background) = &self.background {
            session.load_background(LoadSource::Path(base.join(background)));
        }
        if let Some(mockup) = &self.mockup {
            session.load_mockup(LoadSource::Path(base.join(mockup)));
        }
        let decoded = self
            .images
            .iter()
            .map(|entry| {
                let path = base.join(&entry.path);
                ImageAsset::open(&path)
                    .with_context(|| format!("Failed to load image {}", path.display()))
            })
            .collect::<Result<Vec<_>>>()?;
        session.wait_for_loads();
        if self.background.is_some() && session.scene().background.is_none() {
            bail!("Background image could not be loaded");
        }

        for (index, (entry, asset)) in self.images.iter().zip(decoded).enumerate() {
            let rect = entry
                .rect
                .map(|[x, y, w, h]| Rect::from_origin_size((x, y), (w, h)));
            session.add_image(asset, Some(SourceId(index as u64)), rect);
        }

        for entry in &self.texts {
            let layer = entry.to_layer()?;
            session.add_text(layer);
        }
        session.set_selection(None)?;
        Ok(session)
    }

    /// Build the session and write its exports. Returns the written files.
    pub fn run(&self, base: &Path) -> Result<Vec<PathBuf>> {
        let mut session = self.build_session(base)?;
        let out_dir = base.join(&self.output_dir);
        std::fs::create_dir_all(&out_dir)
            .with_context(|| format!("Failed to create {}", out_dir.display()))?;

        let mut written = Vec::new();
        let design = session.export_design().context("Design export failed")?;
        written.push(design.save(&out_dir)?);

        if self.mockup.is_some() {
            let preview = session
                .export_bottle_preview()
                .context("Bottle preview export failed")?;
            written.push(preview.save(&out_dir)?);
        }
        Ok(written)
    }
}

impl TextEntry {
    fn to_layer(&self) -> Result<TextLayer> {
        let mut layer = TextLayer::new(self.x, self.y);
        layer.text.clone_from(&self.text);
        if let Some(family) = &self.font_family {
            layer.font_family.clone_from(family);
        }
        if let Some(size) = self.font_size {
            layer.font_size = size.max(1.0);
        }
        if let Some(color) = &self.color {
            layer.color = match parse_color(color) {
                Some(c) => c,
                None => bail!("Invalid color '{}' for text '{}'", color, self.text),
            };
        }
        if let Some(rotation) = self.rotation {
            layer.rotation = rotation.rem_euclid(360.0);
        }
        if let Some(spacing) = self.letter_spacing {
            layer.letter_spacing = spacing;
        }
        layer.effects = self.effects;
        if let Some(curve) = self.curve {
            layer.curve = curve;
        }
        Ok(layer)
    }
}
