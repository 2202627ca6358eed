// Copyright 2025 the Labelcraft Authors
// SPDX-License-Identifier: Apache-2.0

//! High-resolution export.
//!
//! Exports always show the flat design. When the bottle view is active the
//! pipeline leaves it for the duration of the render and enters it again
//! afterwards; the selection is untouched by the detour and never drawn.

use crate::config::ExportConfig;
use crate::error::{EditorError, Result};
use crate::model::{ImageAsset, Scene};
use crate::render::{PixmapSurface, RenderOptions, SceneRenderer, Surface};
use crate::text::FontBook;
use crate::view_mode::ViewModeController;
use chrono::{DateTime, Local};
use image::{ImageFormat, RgbaImage};
use kurbo::{Rect, Size};
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// File name prefix of flat design exports
pub const DESIGN_PREFIX: &str = "customized-design";

/// File name prefix of bottle preview exports
pub const PREVIEW_PREFIX: &str = "bottle-preview";

/// `{prefix}-{YYYYmmddHHMMSS}.png`
pub fn export_file_name(prefix: &str, at: DateTime<Local>) -> String {
    format!("{}-{}.png", prefix, at.format("%Y%m%d%H%M%S"))
}

// ===== Exported Image =====

/// A rendered export with the name it should be saved under
#[derive(Debug, Clone)]
pub struct ExportedImage {
    pub file_name: String,
    pub image: RgbaImage,
}

impl ExportedImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Encode as PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut out = Cursor::new(Vec::new());
        self.image
            .write_to(&mut out, ImageFormat::Png)
            .map_err(|e| EditorError::Encode(e.to_string()))?;
        Ok(out.into_inner())
    }

    /// Write the PNG into `dir` under its file name. Nothing is written if
    /// encoding fails.
    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        let bytes = self.encode_png()?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, bytes).map_err(|source| EditorError::Write {
            path: path.clone(),
            source,
        })?;
        tracing::info!("Saved {}x{} export to {}", self.width(), self.height(), path.display());
        Ok(path)
    }
}

// ===== Upload Collaborator =====

/// Receives exported PNGs, e.g. an upload or cart service.
pub trait Uploader {
    /// Hand off `png` under `file_name`; returns the remote URL.
    fn upload(&mut self, png: &[u8], file_name: &str) -> Result<String>;
}

// ===== Pipeline =====

/// Renders scenes to images at export resolution
#[derive(Debug, Clone)]
pub struct ExportPipeline {
    config: ExportConfig,
}

impl ExportPipeline {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Render the flat design at `quality` surface pixels per logical unit.
    pub fn render_to_image(
        &self,
        scene: &mut Scene,
        view_mode: &mut ViewModeController,
        fonts: &FontBook,
        quality: f64,
    ) -> Result<RgbaImage> {
        let was_bottle = view_mode.exit_bottle(scene, fonts);
        let rendered = render_flat(scene, fonts, quality);
        if was_bottle {
            view_mode.enter_bottle(scene);
        }
        if let Err(err) = &rendered {
            tracing::error!("Export render failed: {}", err);
        }
        rendered
    }

    /// The downloadable design at the configured design quality.
    pub fn export_design(
        &self,
        scene: &mut Scene,
        view_mode: &mut ViewModeController,
        fonts: &FontBook,
        at: DateTime<Local>,
    ) -> Result<ExportedImage> {
        let image = self.render_to_image(scene, view_mode, fonts, self.config.design_quality)?;
        Ok(ExportedImage {
            file_name: export_file_name(DESIGN_PREFIX, at),
            image,
        })
    }

    /// The design composited onto the bottle mockup at the fixed label
    /// overlay. Fails with `MockupUnavailable` when there is no mockup.
    pub fn export_bottle_preview(
        &self,
        scene: &mut Scene,
        view_mode: &mut ViewModeController,
        fonts: &FontBook,
        mockup: Option<&ImageAsset>,
        at: DateTime<Local>,
    ) -> Result<ExportedImage> {
        let Some(mockup) = mockup else {
            tracing::error!("Bottle preview requested without a mockup image");
            return Err(EditorError::MockupUnavailable);
        };

        let quality = self.config.preview_quality;
        let design = self.render_to_image(scene, view_mode, fonts, self.config.preview_design_quality)?;
        let design = ImageAsset::from_rgba(design)?;

        let base = self.config.mockup.size();
        let mut surface =
            PixmapSurface::with_size(Size::new(base.width * quality, base.height * quality), fonts)?;
        surface.clear();
        surface.draw_image(mockup, mockup.natural_size().to_rect(), surface.size().to_rect());

        let overlay = self.config.overlay.rect();
        let overlay = Rect::new(
            overlay.x0 * quality,
            overlay.y0 * quality,
            overlay.x1 * quality,
            overlay.y1 * quality,
        );
        surface.draw_image(&design, design.natural_size().to_rect(), overlay);

        let image = surface.to_rgba_image()?;
        tracing::info!("Rendered bottle preview {}x{}", image.width(), image.height());
        Ok(ExportedImage {
            file_name: export_file_name(PREVIEW_PREFIX, at),
            image,
        })
    }

    /// Render the design and hand it to `uploader`. Returns the remote URL.
    pub fn post(
        &self,
        scene: &mut Scene,
        view_mode: &mut ViewModeController,
        fonts: &FontBook,
        uploader: &mut dyn Uploader,
        at: DateTime<Local>,
    ) -> Result<String> {
        let export = self.export_design(scene, view_mode, fonts, at)?;
        let png = export.encode_png()?;
        let url = uploader.upload(&png, &export.file_name).inspect_err(|err| {
            tracing::error!("Upload of {} failed: {}", export.file_name, err);
        })?;
        tracing::info!("Posted {} to {}", export.file_name, url);
        Ok(url)
    }
}

fn render_flat(scene: &Scene, fonts: &FontBook, quality: f64) -> Result<RgbaImage> {
    let display = scene.display_size();
    let mut surface = PixmapSurface::with_size(
        Size::new(display.width * quality, display.height * quality),
        fonts,
    )?;
    SceneRenderer::render(&mut surface, scene, &RenderOptions::export(quality, fonts));
    surface.to_rgba_image()
}
