// Copyright 2025 the Labelcraft Authors
// SPDX-License-Identifier: Apache-2.0

//! Decoded raster images shared between layers.
//!
//! An `ImageAsset` is decoded once and then only ever read. Layers, the
//! background and the bottle mockup hold it behind an `Arc`; dropping the
//! last reference frees the pixels.

use crate::error::{EditorError, Result};
use std::path::Path;
use std::sync::Arc;
use tiny_skia::Pixmap;

/// A decoded image, stored premultiplied for compositing.
pub struct ImageAsset {
    pixmap: Pixmap,
}

impl std::fmt::Debug for ImageAsset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageAsset")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

impl ImageAsset {
    /// Decode an encoded image (PNG or JPEG).
    pub fn decode(bytes: &[u8]) -> Result<Arc<Self>> {
        let img = image::load_from_memory(bytes)?;
        Self::from_rgba(img.to_rgba8())
    }

    /// Read and decode an image file.
    pub fn open(path: &Path) -> Result<Arc<Self>> {
        let bytes = std::fs::read(path).map_err(|source| EditorError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let asset = Self::decode(&bytes)?;
        tracing::debug!(
            "[ImageAsset::open] {} ({}x{})",
            path.display(),
            asset.width(),
            asset.height()
        );
        Ok(asset)
    }

    /// Wrap straight-alpha RGBA pixels.
    pub fn from_rgba(rgba: image::RgbaImage) -> Result<Arc<Self>> {
        let (width, height) = rgba.dimensions();
        let mut pixmap = Pixmap::new(width, height).ok_or(EditorError::EmptyImage)?;
        let mut data = rgba.into_raw();
        premultiply_in_place(&mut data);
        pixmap.data_mut().copy_from_slice(&data);
        Ok(Arc::new(Self { pixmap }))
    }

    /// Natural width in pixels
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Natural height in pixels
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Natural size as floating point, for layout math
    pub fn natural_size(&self) -> kurbo::Size {
        kurbo::Size::new(self.width() as f64, self.height() as f64)
    }

    pub(crate) fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }
}

fn premultiply_in_place(bytes: &mut [u8]) {
    for pixel in bytes.chunks_exact_mut(4) {
        let alpha = pixel[3] as u16;
        pixel[0] = ((pixel[0] as u16 * alpha + 127) / 255) as u8;
        pixel[1] = ((pixel[1] as u16 * alpha + 127) / 255) as u8;
        pixel[2] = ((pixel[2] as u16 * alpha + 127) / 255) as u8;
    }
}

#[cfg(test)]
pub(crate) fn solid_asset(width: u32, height: u32, rgba: [u8; 4]) -> Arc<ImageAsset> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    ImageAsset::from_rgba(img).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn decode_png_keeps_natural_size() {
        let asset = ImageAsset::decode(&png_bytes(30, 12)).unwrap();
        assert_eq!(asset.width(), 30);
        assert_eq!(asset.height(), 12);
        assert_eq!(asset.natural_size(), kurbo::Size::new(30.0, 12.0));
    }

    #[test]
    fn corrupt_bytes_fail_to_decode() {
        let err = ImageAsset::decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, EditorError::ImageDecode(_)));
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = ImageAsset::open(Path::new("/nonexistent/labelcraft.png")).unwrap_err();
        assert!(matches!(err, EditorError::Read { .. }));
    }

    #[test]
    fn half_transparent_pixels_are_premultiplied() {
        let asset = solid_asset(1, 1, [200, 100, 0, 128]);
        let px = asset.pixmap().pixels()[0];
        assert_eq!(px.alpha(), 128);
        assert_eq!(px.red(), 100);
        assert_eq!(px.green(), 50);
    }
}
