// Copyright 2025 the Labelcraft Authors
// SPDX-License-Identifier: Apache-2.0

//! Error types for editor operations.
//!
//! Asset and export failures leave the scene untouched and are meant to be
//! shown to the user. Precondition failures (stale layer ids) are returned
//! to the caller as plain values.

use crate::model::LayerId;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the editor core
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Image has no pixels")]
    EmptyImage,

    #[error("Invalid font data for '{family}': {reason}")]
    FontData { family: String, reason: String },

    #[error("No layer with id {0:?}")]
    LayerNotFound(LayerId),

    #[error("Bottle preview is not available for this product.")]
    MockupUnavailable,

    #[error("Could not allocate a {width}x{height} render surface")]
    SurfaceAllocation { width: u32, height: u32 },

    #[error("Failed to encode export: {0}")]
    Encode(String),

    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Image decoder stopped unexpectedly: {0}")]
    Worker(String),

    #[error("Upload failed: {0}")]
    Upload(String),
}

impl EditorError {
    /// True for failures that should be shown to the user
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, Self::LayerNotFound(_))
    }
}

/// Result alias for editor operations
pub type Result<T> = std::result::Result<T, EditorError>;
