// Copyright 2025 the Labelcraft Authors
// SPDX-License-Identifier: Apache-2.0

//! Scene data model

pub mod asset;
pub mod image_layer;
pub mod layer_id;
pub mod scene;
pub mod selection;
pub mod text_layer;

pub use asset::ImageAsset;
pub use image_layer::{ImageLayer, ResizeHandle, ResizeLimits, resize_rect};
pub use layer_id::{LayerId, SourceId};
pub use scene::Scene;
pub use selection::{LayerRef, Selection};
pub use text_layer::{CurveDirection, CurveParams, TextEffects, TextLayer, TextPatch, parse_color};
