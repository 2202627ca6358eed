// Copyright 2025 the Labelcraft Authors
// SPDX-License-Identifier: Apache-2.0

//! Ordered layer collections. Sequence order is z-order: last is topmost.

pub mod image_store;
pub mod text_store;

pub use image_store::ImageLayerStore;
pub use text_store::TextLayerStore;
