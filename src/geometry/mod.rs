// Copyright 2025 the Labelcraft Authors
// SPDX-License-Identifier: Apache-2.0

//! View state and coordinate transforms

pub mod transform;
pub mod view_state;

pub use transform::{GeometryTransform, SurfaceLayout};
pub use view_state::ViewState;
