// Copyright 2025 the Labelcraft Authors
// SPDX-License-Identifier: Apache-2.0

//! Unique identifiers for layers and uploaded image sources.
//!
//! Each `LayerId` is a monotonically increasing `u64` generated from a global
//! atomic counter. IDs are never reused within a session, so a host holding
//! the id of a deleted layer gets a clean `LayerNotFound` rather than
//! silently editing whatever took its slot.

use std::sync::atomic::{AtomicU64, Ordering};

/// A unique identifier for a text or image layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayerId(u64);

static LAYER_COUNTER: AtomicU64 = AtomicU64::new(1);

impl LayerId {
    /// Create a new unique layer ID
    pub fn next() -> Self {
        Self(LAYER_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw value, for hosts that key their own widgets by layer
    pub fn get(self) -> u64 {
        self.0
    }
}

impl Default for LayerId {
    fn default() -> Self {
        Self::next()
    }
}

/// Identifier of an uploaded image owned by the host's image list.
///
/// Several layers may be placed from the same source; removing the source
/// removes all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceId(pub u64);
