// Copyright 2025 the Labelcraft Authors
// SPDX-License-Identifier: Apache-2.0

//! Pointer, touch and keyboard interaction

pub mod controller;
pub mod cursor;
pub mod keyboard;
pub mod pointer;

pub use controller::{InteractionController, InteractionOutcome, InteractionState};
pub use cursor::CursorHint;
pub use keyboard::KeyCommand;
pub use pointer::{
    Modifiers, PointerEvent, PointerPhase, PointerSource, TouchAdapter, TouchPhase, TouchPoint,
};
