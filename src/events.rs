// Copyright 2025 the Labelcraft Authors
// SPDX-License-Identifier: Apache-2.0

//! Signals from the editor to the host.
//!
//! Delivery is fire-and-forget: `publish` never blocks and never fails.
//! Each subscriber owns the receiving end of its own channel and drains it
//! whenever it likes. Subscribers that have gone away are pruned on the
//! next publish.

use crate::model::LayerRef;
use crate::view_mode::ViewMode;
use std::sync::mpsc::{self, Receiver, Sender};

/// A signal published by an editor session
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    /// The scene changed and the canvas should be redrawn
    RedrawRequested,
    /// The selection moved to another layer, or was cleared
    SelectionChanged(Option<LayerRef>),
    /// A layer went away through the canvas (delete affordance)
    LayerRemoved(LayerRef),
    ViewModeChanged(ViewMode),
    /// Ask the host's step navigation to move to a step
    StepChangeRequested(u32),
    /// An export produced an image
    ExportFinished {
        file_name: String,
        width: u32,
        height: u32,
    },
    /// A failure the host should show to the user
    UserMessage(String),
}

/// Observer registry built on `mpsc` channels
#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Vec<Sender<EditorEvent>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new observer.
    pub fn subscribe(&mut self) -> Receiver<EditorEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Send `event` to every live subscriber.
    pub fn publish(&mut self, event: EditorEvent) {
        tracing::trace!("[EventBus::publish] {:?}", event);
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}
