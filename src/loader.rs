// Copyright 2025 the Labelcraft Authors
// SPDX-License-Identifier: Apache-2.0

//! Background image decoding.
//!
//! Each request decodes on its own worker thread and reports back over a
//! channel. Completions are only ever applied on the editor thread, when
//! the session drains them, so they act on the scene as it is then rather
//! than as it was when the request was made.

use crate::error::{EditorError, Result};
use crate::model::{ImageAsset, SourceId};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

/// What a decoded image is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPurpose {
    /// Replaces the scene background
    Background,
    /// Placed as a new image layer
    Layer { source: Option<SourceId> },
    /// The bottle mockup used by the preview export
    Mockup,
}

/// Where the encoded bytes come from
#[derive(Debug, Clone)]
pub enum LoadSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

/// A finished request
#[derive(Debug)]
pub struct LoadCompletion {
    pub ticket: u64,
    pub purpose: LoadPurpose,
    pub result: Result<Arc<ImageAsset>>,
}

/// Spawns decode jobs and collects their results
#[derive(Debug)]
pub struct AssetLoader {
    tx: Sender<LoadCompletion>,
    rx: Receiver<LoadCompletion>,
    next_ticket: u64,
    pending: usize,
}

impl Default for AssetLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetLoader {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            tx,
            rx,
            next_ticket: 1,
            pending: 0,
        }
    }

    /// Number of requests that have not been collected yet
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Start decoding `source` in the background. Returns a ticket that
    /// identifies the completion.
    pub fn request(&mut self, source: LoadSource, purpose: LoadPurpose) -> u64 {
        self.spawn(purpose, move || match source {
            LoadSource::Path(path) => ImageAsset::open(&path),
            LoadSource::Bytes(bytes) => ImageAsset::decode(&bytes),
        })
    }

    /// Run `job` on a worker thread. Every job reports exactly one
    /// completion, including one that panics.
    fn spawn<F>(&mut self, purpose: LoadPurpose, job: F) -> u64
    where
        F: FnOnce() -> Result<Arc<ImageAsset>> + Send + 'static,
    {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.pending += 1;

        tracing::debug!("[AssetLoader::request] #{} {:?}", ticket, purpose);
        let tx = self.tx.clone();
        std::thread::spawn(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(job)).unwrap_or_else(|payload| {
                let reason = panic_message(payload.as_ref());
                tracing::error!("Decode worker #{} panicked: {}", ticket, reason);
                Err(EditorError::Worker(reason))
            });
            // The loader may have been dropped; nobody is waiting then
            let _ = tx.send(LoadCompletion {
                ticket,
                purpose,
                result,
            });
        });
        ticket
    }

    /// Collect every completion that has arrived, without blocking.
    pub fn try_completions(&mut self) -> Vec<LoadCompletion> {
        let done: Vec<_> = self.rx.try_iter().collect();
        self.pending -= done.len();
        done
    }

    /// Block until every outstanding request has completed.
    pub fn wait_all(&mut self) -> Vec<LoadCompletion> {
        let mut done = Vec::with_capacity(self.pending);
        while self.pending > 0 {
            // The loader holds a sender itself, so the channel cannot close
            let Ok(completion) = self.rx.recv() else {
                break;
            };
            self.pending -= 1;
            done.push(completion);
        }
        done
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes() -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(8, 4, image::Rgba([1, 2, 3, 255]));
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn decodes_in_background() {
        let mut loader = AssetLoader::new();
        let ticket = loader.request(LoadSource::Bytes(png_bytes()), LoadPurpose::Background);
        assert_eq!(loader.pending(), 1);

        let done = loader.wait_all();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].ticket, ticket);
        assert_eq!(done[0].purpose, LoadPurpose::Background);
        let asset = done[0].result.as_ref().unwrap();
        assert_eq!((asset.width(), asset.height()), (8, 4));
        assert_eq!(loader.pending(), 0);
    }

    #[test]
    fn failures_are_reported_not_dropped() {
        let mut loader = AssetLoader::new();
        loader.request(LoadSource::Bytes(b"nope".to_vec()), LoadPurpose::Mockup);
        loader.request(
            LoadSource::Path(PathBuf::from("/nonexistent/mockup.png")),
            LoadPurpose::Mockup,
        );
        let done = loader.wait_all();
        assert_eq!(done.len(), 2);
        assert!(done.iter().all(|c| c.result.is_err()));
        assert!(done.iter().any(|c| matches!(c.result, Err(EditorError::Read { .. }))));
    }

    #[test]
    fn panicking_decode_still_completes() {
        let mut loader = AssetLoader::new();
        let ticket = loader.spawn(LoadPurpose::Mockup, || panic!("decoder blew up"));
        loader.request(LoadSource::Bytes(png_bytes()), LoadPurpose::Background);

        let done = loader.wait_all();
        assert_eq!(done.len(), 2);
        assert_eq!(loader.pending(), 0);
        let failed = done.iter().find(|c| c.ticket == ticket).unwrap();
        match &failed.result {
            Err(EditorError::Worker(reason)) => assert_eq!(reason, "decoder blew up"),
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn tickets_increase() {
        let mut loader = AssetLoader::new();
        let a = loader.request(LoadSource::Bytes(png_bytes()), LoadPurpose::Layer { source: None });
        let b = loader.request(LoadSource::Bytes(png_bytes()), LoadPurpose::Layer { source: None });
        assert!(b > a);
        loader.wait_all();
        assert!(loader.try_completions().is_empty());
    }
}
