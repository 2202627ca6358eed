// Copyright 2025 the Labelcraft Authors
// SPDX-License-Identifier: Apache-2.0

//! Labelcraft: a label design editor core
//!
//! Image and text layers on a fixed logical canvas, direct manipulation
//! through a pointer state machine, a scaled bottle preview, and
//! high-resolution export. Hosts drive everything through
//! [`EditorSession`].

pub mod config;
pub mod editing;
pub mod error;
pub mod events;
pub mod export;
pub mod geometry;
pub mod job;
pub mod loader;
pub mod model;
pub mod render;
pub mod session;
pub mod settings;
pub mod store;
pub mod text;
pub mod theme;
pub mod view_mode;

pub use config::EditorConfig;
pub use error::{EditorError, Result};
pub use events::EditorEvent;
pub use session::EditorSession;

use anyhow::Context;
use std::path::PathBuf;

const USAGE: &str = "Usage: labelcraft <job.toml>";

/// Entry point for the labelcraft command-line renderer
pub fn run() -> anyhow::Result<()> {
    // Controlled via RUST_LOG
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("labelcraft=info".parse()?),
        )
        .init();

    let Some(job_path) = job_path_from_args() else {
        eprintln!("{USAGE}");
        return Ok(());
    };

    let job = job::RenderJob::load(&job_path)?;
    let base = job_path
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let written = job
        .run(&base)
        .with_context(|| format!("Job {} failed", job_path.display()))?;
    for path in written {
        tracing::info!("Wrote {}", path.display());
    }
    Ok(())
}

/// The job file named on the command line
fn job_path_from_args() -> Option<PathBuf> {
    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        None | Some("-h") | Some("--help") => None,
        Some(path) => Some(PathBuf::from(path)),
    }
}
