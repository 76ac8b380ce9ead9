//! Dependency tracking and artifact identity for an assembler.
//!
//! While producing an output object the assembler registers every input
//! file it opens with a [`DependencyTracker`]. At finalization the tracker
//! can emit a `make`-compatible dependency rule for those inputs, and can
//! build an OmniBOR document: one `blob <gitoid>` line per input (plus a
//! ` bom <id>` reference when the input carries its own OmniBOR note),
//! sorted by gitoid, content-addressed into a document store, with the
//! document's own gitoid serving as the output's artifact identifier.
//!
//! All state lives in the tracker value; the hosting assembler owns one
//! per process and drives it from its single thread.

mod makefile;
mod manifest;
mod platform;
mod tracker;

use std::path::PathBuf;

pub use tracker::DependencyTracker;

pub use adg_hash::{GitOid, HashAlgorithm};

/// Errors surfaced to the hosting assembler.
///
/// Per-dependency read failures never show up here; unreadable inputs are
/// skipped during document building.
#[derive(Debug, thiserror::Error)]
pub enum DepsError {
    #[error("cannot write dependency rule to '{path}': {source}")]
    MakeOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Hash(#[from] adg_hash::HashError),

    #[error(transparent)]
    Store(#[from] adg_store::StoreError),
}

pub type Result<T> = std::result::Result<T, DepsError>;
