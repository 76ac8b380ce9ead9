//! Content-addressed storage for OmniBOR documents.
//!
//! Each document lives at
//! `<root>/objects/gitoid_blob_<algo>/<xx>/<rest>` where `xx` is the first
//! two hex characters of the document's own gitoid and `<rest>` the
//! remainder. Every directory on the way, including the root itself, is
//! created on demand with mode 0700.

mod write;

use std::path::PathBuf;

use bstr::{BStr, BString};

use adg_hash::GitOid;

/// Interface to an OmniBOR document store rooted at a caller-supplied path.
///
/// The root is kept as raw bytes: dependency and result paths come from the
/// hosting assembler's command line and need not be valid UTF-8.
pub struct DocumentStore {
    root: BString,
}

impl DocumentStore {
    /// Open a store under `root`. Nothing is created until the first write.
    pub fn new(root: impl Into<BString>) -> Self {
        Self { root: root.into() }
    }

    /// The configured root, unmodified.
    pub fn root(&self) -> &BStr {
        self.root.as_ref()
    }

    /// The path a document with id `oid` is stored at.
    pub fn document_path(&self, oid: &GitOid) -> PathBuf {
        let mut path = write::root_as_path(self.root());
        path.push("objects");
        path.push(oid.algorithm().store_dir());
        path.push(oid.store_path());
        path
    }
}

/// Errors from document store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("empty document store root")]
    EmptyRoot,

    #[error("cannot create store directory '{path}': {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write document '{path}': {source}")]
    WriteDocument {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
