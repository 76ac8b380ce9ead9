use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use bstr::BStr;

use adg_hash::GitOid;

use crate::{DocumentStore, StoreError};

impl DocumentStore {
    /// Write a document's bytes to its content-addressed location.
    ///
    /// Creates the root, `objects/`, the per-algorithm directory, and the
    /// two-character fan-out directory as needed, each with mode 0700. An
    /// existing document at the target path is overwritten; identical
    /// content writes are therefore idempotent. On failure any directories
    /// created so far are left in place.
    pub fn write_document(&self, oid: &GitOid, bytes: &[u8]) -> Result<PathBuf, StoreError> {
        let mut path = self.ensure_root()?;

        path.push("objects");
        ensure_dir(&path)?;
        path.push(oid.algorithm().store_dir());
        ensure_dir(&path)?;

        path.push(oid.store_path());
        if let Some(fanout) = path.parent() {
            ensure_dir(fanout)?;
        }

        // TODO: remove directories created above when the document itself
        // fails to write.
        write_file(&path, bytes).map_err(|source| StoreError::WriteDocument {
            path: path.clone(),
            source,
        })?;

        Ok(path)
    }

    /// Create the root directory component by component and return it as a
    /// filesystem path. Runs of `/` collapse; a leading `/` anchors the
    /// walk at the filesystem root.
    fn ensure_root(&self) -> Result<PathBuf, StoreError> {
        if self.root().is_empty() {
            return Err(StoreError::EmptyRoot);
        }

        let mut path = if self.root().first() == Some(&b'/') {
            PathBuf::from("/")
        } else {
            PathBuf::new()
        };

        for component in self.root().split(|&b| b == b'/') {
            if component.is_empty() {
                continue;
            }
            path.push(component_as_os(component));
            ensure_dir(&path)?;
        }

        Ok(path)
    }
}

/// Create a directory with mode 0700, tolerating one that already exists.
fn ensure_dir(path: &Path) -> Result<(), StoreError> {
    let mut builder = fs::DirBuilder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    match builder.create(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
        Err(source) => Err(StoreError::CreateDir {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Create or truncate the document file with mode 0700 and write `bytes`.
fn write_file(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o700);
    }
    let mut file = options.open(path)?;
    file.write_all(bytes)
}

pub(crate) fn root_as_path(root: &BStr) -> PathBuf {
    let mut path = if root.first() == Some(&b'/') {
        PathBuf::from("/")
    } else {
        PathBuf::new()
    };
    for component in root.split(|&b| b == b'/') {
        if component.is_empty() {
            continue;
        }
        path.push(component_as_os(component));
    }
    path
}

#[cfg(unix)]
fn component_as_os(bytes: &[u8]) -> std::borrow::Cow<'_, std::ffi::OsStr> {
    use std::os::unix::ffi::OsStrExt;
    std::borrow::Cow::Borrowed(std::ffi::OsStr::from_bytes(bytes))
}

#[cfg(not(unix))]
fn component_as_os(bytes: &[u8]) -> std::borrow::Cow<'_, std::ffi::OsStr> {
    std::borrow::Cow::Owned(String::from_utf8_lossy(bytes).into_owned().into())
}
