use std::path::PathBuf;

use bstr::{BStr, BString};

use crate::manifest::{DepRecord, NoteRecord};
use crate::platform::filenames_equal;

/// Tracks the input files consumed while producing one output object.
///
/// Owns everything the subsystem needs: the ordered dependency registry,
/// the per-dependency gitoid cache shared by the SHA-1 and SHA-256 passes,
/// the `.note.omnibor` sidecar records, and the make-rule output path.
#[derive(Default)]
pub struct DependencyTracker {
    /// Where to write the make rule, if requested.
    pub(crate) dep_output: Option<PathBuf>,
    /// Whether OmniBOR document building was requested; keeps the registry
    /// alive even without a make-rule output.
    pub(crate) omnibor_enabled: bool,
    /// Registered dependency paths, insertion order, no duplicates.
    pub(crate) deps: Vec<BString>,
    /// Cached gitoids, populated lazily per algorithm.
    pub(crate) records: Vec<DepRecord>,
    /// Note-section contents supplied by the object reader.
    pub(crate) notes: Vec<NoteRecord>,
}

impl DependencyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start saving dependencies, to be written as a make rule to `path`.
    pub fn start_dependencies(&mut self, path: impl Into<PathBuf>) {
        self.dep_output = Some(path.into());
    }

    /// Enable OmniBOR document building. Dependencies are then retained
    /// even if no make-rule output was configured.
    pub fn enable_omnibor(&mut self) {
        self.omnibor_enabled = true;
    }

    pub fn is_omnibor_enabled(&self) -> bool {
        self.omnibor_enabled
    }

    /// Noticed a new input file; register it unless tracking is off or it
    /// is already present under the platform filename comparison.
    pub fn register_dependency(&mut self, filename: impl AsRef<[u8]>) {
        if self.dep_output.is_none() && !self.omnibor_enabled {
            return;
        }
        let filename = filename.as_ref();
        if self.deps.iter().any(|d| filenames_equal(d, filename)) {
            return;
        }
        self.deps.push(BString::from(filename));
    }

    /// The registered dependencies in registration order.
    pub fn dependencies(&self) -> impl Iterator<Item = &BStr> {
        self.deps.iter().map(|d| d.as_ref())
    }

    /// Drop the cached per-dependency gitoids. The registry itself stays.
    pub fn clear_deps(&mut self) {
        self.records.clear();
    }

    /// Drop all recorded note-section contents.
    pub fn clear_note_sections(&mut self) {
        self.notes.clear();
    }
}
