//! OmniBOR document building.
//!
//! A document lists one `blob <gitoid>` line per registered dependency,
//! sorted ascending by the hex of the gitoid, preceded by a
//! `gitoid:blob:<algo>` header. A dependency whose object file already
//! carries a `.note.omnibor` section gets a ` bom <id>` reference appended
//! verbatim. The document's own gitoid names it in the store and becomes
//! the output's artifact identifier.

use bstr::{BStr, BString, ByteVec};

use adg_hash::{gitoid_of_bytes, gitoid_of_file, GitOid, HashAlgorithm};
use adg_store::DocumentStore;

use crate::platform::{filename_to_path, filenames_equal};
use crate::tracker::DependencyTracker;
use crate::Result;

/// Cached gitoids for one dependency, shared across the SHA-1 and SHA-256
/// passes. Either column may be absent until the matching pass runs.
pub(crate) struct DepRecord {
    pub(crate) name: BString,
    sha1_hex: Option<String>,
    sha256_hex: Option<String>,
}

impl DepRecord {
    fn new(name: BString) -> Self {
        Self {
            name,
            sha1_hex: None,
            sha256_hex: None,
        }
    }

    fn hex(&self, algo: HashAlgorithm) -> Option<&str> {
        match algo {
            HashAlgorithm::Sha1 => self.sha1_hex.as_deref(),
            HashAlgorithm::Sha256 => self.sha256_hex.as_deref(),
        }
    }

    fn set_hex(&mut self, algo: HashAlgorithm, hex: String) {
        match algo {
            HashAlgorithm::Sha1 => self.sha1_hex = Some(hex),
            HashAlgorithm::Sha256 => self.sha256_hex = Some(hex),
        }
    }
}

/// The `.note.omnibor` contents reported for one dependency.
///
/// The hex strings are caller-supplied and copied into document lines
/// verbatim; nothing validates them against the dependency's contents.
pub(crate) struct NoteRecord {
    name: BString,
    sha1_hex: Option<BString>,
    sha256_hex: Option<BString>,
}

impl NoteRecord {
    fn hex(&self, algo: HashAlgorithm) -> Option<&BStr> {
        match algo {
            HashAlgorithm::Sha1 => self.sha1_hex.as_ref().map(|b| BStr::new(b)),
            HashAlgorithm::Sha256 => self.sha256_hex.as_ref().map(|b| BStr::new(b)),
        }
    }
}

impl DependencyTracker {
    /// Record the `.note.omnibor` contents found in a dependency's object
    /// file. Duplicate records are kept; lookups see the first one.
    pub fn add_note_section(
        &mut self,
        filename: impl AsRef<[u8]>,
        sha1_hex: Option<&[u8]>,
        sha256_hex: Option<&[u8]>,
    ) {
        self.notes.push(NoteRecord {
            name: BString::from(filename.as_ref()),
            sha1_hex: sha1_hex.map(BString::from),
            sha256_hex: sha256_hex.map(BString::from),
        });
    }

    /// Build the OmniBOR document for the registered dependencies, place
    /// it in the store under `result_root`, and return its gitoid.
    ///
    /// Dependencies that cannot be read are skipped. Gitoids computed by
    /// an earlier pass (either algorithm) are reused from the cache.
    pub fn write_omnibor(
        &mut self,
        algo: HashAlgorithm,
        result_root: impl AsRef<[u8]>,
    ) -> Result<GitOid> {
        self.hash_pending_deps(algo);

        let body = self.render_document(algo);
        let oid = gitoid_of_bytes(algo, &body)?;

        DocumentStore::new(result_root.as_ref()).write_document(&oid, &body)?;
        Ok(oid)
    }

    /// As [`write_omnibor`](Self::write_omnibor) with SHA-1, returning the
    /// hex identifier, or an empty string on failure.
    pub fn write_sha1_omnibor(&mut self, result_root: impl AsRef<[u8]>) -> String {
        self.write_omnibor(HashAlgorithm::Sha1, result_root)
            .map(|oid| oid.to_hex())
            .unwrap_or_default()
    }

    /// As [`write_omnibor`](Self::write_omnibor) with SHA-256, returning
    /// the hex identifier, or an empty string on failure.
    pub fn write_sha256_omnibor(&mut self, result_root: impl AsRef<[u8]>) -> String {
        self.write_omnibor(HashAlgorithm::Sha256, result_root)
            .map(|oid| oid.to_hex())
            .unwrap_or_default()
    }

    /// Fill the `algo` column of the record cache for every registered
    /// dependency that does not have it yet. Unreadable files leave no
    /// record behind for this pass.
    fn hash_pending_deps(&mut self, algo: HashAlgorithm) {
        for dep in &self.deps {
            let position = self
                .records
                .iter()
                .position(|r| filenames_equal(&r.name, dep));

            if let Some(i) = position {
                if self.records[i].hex(algo).is_some() {
                    continue;
                }
            }

            let Ok(oid) = gitoid_of_file(algo, &filename_to_path(dep)) else {
                continue;
            };

            match position {
                Some(i) => self.records[i].set_hex(algo, oid.to_hex()),
                None => {
                    let mut record = DepRecord::new(dep.clone());
                    record.set_hex(algo, oid.to_hex());
                    self.records.push(record);
                }
            }
        }
    }

    /// Serialize the document body: header, then one line per cached
    /// record that carries this algorithm's gitoid, sorted by that hex.
    fn render_document(&self, algo: HashAlgorithm) -> BString {
        let mut lines: Vec<(&str, &BString)> = self
            .records
            .iter()
            .filter_map(|r| r.hex(algo).map(|hex| (hex, &r.name)))
            .collect();
        lines.sort_by(|a, b| a.0.cmp(b.0));

        let mut body = BString::from(format!("gitoid:blob:{algo}\n"));
        for (hex, name) in lines {
            body.push_str("blob ");
            body.push_str(hex);
            if let Some(note) = self.note_for(name, algo) {
                body.push_str(" bom ");
                body.push_str(note);
            }
            body.push_str("\n");
        }
        body
    }

    /// First note recorded for `name` that carries this algorithm's id.
    fn note_for(&self, name: &[u8], algo: HashAlgorithm) -> Option<&BStr> {
        self.notes
            .iter()
            .find(|n| filenames_equal(&n.name, name))
            .and_then(|n| n.hex(algo))
    }
}
