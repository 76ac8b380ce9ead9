//! Streaming hash computation and the git blob framing.

use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use crate::{GitOid, HashAlgorithm, HashError};

/// Incremental SHA-1 / SHA-256 hasher producing a [`GitOid`].
///
/// SHA-1 runs with collision detection; a detected collision surfaces as
/// [`HashError::Sha1Collision`] at finalization. The boxed SHA-1 state is
/// large, hence the indirection.
pub enum Hasher {
    Sha1(Box<sha1_checked::Sha1>),
    Sha256(sha2::Sha256),
}

impl Hasher {
    /// Create a hasher for the given algorithm.
    pub fn new(algo: HashAlgorithm) -> Self {
        use digest::Digest;
        match algo {
            HashAlgorithm::Sha1 => Self::Sha1(Box::new(sha1_checked::Sha1::new())),
            HashAlgorithm::Sha256 => Self::Sha256(sha2::Sha256::new()),
        }
    }

    /// Feed bytes into the hasher.
    pub fn update(&mut self, data: &[u8]) {
        use digest::Digest;
        match self {
            Self::Sha1(h) => h.update(data),
            Self::Sha256(h) => h.update(data),
        }
    }

    /// Finalize into a [`GitOid`].
    pub fn finalize(self) -> Result<GitOid, HashError> {
        match self {
            Self::Sha1(h) => {
                let result = h.try_finalize();
                if result.has_collision() {
                    return Err(HashError::Sha1Collision);
                }
                let mut raw = [0u8; 20];
                raw.copy_from_slice(result.hash().as_slice());
                Ok(GitOid::Sha1(raw))
            }
            Self::Sha256(h) => {
                use digest::Digest;
                let mut raw = [0u8; 32];
                raw.copy_from_slice(h.finalize().as_slice());
                Ok(GitOid::Sha256(raw))
            }
        }
    }
}

impl std::io::Write for Hasher {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Compute the gitoid of a byte buffer.
///
/// The hashed stream is `"blob " <decimal-length> "\0" <data>`; the NUL
/// terminating the header is included. A zero-length buffer hashes the
/// header `blob 0\0` alone.
pub fn gitoid_of_bytes(algo: HashAlgorithm, data: &[u8]) -> Result<GitOid, HashError> {
    let mut hasher = Hasher::new(algo);
    hasher.update(format!("blob {}\0", data.len()).as_bytes());
    hasher.update(data);
    hasher.finalize()
}

/// Compute the gitoid of a file's contents.
///
/// The size for the blob header is taken by seeking to the end of the file,
/// then the whole file is read into memory and hashed.
pub fn gitoid_of_file(algo: HashAlgorithm, path: &Path) -> Result<GitOid, HashError> {
    let mut file = std::fs::File::open(path)?;
    let size = file.seek(SeekFrom::End(0))?;
    file.seek(SeekFrom::Start(0))?;

    let mut contents = Vec::with_capacity(size as usize);
    file.read_to_end(&mut contents)?;

    gitoid_of_bytes(algo, &contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn streaming_matches_one_shot() {
        for algo in [HashAlgorithm::Sha1, HashAlgorithm::Sha256] {
            let one_shot = gitoid_of_bytes(algo, b"some contents").unwrap();

            let mut hasher = Hasher::new(algo);
            hasher.update(b"blob 13\0");
            hasher.update(b"some ");
            hasher.update(b"contents");
            assert_eq!(hasher.finalize().unwrap(), one_shot);
        }
    }

    #[test]
    fn write_impl_feeds_hasher() {
        use std::io::Write;
        let mut hasher = Hasher::new(HashAlgorithm::Sha256);
        hasher.write_all(b"blob 2\0").unwrap();
        hasher.write_all(b"ab").unwrap();
        let via_write = hasher.finalize().unwrap();
        assert_eq!(via_write, gitoid_of_bytes(HashAlgorithm::Sha256, b"ab").unwrap());
    }

    #[test]
    fn algorithm_is_carried_through() {
        let oid = gitoid_of_bytes(HashAlgorithm::Sha1, b"x").unwrap();
        assert_eq!(oid.algorithm(), HashAlgorithm::Sha1);
        let oid = gitoid_of_bytes(HashAlgorithm::Sha256, b"x").unwrap();
        assert_eq!(oid.algorithm(), HashAlgorithm::Sha256);
    }
}
