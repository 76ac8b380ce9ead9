/// Hash algorithms a gitoid can be computed with.
///
/// OmniBOR documents come in two flavours, one per algorithm; SHA-1 is the
/// historical git default, SHA-256 the successor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HashAlgorithm {
    /// SHA-1 (20-byte digest), computed with collision detection.
    #[default]
    Sha1,
    /// SHA-256 (32-byte digest).
    Sha256,
}

impl HashAlgorithm {
    /// Length of the raw digest in bytes.
    pub const fn digest_len(&self) -> usize {
        match self {
            Self::Sha1 => 20,
            Self::Sha256 => 32,
        }
    }

    /// Length of the lowercase hex form.
    pub const fn hex_len(&self) -> usize {
        self.digest_len() * 2
    }

    /// The algorithm name as it appears in OmniBOR document headers.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
        }
    }

    /// The per-algorithm directory inside a document store's `objects/`.
    pub const fn store_dir(&self) -> &'static str {
        match self {
            Self::Sha1 => "gitoid_blob_sha1",
            Self::Sha256 => "gitoid_blob_sha256",
        }
    }

    /// Look up an algorithm by name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sha1" | "sha-1" => Some(Self::Sha1),
            "sha256" | "sha-256" => Some(Self::Sha256),
            _ => None,
        }
    }

    /// Look up an algorithm by raw digest length.
    pub fn from_digest_len(len: usize) -> Option<Self> {
        match len {
            20 => Some(Self::Sha1),
            32 => Some(Self::Sha256),
            _ => None,
        }
    }

    /// Look up an algorithm by hex length.
    pub fn from_hex_len(len: usize) -> Option<Self> {
        match len {
            40 => Some(Self::Sha1),
            64 => Some(Self::Sha256),
            _ => None,
        }
    }
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lengths() {
        assert_eq!(HashAlgorithm::Sha1.digest_len(), 20);
        assert_eq!(HashAlgorithm::Sha1.hex_len(), 40);
        assert_eq!(HashAlgorithm::Sha256.digest_len(), 32);
        assert_eq!(HashAlgorithm::Sha256.hex_len(), 64);
    }

    #[test]
    fn default_is_sha1() {
        assert_eq!(HashAlgorithm::default(), HashAlgorithm::Sha1);
    }

    #[test]
    fn store_dirs() {
        assert_eq!(HashAlgorithm::Sha1.store_dir(), "gitoid_blob_sha1");
        assert_eq!(HashAlgorithm::Sha256.store_dir(), "gitoid_blob_sha256");
    }

    #[test]
    fn from_name() {
        assert_eq!(HashAlgorithm::from_name("sha1"), Some(HashAlgorithm::Sha1));
        assert_eq!(
            HashAlgorithm::from_name("sha-256"),
            Some(HashAlgorithm::Sha256)
        );
        assert_eq!(HashAlgorithm::from_name("md5"), None);
    }

    #[test]
    fn from_lengths() {
        assert_eq!(HashAlgorithm::from_digest_len(20), Some(HashAlgorithm::Sha1));
        assert_eq!(HashAlgorithm::from_hex_len(64), Some(HashAlgorithm::Sha256));
        assert_eq!(HashAlgorithm::from_digest_len(16), None);
        assert_eq!(HashAlgorithm::from_hex_len(41), None);
    }

    #[test]
    fn display_matches_header_names() {
        assert_eq!(HashAlgorithm::Sha1.to_string(), "sha1");
        assert_eq!(HashAlgorithm::Sha256.to_string(), "sha256");
    }
}
