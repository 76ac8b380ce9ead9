use std::fmt;
use std::str::FromStr;

use crate::{hex, HashAlgorithm, HashError};

/// A gitoid: the git blob object id of some contents.
///
/// Carries the raw digest inline, one variant per algorithm.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GitOid {
    Sha1([u8; 20]),
    Sha256([u8; 32]),
}

impl GitOid {
    /// Build a gitoid from raw digest bytes for the given algorithm.
    pub fn from_bytes(algo: HashAlgorithm, bytes: &[u8]) -> Result<Self, HashError> {
        if bytes.len() != algo.digest_len() {
            return Err(HashError::InvalidDigestLength {
                expected: algo.digest_len(),
                actual: bytes.len(),
            });
        }
        Ok(match algo {
            HashAlgorithm::Sha1 => {
                let mut raw = [0u8; 20];
                raw.copy_from_slice(bytes);
                Self::Sha1(raw)
            }
            HashAlgorithm::Sha256 => {
                let mut raw = [0u8; 32];
                raw.copy_from_slice(bytes);
                Self::Sha256(raw)
            }
        })
    }

    /// Parse a gitoid from hex; the algorithm is inferred from the length
    /// (40 chars means SHA-1, 64 chars means SHA-256).
    pub fn from_hex(s: &str) -> Result<Self, HashError> {
        let algo = HashAlgorithm::from_hex_len(s.len())
            .ok_or(HashError::InvalidHexLength { actual: s.len() })?;
        match algo {
            HashAlgorithm::Sha1 => {
                let mut raw = [0u8; 20];
                hex::decode(s, &mut raw)?;
                Ok(Self::Sha1(raw))
            }
            HashAlgorithm::Sha256 => {
                let mut raw = [0u8; 32];
                hex::decode(s, &mut raw)?;
                Ok(Self::Sha256(raw))
            }
        }
    }

    /// The raw digest bytes.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Sha1(raw) => raw,
            Self::Sha256(raw) => raw,
        }
    }

    /// The algorithm this gitoid was computed with.
    pub fn algorithm(&self) -> HashAlgorithm {
        match self {
            Self::Sha1(_) => HashAlgorithm::Sha1,
            Self::Sha256(_) => HashAlgorithm::Sha256,
        }
    }

    /// The lowercase hex form.
    pub fn to_hex(&self) -> String {
        hex::encode(self.as_bytes())
    }

    /// The fan-out path component inside a document store: `"xx/rest"`,
    /// where `xx` is the first two hex characters.
    pub fn store_path(&self) -> String {
        let hex = self.to_hex();
        format!("{}/{}", &hex[..2], &hex[2..])
    }
}

impl fmt::Display for GitOid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for GitOid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GitOid({})", &self.to_hex()[..8])
    }
}

impl FromStr for GitOid {
    type Err = HashError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // SHA-1 and SHA-256 gitoids of the empty blob, as computed by git.
    const EMPTY_SHA1: &str = "e69de29bb2d1d6434b8b29ae775ad8c2e48c5391";
    const EMPTY_SHA256: &str =
        "473a0f4c3be8a93681a267e3b1e9a7dcda1185436fe141f7749120a303721813";

    #[test]
    fn from_hex_infers_algorithm() {
        let sha1 = GitOid::from_hex(EMPTY_SHA1).unwrap();
        assert_eq!(sha1.algorithm(), HashAlgorithm::Sha1);
        assert_eq!(sha1.as_bytes().len(), 20);

        let sha256 = GitOid::from_hex(EMPTY_SHA256).unwrap();
        assert_eq!(sha256.algorithm(), HashAlgorithm::Sha256);
        assert_eq!(sha256.as_bytes().len(), 32);
    }

    #[test]
    fn from_hex_rejects_odd_lengths() {
        assert!(matches!(
            GitOid::from_hex("abcd"),
            Err(HashError::InvalidHexLength { actual: 4 })
        ));
    }

    #[test]
    fn from_hex_rejects_bad_digits() {
        let bad = "z".repeat(40);
        assert!(matches!(
            GitOid::from_hex(&bad),
            Err(HashError::InvalidHex { .. })
        ));
    }

    #[test]
    fn hex_roundtrip_via_display() {
        let oid = GitOid::from_hex(EMPTY_SHA1).unwrap();
        assert_eq!(oid.to_string(), EMPTY_SHA1);
        let parsed: GitOid = oid.to_string().parse().unwrap();
        assert_eq!(parsed, oid);
    }

    #[test]
    fn from_bytes_checks_length() {
        let oid = GitOid::from_hex(EMPTY_SHA256).unwrap();
        let back = GitOid::from_bytes(HashAlgorithm::Sha256, oid.as_bytes()).unwrap();
        assert_eq!(back, oid);

        let err = GitOid::from_bytes(HashAlgorithm::Sha1, &[0u8; 10]).unwrap_err();
        assert!(matches!(
            err,
            HashError::InvalidDigestLength {
                expected: 20,
                actual: 10
            }
        ));
    }

    #[test]
    fn store_path_splits_after_two_chars() {
        let oid = GitOid::from_hex(EMPTY_SHA1).unwrap();
        assert_eq!(oid.store_path(), format!("e6/{}", &EMPTY_SHA1[2..]));
        let oid = GitOid::from_hex(EMPTY_SHA256).unwrap();
        assert_eq!(oid.store_path(), format!("47/{}", &EMPTY_SHA256[2..]));
    }

    #[test]
    fn debug_is_shortened() {
        let oid = GitOid::from_hex(EMPTY_SHA1).unwrap();
        assert_eq!(format!("{oid:?}"), "GitOid(e69de29b)");
    }

    #[test]
    fn ordering_follows_digest_bytes() {
        let a = GitOid::from_hex("0000000000000000000000000000000000000001").unwrap();
        let b = GitOid::from_hex("0000000000000000000000000000000000000002").unwrap();
        assert!(a < b);
    }
}
