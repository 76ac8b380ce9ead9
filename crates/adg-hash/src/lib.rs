//! Gitoid computation for the adgr dependency tracker.
//!
//! A gitoid is the object id git would assign to a file's contents: the
//! hash of `"blob " <decimal-length> "\0" <bytes>`, where the NUL is part
//! of the hashed stream. OmniBOR uses gitoids to content-address every
//! build input, so this crate provides the [`GitOid`] value type, the
//! [`HashAlgorithm`] selector, hex encoding/decoding, and the streaming
//! [`Hasher`] the rest of the workspace computes identities with.

mod algorithm;
mod error;
pub mod hex;
mod oid;
pub mod hasher;

pub use algorithm::HashAlgorithm;
pub use error::HashError;
pub use hasher::{gitoid_of_bytes, gitoid_of_file, Hasher};
pub use oid::GitOid;
