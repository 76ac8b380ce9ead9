/// Errors produced by gitoid and hex operations.
#[derive(Debug, thiserror::Error)]
pub enum HashError {
    #[error("invalid hex digit at position {position}: '{character}'")]
    InvalidHex { position: usize, character: char },

    #[error("invalid hex string length: {actual}")]
    InvalidHexLength { actual: usize },

    #[error("invalid digest length: expected {expected} bytes, got {actual}")]
    InvalidDigestLength { expected: usize, actual: usize },

    #[error("SHA-1 collision detected while hashing")]
    Sha1Collision,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
