use thiserror::Error;

/// Errors of key parsing and program address derivation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Invalid hexadecimal string format
    #[error("Invalid hex string: {0}")]
    InvalidHex(String),

    /// Key or signature has invalid length
    #[error("Invalid key length: {len} bytes, expected: {expected} bytes")]
    InvalidKeyLength { len: usize, expected: usize },

    /// Public key half of a keypair does not match its secret key
    #[error("Keypair public key does not match its secret key")]
    KeypairMismatch,

    /// A single seed exceeds the maximum allowed length
    #[error("Seed too long: {len} bytes, maximum: {max} bytes")]
    MaxSeedLengthExceeded { len: usize, max: usize },

    /// Too many seeds were provided for an address derivation
    #[error("Too many seeds: {count}, maximum: {max}")]
    TooManySeeds { count: usize, max: usize },

    /// Derived address lies on the ed25519 curve and could be signed for
    #[error("Derived address is on the curve")]
    InvalidSeeds,

    /// No bump in [0, 255] produced an off-curve address
    #[error("Unable to find a viable program address bump seed")]
    NoViableBump,
}
