//! Ed25519 account keys and transaction signatures.
//!
//! A [`PublicKey`] is a 32-byte account address. Most addresses are ed25519
//! verifying keys, but program-derived addresses are deliberately chosen off
//! the curve so that no secret key can ever sign for them.

use ed25519_dalek::{
    Signature as DalekSignature, Signer, SigningKey, Verifier, VerifyingKey, SECRET_KEY_LENGTH,
    SIGNATURE_LENGTH,
};
use rand::rngs::OsRng;
use serde::{de::Error as SerdeError, Deserialize, Serialize};
use std::{fmt, str::FromStr};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::CryptoError;
use crate::serializer::{Reader, ReaderError, Serializer, Writer};

/// Size of a public key / address in bytes.
pub const PUBLIC_KEY_SIZE: usize = 32;

/// Size of an ed25519 signature in bytes.
pub const SIGNATURE_SIZE: usize = SIGNATURE_LENGTH;

/// Size of the secret seed of a key pair.
pub const SECRET_KEY_SIZE: usize = SECRET_KEY_LENGTH;

/// Account address (32 bytes).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PublicKey([u8; PUBLIC_KEY_SIZE]);

impl PublicKey {
    pub const fn new(bytes: [u8; PUBLIC_KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Create a public key from a slice.
    pub fn from_slice(slice: &[u8]) -> Result<Self, CryptoError> {
        let bytes: [u8; PUBLIC_KEY_SIZE] =
            slice
                .try_into()
                .map_err(|_| CryptoError::InvalidKeyLength {
                    len: slice.len(),
                    expected: PUBLIC_KEY_SIZE,
                })?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_SIZE] {
        &self.0
    }

    pub fn to_bytes(self) -> [u8; PUBLIC_KEY_SIZE] {
        self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// The all-zero key, used as "unset" marker in program state.
    pub fn is_default(&self) -> bool {
        self.0 == [0u8; PUBLIC_KEY_SIZE]
    }

    /// Whether these bytes decompress to a valid ed25519 point.
    pub fn is_on_curve(&self) -> bool {
        VerifyingKey::from_bytes(&self.0).is_ok()
    }

    /// Verify a signature on a message.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        let Ok(verifying_key) = VerifyingKey::from_bytes(&self.0) else {
            return false;
        };
        let dalek_sig = DalekSignature::from_bytes(&signature.0);
        verifying_key.verify(message, &dalek_sig).is_ok()
    }
}

impl FromStr for PublicKey {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|e| CryptoError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for PublicKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(SerdeError::custom)
    }
}

impl Serializer for PublicKey {
    fn write(&self, writer: &mut Writer) {
        writer.write_bytes(&self.0);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        reader.read_bytes_32().map(Self)
    }

    fn size(&self) -> usize {
        PUBLIC_KEY_SIZE
    }
}

/// Ed25519 signature (64 bytes).
///
/// The first signature of a transaction is its identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature([u8; SIGNATURE_SIZE]);

impl Signature {
    pub const fn new(bytes: [u8; SIGNATURE_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(slice: &[u8]) -> Result<Self, CryptoError> {
        let bytes: [u8; SIGNATURE_SIZE] =
            slice
                .try_into()
                .map_err(|_| CryptoError::InvalidKeyLength {
                    len: slice.len(),
                    expected: SIGNATURE_SIZE,
                })?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_SIZE] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for Signature {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|e| CryptoError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({}...)", &self.to_hex()[..16])
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for Signature {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(SerdeError::custom)
    }
}

impl Serializer for Signature {
    fn write(&self, writer: &mut Writer) {
        writer.write_bytes(&self.0);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        reader.read_bytes::<SIGNATURE_SIZE>().map(Self)
    }

    fn size(&self) -> usize {
        SIGNATURE_SIZE
    }
}

/// Ed25519 key pair.
///
/// The secret key is zeroized on drop for security.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeyPair {
    #[zeroize(skip)]
    signing_key: SigningKey,
}

impl KeyPair {
    /// Generate a new random key pair using a cryptographically secure RNG.
    pub fn new() -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        Self { signing_key }
    }

    /// Create a key pair from its 32-byte secret seed.
    pub fn from_seed(seed: &[u8; SECRET_KEY_SIZE]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Accepts either the 32-byte seed or the 64-byte `seed || public` form.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        match bytes.len() {
            SECRET_KEY_SIZE => {
                let mut seed = [0u8; SECRET_KEY_SIZE];
                seed.copy_from_slice(bytes);
                Ok(Self::from_seed(&seed))
            }
            len if len == SECRET_KEY_SIZE + PUBLIC_KEY_SIZE => {
                let (secret, public) = bytes.split_at(SECRET_KEY_SIZE);
                let mut seed = [0u8; SECRET_KEY_SIZE];
                seed.copy_from_slice(secret);
                let keypair = Self::from_seed(&seed);
                if keypair.public_key().as_bytes()[..] != public[..] {
                    return Err(CryptoError::KeypairMismatch);
                }
                Ok(keypair)
            }
            len => Err(CryptoError::InvalidKeyLength {
                len,
                expected: SECRET_KEY_SIZE + PUBLIC_KEY_SIZE,
            }),
        }
    }

    /// `seed || public` as stored in keypair files.
    pub fn to_bytes(&self) -> [u8; SECRET_KEY_SIZE + PUBLIC_KEY_SIZE] {
        let mut bytes = [0u8; SECRET_KEY_SIZE + PUBLIC_KEY_SIZE];
        bytes[..SECRET_KEY_SIZE].copy_from_slice(&self.signing_key.to_bytes());
        bytes[SECRET_KEY_SIZE..].copy_from_slice(self.public_key().as_bytes());
        bytes
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.signing_key.verifying_key().to_bytes())
    }

    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature(self.signing_key.sign(message).to_bytes())
    }
}

impl Default for KeyPair {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key())
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}
