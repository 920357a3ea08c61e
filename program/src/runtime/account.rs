use delegate_common::{crypto::PublicKey, serializer::Serializer};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::constants::Discriminator;

use super::ProgramError;

const DISCRIMINATOR_SIZE: usize = 8;

/// Raw account stored in the ledger
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Account {
    /// Only the owner program may modify the data
    pub owner: PublicKey,
    #[serde(with = "hex::serde")]
    pub data: Vec<u8>,
}

/// First 8 bytes of sha256("<namespace>:<name>")
pub fn sighash(namespace: &str, name: &str) -> Discriminator {
    let digest = Sha256::digest(format!("{}:{}", namespace, name).as_bytes());
    let mut discriminator = [0u8; DISCRIMINATOR_SIZE];
    discriminator.copy_from_slice(&digest[..DISCRIMINATOR_SIZE]);
    discriminator
}

/// Typed account data, prefixed on the ledger by an 8 byte type discriminator
pub trait AccountState: Serializer + Sized {
    const NAME: &'static str;

    /// Program owning accounts of this type
    fn owner() -> PublicKey;

    fn discriminator() -> Discriminator {
        sighash("account", Self::NAME)
    }

    fn pack(&self) -> Vec<u8> {
        let mut data = Self::discriminator().to_vec();
        data.extend(self.to_bytes());
        data
    }

    fn unpack(key: &PublicKey, data: &[u8]) -> Result<Self, ProgramError> {
        if data.len() < DISCRIMINATOR_SIZE || data[..DISCRIMINATOR_SIZE] != Self::discriminator() {
            return Err(ProgramError::InvalidAccountData(*key));
        }
        Self::from_bytes(&data[DISCRIMINATOR_SIZE..])
            .map_err(|_| ProgramError::InvalidAccountData(*key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sighash_matches_known_instruction_discriminator() {
        // sha256("global:initialize")[..8]
        assert_eq!(
            sighash("global", "initialize"),
            [175, 175, 109, 31, 13, 152, 155, 237]
        );
    }

    #[test]
    fn test_namespaces_do_not_collide() {
        assert_ne!(sighash("global", "config"), sighash("account", "config"));
    }
}
