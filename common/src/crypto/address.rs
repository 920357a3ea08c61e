use super::{hashv, CryptoError, PublicKey};

/// Maximum length of a single derivation seed
pub const MAX_SEED_LEN: usize = 32;

/// Maximum number of seeds in one derivation (bump included)
pub const MAX_SEEDS: usize = 16;

const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

const PROGRAM_ID_DOMAIN: &[u8] = b"DELEGATE_PROGRAM_ID:";

/// Create a program id from a human readable name (hash of the name)
pub fn program_id_from_name(name: &str) -> PublicKey {
    PublicKey::new(hashv(&[PROGRAM_ID_DOMAIN, name.as_bytes()]).to_bytes())
}

/// Compute a program-derived address
///
/// Formula: address = blake3(seeds.. || program_id || "ProgramDerivedAddress")
///
/// The result must not be a valid ed25519 point so that only the program,
/// by presenting the same seeds, can act as its signer.
pub fn create_program_address(
    seeds: &[&[u8]],
    program_id: &PublicKey,
) -> Result<PublicKey, CryptoError> {
    if seeds.len() > MAX_SEEDS {
        return Err(CryptoError::TooManySeeds {
            count: seeds.len(),
            max: MAX_SEEDS,
        });
    }

    let mut parts: Vec<&[u8]> = Vec::with_capacity(seeds.len() + 2);
    for seed in seeds {
        if seed.len() > MAX_SEED_LEN {
            return Err(CryptoError::MaxSeedLengthExceeded {
                len: seed.len(),
                max: MAX_SEED_LEN,
            });
        }
        parts.push(seed);
    }
    parts.push(program_id.as_ref());
    parts.push(PDA_MARKER);

    let address = PublicKey::new(hashv(&parts).to_bytes());
    if address.is_on_curve() {
        return Err(CryptoError::InvalidSeeds);
    }
    Ok(address)
}

/// Find the first off-curve address, trying bump seeds from 255 down to 0
pub fn try_find_program_address(
    seeds: &[&[u8]],
    program_id: &PublicKey,
) -> Result<(PublicKey, u8), CryptoError> {
    let mut bump = [u8::MAX];
    for _ in 0..=u8::MAX {
        let mut with_bump = seeds.to_vec();
        with_bump.push(&bump);
        match create_program_address(&with_bump, program_id) {
            Ok(address) => return Ok((address, bump[0])),
            Err(CryptoError::InvalidSeeds) => {}
            Err(e) => return Err(e),
        }
        bump[0] = bump[0].wrapping_sub(1);
    }
    Err(CryptoError::NoViableBump)
}

/// Same as [`try_find_program_address`] for seeds known to be well formed
///
/// Panics only if the seeds are too long or too many, or if no bump works,
/// which is practically impossible (probability 2^-256).
pub fn find_program_address(seeds: &[&[u8]], program_id: &PublicKey) -> (PublicKey, u8) {
    try_find_program_address(seeds, program_id)
        .unwrap_or_else(|e| panic!("Invalid program address seeds: {}", e))
}
