mod access;
mod config;

use delegate_common::crypto::{find_program_address, PublicKey};

pub use access::Access;
pub use config::Config;

use crate::constants::{ACCESS_SEED, CONFIG_SEED, ID, VAULT_SEED};

pub fn find_config_address() -> (PublicKey, u8) {
    find_program_address(&[CONFIG_SEED.as_bytes()], &ID)
}

/// The vault holds no data, it only signs for the program
pub fn find_vault_address() -> (PublicKey, u8) {
    find_program_address(&[VAULT_SEED.as_bytes()], &ID)
}

pub fn find_access_address(user: &PublicKey) -> (PublicKey, u8) {
    find_program_address(&[ACCESS_SEED.as_bytes(), user.as_ref()], &ID)
}
