// Keypair files hold a JSON array with either the 32-byte secret seed or the
// 64-byte seed || public key form.

use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::Path,
};

use delegate_common::crypto::KeyPair;
use log::debug;

use crate::error::ClientError;

pub fn read_keypair_file<P: AsRef<Path>>(path: P) -> Result<KeyPair, ClientError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let bytes: Vec<u8> =
        serde_json::from_str(&content).map_err(|e| ClientError::InvalidKeypairFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    KeyPair::from_bytes(&bytes).map_err(|e| ClientError::InvalidKeypairFile {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

pub fn write_keypair_file<P: AsRef<Path>>(keypair: &KeyPair, path: P) -> Result<(), ClientError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string(&keypair.to_bytes().to_vec())?;
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    // the mode only applies to new files
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(json.as_bytes())?;
    debug!("Keypair {} written to {}", keypair.public_key(), path.display());
    Ok(())
}
