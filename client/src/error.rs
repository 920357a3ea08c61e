use std::{io, path::PathBuf};

use delegate_common::{crypto::CryptoError, transaction::TransactionError};
use delegate_program::{
    runtime::{ProgramError, RuntimeError},
    DelegateError,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error(transparent)]
    Transaction(#[from] TransactionError),

    #[error(transparent)]
    Program(#[from] ProgramError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error("Unsupported provider url '{0}', expected 'local' or 'file://<path>'")]
    InvalidProviderUrl(String),

    #[error("Environment variable {0} is not set")]
    MissingEnv(&'static str),

    #[error("Invalid keypair file {path}: {reason}")]
    InvalidKeypairFile { path: PathBuf, reason: String },

    #[error("Config account is not initialized")]
    ConfigNotFound,

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    /// Program error of a failed transaction, if any
    pub fn delegate_error(&self) -> Option<DelegateError> {
        match self {
            Self::Runtime(e) => e.delegate_error(),
            Self::Program(ProgramError::Delegate(e)) => Some(*e),
            _ => None,
        }
    }
}
