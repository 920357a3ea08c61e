use delegate_common::{
    crypto::{CryptoError, Hash, PublicKey, Signature},
    serializer::ReaderError,
    transaction::TransactionError,
};
use thiserror::Error;

use crate::{error::DelegateError, token::TokenError};

/// Failure of a single program invocation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProgramError {
    #[error(transparent)]
    Delegate(#[from] DelegateError),

    #[error(transparent)]
    Token(#[from] TokenError),

    // Raised by external programs
    #[error("Custom program error: {0}")]
    Custom(u32),

    #[error("Missing required signature for account {0}")]
    MissingRequiredSignature(PublicKey),

    #[error("Not enough account keys given to the instruction")]
    NotEnoughAccountKeys,

    #[error("Account {0} not found")]
    AccountNotFound(PublicKey),

    #[error("Account {0} is not part of the instruction")]
    MissingAccount(PublicKey),

    #[error("Account {0} is not writable")]
    ReadonlyAccount(PublicKey),

    #[error("Account {0} does not match the expected address")]
    InvalidAccountAddress(PublicKey),

    #[error("Account {0} is not owned by the expected program")]
    IllegalOwner(PublicKey),

    #[error("Invalid account data for {0}")]
    InvalidAccountData(PublicKey),

    #[error("Invalid instruction data: {0}")]
    InvalidInstructionData(#[from] ReaderError),

    #[error("Invalid seeds: {0}")]
    InvalidSeeds(#[from] CryptoError),

    #[error("Program {0} is not registered")]
    UnsupportedProgramId(PublicKey),

    #[error("Cross-program invocation depth exceeded")]
    CallDepthExceeded,

    #[error("Failed to encode event: {0}")]
    EventEncoding(String),
}

impl ProgramError {
    /// Numeric code for custom errors, as reported to clients
    pub fn custom_code(&self) -> Option<u32> {
        match self {
            Self::Delegate(e) => Some(e.code()),
            Self::Custom(code) => Some(*code),
            _ => None,
        }
    }
}

/// Failure of a whole transaction, nothing from it was committed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    #[error(transparent)]
    Transaction(#[from] TransactionError),

    #[error("Transaction {0} has already been processed")]
    AlreadyProcessed(Signature),

    #[error("Recent hash {0} not found or expired")]
    BlockhashNotFound(Hash),

    #[error("Error processing instruction {index}: {source}")]
    InstructionError {
        index: usize,
        #[source]
        source: ProgramError,
    },
}

impl RuntimeError {
    pub fn program_error(&self) -> Option<&ProgramError> {
        match self {
            Self::InstructionError { source, .. } => Some(source),
            _ => None,
        }
    }

    pub fn delegate_error(&self) -> Option<DelegateError> {
        match self.program_error()? {
            ProgramError::Delegate(e) => Some(*e),
            _ => None,
        }
    }

    pub fn token_error(&self) -> Option<&TokenError> {
        match self.program_error()? {
            ProgramError::Token(e) => Some(e),
            _ => None,
        }
    }
}
