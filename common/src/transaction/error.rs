use thiserror::Error;

use crate::crypto::PublicKey;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransactionError {
    #[error("Transaction has no instructions")]
    NoInstructions,

    #[error("Too many instructions: {count}, maximum: {max}")]
    TooManyInstructions { count: usize, max: usize },

    #[error("Instruction {index} references {count} accounts, maximum: {max}")]
    TooManyAccounts { index: usize, count: usize, max: usize },

    #[error("Instruction {index} carries {size} bytes of data, maximum: {max}")]
    InstructionDataTooLarge { index: usize, size: usize, max: usize },

    #[error("Missing signer for account {0}")]
    MissingSigner(PublicKey),

    #[error("Invalid signature count: expected {expected}, got {got}")]
    SignatureCountMismatch { expected: usize, got: usize },

    #[error("Invalid signature for account {0}")]
    InvalidSignature(PublicKey),
}
