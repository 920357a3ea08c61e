use delegate_common::crypto::PublicKey;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Account {0} is already initialized")]
    AlreadyInitialized(PublicKey),
    #[error("Token account does not belong to mint {0}")]
    MintMismatch(PublicKey),
    #[error("Invalid decimals, expected {expected} got {got}")]
    DecimalsMismatch { expected: u8, got: u8 },
    #[error("Insufficient funds, need {need} have {have}")]
    InsufficientFunds { need: u64, have: u64 },
    #[error("Authority {0} is neither the owner nor the delegate")]
    OwnerMismatch(PublicKey),
    #[error("Account {0} is not the associated token address")]
    InvalidAssociatedAddress(PublicKey),
    #[error("Token amount overflow")]
    Overflow,
}
