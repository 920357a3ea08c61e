//! Delegate program error codes
//!
//! Range: 6000 + declaration index, stable across releases.
//! New variants are only ever appended.

use thiserror::Error;

pub const ERROR_CODE_OFFSET: u32 = 6000;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum DelegateError {
    // Common
    #[error("Unauthorized")]
    Unauthorized,

    // Access
    #[error("Access is not granted")]
    AccessNotGranted,
    #[error("Access is already granted")]
    AccessAlreadyGranted,

    // Config
    #[error("Config is not initialized")]
    ConfigNotInitialized,
    #[error("Config is already initialized")]
    ConfigAlreadyInitialized,
    #[error("Invalid cooldown duration")]
    InvalidCooldownDuration,

    // Swap
    #[error("Swap too frequent")]
    SwapTooFrequent,
    #[error("Swap failed")]
    SwapFailed,

    // Admin
    #[error("Only admin can propose new admin")]
    OnlyAdminCanProposeNewAdmin,
    #[error("Only proposed admin can accept")]
    OnlyProposedAdminCanAccept,
    #[error("Proposed admin is already set")]
    ProposedAdminAlreadySet,
    #[error("Proposed admin is current admin")]
    ProposedAdminIsCurrentAdmin,
    #[error("No pending admin transfer")]
    NoPendingAdminTransfer,

    // Modify config
    #[error("Only admin can modify cooldown duration")]
    OnlyAdminCanModifyCooldownDuration,

    #[error("Swap amount is too small")]
    SwapAmountTooSmall,
    #[error("Admin authority mismatch")]
    AdminAuthorityMismatch,
    #[error("New admin proposed")]
    NewAdminProposed,
    #[error("No new admin proposed")]
    NoNewAdminProposed,
    #[error("Vault has not been delegated authority")]
    DelegateNotApproved,
    #[error("Delegated amount is insufficient")]
    InsufficientDelegatedAmount,

    // Operations
    #[error("Signer is neither the operator nor the admin")]
    InvalidOperator,
    #[error("Config is paused")]
    ConfigPaused,
    #[error("Insufficient funds")]
    InsufficientFunds,
    #[error("Invalid token account")]
    InvalidTokenAccount,
    #[error("Invalid delegate token account")]
    InvalidDelegateTokenAccount,
    #[error("Receiver token account not found")]
    ReceiverTokenAccountNotFound,
    #[error("Executor output token account is insufficient")]
    ExecutorOutputTokenAccountIsInsufficient,
    #[error("Fund vault output token account not found")]
    FundVaultOutputTokenAccountNotFound,
    #[error("Invalid program id")]
    InvalidProgramId,
    #[error("Instruction discriminator is not allowed for this aggregator")]
    InvalidInstructionDiscriminator,
    #[error("Math overflow")]
    MathOverflow,
}

impl DelegateError {
    pub fn code(&self) -> u32 {
        ERROR_CODE_OFFSET + *self as u32
    }
}
