//! Minimal token program: mints, owner balances and single delegate approvals

mod error;
mod processor;
mod state;

pub mod instruction;

use delegate_common::{crypto::PublicKey, serializer::Serializer, transaction::AccountMeta};

pub use error::TokenError;
pub use instruction::TokenInstruction;
pub use state::{get_associated_token_address, Mint, TokenAccount};

use crate::{
    constants::TOKEN_PROGRAM_ID,
    runtime::{InvokeContext, Program, ProgramError},
};

pub struct TokenProgram;

impl Program for TokenProgram {
    fn id(&self) -> PublicKey {
        *TOKEN_PROGRAM_ID
    }

    fn process(
        &self,
        ctx: &mut InvokeContext<'_>,
        accounts: &[AccountMeta],
        data: &[u8],
    ) -> Result<(), ProgramError> {
        match TokenInstruction::from_bytes(data)? {
            TokenInstruction::InitializeMint {
                decimals,
                mint_authority,
            } => processor::process_initialize_mint(ctx, accounts, decimals, mint_authority),
            TokenInstruction::CreateAssociatedAccount => {
                processor::process_create_associated_account(ctx, accounts)
            }
            TokenInstruction::MintTo { amount } => processor::process_mint_to(ctx, accounts, amount),
            TokenInstruction::Approve { amount } => processor::process_approve(ctx, accounts, amount),
            TokenInstruction::Revoke => processor::process_revoke(ctx, accounts),
            TokenInstruction::TransferChecked { amount, decimals } => {
                processor::process_transfer_checked(ctx, accounts, amount, decimals)
            }
        }
    }
}
