//! Instruction handlers of the delegate program

mod access;
mod admin;
mod route;
mod transfer;

use delegate_common::{crypto::PublicKey, serializer::Serializer, transaction::AccountMeta};
use log::{debug, log_enabled, Level};

use crate::{
    constants::{ID, VAULT_SEED},
    error::DelegateError,
    instruction::DelegateInstruction,
    runtime::{InvokeContext, Program, ProgramError},
    state::{find_config_address, find_vault_address, Config},
    token::{self, get_associated_token_address, Mint},
};

pub struct DelegateProgram;

impl Program for DelegateProgram {
    fn id(&self) -> PublicKey {
        *ID
    }

    fn process(
        &self,
        ctx: &mut InvokeContext<'_>,
        accounts: &[AccountMeta],
        data: &[u8],
    ) -> Result<(), ProgramError> {
        let instruction = DelegateInstruction::from_bytes(data)?;
        if log_enabled!(Level::Debug) {
            debug!(
                "Processing {} with {} accounts",
                instruction.name(),
                accounts.len()
            );
        }
        ctx.log(format!("Instruction: {}", instruction.name()));

        match instruction {
            DelegateInstruction::InitConfig {
                operator,
                cooldown_duration,
            } => admin::process_init_config(ctx, accounts, operator, cooldown_duration),
            DelegateInstruction::GrantAccess { user } => {
                access::process_grant_access(ctx, accounts, user)
            }
            DelegateInstruction::RevokeAccess { user } => {
                access::process_revoke_access(ctx, accounts, user)
            }
            DelegateInstruction::ProposeNewAdmin => admin::process_propose_new_admin(ctx, accounts),
            DelegateInstruction::AcceptAdminTransfer => {
                admin::process_accept_admin_transfer(ctx, accounts)
            }
            DelegateInstruction::ModifyCooldownDuration { cooldown_duration } => {
                admin::process_modify_cooldown_duration(ctx, accounts, cooldown_duration)
            }
            DelegateInstruction::ModifyOperator { operator } => {
                admin::process_modify_operator(ctx, accounts, operator)
            }
            DelegateInstruction::Pause { toggle } => admin::process_pause(ctx, accounts, toggle),
            DelegateInstruction::TokenReceive => transfer::process_token_receive(ctx, accounts),
            DelegateInstruction::TransferIn { amount } => {
                transfer::process_transfer_in(ctx, accounts, amount)
            }
            DelegateInstruction::TransferOut { amount } => {
                transfer::process_transfer_out(ctx, accounts, amount)
            }
            DelegateInstruction::Route(params) => route::process_route(ctx, accounts, params),
        }
    }
}

fn check_address(meta: &AccountMeta, expected: &PublicKey) -> Result<(), ProgramError> {
    if meta.pubkey != *expected {
        return Err(ProgramError::InvalidAccountAddress(meta.pubkey));
    }
    Ok(())
}

/// Load the config, which must exist and be initialized
fn load_config(ctx: &InvokeContext<'_>, meta: &AccountMeta) -> Result<Config, ProgramError> {
    check_address(meta, &find_config_address().0)?;
    match ctx.try_load::<Config>(&meta.pubkey)? {
        Some(config) if config.is_initialized => Ok(config),
        _ => Err(DelegateError::ConfigNotInitialized.into()),
    }
}

/// Returns the vault bump
fn check_vault(meta: &AccountMeta) -> Result<u8, ProgramError> {
    let (vault, bump) = find_vault_address();
    check_address(meta, &vault)?;
    Ok(bump)
}

fn check_associated_account(
    meta: &AccountMeta,
    owner: &PublicKey,
    mint: &PublicKey,
    error: DelegateError,
) -> Result<(), ProgramError> {
    if meta.pubkey != get_associated_token_address(owner, mint) {
        return Err(error.into());
    }
    Ok(())
}

// Create the associated token account of `owner` if it doesn't exist yet
fn ensure_associated_account(
    ctx: &mut InvokeContext<'_>,
    payer: &PublicKey,
    owner: &PublicKey,
    mint: &PublicKey,
) -> Result<(), ProgramError> {
    ctx.invoke(&token::instruction::create_associated_account(payer, owner, mint), &[])
}

fn mint_decimals(ctx: &InvokeContext<'_>, mint: &PublicKey) -> Result<u8, ProgramError> {
    Ok(ctx.load::<Mint>(mint)?.decimals)
}

/// Move tokens out of a vault owned account, the vault signs
fn transfer_from_vault(
    ctx: &mut InvokeContext<'_>,
    vault_bump: u8,
    source: &PublicKey,
    mint: &PublicKey,
    destination: &PublicKey,
    amount: u64,
) -> Result<(), ProgramError> {
    let vault = find_vault_address().0;
    let decimals = mint_decimals(ctx, mint)?;
    let bump = [vault_bump];
    let seeds: &[&[u8]] = &[VAULT_SEED.as_bytes(), &bump];
    ctx.invoke(
        &token::instruction::transfer_checked(source, mint, destination, &vault, amount, decimals),
        &[seeds],
    )
}
