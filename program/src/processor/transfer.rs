use delegate_common::transaction::AccountMeta;
use log::debug;

use crate::{
    error::DelegateError,
    runtime::{InvokeContext, ProgramError},
    state::{find_access_address, Access},
    token::{self, TokenAccount},
};

use super::{
    check_address, check_associated_account, check_vault, ensure_associated_account, load_config,
    mint_decimals, transfer_from_vault,
};

/// Move the whole executor balance of `output_mint` to a receiver holding access
pub fn process_token_receive(
    ctx: &mut InvokeContext<'_>,
    accounts: &[AccountMeta],
) -> Result<(), ProgramError> {
    let [output_mint, executor, executor_account, receiver_account, receiver, access_meta, ..] =
        accounts
    else {
        return Err(ProgramError::NotEnoughAccountKeys);
    };
    ctx.require_signer(&executor.pubkey)?;

    check_address(access_meta, &find_access_address(&receiver.pubkey).0)?;
    match ctx.try_load::<Access>(&access_meta.pubkey)? {
        Some(access) if access.is_granted => {}
        _ => return Err(DelegateError::AccessNotGranted.into()),
    }

    check_associated_account(
        executor_account,
        &executor.pubkey,
        &output_mint.pubkey,
        DelegateError::InvalidTokenAccount,
    )?;
    let amount = ctx.load::<TokenAccount>(&executor_account.pubkey)?.amount;
    if amount == 0 {
        return Err(DelegateError::ExecutorOutputTokenAccountIsInsufficient.into());
    }
    check_associated_account(
        receiver_account,
        &receiver.pubkey,
        &output_mint.pubkey,
        DelegateError::FundVaultOutputTokenAccountNotFound,
    )?;

    ensure_associated_account(ctx, &executor.pubkey, &receiver.pubkey, &output_mint.pubkey)?;
    let decimals = mint_decimals(ctx, &output_mint.pubkey)?;
    ctx.invoke(
        &token::instruction::transfer_checked(
            &executor_account.pubkey,
            &output_mint.pubkey,
            &receiver_account.pubkey,
            &executor.pubkey,
            amount,
            decimals,
        ),
        &[],
    )?;

    debug!(
        "Forwarded {} of {} from {} to {}",
        amount, output_mint.pubkey, executor.pubkey, receiver.pubkey
    );
    Ok(())
}

/// Pull funds into the vault, signed either by their owner or by the vault
/// acting as approved delegate
pub fn process_transfer_in(
    ctx: &mut InvokeContext<'_>,
    accounts: &[AccountMeta],
    amount: u64,
) -> Result<(), ProgramError> {
    let [operator, authority, mint, from, config_meta, vault, vault_account, ..] = accounts else {
        return Err(ProgramError::NotEnoughAccountKeys);
    };
    ctx.require_signer(&operator.pubkey)?;
    let config = load_config(ctx, config_meta)?;
    config.check_operational(&operator.pubkey)?;
    if amount == 0 {
        return Err(DelegateError::SwapAmountTooSmall.into());
    }

    let vault_bump = check_vault(vault)?;
    check_associated_account(
        vault_account,
        &vault.pubkey,
        &mint.pubkey,
        DelegateError::InvalidTokenAccount,
    )?;

    let source: TokenAccount = ctx.load(&from.pubkey)?;
    if source.mint != mint.pubkey {
        return Err(DelegateError::InvalidTokenAccount.into());
    }

    let owner_signed = source.owner == authority.pubkey;
    if owner_signed {
        if !ctx.is_signer(&authority.pubkey) {
            return Err(DelegateError::InvalidTokenAccount.into());
        }
        if source.amount < amount {
            return Err(DelegateError::InsufficientFunds.into());
        }
    } else {
        if source.delegate != Some(vault.pubkey) {
            return Err(DelegateError::InvalidDelegateTokenAccount.into());
        }
        if source.delegated_amount < amount {
            return Err(DelegateError::InsufficientFunds.into());
        }
    }

    ensure_associated_account(ctx, &operator.pubkey, &vault.pubkey, &mint.pubkey)?;
    if owner_signed {
        let decimals = mint_decimals(ctx, &mint.pubkey)?;
        ctx.invoke(
            &token::instruction::transfer_checked(
                &from.pubkey,
                &mint.pubkey,
                &vault_account.pubkey,
                &authority.pubkey,
                amount,
                decimals,
            ),
            &[],
        )
    } else {
        transfer_from_vault(
            ctx,
            vault_bump,
            &from.pubkey,
            &mint.pubkey,
            &vault_account.pubkey,
            amount,
        )
    }
}

/// Send vault funds to any token account, subject to the cooldown
pub fn process_transfer_out(
    ctx: &mut InvokeContext<'_>,
    accounts: &[AccountMeta],
    amount: u64,
) -> Result<(), ProgramError> {
    let [operator, config_meta, vault, mint, vault_account, destination, ..] = accounts else {
        return Err(ProgramError::NotEnoughAccountKeys);
    };
    ctx.require_signer(&operator.pubkey)?;
    let mut config = load_config(ctx, config_meta)?;
    config.check_operational(&operator.pubkey)?;
    if amount == 0 {
        return Err(DelegateError::SwapAmountTooSmall.into());
    }

    let vault_bump = check_vault(vault)?;
    check_associated_account(
        vault_account,
        &vault.pubkey,
        &mint.pubkey,
        DelegateError::InvalidTokenAccount,
    )?;
    let balance = ctx.load::<TokenAccount>(&vault_account.pubkey)?.amount;
    if balance < amount {
        return Err(DelegateError::InsufficientFunds.into());
    }

    config.check_cooldown(ctx.unix_timestamp())?;
    ctx.store(&config_meta.pubkey, &config)?;

    transfer_from_vault(
        ctx,
        vault_bump,
        &vault_account.pubkey,
        &mint.pubkey,
        &destination.pubkey,
        amount,
    )
}
