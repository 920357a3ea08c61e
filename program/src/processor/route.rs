use delegate_common::transaction::{AccountMeta, Instruction};
use log::{debug, info};

use crate::{
    constants::VAULT_SEED,
    error::DelegateError,
    event::RouteEvent,
    instruction::RouteParams,
    runtime::{InvokeContext, ProgramError},
    state::{find_access_address, Access},
    token::TokenAccount,
};

use super::{
    check_address, check_associated_account, check_vault, ensure_associated_account, load_config,
    transfer_from_vault,
};

/// Swap delegated funds through an aggregator and forward the proceeds
///
/// The input is pulled from the delegator into the vault, the aggregator is
/// invoked with the vault as signer, and whatever the vault output account
/// gained is sent to the receiver.
pub fn process_route(
    ctx: &mut InvokeContext<'_>,
    accounts: &[AccountMeta],
    params: RouteParams,
) -> Result<(), ProgramError> {
    let [operator, config_meta, vault, delegator, input_mint, delegator_account, vault_input_account, output_mint, vault_output_account, receiver_account, receiver, access_meta, aggregator_program, remaining @ ..] =
        accounts
    else {
        return Err(ProgramError::NotEnoughAccountKeys);
    };

    ctx.require_signer(&operator.pubkey)?;
    let mut config = load_config(ctx, config_meta)?;
    config.check_operational(&operator.pubkey)?;
    if params.in_amount == 0 {
        return Err(DelegateError::SwapAmountTooSmall.into());
    }
    let vault_bump = check_vault(vault)?;

    let aggregator = params.aggregator;
    if aggregator_program.pubkey != aggregator.program_id() {
        return Err(DelegateError::InvalidProgramId.into());
    }
    if !aggregator.is_allowed(&params.data) {
        return Err(DelegateError::InvalidInstructionDiscriminator.into());
    }

    // Delegation
    check_associated_account(
        delegator_account,
        &delegator.pubkey,
        &input_mint.pubkey,
        DelegateError::InvalidDelegateTokenAccount,
    )?;
    let delegated: TokenAccount = ctx.load(&delegator_account.pubkey)?;
    if delegated.delegate != Some(vault.pubkey) {
        return Err(DelegateError::DelegateNotApproved.into());
    }
    if delegated.delegated_amount < params.in_amount {
        return Err(DelegateError::InsufficientDelegatedAmount.into());
    }

    // Receiver
    check_associated_account(
        receiver_account,
        &receiver.pubkey,
        &output_mint.pubkey,
        DelegateError::InvalidTokenAccount,
    )?;
    if !remaining
        .iter()
        .any(|meta| meta.pubkey == receiver_account.pubkey)
    {
        return Err(DelegateError::ReceiverTokenAccountNotFound.into());
    }
    check_address(access_meta, &find_access_address(&receiver.pubkey).0)?;
    match ctx.try_load::<Access>(&access_meta.pubkey)? {
        Some(access) if access.is_granted => {}
        _ => return Err(DelegateError::AccessNotGranted.into()),
    }

    check_associated_account(
        vault_input_account,
        &vault.pubkey,
        &input_mint.pubkey,
        DelegateError::InvalidTokenAccount,
    )?;
    check_associated_account(
        vault_output_account,
        &vault.pubkey,
        &output_mint.pubkey,
        DelegateError::FundVaultOutputTokenAccountNotFound,
    )?;

    config.check_cooldown(ctx.unix_timestamp())?;
    ctx.store(&config_meta.pubkey, &config)?;

    ensure_associated_account(ctx, &operator.pubkey, &vault.pubkey, &input_mint.pubkey)?;
    ensure_associated_account(ctx, &operator.pubkey, &vault.pubkey, &output_mint.pubkey)?;
    ensure_associated_account(ctx, &operator.pubkey, &receiver.pubkey, &output_mint.pubkey)?;

    transfer_from_vault(
        ctx,
        vault_bump,
        &delegator_account.pubkey,
        &input_mint.pubkey,
        &vault_input_account.pubkey,
        params.in_amount,
    )?;

    let initial_output = ctx.load::<TokenAccount>(&vault_output_account.pubkey)?.amount;

    let metas = remaining
        .iter()
        .map(|meta| AccountMeta {
            pubkey: meta.pubkey,
            is_signer: meta.pubkey == vault.pubkey,
            is_writable: meta.is_writable,
        })
        .collect();
    let bump = [vault_bump];
    let seeds: &[&[u8]] = &[VAULT_SEED.as_bytes(), &bump];
    debug!(
        "Invoking {} aggregator {} with {} accounts",
        aggregator.name(),
        aggregator_program.pubkey,
        remaining.len()
    );
    ctx.invoke(
        &Instruction::new_with_bytes(aggregator_program.pubkey, &params.data, metas),
        &[seeds],
    )?;

    let final_output = ctx.load::<TokenAccount>(&vault_output_account.pubkey)?.amount;
    let out_amount = final_output
        .checked_sub(initial_output)
        .ok_or(DelegateError::SwapFailed)?;
    if out_amount > 0 {
        transfer_from_vault(
            ctx,
            vault_bump,
            &vault_output_account.pubkey,
            &output_mint.pubkey,
            &receiver_account.pubkey,
            out_amount,
        )?;
    }

    info!(
        "Routed {} of {} through {} for {}, {} of {} sent to {}",
        params.in_amount,
        input_mint.pubkey,
        aggregator.name(),
        delegator.pubkey,
        out_amount,
        output_mint.pubkey,
        receiver.pubkey
    );
    ctx.emit(&RouteEvent {
        aggregator: aggregator.name().to_owned(),
        delegator: delegator.pubkey,
        receiver: receiver.pubkey,
        input_mint: input_mint.pubkey,
        output_mint: output_mint.pubkey,
        in_amount: params.in_amount,
        out_amount,
    })
}
