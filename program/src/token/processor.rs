use delegate_common::{crypto::PublicKey, transaction::AccountMeta};
use log::trace;

use crate::runtime::{InvokeContext, ProgramError};

use super::{get_associated_token_address, Mint, TokenAccount, TokenError};

pub fn process_initialize_mint(
    ctx: &mut InvokeContext<'_>,
    accounts: &[AccountMeta],
    decimals: u8,
    mint_authority: PublicKey,
) -> Result<(), ProgramError> {
    let [mint, ..] = accounts else {
        return Err(ProgramError::NotEnoughAccountKeys);
    };
    ctx.require_signer(&mint.pubkey)?;
    if ctx.get_account(&mint.pubkey).is_some() {
        return Err(TokenError::AlreadyInitialized(mint.pubkey).into());
    }

    ctx.store(
        &mint.pubkey,
        &Mint {
            mint_authority,
            supply: 0,
            decimals,
        },
    )
}

pub fn process_create_associated_account(
    ctx: &mut InvokeContext<'_>,
    accounts: &[AccountMeta],
) -> Result<(), ProgramError> {
    let [payer, associated, owner, mint, ..] = accounts else {
        return Err(ProgramError::NotEnoughAccountKeys);
    };
    ctx.require_signer(&payer.pubkey)?;
    if associated.pubkey != get_associated_token_address(&owner.pubkey, &mint.pubkey) {
        return Err(TokenError::InvalidAssociatedAddress(associated.pubkey).into());
    }
    ctx.load::<Mint>(&mint.pubkey)?;

    match ctx.try_load::<TokenAccount>(&associated.pubkey)? {
        Some(existing) if existing.owner == owner.pubkey && existing.mint == mint.pubkey => Ok(()),
        Some(_) => Err(TokenError::AlreadyInitialized(associated.pubkey).into()),
        None => {
            trace!(
                "Creating token account {} for owner {}",
                associated.pubkey,
                owner.pubkey
            );
            ctx.store(
                &associated.pubkey,
                &TokenAccount::new(mint.pubkey, owner.pubkey),
            )
        }
    }
}

pub fn process_mint_to(
    ctx: &mut InvokeContext<'_>,
    accounts: &[AccountMeta],
    amount: u64,
) -> Result<(), ProgramError> {
    let [mint_meta, destination, authority, ..] = accounts else {
        return Err(ProgramError::NotEnoughAccountKeys);
    };
    ctx.require_signer(&authority.pubkey)?;

    let mut mint: Mint = ctx.load(&mint_meta.pubkey)?;
    if mint.mint_authority != authority.pubkey {
        return Err(TokenError::OwnerMismatch(authority.pubkey).into());
    }
    let mut account: TokenAccount = ctx.load(&destination.pubkey)?;
    if account.mint != mint_meta.pubkey {
        return Err(TokenError::MintMismatch(mint_meta.pubkey).into());
    }

    mint.supply = mint.supply.checked_add(amount).ok_or(TokenError::Overflow)?;
    account.amount = account.amount.checked_add(amount).ok_or(TokenError::Overflow)?;

    ctx.store(&mint_meta.pubkey, &mint)?;
    ctx.store(&destination.pubkey, &account)
}

pub fn process_approve(
    ctx: &mut InvokeContext<'_>,
    accounts: &[AccountMeta],
    amount: u64,
) -> Result<(), ProgramError> {
    let [source, delegate, owner, ..] = accounts else {
        return Err(ProgramError::NotEnoughAccountKeys);
    };
    ctx.require_signer(&owner.pubkey)?;

    let mut account: TokenAccount = ctx.load(&source.pubkey)?;
    if account.owner != owner.pubkey {
        return Err(TokenError::OwnerMismatch(owner.pubkey).into());
    }
    account.delegate = Some(delegate.pubkey);
    account.delegated_amount = amount;
    ctx.store(&source.pubkey, &account)
}

pub fn process_revoke(ctx: &mut InvokeContext<'_>, accounts: &[AccountMeta]) -> Result<(), ProgramError> {
    let [source, owner, ..] = accounts else {
        return Err(ProgramError::NotEnoughAccountKeys);
    };
    ctx.require_signer(&owner.pubkey)?;

    let mut account: TokenAccount = ctx.load(&source.pubkey)?;
    if account.owner != owner.pubkey {
        return Err(TokenError::OwnerMismatch(owner.pubkey).into());
    }
    account.delegate = None;
    account.delegated_amount = 0;
    ctx.store(&source.pubkey, &account)
}

pub fn process_transfer_checked(
    ctx: &mut InvokeContext<'_>,
    accounts: &[AccountMeta],
    amount: u64,
    decimals: u8,
) -> Result<(), ProgramError> {
    let [source_meta, mint_meta, destination_meta, authority, ..] = accounts else {
        return Err(ProgramError::NotEnoughAccountKeys);
    };
    ctx.require_signer(&authority.pubkey)?;

    let mint: Mint = ctx.load(&mint_meta.pubkey)?;
    if mint.decimals != decimals {
        return Err(TokenError::DecimalsMismatch {
            expected: mint.decimals,
            got: decimals,
        }
        .into());
    }

    let mut source: TokenAccount = ctx.load(&source_meta.pubkey)?;
    let mut destination: TokenAccount = ctx.load(&destination_meta.pubkey)?;
    if source.mint != mint_meta.pubkey || destination.mint != mint_meta.pubkey {
        return Err(TokenError::MintMismatch(mint_meta.pubkey).into());
    }

    if authority.pubkey != source.owner {
        if source.delegate != Some(authority.pubkey) {
            return Err(TokenError::OwnerMismatch(authority.pubkey).into());
        }
        let allowance = source.allowance(&authority.pubkey);
        if allowance < amount {
            return Err(TokenError::InsufficientFunds {
                need: amount,
                have: allowance,
            }
            .into());
        }
        source.delegated_amount = allowance - amount;
        if source.delegated_amount == 0 {
            source.delegate = None;
        }
    }

    if source.amount < amount {
        return Err(TokenError::InsufficientFunds {
            need: amount,
            have: source.amount,
        }
        .into());
    }

    if source_meta.pubkey == destination_meta.pubkey {
        return ctx.store(&source_meta.pubkey, &source);
    }

    source.amount -= amount;
    destination.amount = destination
        .amount
        .checked_add(amount)
        .ok_or(TokenError::Overflow)?;

    ctx.store(&source_meta.pubkey, &source)?;
    ctx.store(&destination_meta.pubkey, &destination)
}
