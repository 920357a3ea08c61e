use delegate_common::{crypto::PublicKey, transaction::AccountMeta};

use crate::{
    error::DelegateError,
    event::{GrantAccessEvent, RevokeAccessEvent},
    runtime::{InvokeContext, ProgramError},
    state::{find_access_address, Access},
};

use super::{check_address, load_config};

pub fn process_grant_access(
    ctx: &mut InvokeContext<'_>,
    accounts: &[AccountMeta],
    user: PublicKey,
) -> Result<(), ProgramError> {
    let [admin, config_meta, access_meta, ..] = accounts else {
        return Err(ProgramError::NotEnoughAccountKeys);
    };
    ctx.require_signer(&admin.pubkey)?;
    let config = load_config(ctx, config_meta)?;
    if config.admin != admin.pubkey {
        return Err(DelegateError::Unauthorized.into());
    }

    let (access_key, bump) = find_access_address(&user);
    check_address(access_meta, &access_key)?;
    if let Some(access) = ctx.try_load::<Access>(&access_key)? {
        if access.is_granted {
            return Err(DelegateError::AccessAlreadyGranted.into());
        }
    }

    ctx.store(
        &access_key,
        &Access {
            user,
            is_granted: true,
            bump,
        },
    )?;
    ctx.emit(&GrantAccessEvent {
        user,
        access: access_key,
    })
}

pub fn process_revoke_access(
    ctx: &mut InvokeContext<'_>,
    accounts: &[AccountMeta],
    user: PublicKey,
) -> Result<(), ProgramError> {
    let [admin, config_meta, access_meta, ..] = accounts else {
        return Err(ProgramError::NotEnoughAccountKeys);
    };
    ctx.require_signer(&admin.pubkey)?;
    let config = load_config(ctx, config_meta)?;
    if config.admin != admin.pubkey {
        return Err(DelegateError::Unauthorized.into());
    }

    let (access_key, _) = find_access_address(&user);
    check_address(access_meta, &access_key)?;
    match ctx.try_load::<Access>(&access_key)? {
        Some(access) if access.is_granted => {}
        _ => return Err(DelegateError::AccessNotGranted.into()),
    }

    ctx.close(&access_key)?;
    ctx.emit(&RevokeAccessEvent {
        user,
        access: access_key,
    })
}
