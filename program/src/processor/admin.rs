use delegate_common::{crypto::PublicKey, transaction::AccountMeta};
use log::info;

use crate::{
    constants::MINIMUM_TRADE_INTERVAL,
    error::DelegateError,
    event::{
        AdminTransferCompletedEvent, AdminTransferProposedEvent, InitConfigEvent,
        ModifyCooldownDurationEvent, ModifyOperatorEvent, PauseEvent,
    },
    runtime::{InvokeContext, ProgramError},
    state::{find_config_address, Config},
};

use super::{check_address, check_vault, load_config};

pub fn process_init_config(
    ctx: &mut InvokeContext<'_>,
    accounts: &[AccountMeta],
    operator: PublicKey,
    cooldown_duration: i64,
) -> Result<(), ProgramError> {
    let [admin, config_meta, vault, ..] = accounts else {
        return Err(ProgramError::NotEnoughAccountKeys);
    };
    ctx.require_signer(&admin.pubkey)?;
    let (config_key, bump) = find_config_address();
    check_address(config_meta, &config_key)?;
    check_vault(vault)?;

    // Created on first use, a leftover uninitialized config may be reused
    let existing = ctx.try_load::<Config>(&config_key)?;
    if existing.map_or(false, |config| config.is_initialized) {
        return Err(DelegateError::ConfigAlreadyInitialized.into());
    }
    if cooldown_duration < MINIMUM_TRADE_INTERVAL {
        return Err(DelegateError::InvalidCooldownDuration.into());
    }

    let config = Config {
        admin: admin.pubkey,
        operator,
        vault: vault.pubkey,
        pending_admin: PublicKey::default(),
        last_trade_timestamp: 0,
        is_initialized: true,
        is_paused: false,
        cooldown_duration,
        bump,
    };
    ctx.store(&config_key, &config)?;

    info!(
        "Config initialized by {} with operator {} and cooldown {}s",
        admin.pubkey, operator, cooldown_duration
    );
    ctx.emit(&InitConfigEvent {
        admin: admin.pubkey,
        operator,
        vault: vault.pubkey,
        cooldown_duration,
    })
}

pub fn process_propose_new_admin(
    ctx: &mut InvokeContext<'_>,
    accounts: &[AccountMeta],
) -> Result<(), ProgramError> {
    let [admin, config_meta, new_admin, ..] = accounts else {
        return Err(ProgramError::NotEnoughAccountKeys);
    };
    ctx.require_signer(&admin.pubkey)?;
    let mut config = load_config(ctx, config_meta)?;

    if config.admin != admin.pubkey {
        return Err(DelegateError::OnlyAdminCanProposeNewAdmin.into());
    }
    if new_admin.pubkey == config.admin {
        return Err(DelegateError::ProposedAdminIsCurrentAdmin.into());
    }
    if new_admin.pubkey == config.pending_admin {
        return Err(DelegateError::ProposedAdminAlreadySet.into());
    }

    config.pending_admin = new_admin.pubkey;
    ctx.store(&config_meta.pubkey, &config)?;
    ctx.emit(&AdminTransferProposedEvent {
        config: config_meta.pubkey,
        current_admin: admin.pubkey,
        proposed_admin: new_admin.pubkey,
    })
}

pub fn process_accept_admin_transfer(
    ctx: &mut InvokeContext<'_>,
    accounts: &[AccountMeta],
) -> Result<(), ProgramError> {
    let [new_admin, config_meta, ..] = accounts else {
        return Err(ProgramError::NotEnoughAccountKeys);
    };
    ctx.require_signer(&new_admin.pubkey)?;
    let mut config = load_config(ctx, config_meta)?;

    if !config.has_pending_admin() {
        return Err(DelegateError::NoPendingAdminTransfer.into());
    }
    if config.pending_admin != new_admin.pubkey {
        return Err(DelegateError::OnlyProposedAdminCanAccept.into());
    }

    let previous_admin = config.admin;
    config.admin = config.pending_admin;
    config.pending_admin = PublicKey::default();
    ctx.store(&config_meta.pubkey, &config)?;

    info!("Admin transferred from {} to {}", previous_admin, config.admin);
    ctx.emit(&AdminTransferCompletedEvent {
        config: config_meta.pubkey,
        previous_admin,
        new_admin: config.admin,
    })
}

pub fn process_modify_cooldown_duration(
    ctx: &mut InvokeContext<'_>,
    accounts: &[AccountMeta],
    cooldown_duration: i64,
) -> Result<(), ProgramError> {
    let [admin, config_meta, ..] = accounts else {
        return Err(ProgramError::NotEnoughAccountKeys);
    };
    ctx.require_signer(&admin.pubkey)?;
    let mut config = load_config(ctx, config_meta)?;

    if config.admin != admin.pubkey {
        return Err(DelegateError::OnlyAdminCanModifyCooldownDuration.into());
    }
    if cooldown_duration < MINIMUM_TRADE_INTERVAL {
        return Err(DelegateError::InvalidCooldownDuration.into());
    }

    config.cooldown_duration = cooldown_duration;
    ctx.store(&config_meta.pubkey, &config)?;
    ctx.emit(&ModifyCooldownDurationEvent {
        config: config_meta.pubkey,
        cooldown_duration,
    })
}

pub fn process_modify_operator(
    ctx: &mut InvokeContext<'_>,
    accounts: &[AccountMeta],
    operator: PublicKey,
) -> Result<(), ProgramError> {
    let [admin, config_meta, ..] = accounts else {
        return Err(ProgramError::NotEnoughAccountKeys);
    };
    ctx.require_signer(&admin.pubkey)?;
    let mut config = load_config(ctx, config_meta)?;

    if config.admin != admin.pubkey {
        return Err(DelegateError::Unauthorized.into());
    }

    config.operator = operator;
    ctx.store(&config_meta.pubkey, &config)?;
    ctx.emit(&ModifyOperatorEvent {
        config: config_meta.pubkey,
        operator,
    })
}

pub fn process_pause(
    ctx: &mut InvokeContext<'_>,
    accounts: &[AccountMeta],
    toggle: bool,
) -> Result<(), ProgramError> {
    let [admin, config_meta, ..] = accounts else {
        return Err(ProgramError::NotEnoughAccountKeys);
    };
    ctx.require_signer(&admin.pubkey)?;
    let mut config = load_config(ctx, config_meta)?;

    if config.admin != admin.pubkey {
        return Err(DelegateError::Unauthorized.into());
    }

    config.is_paused = toggle;
    ctx.store(&config_meta.pubkey, &config)?;
    info!("Config {}", if toggle { "paused" } else { "resumed" });
    ctx.emit(&PauseEvent {
        config: config_meta.pubkey,
        toggle,
    })
}
