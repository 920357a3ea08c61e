use delegate_common::crypto::PublicKey;
use serde::{Deserialize, Serialize};

use crate::runtime::Event;

macro_rules! impl_event {
    ($($event:ident),+ $(,)?) => {
        $(
            impl Event for $event {
                const NAME: &'static str = stringify!($event);
            }
        )+
    };
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct InitConfigEvent {
    pub admin: PublicKey,
    pub operator: PublicKey,
    pub vault: PublicKey,
    pub cooldown_duration: i64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct GrantAccessEvent {
    pub user: PublicKey,
    pub access: PublicKey,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RevokeAccessEvent {
    pub user: PublicKey,
    pub access: PublicKey,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct AdminTransferProposedEvent {
    pub config: PublicKey,
    pub current_admin: PublicKey,
    pub proposed_admin: PublicKey,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct AdminTransferCompletedEvent {
    pub config: PublicKey,
    pub previous_admin: PublicKey,
    pub new_admin: PublicKey,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ModifyCooldownDurationEvent {
    pub config: PublicKey,
    pub cooldown_duration: i64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ModifyOperatorEvent {
    pub config: PublicKey,
    pub operator: PublicKey,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PauseEvent {
    pub config: PublicKey,
    pub toggle: bool,
}

/// Emitted once the aggregator output has been forwarded to the receiver
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RouteEvent {
    pub aggregator: String,
    pub delegator: PublicKey,
    pub receiver: PublicKey,
    pub input_mint: PublicKey,
    pub output_mint: PublicKey,
    pub in_amount: u64,
    pub out_amount: u64,
}

impl_event!(
    InitConfigEvent,
    GrantAccessEvent,
    RevokeAccessEvent,
    AdminTransferProposedEvent,
    AdminTransferCompletedEvent,
    ModifyCooldownDurationEvent,
    ModifyOperatorEvent,
    PauseEvent,
    RouteEvent,
);
