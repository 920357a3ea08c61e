//! Delegate program instructions and their account lists
//!
//! Wire format: `[discriminator: 8][arguments]` where the discriminator is
//! the first 8 bytes of sha256("global:<instruction name>").

use delegate_common::{
    crypto::PublicKey,
    serializer::{Reader, ReaderError, Serializer, Writer},
    transaction::{AccountMeta, Instruction},
};
use serde::{Deserialize, Serialize};

use crate::{
    constants::*,
    runtime::sighash,
    state::{find_access_address, find_config_address, find_vault_address},
    token::get_associated_token_address,
};

const INIT_CONFIG: &str = "init_config";
const GRANT_ACCESS: &str = "grant_access";
const REVOKE_ACCESS: &str = "revoke_access";
const PROPOSE_NEW_ADMIN: &str = "propose_new_admin";
const ACCEPT_ADMIN_TRANSFER: &str = "accept_admin_transfer";
const MODIFY_COOLDOWN_DURATION: &str = "modify_cooldown_duration";
const MODIFY_OPERATOR: &str = "modify_operator";
const PAUSE: &str = "pause";
const TOKEN_RECEIVE: &str = "token_receive";
const TRANSFER_IN: &str = "transfer_in";
const TRANSFER_OUT: &str = "transfer_out";
const ROUTE: &str = "route";

const INSTRUCTION_NAMES: [&str; 12] = [
    INIT_CONFIG,
    GRANT_ACCESS,
    REVOKE_ACCESS,
    PROPOSE_NEW_ADMIN,
    ACCEPT_ADMIN_TRANSFER,
    MODIFY_COOLDOWN_DURATION,
    MODIFY_OPERATOR,
    PAUSE,
    TOKEN_RECEIVE,
    TRANSFER_IN,
    TRANSFER_OUT,
    ROUTE,
];

pub fn instruction_discriminator(name: &str) -> Discriminator {
    sighash("global", name)
}

/// External venue a route is executed against
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Aggregator {
    Jupiter,
    JupiterOrderEngine,
    Dflow,
    Okx,
    JupiterPerpetuals,
}

impl Aggregator {
    pub fn program_id(&self) -> PublicKey {
        match self {
            Self::Jupiter => *JUPITER_PROGRAM_ID,
            Self::JupiterOrderEngine => *JUPITER_ORDER_ENGINE_PROGRAM_ID,
            Self::Dflow => *DFLOW_PROGRAM_ID,
            Self::Okx => *OKX_PROGRAM_ID,
            Self::JupiterPerpetuals => *JUPITER_PERPETUALS_PROGRAM_ID,
        }
    }

    /// Inner instructions the vault is allowed to sign for
    pub fn allowed_discriminators(&self) -> &'static [Discriminator] {
        match self {
            Self::Jupiter => &[
                DISCRIMINATOR_JUPITER_AGGREGATOR_SHARED_ACCOUNTS_ROUTE,
                DISCRIMINATOR_JUPITER_AGGREGATOR_SHARED_ACCOUNTS_ROUTE_V2,
                DISCRIMINATOR_JUPITER_AGGREGATOR_ROUTE,
                DISCRIMINATOR_JUPITER_AGGREGATOR_ROUTE_V2,
            ],
            Self::JupiterOrderEngine => &[DISCRIMINATOR_JUPITER_ORDER_ENGINE_FILL],
            Self::Dflow => &[DISCRIMINATOR_DFLOW_SWAP, DISCRIMINATOR_DFLOW_SWAP2],
            Self::Okx => &[
                DISCRIMINATOR_OKX_SWAP,
                DISCRIMINATOR_OKX_SWAP_V3,
                DISCRIMINATOR_OKX_SWAP_TOB_V3,
                DISCRIMINATOR_OKX_SWAP_TOB_V3_WITH_RECEIVER,
            ],
            Self::JupiterPerpetuals => &[
                DISCRIMINATOR_PERPETUALS_ADD_LIQUIDITY,
                DISCRIMINATOR_PERPETUALS_REMOVE_LIQUIDITY,
            ],
        }
    }

    pub fn is_allowed(&self, data: &[u8]) -> bool {
        data.len() >= 8
            && self
                .allowed_discriminators()
                .iter()
                .any(|discriminator| data[..8] == discriminator[..])
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Jupiter => "jupiter",
            Self::JupiterOrderEngine => "jupiter-order-engine",
            Self::Dflow => "dflow",
            Self::Okx => "okx",
            Self::JupiterPerpetuals => "jupiter-perpetuals",
        }
    }

    fn id(&self) -> u8 {
        match self {
            Self::Jupiter => 0,
            Self::JupiterOrderEngine => 1,
            Self::Dflow => 2,
            Self::Okx => 3,
            Self::JupiterPerpetuals => 4,
        }
    }
}

impl Serializer for Aggregator {
    fn write(&self, writer: &mut Writer) {
        writer.write_u8(self.id());
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(match reader.read_u8()? {
            0 => Self::Jupiter,
            1 => Self::JupiterOrderEngine,
            2 => Self::Dflow,
            3 => Self::Okx,
            4 => Self::JupiterPerpetuals,
            _ => return Err(ReaderError::InvalidValue),
        })
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RouteParams {
    pub aggregator: Aggregator,
    /// Amount pulled from the delegator into the vault before the swap
    pub in_amount: u64,
    /// Instruction data forwarded untouched to the aggregator
    #[serde(with = "hex::serde")]
    pub data: Vec<u8>,
}

impl Serializer for RouteParams {
    fn write(&self, writer: &mut Writer) {
        self.aggregator.write(writer);
        writer.write_u64(self.in_amount);
        self.data.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(Self {
            aggregator: reader.read()?,
            in_amount: reader.read_u64()?,
            data: reader.read()?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DelegateInstruction {
    InitConfig {
        operator: PublicKey,
        cooldown_duration: i64,
    },
    GrantAccess {
        user: PublicKey,
    },
    RevokeAccess {
        user: PublicKey,
    },
    ProposeNewAdmin,
    AcceptAdminTransfer,
    ModifyCooldownDuration {
        cooldown_duration: i64,
    },
    ModifyOperator {
        operator: PublicKey,
    },
    Pause {
        toggle: bool,
    },
    TokenReceive,
    TransferIn {
        amount: u64,
    },
    TransferOut {
        amount: u64,
    },
    Route(RouteParams),
}

impl DelegateInstruction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::InitConfig { .. } => INIT_CONFIG,
            Self::GrantAccess { .. } => GRANT_ACCESS,
            Self::RevokeAccess { .. } => REVOKE_ACCESS,
            Self::ProposeNewAdmin => PROPOSE_NEW_ADMIN,
            Self::AcceptAdminTransfer => ACCEPT_ADMIN_TRANSFER,
            Self::ModifyCooldownDuration { .. } => MODIFY_COOLDOWN_DURATION,
            Self::ModifyOperator { .. } => MODIFY_OPERATOR,
            Self::Pause { .. } => PAUSE,
            Self::TokenReceive => TOKEN_RECEIVE,
            Self::TransferIn { .. } => TRANSFER_IN,
            Self::TransferOut { .. } => TRANSFER_OUT,
            Self::Route(_) => ROUTE,
        }
    }

    pub fn discriminator(&self) -> Discriminator {
        instruction_discriminator(self.name())
    }
}

impl Serializer for DelegateInstruction {
    fn write(&self, writer: &mut Writer) {
        writer.write_bytes(&self.discriminator());
        match self {
            Self::InitConfig {
                operator,
                cooldown_duration,
            } => {
                operator.write(writer);
                writer.write_i64(*cooldown_duration);
            }
            Self::GrantAccess { user } | Self::RevokeAccess { user } => user.write(writer),
            Self::ModifyCooldownDuration { cooldown_duration } => {
                writer.write_i64(*cooldown_duration)
            }
            Self::ModifyOperator { operator } => operator.write(writer),
            Self::Pause { toggle } => writer.write_bool(*toggle),
            Self::TransferIn { amount } | Self::TransferOut { amount } => writer.write_u64(*amount),
            Self::Route(params) => params.write(writer),
            Self::ProposeNewAdmin | Self::AcceptAdminTransfer | Self::TokenReceive => {}
        }
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let discriminator: Discriminator = reader.read_bytes()?;
        let name = INSTRUCTION_NAMES
            .iter()
            .find(|name| instruction_discriminator(name) == discriminator)
            .ok_or_else(|| ReaderError::UnknownDiscriminator(hex::encode(discriminator)))?;

        Ok(match *name {
            INIT_CONFIG => Self::InitConfig {
                operator: reader.read()?,
                cooldown_duration: reader.read_i64()?,
            },
            GRANT_ACCESS => Self::GrantAccess {
                user: reader.read()?,
            },
            REVOKE_ACCESS => Self::RevokeAccess {
                user: reader.read()?,
            },
            PROPOSE_NEW_ADMIN => Self::ProposeNewAdmin,
            ACCEPT_ADMIN_TRANSFER => Self::AcceptAdminTransfer,
            MODIFY_COOLDOWN_DURATION => Self::ModifyCooldownDuration {
                cooldown_duration: reader.read_i64()?,
            },
            MODIFY_OPERATOR => Self::ModifyOperator {
                operator: reader.read()?,
            },
            PAUSE => Self::Pause {
                toggle: reader.read_bool()?,
            },
            TOKEN_RECEIVE => Self::TokenReceive,
            TRANSFER_IN => Self::TransferIn {
                amount: reader.read_u64()?,
            },
            TRANSFER_OUT => Self::TransferOut {
                amount: reader.read_u64()?,
            },
            ROUTE => Self::Route(reader.read()?),
            _ => return Err(ReaderError::InvalidValue),
        })
    }
}

fn delegate_instruction(data: DelegateInstruction, accounts: Vec<AccountMeta>) -> Instruction {
    Instruction::new(*ID, &data, accounts)
}

pub fn init_config(admin: &PublicKey, operator: &PublicKey, cooldown_duration: i64) -> Instruction {
    delegate_instruction(
        DelegateInstruction::InitConfig {
            operator: *operator,
            cooldown_duration,
        },
        vec![
            AccountMeta::new(*admin, true),
            AccountMeta::new(find_config_address().0, false),
            AccountMeta::new_readonly(find_vault_address().0, false),
        ],
    )
}

pub fn grant_access(admin: &PublicKey, user: &PublicKey) -> Instruction {
    delegate_instruction(
        DelegateInstruction::GrantAccess { user: *user },
        vec![
            AccountMeta::new(*admin, true),
            AccountMeta::new_readonly(find_config_address().0, false),
            AccountMeta::new(find_access_address(user).0, false),
        ],
    )
}

pub fn revoke_access(admin: &PublicKey, user: &PublicKey) -> Instruction {
    delegate_instruction(
        DelegateInstruction::RevokeAccess { user: *user },
        vec![
            AccountMeta::new(*admin, true),
            AccountMeta::new_readonly(find_config_address().0, false),
            AccountMeta::new(find_access_address(user).0, false),
        ],
    )
}

pub fn propose_new_admin(admin: &PublicKey, new_admin: &PublicKey) -> Instruction {
    delegate_instruction(
        DelegateInstruction::ProposeNewAdmin,
        vec![
            AccountMeta::new(*admin, true),
            AccountMeta::new(find_config_address().0, false),
            AccountMeta::new_readonly(*new_admin, false),
        ],
    )
}

pub fn accept_admin_transfer(new_admin: &PublicKey) -> Instruction {
    delegate_instruction(
        DelegateInstruction::AcceptAdminTransfer,
        vec![
            AccountMeta::new(*new_admin, true),
            AccountMeta::new(find_config_address().0, false),
        ],
    )
}

pub fn modify_cooldown_duration(admin: &PublicKey, cooldown_duration: i64) -> Instruction {
    delegate_instruction(
        DelegateInstruction::ModifyCooldownDuration { cooldown_duration },
        vec![
            AccountMeta::new(*admin, true),
            AccountMeta::new(find_config_address().0, false),
        ],
    )
}

pub fn modify_operator(admin: &PublicKey, operator: &PublicKey) -> Instruction {
    delegate_instruction(
        DelegateInstruction::ModifyOperator {
            operator: *operator,
        },
        vec![
            AccountMeta::new(*admin, true),
            AccountMeta::new(find_config_address().0, false),
        ],
    )
}

pub fn pause(admin: &PublicKey, toggle: bool) -> Instruction {
    delegate_instruction(
        DelegateInstruction::Pause { toggle },
        vec![
            AccountMeta::new(*admin, true),
            AccountMeta::new(find_config_address().0, false),
        ],
    )
}

pub fn token_receive(executor: &PublicKey, receiver: &PublicKey, output_mint: &PublicKey) -> Instruction {
    delegate_instruction(
        DelegateInstruction::TokenReceive,
        vec![
            AccountMeta::new_readonly(*output_mint, false),
            AccountMeta::new(*executor, true),
            AccountMeta::new(get_associated_token_address(executor, output_mint), false),
            AccountMeta::new(get_associated_token_address(receiver, output_mint), false),
            AccountMeta::new(*receiver, false),
            AccountMeta::new_readonly(find_access_address(receiver).0, false),
        ],
    )
}

/// Pull `amount` from `from` into the vault
///
/// When `authority` owns `from` it must co-sign, otherwise the vault must be
/// the approved delegate of `from`.
pub fn transfer_in(
    operator: &PublicKey,
    authority: &PublicKey,
    authority_signs: bool,
    mint: &PublicKey,
    from: &PublicKey,
    amount: u64,
) -> Instruction {
    let vault = find_vault_address().0;
    delegate_instruction(
        DelegateInstruction::TransferIn { amount },
        vec![
            AccountMeta::new(*operator, true),
            AccountMeta::new(*authority, authority_signs),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new(*from, false),
            AccountMeta::new_readonly(find_config_address().0, false),
            AccountMeta::new(vault, false),
            AccountMeta::new(get_associated_token_address(&vault, mint), false),
        ],
    )
}

pub fn transfer_out(
    operator: &PublicKey,
    mint: &PublicKey,
    destination: &PublicKey,
    amount: u64,
) -> Instruction {
    let vault = find_vault_address().0;
    delegate_instruction(
        DelegateInstruction::TransferOut { amount },
        vec![
            AccountMeta::new(*operator, true),
            AccountMeta::new(find_config_address().0, false),
            AccountMeta::new_readonly(vault, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new(get_associated_token_address(&vault, mint), false),
            AccountMeta::new(*destination, false),
        ],
    )
}

/// Parties of a route, the derived accounts are filled in by [`route`]
#[derive(Clone, Copy, Debug)]
pub struct RouteAccounts {
    pub operator: PublicKey,
    pub delegator: PublicKey,
    pub input_mint: PublicKey,
    pub output_mint: PublicKey,
    pub receiver: PublicKey,
}

/// Build a route
///
/// `remaining` is forwarded to the aggregator; the vault is marked as signer
/// wherever it appears.
pub fn route(accounts: &RouteAccounts, params: RouteParams, remaining: Vec<AccountMeta>) -> Instruction {
    let vault = find_vault_address().0;
    let program_id = params.aggregator.program_id();
    let mut metas = vec![
        AccountMeta::new(accounts.operator, true),
        AccountMeta::new(find_config_address().0, false),
        AccountMeta::new(vault, false),
        AccountMeta::new_readonly(accounts.delegator, false),
        AccountMeta::new_readonly(accounts.input_mint, false),
        AccountMeta::new(
            get_associated_token_address(&accounts.delegator, &accounts.input_mint),
            false,
        ),
        AccountMeta::new(get_associated_token_address(&vault, &accounts.input_mint), false),
        AccountMeta::new_readonly(accounts.output_mint, false),
        AccountMeta::new(get_associated_token_address(&vault, &accounts.output_mint), false),
        AccountMeta::new(
            get_associated_token_address(&accounts.receiver, &accounts.output_mint),
            false,
        ),
        AccountMeta::new_readonly(accounts.receiver, false),
        AccountMeta::new_readonly(find_access_address(&accounts.receiver).0, false),
        AccountMeta::new_readonly(program_id, false),
    ];
    metas.extend(remaining);
    delegate_instruction(DelegateInstruction::Route(params), metas)
}
