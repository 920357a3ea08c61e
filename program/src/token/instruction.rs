use delegate_common::{
    crypto::PublicKey,
    serializer::{Reader, ReaderError, Serializer, Writer},
    transaction::{AccountMeta, Instruction},
};

use crate::constants::TOKEN_PROGRAM_ID;

use super::get_associated_token_address;

// Opcodes
const OP_INITIALIZE_MINT: u8 = 0x00;
const OP_CREATE_ASSOCIATED_ACCOUNT: u8 = 0x01;
const OP_MINT_TO: u8 = 0x02;
const OP_APPROVE: u8 = 0x03;
const OP_REVOKE: u8 = 0x04;
const OP_TRANSFER_CHECKED: u8 = 0x05;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenInstruction {
    /// Accounts: [mint (signer, writable)]
    InitializeMint {
        decimals: u8,
        mint_authority: PublicKey,
    },
    /// Idempotent
    ///
    /// Accounts: [payer (signer), associated account (writable), owner, mint]
    CreateAssociatedAccount,
    /// Accounts: [mint (writable), destination (writable), mint authority (signer)]
    MintTo { amount: u64 },
    /// Accounts: [source (writable), delegate, owner (signer)]
    Approve { amount: u64 },
    /// Accounts: [source (writable), owner (signer)]
    Revoke,
    /// Authority is either the owner or the delegate of the source
    ///
    /// Accounts: [source (writable), mint, destination (writable), authority (signer)]
    TransferChecked { amount: u64, decimals: u8 },
}

impl Serializer for TokenInstruction {
    fn write(&self, writer: &mut Writer) {
        match self {
            Self::InitializeMint {
                decimals,
                mint_authority,
            } => {
                writer.write_u8(OP_INITIALIZE_MINT);
                writer.write_u8(*decimals);
                mint_authority.write(writer);
            }
            Self::CreateAssociatedAccount => writer.write_u8(OP_CREATE_ASSOCIATED_ACCOUNT),
            Self::MintTo { amount } => {
                writer.write_u8(OP_MINT_TO);
                writer.write_u64(*amount);
            }
            Self::Approve { amount } => {
                writer.write_u8(OP_APPROVE);
                writer.write_u64(*amount);
            }
            Self::Revoke => writer.write_u8(OP_REVOKE),
            Self::TransferChecked { amount, decimals } => {
                writer.write_u8(OP_TRANSFER_CHECKED);
                writer.write_u64(*amount);
                writer.write_u8(*decimals);
            }
        }
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(match reader.read_u8()? {
            OP_INITIALIZE_MINT => Self::InitializeMint {
                decimals: reader.read_u8()?,
                mint_authority: reader.read()?,
            },
            OP_CREATE_ASSOCIATED_ACCOUNT => Self::CreateAssociatedAccount,
            OP_MINT_TO => Self::MintTo {
                amount: reader.read_u64()?,
            },
            OP_APPROVE => Self::Approve {
                amount: reader.read_u64()?,
            },
            OP_REVOKE => Self::Revoke,
            OP_TRANSFER_CHECKED => Self::TransferChecked {
                amount: reader.read_u64()?,
                decimals: reader.read_u8()?,
            },
            op => return Err(ReaderError::UnknownDiscriminator(format!("{:#04x}", op))),
        })
    }
}

pub fn initialize_mint(mint: &PublicKey, mint_authority: &PublicKey, decimals: u8) -> Instruction {
    Instruction::new(
        *TOKEN_PROGRAM_ID,
        &TokenInstruction::InitializeMint {
            decimals,
            mint_authority: *mint_authority,
        },
        vec![AccountMeta::new(*mint, true)],
    )
}

pub fn create_associated_account(payer: &PublicKey, owner: &PublicKey, mint: &PublicKey) -> Instruction {
    Instruction::new(
        *TOKEN_PROGRAM_ID,
        &TokenInstruction::CreateAssociatedAccount,
        vec![
            AccountMeta::new(*payer, true),
            AccountMeta::new(get_associated_token_address(owner, mint), false),
            AccountMeta::new_readonly(*owner, false),
            AccountMeta::new_readonly(*mint, false),
        ],
    )
}

pub fn mint_to(
    mint: &PublicKey,
    destination: &PublicKey,
    mint_authority: &PublicKey,
    amount: u64,
) -> Instruction {
    Instruction::new(
        *TOKEN_PROGRAM_ID,
        &TokenInstruction::MintTo { amount },
        vec![
            AccountMeta::new(*mint, false),
            AccountMeta::new(*destination, false),
            AccountMeta::new_readonly(*mint_authority, true),
        ],
    )
}

pub fn approve(source: &PublicKey, delegate: &PublicKey, owner: &PublicKey, amount: u64) -> Instruction {
    Instruction::new(
        *TOKEN_PROGRAM_ID,
        &TokenInstruction::Approve { amount },
        vec![
            AccountMeta::new(*source, false),
            AccountMeta::new_readonly(*delegate, false),
            AccountMeta::new_readonly(*owner, true),
        ],
    )
}

pub fn revoke(source: &PublicKey, owner: &PublicKey) -> Instruction {
    Instruction::new(
        *TOKEN_PROGRAM_ID,
        &TokenInstruction::Revoke,
        vec![
            AccountMeta::new(*source, false),
            AccountMeta::new_readonly(*owner, true),
        ],
    )
}

pub fn transfer_checked(
    source: &PublicKey,
    mint: &PublicKey,
    destination: &PublicKey,
    authority: &PublicKey,
    amount: u64,
    decimals: u8,
) -> Instruction {
    Instruction::new(
        *TOKEN_PROGRAM_ID,
        &TokenInstruction::TransferChecked { amount, decimals },
        vec![
            AccountMeta::new(*source, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new(*destination, false),
            AccountMeta::new_readonly(*authority, true),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_layout() {
        let data = TokenInstruction::TransferChecked {
            amount: 1,
            decimals: 6,
        }
        .to_bytes();
        assert_eq!(data, vec![0x05, 0, 0, 0, 0, 0, 0, 0, 1, 6]);
    }

    #[test]
    fn test_unknown_opcode() {
        assert_eq!(
            TokenInstruction::from_bytes(&[0xff]),
            Err(ReaderError::UnknownDiscriminator("0xff".to_string()))
        );
    }
}
