use delegate_common::{
    crypto::{find_program_address, PublicKey},
    serializer::{Reader, ReaderError, Serializer, Writer},
};
use serde::{Deserialize, Serialize};

use crate::{
    constants::{ASSOCIATED_TOKEN_PROGRAM_ID, TOKEN_PROGRAM_ID},
    runtime::AccountState,
};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Mint {
    pub mint_authority: PublicKey,
    pub supply: u64,
    pub decimals: u8,
}

impl Serializer for Mint {
    fn write(&self, writer: &mut Writer) {
        self.mint_authority.write(writer);
        writer.write_u64(self.supply);
        writer.write_u8(self.decimals);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(Self {
            mint_authority: reader.read()?,
            supply: reader.read_u64()?,
            decimals: reader.read_u8()?,
        })
    }
}

impl AccountState for Mint {
    const NAME: &'static str = "Mint";

    fn owner() -> PublicKey {
        *TOKEN_PROGRAM_ID
    }
}

/// Balance of one owner for one mint
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TokenAccount {
    pub mint: PublicKey,
    pub owner: PublicKey,
    pub amount: u64,
    /// Account allowed to move up to `delegated_amount` on behalf of the owner
    pub delegate: Option<PublicKey>,
    pub delegated_amount: u64,
}

impl TokenAccount {
    pub fn new(mint: PublicKey, owner: PublicKey) -> Self {
        Self {
            mint,
            owner,
            amount: 0,
            delegate: None,
            delegated_amount: 0,
        }
    }

    // Remaining allowance of `key`, zero if it's not the delegate
    pub fn allowance(&self, key: &PublicKey) -> u64 {
        match self.delegate {
            Some(delegate) if delegate == *key => self.delegated_amount,
            _ => 0,
        }
    }
}

impl Serializer for TokenAccount {
    fn write(&self, writer: &mut Writer) {
        self.mint.write(writer);
        self.owner.write(writer);
        writer.write_u64(self.amount);
        self.delegate.write(writer);
        writer.write_u64(self.delegated_amount);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(Self {
            mint: reader.read()?,
            owner: reader.read()?,
            amount: reader.read_u64()?,
            delegate: reader.read()?,
            delegated_amount: reader.read_u64()?,
        })
    }
}

impl AccountState for TokenAccount {
    const NAME: &'static str = "TokenAccount";

    fn owner() -> PublicKey {
        *TOKEN_PROGRAM_ID
    }
}

/// Deterministic token account of `owner` for `mint`
pub fn get_associated_token_address(owner: &PublicKey, mint: &PublicKey) -> PublicKey {
    find_program_address(
        &[owner.as_ref(), TOKEN_PROGRAM_ID.as_ref(), mint.as_ref()],
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    )
    .0
}
