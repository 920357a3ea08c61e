use delegate_common::{
    crypto::PublicKey,
    serializer::{Reader, ReaderError, Serializer, Writer},
    time::UnixTimestamp,
};
use serde::{Deserialize, Serialize};

use crate::{constants::ID, error::DelegateError, runtime::AccountState};

/// Global program configuration, a singleton at the config address
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    pub admin: PublicKey,
    pub operator: PublicKey,
    pub vault: PublicKey,
    /// Default key when no transfer is pending
    pub pending_admin: PublicKey,
    pub last_trade_timestamp: UnixTimestamp,
    pub is_initialized: bool,
    pub is_paused: bool,
    // seconds
    pub cooldown_duration: i64,
    pub bump: u8,
}

impl Config {
    pub fn is_operator(&self, key: &PublicKey) -> bool {
        *key == self.operator || *key == self.admin
    }

    pub fn has_pending_admin(&self) -> bool {
        !self.pending_admin.is_default()
    }

    /// Gate shared by every fund movement
    pub fn check_operational(&self, signer: &PublicKey) -> Result<(), DelegateError> {
        if !self.is_operator(signer) {
            return Err(DelegateError::InvalidOperator);
        }
        if !self.is_initialized {
            return Err(DelegateError::ConfigNotInitialized);
        }
        if self.is_paused {
            return Err(DelegateError::ConfigPaused);
        }
        Ok(())
    }

    /// Earliest timestamp strictly after which the next trade is allowed
    pub fn cooldown_ends_at(&self) -> Result<UnixTimestamp, DelegateError> {
        self.last_trade_timestamp
            .checked_add(self.cooldown_duration)
            .ok_or(DelegateError::MathOverflow)
    }

    /// Enforce the cooldown and record `now` as the last trade
    pub fn check_cooldown(&mut self, now: UnixTimestamp) -> Result<(), DelegateError> {
        if self.cooldown_ends_at()? >= now {
            return Err(DelegateError::SwapTooFrequent);
        }
        self.last_trade_timestamp = now;
        Ok(())
    }
}

impl Serializer for Config {
    fn write(&self, writer: &mut Writer) {
        self.admin.write(writer);
        self.operator.write(writer);
        self.vault.write(writer);
        self.pending_admin.write(writer);
        writer.write_i64(self.last_trade_timestamp);
        writer.write_bool(self.is_initialized);
        writer.write_bool(self.is_paused);
        writer.write_i64(self.cooldown_duration);
        writer.write_u8(self.bump);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(Self {
            admin: reader.read()?,
            operator: reader.read()?,
            vault: reader.read()?,
            pending_admin: reader.read()?,
            last_trade_timestamp: reader.read_i64()?,
            is_initialized: reader.read_bool()?,
            is_paused: reader.read_bool()?,
            cooldown_duration: reader.read_i64()?,
            bump: reader.read_u8()?,
        })
    }

    fn size(&self) -> usize {
        4 * 32 + 8 + 1 + 1 + 8 + 1
    }
}

impl AccountState for Config {
    const NAME: &'static str = "Config";

    fn owner() -> PublicKey {
        *ID
    }
}
