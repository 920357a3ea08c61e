use serde::{Deserialize, Serialize};

use crate::{
    crypto::PublicKey,
    serializer::{Reader, ReaderError, Serializer, Writer},
};

/// Account referenced by an instruction
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccountMeta {
    pub pubkey: PublicKey,
    pub is_signer: bool,
    pub is_writable: bool,
}

impl AccountMeta {
    pub fn new(pubkey: PublicKey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: true,
        }
    }

    pub fn new_readonly(pubkey: PublicKey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: false,
        }
    }
}

impl Serializer for AccountMeta {
    fn write(&self, writer: &mut Writer) {
        self.pubkey.write(writer);
        writer.write_bool(self.is_signer);
        writer.write_bool(self.is_writable);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(Self {
            pubkey: reader.read()?,
            is_signer: reader.read_bool()?,
            is_writable: reader.read_bool()?,
        })
    }

    fn size(&self) -> usize {
        self.pubkey.size() + 2
    }
}

/// A call into a program: its id, the accounts it touches and opaque data
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Instruction {
    pub program_id: PublicKey,
    pub accounts: Vec<AccountMeta>,
    pub data: Vec<u8>,
}

impl Instruction {
    pub fn new<T: Serializer>(program_id: PublicKey, data: &T, accounts: Vec<AccountMeta>) -> Self {
        Self {
            program_id,
            accounts,
            data: data.to_bytes(),
        }
    }

    pub fn new_with_bytes(program_id: PublicKey, data: &[u8], accounts: Vec<AccountMeta>) -> Self {
        Self {
            program_id,
            accounts,
            data: data.to_vec(),
        }
    }
}

impl Serializer for Instruction {
    fn write(&self, writer: &mut Writer) {
        self.program_id.write(writer);
        self.accounts.write(writer);
        self.data.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(Self {
            program_id: reader.read()?,
            accounts: reader.read()?,
            data: reader.read()?,
        })
    }

    fn size(&self) -> usize {
        self.program_id.size() + self.accounts.size() + self.data.size()
    }
}
