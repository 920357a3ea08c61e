use log::trace;
use serde::{Deserialize, Serialize};

use crate::{
    crypto::{Hash, Hashable, KeyPair, PublicKey, Signature},
    serializer::*,
};

mod error;
mod instruction;

pub use error::TransactionError;
pub use instruction::{AccountMeta, Instruction};

// Maximum number of instructions in a single transaction
pub const MAX_INSTRUCTIONS_PER_TX: usize = 64;

// Maximum number of account metas in a single instruction
pub const MAX_ACCOUNTS_PER_INSTRUCTION: usize = 256;

// Maximum size of the data of a single instruction
pub const MAX_INSTRUCTION_DATA_SIZE: usize = MAX_LENGTH_PREFIX;

/// The signed part of a transaction
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Message {
    /// Recent ledger hash, bounds the lifetime of the transaction
    pub recent_hash: Hash,
    /// Account paying for the transaction, always the first signer
    pub fee_payer: PublicKey,
    pub instructions: Vec<Instruction>,
}

impl Message {
    pub fn new(instructions: Vec<Instruction>, fee_payer: PublicKey, recent_hash: Hash) -> Self {
        Self {
            recent_hash,
            fee_payer,
            instructions,
        }
    }

    // Fee payer first, then every signer meta in order of appearance
    pub fn required_signers(&self) -> Vec<PublicKey> {
        let mut signers = vec![self.fee_payer];
        for meta in self.instructions.iter().flat_map(|ix| ix.accounts.iter()) {
            if meta.is_signer && !signers.contains(&meta.pubkey) {
                signers.push(meta.pubkey);
            }
        }
        signers
    }
}

impl Serializer for Message {
    fn write(&self, writer: &mut Writer) {
        self.recent_hash.write(writer);
        self.fee_payer.write(writer);
        self.instructions.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(Self {
            recent_hash: reader.read()?,
            fee_payer: reader.read()?,
            instructions: reader.read()?,
        })
    }
}

impl Hashable for Message {}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub message: Message,
    /// One signature per required signer, same order
    pub signatures: Vec<Signature>,
}

impl Transaction {
    /// Build and sign a transaction
    ///
    /// Every required signer must be the payer or one of `signers`.
    pub fn new_signed(
        instructions: Vec<Instruction>,
        payer: &KeyPair,
        signers: &[&KeyPair],
        recent_hash: Hash,
    ) -> Result<Self, TransactionError> {
        let message = Message::new(instructions, payer.public_key(), recent_hash);
        Self::check_instructions(&message)?;

        let bytes = message.to_bytes();
        let mut signatures = Vec::new();
        for key in message.required_signers() {
            let keypair = std::iter::once(payer)
                .chain(signers.iter().copied())
                .find(|keypair| keypair.public_key() == key)
                .ok_or(TransactionError::MissingSigner(key))?;
            signatures.push(keypair.sign(&bytes));
        }

        trace!(
            "Signed transaction with {} instructions and {} signatures",
            message.instructions.len(),
            signatures.len()
        );

        Ok(Self {
            message,
            signatures,
        })
    }

    fn check_instructions(message: &Message) -> Result<(), TransactionError> {
        let count = message.instructions.len();
        if count == 0 {
            return Err(TransactionError::NoInstructions);
        }
        if count > MAX_INSTRUCTIONS_PER_TX {
            return Err(TransactionError::TooManyInstructions {
                count,
                max: MAX_INSTRUCTIONS_PER_TX,
            });
        }

        // Every length must fit its prefix for the signed bytes to decode
        // back to the same message
        for (index, instruction) in message.instructions.iter().enumerate() {
            let count = instruction.accounts.len();
            if count > MAX_ACCOUNTS_PER_INSTRUCTION {
                return Err(TransactionError::TooManyAccounts {
                    index,
                    count,
                    max: MAX_ACCOUNTS_PER_INSTRUCTION,
                });
            }
            let size = instruction.data.len();
            if size > MAX_INSTRUCTION_DATA_SIZE {
                return Err(TransactionError::InstructionDataTooLarge {
                    index,
                    size,
                    max: MAX_INSTRUCTION_DATA_SIZE,
                });
            }
        }
        Ok(())
    }

    /// Verify every required signature over the message
    pub fn verify(&self) -> Result<(), TransactionError> {
        Self::check_instructions(&self.message)?;

        let required = self.message.required_signers();
        if required.len() != self.signatures.len() {
            return Err(TransactionError::SignatureCountMismatch {
                expected: required.len(),
                got: self.signatures.len(),
            });
        }

        let bytes = self.message.to_bytes();
        for (key, signature) in required.iter().zip(self.signatures.iter()) {
            if !key.verify(&bytes, signature) {
                return Err(TransactionError::InvalidSignature(*key));
            }
        }
        Ok(())
    }

    /// Transaction id: the fee payer signature
    pub fn signature(&self) -> Option<&Signature> {
        self.signatures.first()
    }

    pub fn signers(&self) -> Vec<PublicKey> {
        self.message.required_signers()
    }
}

impl Serializer for Transaction {
    fn write(&self, writer: &mut Writer) {
        self.message.write(writer);
        self.signatures.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(Self {
            message: reader.read()?,
            signatures: reader.read()?,
        })
    }
}
