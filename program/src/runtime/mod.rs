//! In-process execution environment
//!
//! Models the parts of a ledger the delegate program depends on: accounts
//! owned by programs, program-derived signers, cross-program invocation and
//! atomic, replay protected transactions.

mod account;
mod context;
mod error;
mod ledger;

use std::{collections::HashMap, sync::Arc};

use delegate_common::{
    crypto::{Hash, PublicKey, Signature},
    time::{Clock, UnixTimestamp},
    transaction::{AccountMeta, Transaction, TransactionError},
};
use log::{debug, info};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

pub use account::{sighash, Account, AccountState};
pub use context::{process_instruction, ExecutionState, InvokeContext};
pub use error::{ProgramError, RuntimeError};
pub use ledger::{Ledger, MAX_RECENT_HASHES};

use crate::{processor::DelegateProgram, token::TokenProgram};

/// Executable program
pub trait Program: Send + Sync {
    fn id(&self) -> PublicKey;

    fn process(
        &self,
        ctx: &mut InvokeContext<'_>,
        accounts: &[AccountMeta],
        data: &[u8],
    ) -> Result<(), ProgramError>;
}

pub type ProgramRegistry = HashMap<PublicKey, Arc<dyn Program>>;

/// Structured event emitted by a program
pub trait Event: Serialize {
    const NAME: &'static str;
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct EventRecord {
    pub program_id: PublicKey,
    pub name: String,
    pub data: serde_json::Value,
}

impl EventRecord {
    pub fn decode<E: Event + DeserializeOwned>(&self) -> Option<E> {
        if self.name != E::NAME {
            return None;
        }
        serde_json::from_value(self.data.clone()).ok()
    }
}

/// Outcome of a committed transaction
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TransactionResult {
    pub signature: Signature,
    pub timestamp: UnixTimestamp,
    pub events: Vec<EventRecord>,
    pub logs: Vec<String>,
}

impl TransactionResult {
    /// Every event of type `E`, in emission order
    pub fn events<E: Event + DeserializeOwned>(&self) -> Vec<E> {
        self.events.iter().filter_map(EventRecord::decode).collect()
    }
}

#[derive(Clone)]
pub struct Runtime {
    ledger: Ledger,
    programs: ProgramRegistry,
    clock: Arc<dyn Clock>,
}

impl Runtime {
    /// Fresh ledger with the token and delegate programs deployed
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_ledger(Ledger::new(), clock)
    }

    pub fn with_ledger(ledger: Ledger, clock: Arc<dyn Clock>) -> Self {
        let mut runtime = Self {
            ledger,
            programs: HashMap::new(),
            clock,
        };
        runtime.register_program(Arc::new(TokenProgram));
        runtime.register_program(Arc::new(DelegateProgram));
        runtime
    }

    pub fn register_program(&mut self, program: Arc<dyn Program>) {
        let id = program.id();
        debug!("Registering program {}", id);
        self.programs.insert(id, program);
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn into_ledger(self) -> Ledger {
        self.ledger
    }

    pub fn latest_hash(&self) -> Hash {
        self.ledger.latest_hash()
    }

    pub fn unix_timestamp(&self) -> UnixTimestamp {
        self.clock.unix_timestamp()
    }

    pub fn get_account(&self, key: &PublicKey) -> Option<&Account> {
        self.ledger.accounts.get(key)
    }

    /// Decode an account as `T`, `None` if it doesn't exist
    pub fn get_state<T: AccountState>(&self, key: &PublicKey) -> Result<Option<T>, ProgramError> {
        match self.get_account(key) {
            Some(account) => {
                if account.owner != T::owner() {
                    return Err(ProgramError::IllegalOwner(*key));
                }
                T::unpack(key, &account.data).map(Some)
            }
            None => Ok(None),
        }
    }

    /// Verify and execute a transaction
    ///
    /// Instructions run in order against a working copy of the accounts which
    /// is committed only if all of them succeed. Every instruction observes
    /// the same timestamp.
    pub fn process_transaction(
        &mut self,
        transaction: &Transaction,
    ) -> Result<TransactionResult, RuntimeError> {
        transaction.verify()?;
        let signature = *transaction
            .signature()
            .ok_or(TransactionError::NoInstructions)?;

        if self.ledger.is_processed(&signature) {
            return Err(RuntimeError::AlreadyProcessed(signature));
        }
        let recent_hash = &transaction.message.recent_hash;
        if !self.ledger.is_recent(recent_hash) {
            return Err(RuntimeError::BlockhashNotFound(recent_hash.clone()));
        }

        let timestamp = self.clock.unix_timestamp();
        let mut state = ExecutionState::new(self.ledger.accounts.clone());
        for (index, instruction) in transaction.message.instructions.iter().enumerate() {
            let signers = instruction
                .accounts
                .iter()
                .filter(|meta| meta.is_signer)
                .map(|meta| meta.pubkey)
                .collect();

            if let Err(source) =
                process_instruction(&mut state, &self.programs, instruction, signers, timestamp, 0)
            {
                debug!(
                    "Transaction {} failed at instruction {}: {}",
                    signature, index, source
                );
                return Err(RuntimeError::InstructionError { index, source });
            }
        }

        self.ledger.accounts = state.accounts;
        self.ledger
            .record(signature, transaction.message.recent_hash.clone());
        info!(
            "Committed transaction {} ({} instructions, {} events)",
            signature,
            transaction.message.instructions.len(),
            state.events.len()
        );

        Ok(TransactionResult {
            signature,
            timestamp,
            events: state.events,
            logs: state.logs,
        })
    }
}
