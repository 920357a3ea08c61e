use std::collections::{BTreeMap, HashSet};

use delegate_common::{
    crypto::{create_program_address, PublicKey},
    time::UnixTimestamp,
    transaction::{AccountMeta, Instruction},
};
use log::{debug, trace};

use crate::constants::MAX_INVOKE_DEPTH;

use super::{Account, AccountState, Event, EventRecord, ProgramError, ProgramRegistry};

/// Working copy of the ledger for one transaction
#[derive(Debug, Default)]
pub struct ExecutionState {
    pub accounts: BTreeMap<PublicKey, Account>,
    pub events: Vec<EventRecord>,
    pub logs: Vec<String>,
}

impl ExecutionState {
    pub fn new(accounts: BTreeMap<PublicKey, Account>) -> Self {
        Self {
            accounts,
            events: Vec::new(),
            logs: Vec::new(),
        }
    }
}

/// Everything a program sees while processing one instruction
pub struct InvokeContext<'a> {
    state: &'a mut ExecutionState,
    programs: &'a ProgramRegistry,
    // Metas of the running instruction, the only accounts it can touch
    accounts: &'a [AccountMeta],
    program_id: PublicKey,
    signers: HashSet<PublicKey>,
    timestamp: UnixTimestamp,
    depth: usize,
}

/// Dispatch an instruction to its program
///
/// `signers` are the accounts whose signature is already established,
/// either by the transaction itself or by the calling program.
pub fn process_instruction(
    state: &mut ExecutionState,
    programs: &ProgramRegistry,
    instruction: &Instruction,
    signers: HashSet<PublicKey>,
    timestamp: UnixTimestamp,
    depth: usize,
) -> Result<(), ProgramError> {
    if depth > MAX_INVOKE_DEPTH {
        return Err(ProgramError::CallDepthExceeded);
    }

    let program = programs
        .get(&instruction.program_id)
        .ok_or(ProgramError::UnsupportedProgramId(instruction.program_id))?;

    trace!(
        "Invoking program {} at depth {} with {} accounts",
        instruction.program_id,
        depth,
        instruction.accounts.len()
    );

    let mut context = InvokeContext {
        state,
        programs,
        accounts: &instruction.accounts,
        program_id: instruction.program_id,
        signers,
        timestamp,
        depth,
    };
    program.process(&mut context, &instruction.accounts, &instruction.data)
}

impl<'a> InvokeContext<'a> {
    pub fn program_id(&self) -> &PublicKey {
        &self.program_id
    }

    pub fn unix_timestamp(&self) -> UnixTimestamp {
        self.timestamp
    }

    pub fn is_signer(&self, key: &PublicKey) -> bool {
        self.signers.contains(key)
    }

    pub fn require_signer(&self, key: &PublicKey) -> Result<(), ProgramError> {
        if !self.is_signer(key) {
            return Err(ProgramError::MissingRequiredSignature(*key));
        }
        Ok(())
    }

    fn is_writable(&self, key: &PublicKey) -> bool {
        self.accounts
            .iter()
            .any(|meta| meta.pubkey == *key && meta.is_writable)
    }

    fn check_declared(&self, key: &PublicKey) -> Result<(), ProgramError> {
        if !self.accounts.iter().any(|meta| meta.pubkey == *key) {
            return Err(ProgramError::MissingAccount(*key));
        }
        Ok(())
    }

    fn check_writable(&self, key: &PublicKey) -> Result<(), ProgramError> {
        self.check_declared(key)?;
        if !self.is_writable(key) {
            return Err(ProgramError::ReadonlyAccount(*key));
        }
        Ok(())
    }

    /// Raw account, `None` if it doesn't exist or isn't part of the instruction
    pub fn get_account(&self, key: &PublicKey) -> Option<&Account> {
        self.check_declared(key).ok()?;
        self.state.accounts.get(key)
    }

    /// Load a typed account, failing if it doesn't exist
    pub fn load<T: AccountState>(&self, key: &PublicKey) -> Result<T, ProgramError> {
        self.try_load(key)?.ok_or(ProgramError::AccountNotFound(*key))
    }

    /// Load a typed account, `None` if it doesn't exist yet
    pub fn try_load<T: AccountState>(&self, key: &PublicKey) -> Result<Option<T>, ProgramError> {
        self.check_declared(key)?;
        match self.state.accounts.get(key) {
            Some(account) => {
                if account.owner != T::owner() {
                    return Err(ProgramError::IllegalOwner(*key));
                }
                T::unpack(key, &account.data).map(Some)
            }
            None => Ok(None),
        }
    }

    /// Write a typed account, creating it if needed
    ///
    /// The account must be writable in the instruction. Only the owner
    /// program can write, and an account owned by another program can never
    /// be taken over.
    pub fn store<T: AccountState>(&mut self, key: &PublicKey, value: &T) -> Result<(), ProgramError> {
        self.check_writable(key)?;
        if T::owner() != self.program_id {
            return Err(ProgramError::IllegalOwner(*key));
        }
        if let Some(account) = self.state.accounts.get(key) {
            if account.owner != self.program_id {
                return Err(ProgramError::IllegalOwner(*key));
            }
        }

        self.state.accounts.insert(
            *key,
            Account {
                owner: self.program_id,
                data: value.pack(),
            },
        );
        Ok(())
    }

    // Remove an account owned by the running program
    pub fn close(&mut self, key: &PublicKey) -> Result<(), ProgramError> {
        self.check_writable(key)?;
        let account = self
            .state
            .accounts
            .get(key)
            .ok_or(ProgramError::AccountNotFound(*key))?;
        if account.owner != self.program_id {
            return Err(ProgramError::IllegalOwner(*key));
        }
        self.state.accounts.remove(key);
        Ok(())
    }

    /// Call another program
    ///
    /// The callee only gets accounts of the calling instruction, writable
    /// only where they are writable for the caller. Signer flags are only
    /// honored for accounts that signed for the caller or for addresses
    /// derived from the caller id with `signer_seeds`.
    pub fn invoke(
        &mut self,
        instruction: &Instruction,
        signer_seeds: &[&[&[u8]]],
    ) -> Result<(), ProgramError> {
        let mut derived = HashSet::with_capacity(signer_seeds.len());
        for seeds in signer_seeds {
            derived.insert(create_program_address(seeds, &self.program_id)?);
        }

        let mut signers = HashSet::new();
        for meta in &instruction.accounts {
            self.check_declared(&meta.pubkey)?;
            if meta.is_writable && !self.is_writable(&meta.pubkey) {
                return Err(ProgramError::ReadonlyAccount(meta.pubkey));
            }
            if !meta.is_signer {
                continue;
            }
            if !self.signers.contains(&meta.pubkey) && !derived.contains(&meta.pubkey) {
                return Err(ProgramError::MissingRequiredSignature(meta.pubkey));
            }
            signers.insert(meta.pubkey);
        }

        process_instruction(
            &mut *self.state,
            self.programs,
            instruction,
            signers,
            self.timestamp,
            self.depth + 1,
        )
    }

    pub fn emit<E: Event>(&mut self, event: &E) -> Result<(), ProgramError> {
        let data =
            serde_json::to_value(event).map_err(|e| ProgramError::EventEncoding(e.to_string()))?;
        debug!("Program {} emitted {}: {}", self.program_id, E::NAME, data);
        self.state.events.push(EventRecord {
            program_id: self.program_id,
            name: E::NAME.to_owned(),
            data,
        });
        Ok(())
    }

    pub fn log<S: Into<String>>(&mut self, message: S) {
        let line = format!("Program {} log: {}", self.program_id, message.into());
        trace!("{}", line);
        self.state.logs.push(line);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        constants::TOKEN_PROGRAM_ID,
        token::{self, Mint, TokenAccount, TokenProgram},
    };

    use super::*;

    fn mint() -> Mint {
        Mint {
            mint_authority: PublicKey::new([1u8; 32]),
            supply: 0,
            decimals: 6,
        }
    }

    fn token_state(keys: &[PublicKey]) -> ExecutionState {
        let mut state = ExecutionState::default();
        for key in keys {
            state.accounts.insert(
                *key,
                Account {
                    owner: *TOKEN_PROGRAM_ID,
                    data: mint().pack(),
                },
            );
        }
        state
    }

    fn token_context<'a>(
        state: &'a mut ExecutionState,
        programs: &'a ProgramRegistry,
        accounts: &'a [AccountMeta],
        signers: HashSet<PublicKey>,
    ) -> InvokeContext<'a> {
        InvokeContext {
            state,
            programs,
            accounts,
            program_id: *TOKEN_PROGRAM_ID,
            signers,
            timestamp: 0,
            depth: 0,
        }
    }

    #[test]
    fn test_undeclared_account_cannot_be_read() {
        let declared = PublicKey::new([2u8; 32]);
        let other = PublicKey::new([3u8; 32]);
        let mut state = token_state(&[declared, other]);
        let programs = ProgramRegistry::new();
        let accounts = [AccountMeta::new_readonly(declared, false)];
        let ctx = token_context(&mut state, &programs, &accounts, HashSet::new());

        assert_eq!(ctx.load::<Mint>(&declared).unwrap(), mint());
        assert_eq!(
            ctx.load::<Mint>(&other),
            Err(ProgramError::MissingAccount(other))
        );
        assert!(ctx.get_account(&other).is_none());
    }

    #[test]
    fn test_store_requires_writable_meta() {
        let readonly = PublicKey::new([2u8; 32]);
        let writable = PublicKey::new([3u8; 32]);
        let undeclared = PublicKey::new([4u8; 32]);
        let mut state = token_state(&[readonly, writable]);
        let programs = ProgramRegistry::new();
        let accounts = [
            AccountMeta::new_readonly(readonly, false),
            AccountMeta::new(writable, false),
        ];
        let mut ctx = token_context(&mut state, &programs, &accounts, HashSet::new());

        let mut value = mint();
        value.supply = 10;
        assert_eq!(
            ctx.store(&readonly, &value),
            Err(ProgramError::ReadonlyAccount(readonly))
        );
        assert_eq!(
            ctx.store(&undeclared, &value),
            Err(ProgramError::MissingAccount(undeclared))
        );
        assert_eq!(ctx.close(&readonly), Err(ProgramError::ReadonlyAccount(readonly)));
        ctx.store(&writable, &value).unwrap();

        assert_eq!(ctx.load::<Mint>(&readonly).unwrap().supply, 0);
        assert_eq!(ctx.load::<Mint>(&writable).unwrap().supply, 10);
        assert!(!state.accounts.contains_key(&undeclared));
    }

    #[test]
    fn test_invoke_cannot_escalate_account_access() {
        let source = PublicKey::new([2u8; 32]);
        let owner = PublicKey::new([3u8; 32]);
        let mut state = ExecutionState::default();
        state.accounts.insert(
            source,
            Account {
                owner: *TOKEN_PROGRAM_ID,
                data: TokenAccount::new(PublicKey::new([4u8; 32]), owner).pack(),
            },
        );
        let mut programs = ProgramRegistry::new();
        programs.insert(*TOKEN_PROGRAM_ID, Arc::new(TokenProgram));
        let revoke = token::instruction::revoke(&source, &owner);

        let accounts = [
            AccountMeta::new_readonly(source, false),
            AccountMeta::new_readonly(owner, true),
        ];
        let mut ctx = token_context(&mut state, &programs, &accounts, HashSet::from([owner]));
        assert_eq!(
            ctx.invoke(&revoke, &[]),
            Err(ProgramError::ReadonlyAccount(source))
        );

        let accounts = [AccountMeta::new_readonly(owner, true)];
        let mut ctx = token_context(&mut state, &programs, &accounts, HashSet::from([owner]));
        assert_eq!(
            ctx.invoke(&revoke, &[]),
            Err(ProgramError::MissingAccount(source))
        );

        let accounts = [
            AccountMeta::new(source, false),
            AccountMeta::new_readonly(owner, true),
        ];
        let mut ctx = token_context(&mut state, &programs, &accounts, HashSet::from([owner]));
        ctx.invoke(&revoke, &[]).unwrap();
    }
}
