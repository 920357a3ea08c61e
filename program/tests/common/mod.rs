#![allow(dead_code)]

use std::sync::Arc;

use delegate_common::{
    crypto::{find_program_address, KeyPair, PublicKey},
    serializer::Reader,
    time::ManualClock,
    transaction::{AccountMeta, Instruction, Transaction},
};
use delegate_program::{
    instruction::{self, Aggregator, RouteAccounts, RouteParams},
    runtime::{InvokeContext, Program, ProgramError, Runtime, RuntimeError, TransactionResult},
    state::{find_config_address, find_vault_address, Access, Config},
    token::{self, get_associated_token_address, Mint, TokenAccount},
    DISCRIMINATOR_JUPITER_AGGREGATOR_ROUTE, JUPITER_PROGRAM_ID,
};

pub const START_TIME: i64 = 1_700_000_000;

const POOL_SEED: &[u8] = b"pool";

pub struct TestEnv {
    pub runtime: Runtime,
    pub clock: Arc<ManualClock>,
    pub admin: KeyPair,
    pub operator: KeyPair,
}

impl TestEnv {
    pub fn new() -> Self {
        let clock = ManualClock::shared(START_TIME);
        let mut runtime = Runtime::new(clock.clone());
        runtime.register_program(Arc::new(MockAggregator::new(*JUPITER_PROGRAM_ID)));
        Self {
            runtime,
            clock,
            admin: KeyPair::new(),
            operator: KeyPair::new(),
        }
    }

    /// Env with the config initialized by `admin`
    pub fn initialized(cooldown_duration: i64) -> Self {
        let mut env = Self::new();
        env.init_config(cooldown_duration).unwrap();
        env
    }

    /// Sign with every key, the first one pays
    pub fn send(
        &mut self,
        instructions: Vec<Instruction>,
        signers: &[&KeyPair],
    ) -> Result<TransactionResult, RuntimeError> {
        let tx = Transaction::new_signed(
            instructions,
            signers[0],
            &signers[1..],
            self.runtime.latest_hash(),
        )?;
        self.runtime.process_transaction(&tx)
    }

    pub fn init_config(&mut self, cooldown_duration: i64) -> Result<TransactionResult, RuntimeError> {
        let admin = self.admin.public_key();
        let operator = self.operator.public_key();
        let admin_keys = clone_keypair(&self.admin);
        self.send(
            vec![instruction::init_config(&admin, &operator, cooldown_duration)],
            &[&admin_keys],
        )
    }

    pub fn admin_send(&mut self, instruction: Instruction) -> Result<TransactionResult, RuntimeError> {
        let admin = clone_keypair(&self.admin);
        self.send(vec![instruction], &[&admin])
    }

    pub fn operator_send(&mut self, instruction: Instruction) -> Result<TransactionResult, RuntimeError> {
        let operator = clone_keypair(&self.operator);
        self.send(vec![instruction], &[&operator])
    }

    /// New mint with `admin` as mint authority
    pub fn create_mint(&mut self, decimals: u8) -> PublicKey {
        let mint = KeyPair::new();
        let admin = clone_keypair(&self.admin);
        self.send(
            vec![token::instruction::initialize_mint(
                &mint.public_key(),
                &admin.public_key(),
                decimals,
            )],
            &[&admin, &mint],
        )
        .unwrap();
        mint.public_key()
    }

    /// Create the associated account of `owner` and mint `amount` into it
    pub fn fund(&mut self, owner: &PublicKey, mint: &PublicKey, amount: u64) -> PublicKey {
        let admin = clone_keypair(&self.admin);
        let account = get_associated_token_address(owner, mint);
        let mut instructions = vec![token::instruction::create_associated_account(
            &admin.public_key(),
            owner,
            mint,
        )];
        if amount > 0 {
            instructions.push(token::instruction::mint_to(
                mint,
                &account,
                &admin.public_key(),
                amount,
            ));
        }
        self.send(instructions, &[&admin]).unwrap();
        account
    }

    pub fn approve_vault(&mut self, owner: &KeyPair, mint: &PublicKey, amount: u64) {
        let source = get_associated_token_address(&owner.public_key(), mint);
        self.send(
            vec![token::instruction::approve(
                &source,
                &find_vault_address().0,
                &owner.public_key(),
                amount,
            )],
            &[owner],
        )
        .unwrap();
    }

    pub fn grant(&mut self, user: &PublicKey) {
        let admin = self.admin.public_key();
        self.admin_send(instruction::grant_access(&admin, user))
            .unwrap();
    }

    pub fn token_account(&self, key: &PublicKey) -> Option<TokenAccount> {
        self.runtime.get_state::<TokenAccount>(key).unwrap()
    }

    pub fn balance(&self, key: &PublicKey) -> u64 {
        self.token_account(key).map(|account| account.amount).unwrap_or(0)
    }

    pub fn config(&self) -> Config {
        self.runtime
            .get_state::<Config>(&find_config_address().0)
            .unwrap()
            .unwrap()
    }

    pub fn access(&self, key: &PublicKey) -> Option<Access> {
        self.runtime.get_state::<Access>(key).unwrap()
    }

    pub fn mint(&self, key: &PublicKey) -> Mint {
        self.runtime.get_state::<Mint>(key).unwrap().unwrap()
    }
}

pub fn clone_keypair(keypair: &KeyPair) -> KeyPair {
    keypair.clone()
}

/// Liquidity pool of the mock aggregator
pub struct Pool {
    pub authority: PublicKey,
    pub input_account: PublicKey,
    pub output_account: PublicKey,
}

pub fn pool_authority() -> (PublicKey, u8) {
    find_program_address(&[POOL_SEED], &JUPITER_PROGRAM_ID)
}

/// A pool holding `liquidity` of `output_mint`
pub fn create_pool(
    env: &mut TestEnv,
    input_mint: &PublicKey,
    output_mint: &PublicKey,
    liquidity: u64,
) -> Pool {
    let authority = pool_authority().0;
    Pool {
        authority,
        input_account: env.fund(&authority, input_mint, 0),
        output_account: env.fund(&authority, output_mint, liquidity),
    }
}

/// Aggregator instruction data understood by [`MockAggregator`]
pub fn swap_data(in_amount: u64, out_amount: u64, drain: u64) -> Vec<u8> {
    let mut data = DISCRIMINATOR_JUPITER_AGGREGATOR_ROUTE.to_vec();
    data.extend(in_amount.to_be_bytes());
    data.extend(out_amount.to_be_bytes());
    data.extend(drain.to_be_bytes());
    data
}

pub struct RouteSetup {
    pub delegator: KeyPair,
    pub receiver: KeyPair,
    pub input_mint: PublicKey,
    pub output_mint: PublicKey,
    pub pool: Pool,
}

impl RouteSetup {
    /// Delegator holding 1000 input tokens, 500 approved to the vault,
    /// a receiver with access and a pool with 10000 output tokens
    pub fn new(env: &mut TestEnv) -> Self {
        let delegator = KeyPair::new();
        let receiver = KeyPair::new();
        let input_mint = env.create_mint(6);
        let output_mint = env.create_mint(9);

        env.fund(&delegator.public_key(), &input_mint, 1_000);
        env.approve_vault(&delegator, &input_mint, 500);
        env.grant(&receiver.public_key());
        let pool = create_pool(env, &input_mint, &output_mint, 10_000);

        Self {
            delegator,
            receiver,
            input_mint,
            output_mint,
            pool,
        }
    }

    pub fn accounts(&self, operator: &PublicKey) -> RouteAccounts {
        RouteAccounts {
            operator: *operator,
            delegator: self.delegator.public_key(),
            input_mint: self.input_mint,
            output_mint: self.output_mint,
            receiver: self.receiver.public_key(),
        }
    }

    pub fn receiver_account(&self) -> PublicKey {
        get_associated_token_address(&self.receiver.public_key(), &self.output_mint)
    }

    pub fn delegator_account(&self) -> PublicKey {
        get_associated_token_address(&self.delegator.public_key(), &self.input_mint)
    }

    /// Accounts forwarded to [`MockAggregator`]
    pub fn remaining(&self) -> Vec<AccountMeta> {
        let vault = find_vault_address().0;
        vec![
            AccountMeta::new(vault, false),
            AccountMeta::new(get_associated_token_address(&vault, &self.input_mint), false),
            AccountMeta::new(get_associated_token_address(&vault, &self.output_mint), false),
            AccountMeta::new(self.pool.input_account, false),
            AccountMeta::new(self.pool.output_account, false),
            AccountMeta::new_readonly(self.input_mint, false),
            AccountMeta::new_readonly(self.output_mint, false),
            AccountMeta::new_readonly(self.pool.authority, false),
            AccountMeta::new(self.receiver_account(), false),
        ]
    }

    pub fn route(&self, operator: &PublicKey, in_amount: u64, data: Vec<u8>) -> Instruction {
        instruction::route(
            &self.accounts(operator),
            RouteParams {
                aggregator: Aggregator::Jupiter,
                in_amount,
                data,
            },
            self.remaining(),
        )
    }
}

/// Fixed price aggregator
///
/// Takes `in_amount` from the vault input account into the pool, pays
/// `out_amount` from the pool to the vault output account, then takes `drain`
/// back out of the vault output account.
///
/// Accounts: [vault (signer), vault input, vault output, pool input,
/// pool output, input mint, output mint, pool authority, ..]
pub struct MockAggregator {
    program_id: PublicKey,
}

impl MockAggregator {
    pub fn new(program_id: PublicKey) -> Self {
        Self { program_id }
    }
}

impl Program for MockAggregator {
    fn id(&self) -> PublicKey {
        self.program_id
    }

    fn process(
        &self,
        ctx: &mut InvokeContext<'_>,
        accounts: &[AccountMeta],
        data: &[u8],
    ) -> Result<(), ProgramError> {
        let [vault, vault_input, vault_output, pool_input, pool_output, input_mint, output_mint, authority, ..] =
            accounts
        else {
            return Err(ProgramError::NotEnoughAccountKeys);
        };
        if data.len() < 8 {
            return Err(ProgramError::Custom(1));
        }
        let mut reader = Reader::new(&data[8..]);
        let in_amount = reader.read_u64()?;
        let out_amount = reader.read_u64()?;
        let drain = reader.read_u64()?;

        let input_decimals = ctx.load::<Mint>(&input_mint.pubkey)?.decimals;
        let output_decimals = ctx.load::<Mint>(&output_mint.pubkey)?.decimals;

        ctx.invoke(
            &token::instruction::transfer_checked(
                &vault_input.pubkey,
                &input_mint.pubkey,
                &pool_input.pubkey,
                &vault.pubkey,
                in_amount,
                input_decimals,
            ),
            &[],
        )?;

        let (pool_authority, bump) = pool_authority();
        if authority.pubkey != pool_authority {
            return Err(ProgramError::Custom(2));
        }
        let bump = [bump];
        let seeds: &[&[u8]] = &[POOL_SEED, &bump];
        ctx.invoke(
            &token::instruction::transfer_checked(
                &pool_output.pubkey,
                &output_mint.pubkey,
                &vault_output.pubkey,
                &pool_authority,
                out_amount,
                output_decimals,
            ),
            &[seeds],
        )?;

        if drain > 0 {
            ctx.invoke(
                &token::instruction::transfer_checked(
                    &vault_output.pubkey,
                    &output_mint.pubkey,
                    &pool_output.pubkey,
                    &vault.pubkey,
                    drain,
                    output_decimals,
                ),
                &[],
            )?;
        }
        Ok(())
    }
}
