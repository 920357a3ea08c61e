use std::sync::Arc;

use delegate_common::{
    crypto::{KeyPair, PublicKey},
    time::SystemClock,
    transaction::{AccountMeta, Instruction, Transaction},
};
use delegate_program::{
    instruction::{self, RouteAccounts, RouteParams},
    runtime::{AccountState, ProgramError, TransactionResult},
    state::{find_access_address, find_config_address, find_vault_address, Access, Config},
    token::{get_associated_token_address, TokenAccount},
};
use log::{debug, info, log_enabled, Level};

use crate::{
    cluster::{Cluster, FileCluster, LocalCluster},
    config::{ClusterUrl, ProviderConfig},
    error::ClientError,
    keypair::read_keypair_file,
};

/// A cluster and the wallet paying for and signing transactions
pub struct Provider {
    cluster: Arc<dyn Cluster>,
    wallet: KeyPair,
}

impl Provider {
    pub fn new(cluster: Arc<dyn Cluster>, wallet: KeyPair) -> Self {
        Self { cluster, wallet }
    }

    pub async fn from_config(config: &ProviderConfig) -> Result<Self, ClientError> {
        let wallet = read_keypair_file(&config.wallet)?;
        let cluster: Arc<dyn Cluster> = match &config.url {
            ClusterUrl::Local => Arc::new(LocalCluster::default()),
            ClusterUrl::File(path) => Arc::new(FileCluster::open(path, Arc::new(SystemClock)).await?),
        };
        info!("Provider {} with wallet {}", config.url, wallet.public_key());
        Ok(Self::new(cluster, wallet))
    }

    /// Provider configured from `DELEGATE_PROVIDER_URL` and `DELEGATE_WALLET`
    pub async fn env() -> Result<Self, ClientError> {
        Self::from_config(&ProviderConfig::from_env()?).await
    }

    pub fn cluster(&self) -> &Arc<dyn Cluster> {
        &self.cluster
    }

    pub fn wallet(&self) -> &KeyPair {
        &self.wallet
    }

    /// Sign with the wallet, which pays, and `signers`, then send
    pub async fn send(
        &self,
        instructions: Vec<Instruction>,
        signers: &[&KeyPair],
    ) -> Result<TransactionResult, ClientError> {
        let recent_hash = self.cluster.latest_hash().await?;
        let transaction = Transaction::new_signed(instructions, &self.wallet, signers, recent_hash)?;
        let result = self.cluster.send_transaction(&transaction).await?;
        if log_enabled!(Level::Debug) {
            for line in &result.logs {
                debug!("{}", line);
            }
        }
        Ok(result)
    }

    /// Decode the account at `key` as `T`
    pub async fn get_state<T: AccountState>(&self, key: &PublicKey) -> Result<Option<T>, ClientError> {
        match self.cluster.get_account(key).await? {
            Some(account) => {
                if account.owner != T::owner() {
                    return Err(ProgramError::IllegalOwner(*key).into());
                }
                Ok(Some(T::unpack(key, &account.data)?))
            }
            None => Ok(None),
        }
    }
}

/// Typed access to the delegate program
///
/// Every instruction is signed by the provider wallet and returns the
/// transaction signature as a hex string.
pub struct DelegateClient {
    provider: Provider,
}

impl DelegateClient {
    pub fn new(provider: Provider) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &Provider {
        &self.provider
    }

    fn wallet_key(&self) -> PublicKey {
        self.provider.wallet.public_key()
    }

    async fn send_one(&self, name: &str, instruction: Instruction) -> Result<String, ClientError> {
        self.send_signed(name, instruction, &[]).await
    }

    async fn send_signed(
        &self,
        name: &str,
        instruction: Instruction,
        signers: &[&KeyPair],
    ) -> Result<String, ClientError> {
        let result = self.provider.send(vec![instruction], signers).await?;
        let signature = result.signature.to_string();
        info!("{} confirmed: {}", name, signature);
        Ok(signature)
    }

    /// Initialize the config with the wallet as both admin and operator
    pub async fn init_config(&self, cooldown_duration: i64) -> Result<String, ClientError> {
        let operator = self.wallet_key();
        self.init_config_with_operator(&operator, cooldown_duration).await
    }

    pub async fn init_config_with_operator(
        &self,
        operator: &PublicKey,
        cooldown_duration: i64,
    ) -> Result<String, ClientError> {
        let admin = self.wallet_key();
        self.send_one(
            "init_config",
            instruction::init_config(&admin, operator, cooldown_duration),
        )
        .await
    }

    pub async fn grant_access(&self, user: &PublicKey) -> Result<String, ClientError> {
        self.send_one("grant_access", instruction::grant_access(&self.wallet_key(), user))
            .await
    }

    pub async fn revoke_access(&self, user: &PublicKey) -> Result<String, ClientError> {
        self.send_one("revoke_access", instruction::revoke_access(&self.wallet_key(), user))
            .await
    }

    pub async fn propose_new_admin(&self, new_admin: &PublicKey) -> Result<String, ClientError> {
        self.send_one(
            "propose_new_admin",
            instruction::propose_new_admin(&self.wallet_key(), new_admin),
        )
        .await
    }

    /// Accept a pending transfer, the wallet must be the proposed admin
    pub async fn accept_admin_transfer(&self) -> Result<String, ClientError> {
        self.send_one(
            "accept_admin_transfer",
            instruction::accept_admin_transfer(&self.wallet_key()),
        )
        .await
    }

    pub async fn modify_cooldown_duration(&self, cooldown_duration: i64) -> Result<String, ClientError> {
        self.send_one(
            "modify_cooldown_duration",
            instruction::modify_cooldown_duration(&self.wallet_key(), cooldown_duration),
        )
        .await
    }

    pub async fn modify_operator(&self, operator: &PublicKey) -> Result<String, ClientError> {
        self.send_one(
            "modify_operator",
            instruction::modify_operator(&self.wallet_key(), operator),
        )
        .await
    }

    pub async fn pause(&self, toggle: bool) -> Result<String, ClientError> {
        self.send_one("pause", instruction::pause(&self.wallet_key(), toggle))
            .await
    }

    /// Sweep the wallet's `output_mint` balance to `receiver`
    pub async fn token_receive(
        &self,
        receiver: &PublicKey,
        output_mint: &PublicKey,
    ) -> Result<String, ClientError> {
        self.send_one(
            "token_receive",
            instruction::token_receive(&self.wallet_key(), receiver, output_mint),
        )
        .await
    }

    /// Pull `amount` from `from` into the vault
    ///
    /// With `owner` the owner co-signs, otherwise the vault must be the
    /// approved delegate of `from`.
    pub async fn transfer_in(
        &self,
        mint: &PublicKey,
        from: &PublicKey,
        amount: u64,
        owner: Option<&KeyPair>,
    ) -> Result<String, ClientError> {
        let operator = self.wallet_key();
        match owner {
            Some(owner) => {
                let ix = instruction::transfer_in(&operator, &owner.public_key(), true, mint, from, amount);
                self.send_signed("transfer_in", ix, &[owner]).await
            }
            None => {
                let vault = find_vault_address().0;
                let ix = instruction::transfer_in(&operator, &vault, false, mint, from, amount);
                self.send_one("transfer_in", ix).await
            }
        }
    }

    pub async fn transfer_out(
        &self,
        mint: &PublicKey,
        destination: &PublicKey,
        amount: u64,
    ) -> Result<String, ClientError> {
        self.send_one(
            "transfer_out",
            instruction::transfer_out(&self.wallet_key(), mint, destination, amount),
        )
        .await
    }

    /// Swap delegated funds of `delegator` through an aggregator, the
    /// proceeds go to `receiver`
    pub async fn route(
        &self,
        delegator: &PublicKey,
        input_mint: &PublicKey,
        output_mint: &PublicKey,
        receiver: &PublicKey,
        params: RouteParams,
        remaining: Vec<AccountMeta>,
    ) -> Result<String, ClientError> {
        let accounts = RouteAccounts {
            operator: self.wallet_key(),
            delegator: *delegator,
            input_mint: *input_mint,
            output_mint: *output_mint,
            receiver: *receiver,
        };
        let name = format!("route via {}", params.aggregator.name());
        self.send_one(&name, instruction::route(&accounts, params, remaining))
            .await
    }

    pub async fn config(&self) -> Result<Config, ClientError> {
        self.provider
            .get_state::<Config>(&find_config_address().0)
            .await?
            .ok_or(ClientError::ConfigNotFound)
    }

    pub async fn access(&self, user: &PublicKey) -> Result<Option<Access>, ClientError> {
        self.provider
            .get_state::<Access>(&find_access_address(user).0)
            .await
    }

    /// Balance of the associated token account, 0 when it doesn't exist
    pub async fn token_balance(&self, owner: &PublicKey, mint: &PublicKey) -> Result<u64, ClientError> {
        let account = self
            .provider
            .get_state::<TokenAccount>(&get_associated_token_address(owner, mint))
            .await?;
        Ok(account.map(|account| account.amount).unwrap_or(0))
    }
}
