use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use delegate_common::{
    crypto::{Hash, PublicKey},
    time::{Clock, SystemClock, UnixTimestamp},
    transaction::Transaction,
};
use delegate_program::runtime::{Account, Ledger, Program, Runtime, TransactionResult};
use log::{debug, info, trace};
use tokio::{fs, sync::Mutex};

use crate::error::ClientError;

/// Endpoint executing transactions
#[async_trait]
pub trait Cluster: Send + Sync {
    /// Hash to reference in the next transaction
    async fn latest_hash(&self) -> Result<Hash, ClientError>;

    async fn unix_timestamp(&self) -> Result<UnixTimestamp, ClientError>;

    async fn send_transaction(&self, transaction: &Transaction) -> Result<TransactionResult, ClientError>;

    async fn get_account(&self, key: &PublicKey) -> Result<Option<Account>, ClientError>;
}

/// In-memory cluster backed by a [`Runtime`]
pub struct LocalCluster {
    runtime: Mutex<Runtime>,
}

impl LocalCluster {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_ledger(Ledger::new(), clock)
    }

    pub fn with_ledger(ledger: Ledger, clock: Arc<dyn Clock>) -> Self {
        Self {
            runtime: Mutex::new(Runtime::with_ledger(ledger, clock)),
        }
    }

    /// Deploy an additional program, such as an aggregator
    pub async fn register_program(&self, program: Arc<dyn Program>) {
        self.runtime.lock().await.register_program(program);
    }

    /// Snapshot of the committed state
    pub async fn ledger(&self) -> Ledger {
        self.runtime.lock().await.ledger().clone()
    }
}

impl Default for LocalCluster {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

#[async_trait]
impl Cluster for LocalCluster {
    async fn latest_hash(&self) -> Result<Hash, ClientError> {
        Ok(self.runtime.lock().await.latest_hash())
    }

    async fn unix_timestamp(&self) -> Result<UnixTimestamp, ClientError> {
        Ok(self.runtime.lock().await.unix_timestamp())
    }

    async fn send_transaction(&self, transaction: &Transaction) -> Result<TransactionResult, ClientError> {
        let mut runtime = self.runtime.lock().await;
        Ok(runtime.process_transaction(transaction)?)
    }

    async fn get_account(&self, key: &PublicKey) -> Result<Option<Account>, ClientError> {
        Ok(self.runtime.lock().await.get_account(key).cloned())
    }
}

/// Local cluster whose ledger is persisted as JSON after every committed
/// transaction
///
/// A transaction whose ledger cannot be written is not committed.
pub struct FileCluster {
    path: PathBuf,
    inner: LocalCluster,
}

impl FileCluster {
    /// Load the ledger at `path`, or start a fresh one if the file is missing
    pub async fn open<P: AsRef<Path>>(path: P, clock: Arc<dyn Clock>) -> Result<Self, ClientError> {
        let path = path.as_ref().to_path_buf();
        let ledger = if fs::try_exists(&path).await? {
            let content = fs::read(&path).await?;
            let ledger: Ledger = serde_json::from_slice(&content)?;
            info!(
                "Loaded ledger from {} ({} accounts, {} transactions)",
                path.display(),
                ledger.accounts.len(),
                ledger.transaction_count()
            );
            ledger
        } else {
            info!("No ledger at {}, starting a new one", path.display());
            Ledger::new()
        };

        Ok(Self {
            path,
            inner: LocalCluster::with_ledger(ledger, clock),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn register_program(&self, program: Arc<dyn Program>) {
        self.inner.register_program(program).await;
    }

    // Written to a sibling file, then renamed over the ledger
    async fn persist(&self, ledger: &Ledger) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_vec_pretty(ledger)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, &json).await?;
        fs::rename(&tmp, &self.path).await?;
        trace!("Ledger persisted to {} ({} bytes)", self.path.display(), json.len());
        Ok(())
    }
}

#[async_trait]
impl Cluster for FileCluster {
    async fn latest_hash(&self) -> Result<Hash, ClientError> {
        self.inner.latest_hash().await
    }

    async fn unix_timestamp(&self) -> Result<UnixTimestamp, ClientError> {
        self.inner.unix_timestamp().await
    }

    async fn send_transaction(&self, transaction: &Transaction) -> Result<TransactionResult, ClientError> {
        // lock held until the ledger is persisted, the live runtime only
        // changes once the file is written
        let mut runtime = self.inner.runtime.lock().await;
        let mut next = runtime.clone();
        let result = next.process_transaction(transaction)?;
        debug!("Persisting ledger after {}", result.signature);
        self.persist(next.ledger()).await?;
        *runtime = next;
        Ok(result)
    }

    async fn get_account(&self, key: &PublicKey) -> Result<Option<Account>, ClientError> {
        self.inner.get_account(key).await
    }
}
