use std::{env, fmt, path::PathBuf, str::FromStr};

use clap::Parser;
use delegate_common::crypto::PublicKey;
use serde::{Deserialize, Serialize};

use crate::{
    error::ClientError,
    logger::{LogLevel, DEFAULT_DATETIME_FORMAT},
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Environment variables read by ProviderConfig::from_env
pub const PROVIDER_URL_ENV: &str = "DELEGATE_PROVIDER_URL";
pub const WALLET_ENV: &str = "DELEGATE_WALLET";

pub const DEFAULT_PROVIDER_URL: &str = "local";
pub const DEFAULT_WALLET_PATH: &str = "delegate-wallet.json";

// Default cooldown between trades, in seconds
pub const DEFAULT_COOLDOWN_DURATION: i64 = 60;

const FILE_URL_PREFIX: &str = "file://";

/// Where transactions are sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterUrl {
    /// In-memory ledger, dropped with the process
    Local,
    /// Ledger persisted as JSON at this path
    File(PathBuf),
}

impl FromStr for ClusterUrl {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == DEFAULT_PROVIDER_URL {
            return Ok(Self::Local);
        }

        match s.strip_prefix(FILE_URL_PREFIX) {
            Some(path) if !path.is_empty() => Ok(Self::File(PathBuf::from(path))),
            _ => Err(ClientError::InvalidProviderUrl(s.to_owned())),
        }
    }
}

impl fmt::Display for ClusterUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "{}", DEFAULT_PROVIDER_URL),
            Self::File(path) => write!(f, "{}{}", FILE_URL_PREFIX, path.display()),
        }
    }
}

/// Cluster endpoint and wallet keypair file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub url: ClusterUrl,
    pub wallet: PathBuf,
}

impl ProviderConfig {
    pub fn new(url: ClusterUrl, wallet: impl Into<PathBuf>) -> Self {
        Self {
            url,
            wallet: wallet.into(),
        }
    }

    /// Read `DELEGATE_PROVIDER_URL` (defaults to `local`) and `DELEGATE_WALLET`
    pub fn from_env() -> Result<Self, ClientError> {
        let url = env::var(PROVIDER_URL_ENV).unwrap_or_else(|_| DEFAULT_PROVIDER_URL.to_owned());
        let wallet = env::var(WALLET_ENV).map_err(|_| ClientError::MissingEnv(WALLET_ENV))?;
        Ok(Self::new(url.parse()?, wallet))
    }
}

fn default_datetime_format() -> String {
    DEFAULT_DATETIME_FORMAT.to_owned()
}

#[derive(Debug, Clone, clap::Args, Serialize, Deserialize)]
pub struct ProviderArgs {
    /// Cluster url: `local` or `file://<path>`
    /// Falls back to DELEGATE_PROVIDER_URL, then `local`
    #[clap(long)]
    pub provider_url: Option<String>,
    /// Wallet keypair file
    /// Falls back to DELEGATE_WALLET, then delegate-wallet.json
    #[clap(long)]
    pub wallet: Option<String>,
}

impl ProviderArgs {
    /// Explicit values first, then the environment, then the defaults
    pub fn resolve(&self) -> Result<ProviderConfig, ClientError> {
        let url = match &self.provider_url {
            Some(url) => url.clone(),
            None => env::var(PROVIDER_URL_ENV).unwrap_or_else(|_| DEFAULT_PROVIDER_URL.to_owned()),
        };
        let wallet = match &self.wallet {
            Some(wallet) => wallet.clone(),
            None => env::var(WALLET_ENV).unwrap_or_else(|_| DEFAULT_WALLET_PATH.to_owned()),
        };
        Ok(ProviderConfig::new(url.parse()?, wallet))
    }
}

#[derive(Debug, Clone, clap::Args, Serialize, Deserialize)]
pub struct LogConfig {
    /// Set log level
    #[clap(long, value_enum, default_value_t)]
    #[serde(default)]
    pub log_level: LogLevel,
    /// Set file log level
    /// By default, it will be the same as log level
    #[clap(long, value_enum)]
    pub file_log_level: Option<LogLevel>,
    /// Also write logs to this file
    #[clap(long)]
    pub log_file: Option<String>,
    /// Disable the usage of colors in log
    #[clap(long)]
    #[serde(default)]
    pub disable_log_color: bool,
    /// Change the datetime format used by the logger
    #[clap(long, default_value_t = default_datetime_format())]
    #[serde(default = "default_datetime_format")]
    pub datetime_format: String,
}

#[derive(Debug, Clone, clap::Subcommand)]
pub enum Command {
    /// Generate a new keypair file
    Keygen {
        /// Where to write the keypair
        #[clap(long, default_value = DEFAULT_WALLET_PATH)]
        outfile: PathBuf,
        /// Overwrite an existing file
        #[clap(long)]
        force: bool,
    },
    /// Print the public key of the wallet
    Address,
    /// Initialize the program config with the wallet as admin
    InitConfig {
        /// Seconds between two trades
        #[clap(long, default_value_t = DEFAULT_COOLDOWN_DURATION)]
        cooldown: i64,
        /// Operator key, the wallet when omitted
        #[clap(long)]
        operator: Option<PublicKey>,
    },
    /// Allow a user to receive routed proceeds
    GrantAccess { user: PublicKey },
    /// Revoke a previously granted access
    RevokeAccess { user: PublicKey },
    /// Propose a new admin, who must then accept
    ProposeAdmin { new_admin: PublicKey },
    /// Accept a pending admin transfer with the wallet
    AcceptAdmin,
    /// Change the cooldown between trades
    SetCooldown { seconds: i64 },
    /// Change the operator
    SetOperator { operator: PublicKey },
    /// Pause transfers and routes
    Pause,
    /// Resume transfers and routes
    Unpause,
    /// Print the program config as JSON
    ShowConfig,
}

#[derive(Parser, Serialize, Deserialize, Clone, Debug)]
#[clap(
    version = VERSION,
    about = "Delegate vault command line interface",
    long_about = "Delegate vault command line interface

Every command is signed by the wallet keypair and sent to the provider cluster.
Use --provider-url file://<path> to keep the ledger between invocations."
)]
pub struct Config {
    /// Provider configuration
    #[clap(flatten)]
    pub provider: ProviderArgs,
    /// Log configuration
    #[clap(flatten)]
    pub log: LogConfig,
    /// JSON File to load the configuration from
    #[clap(long)]
    #[serde(skip)]
    #[serde(default)]
    pub config_file: Option<String>,
    /// Generate the template at the `config_file` path
    #[clap(long)]
    #[serde(skip)]
    #[serde(default)]
    pub generate_config_template: bool,
    /// Command to execute
    #[clap(subcommand)]
    #[serde(skip)]
    pub command: Option<Command>,
}
