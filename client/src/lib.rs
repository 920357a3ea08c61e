//! Client side of the delegate vault: provider configuration, clusters and a
//! typed client for every program instruction.

pub mod client;
pub mod cluster;
pub mod config;
pub mod error;
pub mod keypair;
pub mod logger;

pub use client::{DelegateClient, Provider};
pub use cluster::{Cluster, FileCluster, LocalCluster};
pub use config::{ClusterUrl, ProviderConfig};
pub use error::ClientError;
