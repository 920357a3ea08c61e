use std::collections::{BTreeMap, HashMap, VecDeque};

use delegate_common::crypto::{hash, hashv, Hash, PublicKey, Signature};
use serde::{Deserialize, Serialize};

use super::Account;

// Number of recent hashes a transaction may reference
pub const MAX_RECENT_HASHES: usize = 150;

const GENESIS_SEED: &[u8] = b"delegate-genesis";

/// Committed state: accounts, processed signatures and the recent hash window
///
/// Serializable so a ledger can be persisted between processes.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Ledger {
    pub accounts: BTreeMap<PublicKey, Account>,
    // Committed signatures and the recent hash each one referenced
    processed: HashMap<Signature, Hash>,
    recent_hashes: VecDeque<Hash>,
    transaction_count: u64,
}

impl Default for Ledger {
    fn default() -> Self {
        let mut recent_hashes = VecDeque::with_capacity(MAX_RECENT_HASHES);
        recent_hashes.push_back(hash(GENESIS_SEED));
        Self {
            accounts: BTreeMap::new(),
            processed: HashMap::new(),
            recent_hashes,
            transaction_count: 0,
        }
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latest_hash(&self) -> Hash {
        self.recent_hashes
            .back()
            .cloned()
            .unwrap_or_else(|| hash(GENESIS_SEED))
    }

    pub fn is_recent(&self, hash: &Hash) -> bool {
        self.recent_hashes.contains(hash)
    }

    pub fn is_processed(&self, signature: &Signature) -> bool {
        self.processed.contains_key(signature)
    }

    pub fn transaction_count(&self) -> u64 {
        self.transaction_count
    }

    /// Number of signatures still tracked for replay protection
    pub fn processed_count(&self) -> usize {
        self.processed.len()
    }

    // Record a committed transaction and move the hash chain forward
    //
    // Signatures are forgotten once their recent hash leaves the window, a
    // replay of them then fails the recent hash check instead.
    pub(crate) fn record(&mut self, signature: Signature, recent_hash: Hash) {
        let next = hashv(&[&self.latest_hash().as_bytes()[..], &signature.as_bytes()[..]]);
        if self.recent_hashes.len() >= MAX_RECENT_HASHES {
            if let Some(expired) = self.recent_hashes.pop_front() {
                self.processed.retain(|_, referenced| *referenced != expired);
            }
        }
        self.recent_hashes.push_back(next);
        self.processed.insert(signature, recent_hash);
        self.transaction_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_advances_hash_window() {
        let mut ledger = Ledger::new();
        let genesis = ledger.latest_hash();
        let signature = Signature::new([7u8; 64]);

        ledger.record(signature, genesis.clone());

        assert_ne!(ledger.latest_hash(), genesis);
        assert!(ledger.is_recent(&genesis));
        assert!(ledger.is_processed(&signature));
        assert_eq!(ledger.transaction_count(), 1);
    }

    #[test]
    fn test_old_hashes_expire() {
        let mut ledger = Ledger::new();
        let genesis = ledger.latest_hash();
        for i in 0..MAX_RECENT_HASHES {
            let latest = ledger.latest_hash();
            ledger.record(Signature::new([i as u8; 64]), latest);
        }
        assert!(!ledger.is_recent(&genesis));
        assert!(ledger.is_recent(&ledger.latest_hash()));
    }

    #[test]
    fn test_processed_signatures_are_bounded_by_window() {
        let mut ledger = Ledger::new();
        let genesis = ledger.latest_hash();
        let first = Signature::new([0xaa; 64]);
        ledger.record(first, genesis);

        for i in 0..1_000u32 {
            let mut bytes = [0u8; 64];
            bytes[..4].copy_from_slice(&i.to_be_bytes());
            let latest = ledger.latest_hash();
            ledger.record(Signature::new(bytes), latest);
            assert!(ledger.processed_count() <= MAX_RECENT_HASHES);
        }

        assert_eq!(ledger.transaction_count(), 1_001);
        assert!(!ledger.is_processed(&first));
    }

    #[test]
    fn test_signature_kept_while_its_hash_is_recent() {
        let mut ledger = Ledger::new();
        let genesis = ledger.latest_hash();
        let signature = Signature::new([0xbb; 64]);
        ledger.record(signature, genesis.clone());

        // genesis plus one hash per record fill the window
        for i in 0..MAX_RECENT_HASHES - 2 {
            let latest = ledger.latest_hash();
            ledger.record(Signature::new([i as u8; 64]), latest);
        }
        assert!(ledger.is_recent(&genesis));
        assert!(ledger.is_processed(&signature));

        let latest = ledger.latest_hash();
        ledger.record(Signature::new([0xcc; 64]), latest);
        assert!(!ledger.is_recent(&genesis));
        assert!(!ledger.is_processed(&signature));
    }

    #[test]
    fn test_json_roundtrip() {
        let mut ledger = Ledger::new();
        ledger.accounts.insert(
            PublicKey::new([1u8; 32]),
            Account {
                owner: PublicKey::new([2u8; 32]),
                data: vec![1, 2, 3],
            },
        );
        let latest = ledger.latest_hash();
        ledger.record(Signature::new([3u8; 64]), latest);

        let json = serde_json::to_string(&ledger).unwrap();
        let decoded: Ledger = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, ledger);
    }
}
