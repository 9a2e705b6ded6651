use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::hash::{canonical_json, sha256_hex};
use crate::transaction::Transaction;

/// A single block in the chain holding a batch of transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: f64, // seconds since the Unix epoch
    pub transactions: Vec<Transaction>,
    pub proof: u64,
    pub previous_hash: String,
}

impl Block {
    /// Create a block stamped with the current time.
    pub fn new(
        index: u64,
        transactions: Vec<Transaction>,
        proof: u64,
        previous_hash: String,
    ) -> Self {
        Self {
            index,
            timestamp: now_secs(),
            transactions,
            proof,
            previous_hash,
        }
    }

    /// SHA-256 of the canonical (key-sorted) JSON encoding of every field.
    pub fn compute_hash(&self) -> String {
        let bytes = canonical_json(self).expect("block serializes to JSON");
        sha256_hex(&bytes)
    }
}

fn now_secs() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}
