use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::sync::{Arc, RwLock};

use crate::blockchain::{Block, Ledger};
use crate::consensus::{PeerClient, Resolver};
use crate::error::LedgerError;
use crate::transaction::Transaction;

/// Shared application state: one ledger per process.
pub struct AppState {
    pub ledger: RwLock<Ledger>,
    /// Held for the whole of a mint or a consensus pass so the two never
    /// interleave on the same chain.
    pub chain_writer: tokio::sync::Mutex<()>,
    /// Recipient of mining rewards, fixed for the process lifetime.
    pub node_id: String,
    pub resolver: Resolver,
}

impl AppState {
    pub fn new(node_id: String, peers: Arc<dyn PeerClient>) -> Self {
        Self {
            ledger: RwLock::new(Ledger::new()),
            chain_writer: tokio::sync::Mutex::new(()),
            node_id,
            resolver: Resolver::new(peers),
        }
    }
}

/* ---------- Chain API Models ---------- */

#[derive(Serialize)]
pub struct ChainResponse<'a> {
    pub chain: &'a [Block],
    pub length: usize,
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub length: usize,
}

#[derive(Serialize)]
pub struct MineResponse {
    pub message: &'static str,
    #[serde(flatten)]
    pub block: Block,
}

/* ---------- TX API Models ---------- */

#[derive(Deserialize)]
pub struct NewTxRequest {
    pub sender: Option<String>,
    pub recipient: Option<String>,
    pub amount: Option<Number>,
}

impl NewTxRequest {
    /// All three fields are required.
    pub fn into_transaction(self) -> Result<Transaction, LedgerError> {
        match (self.sender, self.recipient, self.amount) {
            (Some(sender), Some(recipient), Some(amount)) => {
                Ok(Transaction::new(sender, recipient, amount))
            }
            (sender, recipient, amount) => {
                let missing: Vec<&str> = [
                    ("sender", sender.is_none()),
                    ("recipient", recipient.is_none()),
                    ("amount", amount.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, absent)| absent.then_some(name))
                .collect();
                Err(LedgerError::MissingFields(missing.join(", ")))
            }
        }
    }
}

#[derive(Serialize)]
pub struct NewTxResponse {
    pub message: String,
    pub index: u64,
}

#[derive(Serialize)]
pub struct PendingResponse<'a> {
    pub size: usize,
    pub transactions: &'a [Transaction],
}

/* ---------- Node API Models ---------- */

#[derive(Deserialize)]
pub struct RegisterNodesRequest {
    pub nodes: Option<Vec<String>>,
}

#[derive(Serialize)]
pub struct RegisterNodesResponse {
    pub message: &'static str,
    pub total_nodes: Vec<String>,
}

#[derive(Serialize)]
pub struct ResolveResponse {
    pub message: &'static str,
    pub replaced: bool,
    pub chain: Vec<Block>,
}
