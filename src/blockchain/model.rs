use reqwest::Url;
use serde_json::Number;
use std::collections::BTreeSet;

use super::{Block, GENESIS_PREVIOUS_HASH, GENESIS_PROOF, valid_proof};
use crate::error::LedgerError;
use crate::transaction::Transaction;

/// In-memory replicated ledger: the chain, the pending pool and known peers.
///
/// The chain only grows through [`Ledger::new_block`], except when the
/// consensus resolver swaps in a longer valid chain as a whole.
#[derive(Debug)]
pub struct Ledger {
    chain: Vec<Block>,
    pending: Vec<Transaction>,
    peers: BTreeSet<String>,
}

impl Ledger {
    /// Initialize a new ledger with a genesis block.
    pub fn new() -> Self {
        let mut ledger = Self {
            chain: Vec::new(),
            pending: Vec::new(),
            peers: BTreeSet::new(),
        };
        ledger.new_block(GENESIS_PROOF, Some(GENESIS_PREVIOUS_HASH.to_string()));
        ledger
    }

    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    pub fn peers(&self) -> &BTreeSet<String> {
        &self.peers
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// Return the last block in the chain.
    pub fn last_block(&self) -> &Block {
        self.chain
            .last()
            .expect("ledger always holds at least the genesis block")
    }

    /// Queue a transaction for the next mined block.
    ///
    /// Returns the index the transaction is expected to land in. This is a
    /// best-effort prediction: a chain replacement before the next mint can
    /// move it.
    pub fn new_transaction(
        &mut self,
        sender: impl Into<String>,
        recipient: impl Into<String>,
        amount: impl Into<Number>,
    ) -> u64 {
        self.pending.push(Transaction::new(sender, recipient, amount));
        self.last_block().index + 1
    }

    /// Seal the pending pool into a new block and append it.
    ///
    /// `previous_hash` defaults to the hash of the current last block.
    pub fn new_block(&mut self, proof: u64, previous_hash: Option<String>) -> &Block {
        let previous_hash = previous_hash.unwrap_or_else(|| self.last_block().compute_hash());
        let block = Block::new(
            self.chain.len() as u64 + 1,
            std::mem::take(&mut self.pending),
            proof,
            previous_hash,
        );
        self.chain.push(block);
        self.last_block()
    }

    /// Add one peer. Returns `false` if it was already known.
    pub fn register_node(&mut self, address: &str) -> Result<bool, LedgerError> {
        let node = parse_node_address(address)?;
        Ok(self.peers.insert(node))
    }

    /// Add several peers. Either every address parses and all are added, or
    /// nothing changes.
    pub fn register_nodes<S: AsRef<str>>(&mut self, addresses: &[S]) -> Result<(), LedgerError> {
        if addresses.is_empty() {
            return Err(LedgerError::EmptyPeerList);
        }
        let parsed = addresses
            .iter()
            .map(|a| parse_node_address(a.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        self.peers.extend(parsed);
        Ok(())
    }

    /// Validate the local chain.
    pub fn is_valid(&self) -> bool {
        valid_chain(&self.chain)
    }

    /// Swap the whole chain. Callers must have validated `chain`.
    pub(crate) fn replace_chain(&mut self, chain: Vec<Block>) {
        debug_assert!(!chain.is_empty());
        self.chain = chain;
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

/// Check every adjacent pair: hash linkage and proof-of-work.
///
/// The genesis block itself is not inspected; an empty slice is invalid.
pub fn valid_chain(chain: &[Block]) -> bool {
    if chain.is_empty() {
        return false;
    }
    chain.windows(2).all(|pair| {
        let (prev, block) = (&pair[0], &pair[1]);
        block.previous_hash == prev.compute_hash() && valid_proof(prev.proof, block.proof)
    })
}

/// Reduce a node address such as `http://192.168.0.5:5000` to `host:port`.
///
/// A bare `host:port` is accepted as well. A missing port is filled in from
/// the scheme (`https://peer` becomes `peer:443`), and an explicit port is
/// always kept, even when it equals the scheme default.
pub fn parse_node_address(address: &str) -> Result<String, LedgerError> {
    let invalid = || LedgerError::InvalidPeerAddress(address.to_string());
    let trimmed = address.trim();
    let url = if trimmed.contains("://") {
        Url::parse(trimmed)
    } else {
        Url::parse(&format!("http://{trimmed}"))
    }
    .map_err(|_| invalid())?;

    let host = url.host_str().filter(|h| !h.is_empty()).ok_or_else(invalid)?;
    Ok(match url.port_or_known_default() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

/// A ledger extended to `blocks` blocks with real proofs, for tests.
#[cfg(test)]
pub(crate) fn mined_ledger(blocks: usize) -> Ledger {
    let mut ledger = Ledger::new();
    while ledger.len() < blocks {
        let proof = super::proof_of_work(ledger.last_block().proof);
        ledger.new_block(proof, None);
    }
    ledger
}
