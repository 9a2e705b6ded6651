//! Longest-valid-chain reconciliation across replicas.

pub mod client;

pub use client::{ChainSnapshot, HttpPeerClient, PeerClient};

use log::{debug, info, warn};
use std::sync::{Arc, RwLock};

use crate::blockchain::{Block, Ledger, valid_chain};

pub struct Resolver {
    client: Arc<dyn PeerClient>,
}

impl Resolver {
    pub fn new(client: Arc<dyn PeerClient>) -> Self {
        Self { client }
    }

    /// Replace the local chain with the longest valid peer chain, if one is
    /// strictly longer. Returns whether the chain was replaced.
    ///
    /// Unreachable peers and invalid candidates are skipped. The caller must
    /// keep other chain writers (mining) out for the duration of the call.
    pub async fn resolve(&self, ledger: &RwLock<Ledger>) -> bool {
        let (peers, mut max_length) = {
            let ledger = ledger.read().expect("ledger lock poisoned");
            (
                ledger.peers().iter().cloned().collect::<Vec<_>>(),
                ledger.len(),
            )
        };

        let mut winner: Option<Vec<Block>> = None;
        for peer in &peers {
            let snapshot = match self.client.fetch_chain(peer).await {
                Ok(s) => s,
                Err(e) => {
                    warn!("CONSENSUS - skipping peer {peer}: {e}");
                    continue;
                }
            };

            if snapshot.length <= max_length {
                debug!(
                    "CONSENSUS - peer {peer} not longer ({} <= {max_length})",
                    snapshot.length
                );
                continue;
            }
            if !valid_chain(&snapshot.chain) {
                debug!("CONSENSUS - peer {peer} sent an invalid chain");
                continue;
            }

            max_length = snapshot.length;
            winner = Some(snapshot.chain);
        }

        match winner {
            Some(chain) => {
                let mut ledger = ledger.write().expect("ledger lock poisoned");
                let before = ledger.len();
                ledger.replace_chain(chain);
                info!(
                    "CONSENSUS - chain replaced ({before} -> {} blocks)",
                    ledger.len()
                );
                true
            }
            None => false,
        }
    }
}
