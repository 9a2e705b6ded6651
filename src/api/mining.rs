use actix_web::{HttpResponse, get, web};
use log::{debug, info};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use super::models::{AppState, MineResponse};
use crate::blockchain::{MINING_REWARD, REWARD_SENDER, proof_of_work_until};
use crate::error::LedgerError;

/// Sets the flag when dropped, which stops a proof search whose request
/// has gone away.
#[derive(Default)]
struct CancelOnDrop(Arc<AtomicBool>);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

/// Mine a block:
/// - search a proof for the last block's proof (on the blocking pool)
/// - queue the reward for this node
/// - seal the pending pool into a new block
///
/// The reward is queued only once a proof exists, so an abandoned search
/// leaves the pending pool untouched.
#[get("/mine")]
pub async fn mine(state: web::Data<AppState>) -> Result<HttpResponse, actix_web::Error> {
    let _writer = state.chain_writer.lock().await;

    let last_proof = {
        let ledger = state.ledger.read().expect("ledger lock poisoned");
        ledger.last_block().proof
    };

    let t0 = Instant::now();
    let cancel = CancelOnDrop::default();
    let flag = Arc::clone(&cancel.0);
    let proof = web::block(move || proof_of_work_until(last_proof, &flag))
        .await?
        .ok_or(LedgerError::MiningCancelled)?;
    debug!(
        "MINER - proof {proof} found for {last_proof} in {} ms",
        t0.elapsed().as_millis()
    );

    let block = {
        let mut ledger = state.ledger.write().expect("ledger lock poisoned");
        ledger.new_transaction(REWARD_SENDER, state.node_id.clone(), MINING_REWARD);
        let previous_hash = ledger.last_block().compute_hash();
        ledger.new_block(proof, Some(previous_hash)).clone()
    };

    info!(
        "MINER - forged block #{} ({} txs, proof={})",
        block.index,
        block.transactions.len(),
        block.proof
    );

    Ok(HttpResponse::Ok().json(MineResponse {
        message: "New block forged",
        block,
    }))
}
