use std::sync::atomic::{AtomicBool, Ordering};

use super::PROOF_PREFIX;
use super::hash::sha256_hex;

/// How many candidates to try between checks of the cancel flag.
const CANCEL_CHECK_INTERVAL: u64 = 4096;

/// Does `sha256("{last_proof}{proof}")` start with four hex zeros?
pub fn valid_proof(last_proof: u64, proof: u64) -> bool {
    let guess = format!("{last_proof}{proof}");
    sha256_hex(guess.as_bytes()).starts_with(PROOF_PREFIX)
}

/// Smallest `proof` such that `valid_proof(last_proof, proof)` holds.
///
/// Linear scan from zero with no attempt limit. Blocks the calling thread
/// until a proof is found.
pub fn proof_of_work(last_proof: u64) -> u64 {
    let mut proof = 0;
    while !valid_proof(last_proof, proof) {
        proof += 1;
    }
    proof
}

/// Same search as [`proof_of_work`], abandoned once `cancel` is set.
///
/// Returns `None` only when cancelled; the result is otherwise identical.
pub fn proof_of_work_until(last_proof: u64, cancel: &AtomicBool) -> Option<u64> {
    let mut proof = 0;
    loop {
        if proof % CANCEL_CHECK_INTERVAL == 0 && cancel.load(Ordering::Relaxed) {
            return None;
        }
        if valid_proof(last_proof, proof) {
            return Some(proof);
        }
        proof += 1;
    }
}
