pub mod block;
pub mod hash;
pub mod model;
pub mod pow;

pub use block::Block;
pub use model::{Ledger, parse_node_address, valid_chain};
pub use pow::{proof_of_work, proof_of_work_until, valid_proof};

/// Proof stored in the genesis block.
pub const GENESIS_PROOF: u64 = 100;

/// `previous_hash` of the genesis block.
pub const GENESIS_PREVIOUS_HASH: &str = "1";

/// A proof is valid when its digest starts with this (fixed difficulty).
pub const PROOF_PREFIX: &str = "0000";

/// Sender of the mining reward transaction.
pub const REWARD_SENDER: &str = "0";

/// Amount credited to the miner for each block.
pub const MINING_REWARD: u64 = 1;
