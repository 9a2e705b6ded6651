//! Minimal replicated ledger: hash-linked blocks of transfers, a fixed
//! proof-of-work admission rule, and longest-valid-chain reconciliation
//! between replicas, served over HTTP.

pub mod api;
pub mod blockchain;
pub mod config;
pub mod consensus;
pub mod error;
pub mod transaction;
