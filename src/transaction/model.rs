use serde::{Deserialize, Serialize};
use serde_json::Number;

/// A transfer waiting in the pending pool or embedded in a block.
///
/// `amount` keeps the JSON number exactly as submitted (an integer stays an
/// integer), so a block received from a peer re-hashes to the same digest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: String,
    pub recipient: String,
    pub amount: Number,
}

impl Transaction {
    pub fn new(
        sender: impl Into<String>,
        recipient: impl Into<String>,
        amount: impl Into<Number>,
    ) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            amount: amount.into(),
        }
    }
}
