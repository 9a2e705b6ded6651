use actix_web::{HttpResponse, Responder, get, post, web};
use log::{debug, warn};

use super::models::{AppState, NewTxRequest, NewTxResponse, PendingResponse};
use crate::error::LedgerError;

/// Queue a transaction for the next block.
///
/// The returned index is where the transaction should land, not a promise:
/// a chain replacement before the next mint can shift it.
#[post("/transactions/new")]
pub async fn post_transaction(
    state: web::Data<AppState>,
    body: web::Json<NewTxRequest>,
) -> Result<HttpResponse, LedgerError> {
    let tx = body.into_inner().into_transaction().inspect_err(|e| {
        warn!("POST /transactions/new - rejected: {e}");
    })?;

    let index = {
        let mut ledger = state.ledger.write().expect("ledger lock poisoned");
        let index = ledger.new_transaction(tx.sender.clone(), tx.recipient.clone(), tx.amount);
        debug!(
            "POST /transactions/new - {} -> {} queued (pending: {})",
            tx.sender,
            tx.recipient,
            ledger.pending().len()
        );
        index
    };

    Ok(HttpResponse::Created().json(NewTxResponse {
        message: format!("Transaction will be added to Block {index}"),
        index,
    }))
}

/// List the pending pool.
#[get("/transactions/pending")]
pub async fn get_pending(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.read().expect("ledger lock poisoned");
    HttpResponse::Ok().json(PendingResponse {
        size: ledger.pending().len(),
        transactions: ledger.pending(),
    })
}
