use actix_web::{HttpResponse, Responder, get, post, web};
use log::{info, warn};

use super::models::{AppState, RegisterNodesRequest, RegisterNodesResponse, ResolveResponse};
use crate::error::LedgerError;

/// Register peers. The whole list is rejected if any address is malformed.
#[post("/nodes/register")]
pub async fn register_nodes(
    state: web::Data<AppState>,
    body: web::Json<RegisterNodesRequest>,
) -> Result<HttpResponse, LedgerError> {
    let nodes = body.into_inner().nodes.unwrap_or_default();

    let total_nodes: Vec<String> = {
        let mut ledger = state.ledger.write().expect("ledger lock poisoned");
        ledger.register_nodes(&nodes).inspect_err(|e| {
            warn!("POST /nodes/register - rejected: {e}");
        })?;
        ledger.peers().iter().cloned().collect()
    };
    info!("POST /nodes/register - {} known peers", total_nodes.len());

    Ok(HttpResponse::Created().json(RegisterNodesResponse {
        message: "New nodes have been added",
        total_nodes,
    }))
}

/// Run one consensus pass against every registered peer.
#[get("/nodes/resolve")]
pub async fn resolve(state: web::Data<AppState>) -> impl Responder {
    let _writer = state.chain_writer.lock().await;
    let replaced = state.resolver.resolve(&state.ledger).await;

    let chain = {
        let ledger = state.ledger.read().expect("ledger lock poisoned");
        ledger.chain().to_vec()
    };
    let message = if replaced {
        "Our chain was replaced"
    } else {
        "Our chain is authoritative"
    };

    HttpResponse::Ok().json(ResolveResponse {
        message,
        replaced,
        chain,
    })
}
