use actix_web::{App, HttpServer, middleware::Logger, web};
use log::info;
use std::io;
use std::sync::Arc;
use uuid::Uuid;

use proof_ledger::api::{self, AppState};
use proof_ledger::config::Config;
use proof_ledger::consensus::HttpPeerClient;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Config first so RUST_LOG from `.env` reaches the logger.
    let config = Config::from_env();
    env_logger::init();

    let node_id = Uuid::new_v4().simple().to_string();
    let peers = HttpPeerClient::new(config.peer_timeout).map_err(io::Error::other)?;

    let state = web::Data::new(AppState::new(node_id.clone(), Arc::new(peers)));
    if !config.peers.is_empty() {
        state
            .ledger
            .write()
            .expect("ledger lock poisoned")
            .register_nodes(&config.peers)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    }

    info!(
        "⛓️ Starting ledger node {node_id} at http://{} ({} peers)",
        config.bind_addr(),
        config.peers.len()
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
