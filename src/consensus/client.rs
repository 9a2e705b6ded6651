use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::blockchain::Block;
use crate::error::PeerError;

/// A peer's chain as served by its `/chain` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainSnapshot {
    pub chain: Vec<Block>,
    pub length: usize,
}

/// Retrieves chains from other replicas.
#[async_trait]
pub trait PeerClient: Send + Sync {
    async fn fetch_chain(&self, peer: &str) -> Result<ChainSnapshot, PeerError>;
}

/// Fetches `http://{peer}/chain` with a bounded timeout.
pub struct HttpPeerClient {
    http: reqwest::Client,
}

impl HttpPeerClient {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl PeerClient for HttpPeerClient {
    async fn fetch_chain(&self, peer: &str) -> Result<ChainSnapshot, PeerError> {
        let request_err = |source| PeerError::Request {
            peer: peer.to_string(),
            source,
        };

        let resp = self
            .http
            .get(format!("http://{peer}/chain"))
            .send()
            .await
            .map_err(request_err)?;

        if !resp.status().is_success() {
            return Err(PeerError::Status {
                peer: peer.to_string(),
                status: resp.status().as_u16(),
            });
        }

        let snapshot: ChainSnapshot = resp.json().await.map_err(request_err)?;
        if snapshot.length != snapshot.chain.len() {
            return Err(PeerError::LengthMismatch {
                peer: peer.to_string(),
                reported: snapshot.length,
                actual: snapshot.chain.len(),
            });
        }
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::{ChainSnapshot, HttpPeerClient, PeerClient};
    use crate::blockchain::Ledger;
    use crate::blockchain::model::mined_ledger;
    use crate::consensus::Resolver;
    use crate::error::PeerError;
    use actix_web::dev::ServerHandle;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, HttpServer, rt, web};
    use serde_json::json;
    use std::sync::{Arc, RwLock};
    use std::time::{Duration, Instant};

    /// Local server answering `/chain` with a fixed status and body, after
    /// an optional delay. Returns its `host:port`.
    fn serve(status: StatusCode, body: String, delay: Duration) -> (String, ServerHandle) {
        let server = HttpServer::new(move || {
            let body = body.clone();
            App::new().route(
                "/chain",
                web::get().to(move || {
                    let body = body.clone();
                    async move {
                        rt::time::sleep(delay).await;
                        HttpResponse::build(status)
                            .content_type("application/json")
                            .body(body)
                    }
                }),
            )
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();
        let addr = server.addrs()[0].to_string();
        let server = server.run();
        let handle = server.handle();
        rt::spawn(server);
        (addr, handle)
    }

    fn serve_json(status: StatusCode, body: serde_json::Value) -> (String, ServerHandle) {
        serve(status, body.to_string(), Duration::ZERO)
    }

    fn client() -> HttpPeerClient {
        HttpPeerClient::new(Duration::from_secs(2)).unwrap()
    }

    #[actix_web::test]
    async fn fetches_a_well_formed_chain() {
        let chain = mined_ledger(2).chain().to_vec();
        let (peer, handle) = serve_json(StatusCode::OK, json!({"chain": chain, "length": 2}));

        let snapshot: ChainSnapshot = client().fetch_chain(&peer).await.unwrap();
        assert_eq!(snapshot.length, 2);
        assert_eq!(snapshot.chain, chain);
        handle.stop(false).await;
    }

    #[actix_web::test]
    async fn reported_length_must_match_blocks() {
        let chain = Ledger::new().chain().to_vec();
        let (peer, handle) = serve_json(StatusCode::OK, json!({"chain": chain, "length": 9}));

        let err = client().fetch_chain(&peer).await.unwrap_err();
        assert!(matches!(
            err,
            PeerError::LengthMismatch {
                reported: 9,
                actual: 1,
                ..
            }
        ));
        handle.stop(false).await;
    }

    #[actix_web::test]
    async fn error_status_is_a_failure() {
        let (peer, handle) = serve_json(StatusCode::INTERNAL_SERVER_ERROR, json!({}));

        let err = client().fetch_chain(&peer).await.unwrap_err();
        assert!(matches!(err, PeerError::Status { status: 500, .. }));
        handle.stop(false).await;
    }

    #[actix_web::test]
    async fn malformed_body_is_a_failure() {
        let (peer, handle) = serve(StatusCode::OK, "{\"chain\": [".into(), Duration::ZERO);

        let err = client().fetch_chain(&peer).await.unwrap_err();
        assert!(matches!(err, PeerError::Request { .. }));
        handle.stop(false).await;
    }

    #[actix_web::test]
    async fn slow_peer_times_out() {
        let chain = Ledger::new().chain().to_vec();
        let body = json!({"chain": chain, "length": 1}).to_string();
        let (peer, handle) = serve(StatusCode::OK, body, Duration::from_secs(5));
        let client = HttpPeerClient::new(Duration::from_millis(200)).unwrap();

        let t0 = Instant::now();
        let err = client.fetch_chain(&peer).await.unwrap_err();
        assert!(matches!(err, PeerError::Request { .. }));
        assert!(t0.elapsed() < Duration::from_secs(4));
        handle.stop(false).await;
    }

    #[actix_web::test]
    async fn resolver_skips_broken_peers_over_http() {
        let valid = mined_ledger(3).chain().to_vec();
        let (good, good_handle) =
            serve_json(StatusCode::OK, json!({"chain": valid, "length": 3}));
        let (lying, lying_handle) =
            serve_json(StatusCode::OK, json!({"chain": valid, "length": 8}));
        let (failing, failing_handle) =
            serve_json(StatusCode::INTERNAL_SERVER_ERROR, json!({}));
        let (garbled, garbled_handle) = serve(StatusCode::OK, "not json".into(), Duration::ZERO);

        let mut ledger = Ledger::new();
        ledger
            .register_nodes(&[&lying, &failing, &garbled, &good])
            .unwrap();
        let ledger = RwLock::new(ledger);

        let resolver = Resolver::new(Arc::new(client()));
        assert!(resolver.resolve(&ledger).await);
        assert_eq!(ledger.read().unwrap().chain(), valid.as_slice());

        for handle in [good_handle, lying_handle, failing_handle, garbled_handle] {
            handle.stop(false).await;
        }
    }

    #[actix_web::test]
    async fn resolver_keeps_chain_when_every_peer_is_broken() {
        let valid = mined_ledger(2).chain().to_vec();
        let (lying, lying_handle) =
            serve_json(StatusCode::OK, json!({"chain": valid, "length": 5}));
        let (failing, failing_handle) = serve_json(StatusCode::BAD_GATEWAY, json!({}));

        let mut ledger = Ledger::new();
        ledger.register_nodes(&[&lying, &failing]).unwrap();
        let before = ledger.chain().to_vec();
        let ledger = RwLock::new(ledger);

        assert!(!Resolver::new(Arc::new(client())).resolve(&ledger).await);
        assert_eq!(ledger.read().unwrap().chain(), before.as_slice());

        lying_handle.stop(false).await;
        failing_handle.stop(false).await;
    }
}
