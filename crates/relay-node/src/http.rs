//! # Verification Service
//!
//! `POST /v1/verify` checks relay-hub multi-signatures for the broker's
//! validation rule. Every parameter travels in the query string:
//!
//! | Param        | Format                                  |
//! |--------------|-----------------------------------------|
//! | `signatures` | JSON array of base64 65-byte signatures |
//! | `hash`       | hex, optional `0x`                      |
//! | `threshold`  | decimal                                 |
//! | `validators` | JSON array of hex addresses             |
//!
//! The answer is always `200` with `{is_pass, data}`; `data` carries the
//! reason when the input could not be checked.

use axum::extract::Query;
use axum::routing::post;
use axum::{Json, Router};
use ir_04_relay_client::{domain::parse_hash, verify_multi_sign, wait_for_shutdown};
use serde::{Deserialize, Serialize};
use serde_with::base64::Base64;
use serde_with::serde_as;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{debug, info};

/// Route of the verification handler.
pub const VERIFY_PATH: &str = "/v1/verify";

/// Raw query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VerifyParams {
    /// JSON array of base64 signatures.
    pub signatures: String,
    /// Signed hash.
    pub hash: String,
    /// Required distinct signers.
    pub threshold: String,
    /// JSON array of validator addresses.
    pub validators: String,
}

/// Verification answer.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyResponse {
    /// Whether enough validators signed.
    pub is_pass: bool,
    /// Failure reason, empty otherwise.
    #[serde_as(as = "Base64")]
    #[serde(default)]
    pub data: Vec<u8>,
}

impl VerifyResponse {
    fn rejected(reason: &str) -> Self {
        Self {
            is_pass: false,
            data: reason.as_bytes().to_vec(),
        }
    }
}

#[serde_as]
#[derive(Deserialize)]
struct Signatures(#[serde_as(as = "Vec<Base64>")] Vec<Vec<u8>>);

/// Evaluate one request.
pub fn check(params: &VerifyParams) -> VerifyResponse {
    let signatures = match serde_json::from_str::<Signatures>(&params.signatures) {
        Ok(Signatures(signatures)) => signatures,
        Err(_) => return VerifyResponse::rejected("multi signatures json unmarshal error"),
    };
    let validators: Vec<String> = match serde_json::from_str(&params.validators) {
        Ok(validators) => validators,
        Err(_) => return VerifyResponse::rejected("validators json unmarshal error"),
    };
    let threshold: u64 = match params.threshold.parse() {
        Ok(threshold) => threshold,
        Err(_) => return VerifyResponse::rejected("threshold parse error"),
    };
    let hash = match parse_hash(&params.hash) {
        Ok(hash) => hash,
        Err(_) => return VerifyResponse::rejected("hash parse error"),
    };

    match verify_multi_sign(&hash, &signatures, &validators, threshold) {
        Ok(is_pass) => VerifyResponse {
            is_pass,
            data: Vec::new(),
        },
        Err(_) => VerifyResponse::rejected("recover plain error"),
    }
}

async fn verify(Query(params): Query<VerifyParams>) -> Json<VerifyResponse> {
    let response = check(&params);
    debug!(
        "[relay-node] verify threshold={} pass={}",
        params.threshold, response.is_pass
    );
    Json(response)
}

/// Router exposing the verification handler.
pub fn router() -> Router {
    Router::new().route(VERIFY_PATH, post(verify))
}

/// Serve on `0.0.0.0:port` until shutdown.
pub async fn serve(port: u16, mut shutdown: watch::Receiver<bool>) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!("[relay-node] Verification service listening on {}", listener.local_addr()?);
    axum::serve(listener, router())
        .with_graceful_shutdown(async move { wait_for_shutdown(&mut shutdown).await })
        .await
}
