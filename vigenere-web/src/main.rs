#![deny(missing_docs)]
//! A web server for the Vigenere toolkit, exposing the cipher and the analysis tools as a JSON API.

use axum::{
    Router,
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use local_ip_address::local_ip;
use log::{error, info};
use serde::Deserialize;
use serde_json::{Value, json};
use std::env;
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use vigenere_core::challenge::{self, ChallengeOptions, KeyStyle};
use vigenere_core::kasiski::{self, KasiskiConfig};
use vigenere_core::{CipherError, cipher, frequency, normalize};

const DEFAULT_PORT: u16 = 3000;

#[derive(Deserialize)]
struct CipherRequest {
    text: String,
    key: String,
}

#[derive(Deserialize)]
struct FrequencyRequest {
    text: String,
}

#[derive(Deserialize)]
struct KasiskiRequest {
    text: String,
    #[serde(default)]
    config: KasiskiConfig,
}

#[derive(Deserialize)]
struct ColumnsRequest {
    text: String,
    key_length: usize,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ChallengeRequest {
    length: Option<usize>,
    key_style: Option<KeyStyle>,
    key_length: Option<usize>,
}

#[derive(Deserialize)]
struct VerifyRequest {
    ciphertext: String,
    key: String,
    plaintext: String,
}

#[tokio::main]
async fn main() {
    env_logger::init();

    // Set up the port from an environment variable or use a default.
    let port = env::var("VIGENERE_WEB_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);

    let app = router();

    // Run the server.
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    println!("listening on:");
    if let Ok(my_local_ip) = local_ip() {
        println!("  - http://{my_local_ip}:{port}/api/health");
    }
    println!("  - http://127.0.0.1:{port}/api/health");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {addr}: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Builds the Axum router.
fn router() -> Router {
    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/encrypt", post(encrypt_handler))
        .route("/api/decrypt", post(decrypt_handler))
        .route("/api/frequency", post(frequency_handler))
        .route("/api/kasiski", post(kasiski_handler))
        .route("/api/columns", post(columns_handler))
        .route("/api/challenge", post(challenge_handler))
        .route("/api/verify", post(verify_handler))
        .layer(CorsLayer::permissive())
}

fn bad_request(e: &CipherError) -> (StatusCode, Json<Value>) {
    info!("Rejected request: {e}");
    (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() })))
}

async fn health_handler() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") })),
    )
}

async fn encrypt_handler(Json(payload): Json<CipherRequest>) -> (StatusCode, Json<Value>) {
    match cipher::encrypt_text(&payload.text, &payload.key) {
        Ok(ciphertext) => (StatusCode::OK, Json(json!({ "text": ciphertext }))),
        Err(e) => bad_request(&e),
    }
}

async fn decrypt_handler(Json(payload): Json<CipherRequest>) -> (StatusCode, Json<Value>) {
    match cipher::decrypt_text(&payload.text, &payload.key) {
        Ok(plaintext) => (StatusCode::OK, Json(json!({ "text": plaintext }))),
        Err(e) => bad_request(&e),
    }
}

/// Returns the 26 letter counts, their total and the percentages.
async fn frequency_handler(Json(payload): Json<FrequencyRequest>) -> (StatusCode, Json<Value>) {
    let counts = frequency::analyze(&normalize(&payload.text));
    let percentages: serde_json::Map<String, Value> = (b'A'..=b'Z')
        .map(|letter| (char::from(letter).to_string(), json!(counts.percentage(letter))))
        .collect();
    let response = json!({
        "counts": counts,
        "percentages": percentages,
        "most_frequent": counts.most_frequent(),
    });
    (StatusCode::OK, Json(response))
}

async fn kasiski_handler(Json(payload): Json<KasiskiRequest>) -> (StatusCode, Json<Value>) {
    match kasiski::analyze_text(&payload.text, &payload.config) {
        Ok(report) => (StatusCode::OK, Json(json!(report))),
        Err(e) => bad_request(&e),
    }
}

async fn columns_handler(Json(payload): Json<ColumnsRequest>) -> (StatusCode, Json<Value>) {
    match frequency::analyze_columns(&normalize(&payload.text), payload.key_length) {
        Ok(columns) => (StatusCode::OK, Json(json!({ "columns": columns }))),
        Err(e) => bad_request(&e),
    }
}

/// Generates a challenge. The answer is included; hiding it is up to the client.
async fn challenge_handler(Json(payload): Json<ChallengeRequest>) -> (StatusCode, Json<Value>) {
    let options = ChallengeOptions {
        excerpt_length: payload.length,
        key_style: payload.key_style,
        key_length: payload.key_length.unwrap_or(challenge::DEFAULT_KEY_LENGTH),
    };
    match challenge::generate(&options) {
        Ok(generated) => (StatusCode::CREATED, Json(json!(generated))),
        Err(e) => bad_request(&e),
    }
}

async fn verify_handler(Json(payload): Json<VerifyRequest>) -> (StatusCode, Json<Value>) {
    match challenge::verify_solution(&payload.ciphertext, &payload.key, &payload.plaintext) {
        Ok(correct) => (StatusCode::OK, Json(json!({ "correct": correct }))),
        Err(e) => bad_request(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn cipher_request(text: &str, key: &str) -> Json<CipherRequest> {
        Json(CipherRequest {
            text: text.to_string(),
            key: key.to_string(),
        })
    }

    #[tokio::test]
    async fn encrypts_and_decrypts() {
        let (status, Json(body)) = encrypt_handler(cipher_request("Hello", "KEY")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["text"], "RIJVS");

        let (status, Json(body)) = decrypt_handler(cipher_request("RIJVS", "KEY")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["text"], "HELLO");
    }

    #[tokio::test]
    async fn invalid_key_is_a_bad_request() {
        let (status, Json(body)) = encrypt_handler(cipher_request("Hello", "123")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("Invalid key"));
    }

    #[tokio::test]
    async fn frequency_of_empty_text() {
        let (status, Json(body)) = frequency_handler(Json(FrequencyRequest {
            text: "?!".to_string(),
        }))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["counts"]["total"], 0);
        assert_eq!(body["percentages"]["E"], 0.0);
        assert!(body["most_frequent"].is_null());
    }

    #[tokio::test]
    async fn kasiski_with_partial_config() {
        let payload: KasiskiRequest =
            serde_json::from_str(r#"{"text": "ABCXYZABC", "config": {"max_pattern_len": 3}}"#).unwrap();
        let (status, Json(body)) = kasiski_handler(Json(payload)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["candidates"], json!([2, 3]));
        assert_eq!(body["hints"][0]["distance"], 6);

        let payload: KasiskiRequest =
            serde_json::from_str(r#"{"text": "ABC", "config": {"min_distance": 30}}"#).unwrap();
        let (status, _) = kasiski_handler(Json(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn columns_reject_out_of_range_guess() {
        let (status, Json(body)) = columns_handler(Json(ColumnsRequest {
            text: "ABCABC".to_string(),
            key_length: 3,
        }))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["columns"].as_array().unwrap().len(), 3);
        assert_eq!(body["columns"][0]["text"], "AA");

        let (status, _) = columns_handler(Json(ColumnsRequest {
            text: "ABCABC".to_string(),
            key_length: 25,
        }))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn challenge_round_trip() {
        let (status, Json(body)) = challenge_handler(Json(ChallengeRequest {
            length: Some(200),
            key_style: Some(KeyStyle::Random),
            key_length: Some(4),
        }))
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["key"].as_str().unwrap().len(), 4);
        assert_eq!(body["key_style"], "random");

        let (status, Json(verdict)) = verify_handler(Json(VerifyRequest {
            ciphertext: body["ciphertext"].as_str().unwrap().to_string(),
            key: body["key"].as_str().unwrap().to_string(),
            plaintext: body["plaintext"].as_str().unwrap().to_string(),
        }))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(verdict["correct"], true);
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (status, Json(body)) = health_handler().await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    async fn send(addr: SocketAddr, request: String) -> String {
        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    #[tokio::test]
    async fn router_serves_the_api_routes() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router()).await });

        let health = send(
            addr,
            "GET /api/health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n".to_string(),
        )
        .await;
        assert!(health.starts_with("HTTP/1.1 200"));
        assert!(health.contains(r#""status":"ok""#));

        let body = r#"{"text": "Hello", "key": "KEY"}"#;
        let encrypted = send(
            addr,
            format!(
                "POST /api/encrypt HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            ),
        )
        .await;
        assert!(encrypted.starts_with("HTTP/1.1 200"));
        assert!(encrypted.contains(r#""text":"RIJVS""#));

        let missing = send(
            addr,
            "GET /api/unknown HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n".to_string(),
        )
        .await;
        assert!(missing.starts_with("HTTP/1.1 404"));
    }
}
