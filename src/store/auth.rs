//! Google service-account authentication.
//!
//! Exchanges a self-signed RS256 JWT for an OAuth2 access token
//! (the "JWT bearer" grant). Signing uses `ring`; the private key comes
//! from the service-account JSON key file as a PKCS#8 PEM block.
//!
//! ```text
//! header  = {"alg":"RS256","typ":"JWT"}
//! claims  = {"iss": client_email, "scope": ..., "aud": token_uri, "iat": now, "exp": now + 3600}
//! jwt     = b64url(header) "." b64url(claims) "." b64url(RSA-SHA256(signing input))
//! ```

use std::path::Path;

use anyhow::Result;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use ring::rand::SystemRandom;
use ring::signature::{RsaKeyPair, RSA_PKCS1_SHA256};
use serde::{Deserialize, Serialize};

use crate::error::BookmarkerError;

/// OAuth scope granting Firestore access.
pub const DATASTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const TOKEN_LIFETIME_SECS: i64 = 3600;

/// The fields of a service-account key file that authentication needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    pub project_id: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BookmarkerError::Auth(format!("failed to read key file {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| BookmarkerError::Auth(format!("invalid service account key: {}", e)).into())
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Decode the DER bytes out of a PEM `PRIVATE KEY` block.
fn pem_to_der(pem: &str) -> Result<Vec<u8>> {
    let body: String = pem
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with("-----"))
        .collect();
    STANDARD
        .decode(body)
        .map_err(|e| BookmarkerError::Auth(format!("private key is not valid PEM: {}", e)).into())
}

/// Build and sign the JWT assertion for `key`, issued at `now` (Unix seconds).
pub fn sign_assertion(key: &ServiceAccountKey, now: i64) -> Result<String> {
    let der = pem_to_der(&key.private_key)?;
    let key_pair = RsaKeyPair::from_pkcs8(&der)
        .map_err(|e| BookmarkerError::Auth(format!("unusable private key: {}", e)))?;

    let header = serde_json::json!({ "alg": "RS256", "typ": "JWT" });
    let claims = Claims {
        iss: key.client_email.clone(),
        scope: DATASTORE_SCOPE.to_string(),
        aud: key.token_uri.clone(),
        iat: now,
        exp: now + TOKEN_LIFETIME_SECS,
    };

    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header)?),
        URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?)
    );

    let mut signature = vec![0u8; key_pair.public().modulus_len()];
    key_pair
        .sign(
            &RSA_PKCS1_SHA256,
            &SystemRandom::new(),
            signing_input.as_bytes(),
            &mut signature,
        )
        .map_err(|_| BookmarkerError::Auth("failed to sign token request".to_string()))?;

    Ok(format!(
        "{}.{}",
        signing_input,
        URL_SAFE_NO_PAD.encode(signature)
    ))
}

/// Exchange a signed assertion for an access token at the key's `token_uri`.
pub async fn fetch_access_token(
    client: &reqwest::Client,
    key: &ServiceAccountKey,
) -> Result<String> {
    let assertion = sign_assertion(key, chrono::Utc::now().timestamp())?;

    let resp = client
        .post(&key.token_uri)
        .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
        .send()
        .await
        .map_err(|e| {
            BookmarkerError::Auth(format!("token exchange with {} failed: {}", key.token_uri, e))
        })?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(BookmarkerError::Auth(format!(
            "token exchange failed (HTTP {}): {}",
            status,
            body.chars().take(500).collect::<String>()
        ))
        .into());
    }

    let token: TokenResponse = resp
        .json()
        .await
        .map_err(|e| BookmarkerError::Auth(format!("invalid token response: {}", e)))?;
    log::debug!("obtained access token for {}", key.client_email);
    Ok(token.access_token)
}
