//! HMAC-SHA256 request signing shared by the remote service clients.
//!
//! Every request to the document-job and object-storage APIs carries an
//! `Authorization` header of the form
//!
//! ```text
//! DOC1-HMAC-SHA256 Credential=<key id>/<date>/<region>/<service>/doc1_request,
//! SignedHeaders=<h1;h2;...>, Signature=<hex>
//! ```
//!
//! plus `x-doc-date`, `x-doc-content-sha256`, and (for session credentials)
//! `x-doc-security-token` headers. The signature covers a canonical request
//! (method, path, query, sorted signed headers, payload hash) and is
//! deterministic given credentials, request, and timestamp.
//!
//! Uses only pure-Rust dependencies (`hmac`, `sha2`) for signing.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use crate::credentials::Credentials;

type HmacSha256 = Hmac<Sha256>;

/// Signature scheme identifier.
pub const SCHEME: &str = "DOC1-HMAC-SHA256";

/// Compute the headers that authenticate one request.
///
/// Returns `(name, value)` pairs to attach: `Authorization`,
/// `x-doc-content-sha256`, `x-doc-date`, and `x-doc-security-token` when the
/// credentials carry a session token. The `host` header participates in the
/// signature but is set by the HTTP client itself, so it is not returned.
///
/// `canonical_query` must be the already-sorted, URI-encoded query string
/// (empty for requests without query parameters).
#[allow(clippy::too_many_arguments)]
pub fn signed_headers(
    credentials: &Credentials,
    method: &str,
    host: &str,
    path: &str,
    canonical_query: &str,
    payload: &[u8],
    region: &str,
    service: &str,
    now: DateTime<Utc>,
) -> Vec<(String, String)> {
    let date_stamp = now.format("%Y%m%d").to_string();
    let timestamp = now.format("%Y%m%dT%H%M%SZ").to_string();
    let payload_hash = hex_sha256(payload);

    let mut headers = vec![
        ("host".to_string(), host.to_string()),
        ("x-doc-content-sha256".to_string(), payload_hash.clone()),
        ("x-doc-date".to_string(), timestamp.clone()),
    ];
    if let Some(token) = credentials.session_token() {
        headers.push(("x-doc-security-token".to_string(), token.to_string()));
    }
    headers.sort_by(|a, b| a.0.cmp(&b.0));

    let signed_names: String = headers
        .iter()
        .map(|(k, _)| k.as_str())
        .collect::<Vec<_>>()
        .join(";");

    let canonical_headers: String = headers
        .iter()
        .map(|(k, v)| format!("{}:{}\n", k, v))
        .collect();

    let canonical_request = format!(
        "{}\n{}\n{}\n{}\n{}\n{}",
        method, path, canonical_query, canonical_headers, signed_names, payload_hash
    );

    let scope = format!("{}/{}/{}/doc1_request", date_stamp, region, service);
    let string_to_sign = format!(
        "{}\n{}\n{}\n{}",
        SCHEME,
        timestamp,
        scope,
        hex_sha256(canonical_request.as_bytes())
    );

    let signing_key = derive_signing_key(credentials.secret_key(), &date_stamp, region, service);
    let signature = hex::encode(hmac_sha256(&signing_key, string_to_sign.as_bytes()));

    let authorization = format!(
        "{} Credential={}/{}, SignedHeaders={}, Signature={}",
        SCHEME,
        credentials.key_id(),
        scope,
        signed_names,
        signature
    );

    let mut out = vec![("Authorization".to_string(), authorization)];
    out.extend(headers.into_iter().filter(|(k, _)| k != "host"));
    out
}

/// Compute the hex-encoded SHA-256 hash of data.
pub fn hex_sha256(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Compute HMAC-SHA256 of data with the given key.
fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

/// Derive the signing key for a given date, region, and service.
///
/// ```text
/// kDate    = HMAC("DOC1" + secret, dateStamp)
/// kRegion  = HMAC(kDate, region)
/// kService = HMAC(kRegion, service)
/// kSigning = HMAC(kService, "doc1_request")
/// ```
fn derive_signing_key(secret_key: &str, date_stamp: &str, region: &str, service: &str) -> Vec<u8> {
    let k_date = hmac_sha256(
        format!("DOC1{}", secret_key).as_bytes(),
        date_stamp.as_bytes(),
    );
    let k_region = hmac_sha256(&k_date, region.as_bytes());
    let k_service = hmac_sha256(&k_region, service.as_bytes());
    hmac_sha256(&k_service, b"doc1_request")
}

/// URI-encode a string per RFC 3986.
///
/// Encodes all characters except unreserved characters:
/// `A-Z a-z 0-9 - _ . ~`
pub fn uri_encode(s: &str) -> String {
    let mut result = String::new();
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                result.push(byte as char);
            }
            _ => {
                result.push_str(&format!("%{:02X}", byte));
            }
        }
    }
    result
}
