//! Gate.io API v4 request signing.
//!
//! Every private request carries three headers:
//!
//! | Header      | Value                                    |
//! |-------------|------------------------------------------|
//! | `KEY`       | API key                                  |
//! | `Timestamp` | Unix time in seconds                     |
//! | `SIGN`      | HMAC-SHA512 of the signature string, hex |
//!
//! The signature string is
//! `METHOD\n<url path>\n<query string>\n<hex sha512(body)>\n<timestamp>`,
//! where the URL path includes the `/api/v4` prefix and the query string is
//! exactly what is sent on the wire (empty when there is none).

use std::time::{SystemTime, UNIX_EPOCH};

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha512};

type HmacSha512 = Hmac<Sha512>;

/// Hex-encoded SHA-512 of a request body (`""` for body-less requests).
pub fn hash_body(body: &str) -> String {
    let mut hasher = Sha512::new();
    hasher.update(body.as_bytes());
    hex::encode(hasher.finalize())
}

/// Compute an HMAC-SHA512 signature and return it as a lowercase hex string.
pub fn hmac_sha512_sign(secret: &str, message: &str) -> String {
    let mut mac =
        HmacSha512::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Build the string that gets signed for one request.
pub fn signature_payload(
    method: &str,
    url_path: &str,
    query: &str,
    body: &str,
    timestamp: &str,
) -> String {
    let body_hash = hash_body(body);
    format!("{method}\n{url_path}\n{query}\n{body_hash}\n{timestamp}")
}

/// Sign one request and return the `SIGN` header value.
pub fn sign_request(
    secret: &str,
    method: &str,
    url_path: &str,
    query: &str,
    body: &str,
    timestamp: &str,
) -> String {
    let payload = signature_payload(method, url_path, query, body, timestamp);
    hmac_sha512_sign(secret, &payload)
}

/// URL-encode `(key, value)` pairs into a query string, preserving order.
pub fn encode_query(params: &[(&str, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Returns the current Unix timestamp in seconds.
pub fn current_timestamp_secs() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACCOUNTS: &str = "/api/v4/futures/usdt/accounts";
    const ORDERS: &str = "/api/v4/futures/usdt/orders";

    #[test]
    fn empty_body_hash() {
        assert_eq!(
            hash_body(""),
            "cf83e1357eefb8bdf1542850d66d8007d620e4050b5715dc83f4a921d36ce9ce\
             47d0d13c5d85f2b0ff8318d2877eec2f63b931bd47417a81a538327af927da3e"
        );
    }

    #[test]
    fn payload_layout() {
        let payload = signature_payload("GET", ACCOUNTS, "", "", "1700000000");
        let lines: Vec<&str> = payload.split('\n').collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "GET");
        assert_eq!(lines[1], ACCOUNTS);
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], hash_body(""));
        assert_eq!(lines[4], "1700000000");
    }

    #[test]
    fn signature_is_hex_sha512_and_deterministic() {
        let a = sign_request("secret", "POST", ORDERS, "", "{}", "1");
        let b = sign_request("secret", "POST", ORDERS, "", "{}", "1");
        let c = sign_request("other", "POST", ORDERS, "", "{}", "1");
        assert_eq!(a.len(), 128);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn query_encoding_keeps_order() {
        let q = encode_query(&[("contract", "BTC_USDT".into()), ("leverage", "10".into())]);
        assert_eq!(q, "contract=BTC_USDT&leverage=10");
    }
}
