//! AWS Signature Version 4 query presigning
//!
//! Only the `host` header is signed and the payload is `UNSIGNED-PAYLOAD`,
//! so the resulting URL can be used by any HTTP client.

use chrono::{DateTime, Utc};
use platform::crypto::{hmac_sha256, sha256_hex};
use secrecy::{ExposeSecret, SecretString};

const ALGORITHM: &str = "AWS4-HMAC-SHA256";
const SERVICE: &str = "s3";
const TERMINATOR: &str = "aws4_request";
const UNSIGNED_PAYLOAD: &str = "UNSIGNED-PAYLOAD";

/// Longest expiry S3 accepts for a presigned URL
pub const MAX_EXPIRES_SECS: u32 = 7 * 24 * 3600;

pub struct SigningKey {
    pub access_key_id: String,
    pub secret_access_key: SecretString,
    pub region: String,
}

/// One request to presign
pub struct PresignRequest<'a> {
    pub method: &'a str,
    pub scheme: &'a str,
    /// `host[:port]`
    pub authority: &'a str,
    /// Absolute path, not yet encoded
    pub path: &'a str,
    pub expires_in_secs: u32,
}

/// Build the presigned URL for `request` as of `now`
pub fn presign(key: &SigningKey, request: &PresignRequest<'_>, now: DateTime<Utc>) -> String {
    let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
    let date = now.format("%Y%m%d").to_string();
    let scope = format!("{date}/{}/{SERVICE}/{TERMINATOR}", key.region);
    let credential = format!("{}/{scope}", key.access_key_id);
    let expires = request.expires_in_secs.min(MAX_EXPIRES_SECS).to_string();

    let mut params = [
        ("X-Amz-Algorithm", ALGORITHM),
        ("X-Amz-Credential", credential.as_str()),
        ("X-Amz-Date", amz_date.as_str()),
        ("X-Amz-Expires", expires.as_str()),
        ("X-Amz-SignedHeaders", "host"),
    ];
    params.sort_by(|a, b| a.0.cmp(b.0));
    let query = params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    let canonical_uri = encode_path(request.path);
    let canonical_request = format!(
        "{}\n{canonical_uri}\n{query}\nhost:{}\n\nhost\n{UNSIGNED_PAYLOAD}",
        request.method, request.authority
    );

    let string_to_sign = format!(
        "{ALGORITHM}\n{amz_date}\n{scope}\n{}",
        sha256_hex(canonical_request.as_bytes())
    );
    let signing_key = derive_signing_key(key, &date);
    let signature = hex::encode(hmac_sha256(&signing_key, string_to_sign.as_bytes()));

    format!(
        "{}://{}{canonical_uri}?{query}&X-Amz-Signature={signature}",
        request.scheme, request.authority
    )
}

/// URI-encode each path segment, keeping the separators
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn derive_signing_key(key: &SigningKey, date: &str) -> [u8; 32] {
    let secret = format!("AWS4{}", key.secret_access_key.expose_secret());
    let k_date = hmac_sha256(secret.as_bytes(), date.as_bytes());
    let k_region = hmac_sha256(&k_date, key.region.as_bytes());
    let k_service = hmac_sha256(&k_region, SERVICE.as_bytes());
    hmac_sha256(&k_service, TERMINATOR.as_bytes())
}
