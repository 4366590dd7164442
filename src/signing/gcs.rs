use std::fmt::Write as _;
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rsa::RsaPrivateKey;
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::signature::{SignatureEncoding, Signer};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use super::{CREDENTIALS_ENV, CloudUri, SignError, UrlSigner};

pub const STORAGE_HOST: &str = "storage.googleapis.com";
/// Longest lifetime V4 signed URLs accept.
pub const MAX_EXPIRY: Duration = Duration::from_secs(7 * 24 * 60 * 60);

const ALGORITHM: &str = "GOOG4-RSA-SHA256";

/// The subset of a service-account key file needed for signing.
#[derive(Deserialize)]
struct ServiceAccountKey {
    client_email: String,
    private_key: String,
}

// ---------------------------------------------------------------------------
// GcsSigner
// ---------------------------------------------------------------------------

/// V4 query-string signer for Google Cloud Storage objects.
pub struct GcsSigner {
    client_email: String,
    key: SigningKey<Sha256>,
}

impl GcsSigner {
    /// Build a signer from the key file named by `GOOGLE_APPLICATION_CREDENTIALS`.
    pub fn from_env() -> Result<Self, SignError> {
        let path = std::env::var_os(CREDENTIALS_ENV)
            .ok_or_else(|| SignError::Credentials(format!("{CREDENTIALS_ENV} is not set")))?;
        Self::from_key_file(Path::new(&path))
    }

    pub fn from_key_file(path: &Path) -> Result<Self, SignError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| SignError::Credentials(format!("{}: {e}", path.display())))?;
        Self::from_key_json(&text)
    }

    pub fn from_key_json(json: &str) -> Result<Self, SignError> {
        let key: ServiceAccountKey =
            serde_json::from_str(json).map_err(|e| SignError::InvalidKey(e.to_string()))?;
        let private = RsaPrivateKey::from_pkcs8_pem(&key.private_key)
            .map_err(|e| SignError::InvalidKey(e.to_string()))?;
        Ok(GcsSigner {
            client_email: key.client_email,
            key: SigningKey::<Sha256>::new(private),
        })
    }

    pub fn client_email(&self) -> &str {
        &self.client_email
    }

    /// Sign `uri` as if the current time were `now`.
    pub fn sign_at(
        &self,
        uri: &CloudUri,
        expiry: Duration,
        now: DateTime<Utc>,
    ) -> Result<String, SignError> {
        let request = CanonicalRequest::new(&self.client_email, uri, expiry, now)?;
        let signature = self
            .key
            .try_sign(request.string_to_sign().as_bytes())
            .map_err(|e| SignError::Signing(e.to_string()))?;
        Ok(request.signed_url(&to_hex(&signature.to_bytes())))
    }
}

impl UrlSigner for GcsSigner {
    fn sign(&self, uri: &CloudUri, expiry: Duration) -> Result<String, SignError> {
        self.sign_at(uri, expiry, Utc::now())
    }
}

// ---------------------------------------------------------------------------
// Canonical request
// ---------------------------------------------------------------------------

/// The pieces of a V4 GET request that get signed.
struct CanonicalRequest {
    resource: String,
    query: String,
    timestamp: String,
    scope: String,
}

impl CanonicalRequest {
    fn new(
        client_email: &str,
        uri: &CloudUri,
        expiry: Duration,
        now: DateTime<Utc>,
    ) -> Result<Self, SignError> {
        if expiry > MAX_EXPIRY {
            return Err(SignError::ExpiryTooLong {
                requested: expiry.as_secs(),
                max: MAX_EXPIRY.as_secs(),
            });
        }
        let expires = expiry.as_secs().max(1);

        let timestamp = now.format("%Y%m%dT%H%M%SZ").to_string();
        let scope = format!("{}/auto/storage/goog4_request", now.format("%Y%m%d"));
        let credential = format!("{client_email}/{scope}");

        // Already in canonical (sorted) order.
        let params = [
            ("X-Goog-Algorithm", ALGORITHM.to_string()),
            ("X-Goog-Credential", credential),
            ("X-Goog-Date", timestamp.clone()),
            ("X-Goog-Expires", expires.to_string()),
            ("X-Goog-SignedHeaders", "host".to_string()),
        ];
        let query = params
            .iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        Ok(CanonicalRequest {
            resource: format!("/{}/{}", uri.bucket, encode_object_path(&uri.object)),
            query,
            timestamp,
            scope,
        })
    }

    fn canonical(&self) -> String {
        format!(
            "GET\n{}\n{}\nhost:{STORAGE_HOST}\n\nhost\nUNSIGNED-PAYLOAD",
            self.resource, self.query
        )
    }

    fn string_to_sign(&self) -> String {
        let digest = Sha256::digest(self.canonical().as_bytes());
        format!(
            "{ALGORITHM}\n{}\n{}\n{:x}",
            self.timestamp, self.scope, digest
        )
    }

    fn signed_url(&self, signature_hex: &str) -> String {
        format!(
            "https://{STORAGE_HOST}{}?{}&X-Goog-Signature={signature_hex}",
            self.resource, self.query
        )
    }
}

/// Percent-encode each path segment, keeping the separators.
fn encode_object_path(object: &str) -> String {
    object
        .split('/')
        .map(urlencoding::encode)
        .collect::<Vec<_>>()
        .join("/")
}

/// Lowercase hex of the raw signature bytes.
fn to_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(out, "{b:02x}");
    }
    out
}
