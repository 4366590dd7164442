/// Signed URLs for cloud-storage image references.
///
/// ```text
///   gs://bucket/object ──► CloudUri ──► UrlSigner::sign ──► https://…?X-Goog-Signature=…
/// ```
///
/// The loader only depends on [`UrlSigner`]; [`LazyGcsSigner`] is the
/// implementation the viewer installs.
pub mod gcs;

use std::fmt;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;

use thiserror::Error;

pub use gcs::GcsSigner;

/// Environment variable naming the service-account key file.
pub const CREDENTIALS_ENV: &str = "GOOGLE_APPLICATION_CREDENTIALS";

const GS_SCHEME: &str = "gs://";

// ---------------------------------------------------------------------------
// CloudUri
// ---------------------------------------------------------------------------

/// A parsed `gs://bucket/object` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudUri {
    pub bucket: String,
    pub object: String,
}

impl CloudUri {
    /// Parse a `gs://` reference. Everything up to the first `/` after the
    /// scheme is the bucket; the rest (possibly empty) is the object path.
    pub fn parse(s: &str) -> Option<Self> {
        let rest = s.strip_prefix(GS_SCHEME)?;
        let (bucket, object) = rest.split_once('/').unwrap_or((rest, ""));
        Some(CloudUri {
            bucket: bucket.to_string(),
            object: object.to_string(),
        })
    }
}

impl fmt::Display for CloudUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{GS_SCHEME}{}/{}", self.bucket, self.object)
    }
}

// ---------------------------------------------------------------------------
// Signer trait
// ---------------------------------------------------------------------------

/// Errors produced while turning a cloud reference into a signed URL.
#[derive(Debug, Clone, Error)]
pub enum SignError {
    #[error("Could not load storage credentials: {0}")]
    Credentials(String),
    #[error("Invalid service account key: {0}")]
    InvalidKey(String),
    #[error("Signed URL expiry of {requested}s exceeds the maximum of {max}s")]
    ExpiryTooLong { requested: u64, max: u64 },
    #[error("Signing failed: {0}")]
    Signing(String),
}

/// Produces time-limited GET URLs for cloud objects.
pub trait UrlSigner {
    fn sign(&self, uri: &CloudUri, expiry: Duration) -> Result<String, SignError>;
}

// ---------------------------------------------------------------------------
// Lazily configured GCS signer
// ---------------------------------------------------------------------------

/// Loads the service-account key on first use and keeps it for later calls.
///
/// When credentials cannot be loaded every call fails with the same cause,
/// so affected rows still load and carry the reason.
#[derive(Default)]
pub struct LazyGcsSigner {
    /// Key file to use instead of the one named by [`CREDENTIALS_ENV`].
    key_file: Option<PathBuf>,
    inner: OnceLock<Result<GcsSigner, SignError>>,
}

impl LazyGcsSigner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key_file(path: impl Into<PathBuf>) -> Self {
        LazyGcsSigner {
            key_file: Some(path.into()),
            inner: OnceLock::new(),
        }
    }

    fn signer(&self) -> Result<&GcsSigner, SignError> {
        self.inner
            .get_or_init(|| {
                let signer = match &self.key_file {
                    Some(path) => GcsSigner::from_key_file(path),
                    None => GcsSigner::from_env(),
                };
                match &signer {
                    Ok(s) => log::debug!("GCS signer ready for {}", s.client_email()),
                    Err(e) => log::warn!("GCS signer unavailable: {e}"),
                }
                signer
            })
            .as_ref()
            .map_err(|e| e.clone())
    }
}

impl UrlSigner for LazyGcsSigner {
    fn sign(&self, uri: &CloudUri, expiry: Duration) -> Result<String, SignError> {
        self.signer()?.sign(uri, expiry)
    }
}
