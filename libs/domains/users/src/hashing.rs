//! Keyed password hashing (HMAC-SHA256, hex encoded)

use hmac::{Hmac, Mac, digest::InvalidLength};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Deterministic keyed hash of plaintext input.
///
/// The MAC is keyed once at construction and cloned per call.
#[derive(Clone)]
pub struct SecretHasher {
    mac: HmacSha256,
}

impl SecretHasher {
    pub fn new(secret: &str) -> Result<Self, InvalidLength> {
        let mac = HmacSha256::new_from_slice(secret.as_bytes())?;
        Ok(Self { mac })
    }

    /// Lowercase hex digest of `input` under this hasher's secret
    pub fn hash(&self, input: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(input.as_bytes());
        let digest = const_hex::encode(mac.finalize().into_bytes());
        tracing::trace!("Computed keyed hash");
        digest
    }
}

impl std::fmt::Debug for SecretHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretHasher")
            .field("secret", &"[redacted]")
            .finish()
    }
}
