use hmac::digest::MacError;
use hmac::{Hmac, Mac};

use sha2::Sha256;

use secrecy::Secret;

/// HMAC-SHA256 key shared with the service that authenticates users
#[derive(Clone)]
pub struct SigningKey(Hmac<Sha256>);

impl SigningKey {
    pub fn new(key: &Secret<String>) -> anyhow::Result<Self> {
        use secrecy::ExposeSecret;

        let hmac = Hmac::new_from_slice(key.expose_secret().as_bytes())?;

        Ok(Self(hmac))
    }

    /// Sign a message
    pub fn sign(&self, msg: &[u8]) -> Vec<u8> {
        self.0
            .clone()
            .chain_update(msg)
            .finalize()
            .into_bytes()
            .to_vec()
    }

    /// Verify a signed message in constant time
    pub fn verify(&self, msg: &[u8], signature: &[u8]) -> Result<(), MacError> {
        self.0.clone().chain_update(msg).verify_slice(signature)
    }
}
