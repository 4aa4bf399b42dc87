//! Per-message session keys

use rand::{CryptoRng, RngCore};
use scribe_core::{CipherFunction, ScribeError, ScribeResult};
use zeroize::Zeroize;

/// The symmetric key for one message, tagged with its cipher. Zeroized on drop.
pub struct SessionKey {
    cipher: CipherFunction,
    bytes: Vec<u8>,
}

impl SessionKey {
    /// Generate a random key sized for `cipher`.
    pub fn generate<R: RngCore + CryptoRng>(
        rng: &mut R,
        cipher: CipherFunction,
    ) -> ScribeResult<Self> {
        let mut bytes = vec![0u8; cipher.key_size()];
        if let Err(e) = rng.try_fill_bytes(&mut bytes) {
            bytes.zeroize();
            return Err(ScribeError::RandomSource(e));
        }
        Ok(Self { cipher, bytes })
    }

    /// Wrap existing key bytes; the length must match the cipher's key size.
    pub fn from_bytes(cipher: CipherFunction, mut bytes: Vec<u8>) -> ScribeResult<Self> {
        if bytes.len() != cipher.key_size() {
            let len = bytes.len();
            bytes.zeroize();
            return Err(ScribeError::codec(format!(
                "session key has wrong size for {cipher:?}: {len} bytes (expected {})",
                cipher.key_size()
            )));
        }
        Ok(Self { cipher, bytes })
    }

    pub fn cipher(&self) -> CipherFunction {
        self.cipher
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Drop for SessionKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionKey")
            .field("cipher", &self.cipher)
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}
