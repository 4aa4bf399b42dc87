use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{ScribeError, ScribeResult};
use crate::types::{CipherFunction, HashAlgorithm};

/// Top-level engine configuration (loaded from scribe.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScribeConfig {
    pub signing: SigningConfig,
    pub encryption: EncryptionConfig,
    pub armor: ArmorConfig,
}

impl ScribeConfig {
    /// Parse a config from TOML text. Missing sections take their defaults.
    pub fn from_toml_str(s: &str) -> ScribeResult<Self> {
        toml::from_str(s).map_err(|e| ScribeError::Config(format!("invalid config: {e}")))
    }

    /// Load a config file from disk.
    pub fn load(path: &Path) -> ScribeResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ScribeError::Config(format!("reading {}: {e}", path.display())))?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded scribe config");
        Ok(config)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SigningConfig {
    /// Hash for detached signatures (default: sha256)
    pub hash: HashAlgorithm,
    /// Fixed signature creation time in epoch seconds (default: current time)
    pub creation_time: Option<u32>,
}

impl SigningConfig {
    /// The creation timestamp to stamp on a new signature.
    pub fn timestamp(&self) -> u32 {
        self.creation_time.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| u32::try_from(d.as_secs()).unwrap_or(u32::MAX))
                .unwrap_or(0)
        })
    }
}

impl Default for SigningConfig {
    fn default() -> Self {
        Self {
            hash: HashAlgorithm::Sha256,
            creation_time: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncryptionConfig {
    /// Cipher for passphrase-only encryption (default: aes128)
    pub passphrase_cipher: CipherFunction,
    /// Hash used by the iterated-and-salted S2K (default: sha256)
    pub s2k_hash: HashAlgorithm,
    /// Bytes hashed by the S2K, rounded up to an encodable count (default: 65536)
    pub s2k_count: u32,
}

impl Default for EncryptionConfig {
    fn default() -> Self {
        Self {
            passphrase_cipher: CipherFunction::Aes128,
            s2k_hash: HashAlgorithm::Sha256,
            s2k_count: 65536,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ArmorConfig {
    /// Extra "Key: Value" header lines written after the BEGIN line
    pub headers: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
[signing]
hash = "sha512"
creation_time = 1700000000

[encryption]
passphrase_cipher = "aes256"
s2k_hash = "sha512"
s2k_count = 1048576

[armor.headers]
Comment = "scribe test"
"#;
        let config = ScribeConfig::from_toml_str(toml_str).unwrap();

        assert_eq!(config.signing.hash, HashAlgorithm::Sha512);
        assert_eq!(config.signing.creation_time, Some(1_700_000_000));
        assert_eq!(config.signing.timestamp(), 1_700_000_000);
        assert_eq!(config.encryption.passphrase_cipher, CipherFunction::Aes256);
        assert_eq!(config.encryption.s2k_hash, HashAlgorithm::Sha512);
        assert_eq!(config.encryption.s2k_count, 1_048_576);
        assert_eq!(
            config.armor.headers.get("Comment").map(String::as_str),
            Some("scribe test")
        );
    }

    #[test]
    fn test_parse_defaults() {
        let config = ScribeConfig::from_toml_str("").unwrap();

        assert_eq!(config.signing.hash, HashAlgorithm::Sha256);
        assert!(config.signing.creation_time.is_none());
        assert_eq!(config.encryption.passphrase_cipher, CipherFunction::Aes128);
        assert_eq!(config.encryption.s2k_count, 65536);
        assert!(config.armor.headers.is_empty());
    }

    #[test]
    fn test_parse_partial_config() {
        let toml_str = r#"
[encryption]
passphrase_cipher = "cast5"
"#;
        let config = ScribeConfig::from_toml_str(toml_str).unwrap();

        // Overridden
        assert_eq!(config.encryption.passphrase_cipher, CipherFunction::Cast5);
        // Defaults
        assert_eq!(config.encryption.s2k_hash, HashAlgorithm::Sha256);
        assert_eq!(config.signing.hash, HashAlgorithm::Sha256);
    }

    #[test]
    fn test_unknown_algorithm_rejected() {
        let result = ScribeConfig::from_toml_str("[signing]\nhash = \"md5\"\n");
        assert!(matches!(result, Err(ScribeError::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scribe.toml");
        std::fs::write(&path, "[signing]\ncreation_time = 42\n").unwrap();

        let config = ScribeConfig::load(&path).unwrap();
        assert_eq!(config.signing.timestamp(), 42);

        let missing = ScribeConfig::load(&dir.path().join("absent.toml"));
        assert!(matches!(missing, Err(ScribeError::Config(_))));
    }

    #[test]
    fn test_serialize_roundtrip() {
        let mut config = ScribeConfig::default();
        config
            .armor
            .headers
            .insert("Version".into(), "scribe".into());
        let toml_str = toml::to_string(&config).unwrap();
        let parsed = ScribeConfig::from_toml_str(&toml_str).unwrap();

        assert_eq!(parsed.signing.hash, config.signing.hash);
        assert_eq!(
            parsed.encryption.passphrase_cipher,
            config.encryption.passphrase_cipher
        );
        assert_eq!(parsed.armor.headers, config.armor.headers);
    }
}
