//! In-memory certificates: a primary key, identities and subkeys
//!
//! Entities are built by the caller and only read here. `Entity::key_for`
//! resolves the key used for a given purpose and fails with a typed error
//! when the entity has none.

use scribe_core::{InvalidArgument, KeyId, ScribeResult};
use scribe_packet::{PrivateKey, PublicKey};

/// Key usage flags from a self-signature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyFlags {
    pub certify: bool,
    pub sign: bool,
    pub encrypt_communications: bool,
    pub encrypt_storage: bool,
}

impl KeyFlags {
    pub fn signing() -> Self {
        Self {
            certify: true,
            sign: true,
            ..Self::default()
        }
    }

    pub fn encryption() -> Self {
        Self {
            encrypt_communications: true,
            encrypt_storage: true,
            ..Self::default()
        }
    }

    fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::Sign => self.sign,
            Capability::Encrypt => self.encrypt_communications || self.encrypt_storage,
        }
    }
}

/// The parts of an identity's self-signature the message layer reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelfSignature {
    pub is_primary_id: bool,
    /// Preferred symmetric cipher ids, most preferred first.
    pub preferred_symmetric: Vec<u8>,
    /// Preferred hash ids, most preferred first.
    pub preferred_hash: Vec<u8>,
    /// Usage flags for the primary key; `None` places no restriction.
    pub flags: Option<KeyFlags>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub self_signature: SelfSignature,
}

impl Identity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            self_signature: SelfSignature::default(),
        }
    }

    pub fn primary(mut self) -> Self {
        self.self_signature.is_primary_id = true;
        self
    }

    pub fn with_preferences(mut self, symmetric: &[u8], hash: &[u8]) -> Self {
        self.self_signature.preferred_symmetric = symmetric.to_vec();
        self.self_signature.preferred_hash = hash.to_vec();
        self
    }

    pub fn with_flags(mut self, flags: KeyFlags) -> Self {
        self.self_signature.flags = Some(flags);
        self
    }
}

#[derive(Debug, Clone)]
pub struct Subkey {
    pub public_key: PublicKey,
    pub private_key: Option<PrivateKey>,
    /// Usage flags from the binding signature; `None` places no restriction.
    pub flags: Option<KeyFlags>,
}

impl Subkey {
    pub fn public(public_key: PublicKey) -> Self {
        Self {
            public_key,
            private_key: None,
            flags: None,
        }
    }

    pub fn private(private_key: PrivateKey) -> Self {
        Self {
            public_key: private_key.public_key().clone(),
            private_key: Some(private_key),
            flags: None,
        }
    }

    pub fn with_flags(mut self, flags: KeyFlags) -> Self {
        self.flags = Some(flags);
        self
    }

    fn usable_for(&self, capability: Capability) -> bool {
        supports(&self.public_key, capability)
            && self.flags.is_none_or(|f| f.allows(capability))
    }
}

/// What a resolved key will be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Sign,
    Encrypt,
}

fn supports(public_key: &PublicKey, capability: Capability) -> bool {
    let algorithm = public_key.algorithm();
    match capability {
        Capability::Sign => algorithm.can_sign(),
        Capability::Encrypt => algorithm.can_encrypt(),
    }
}

/// A cryptographic identity.
#[derive(Debug, Clone)]
pub struct Entity {
    pub primary_key: PublicKey,
    pub private_key: Option<PrivateKey>,
    pub identities: Vec<Identity>,
    pub subkeys: Vec<Subkey>,
}

impl Entity {
    /// An entity with only public material.
    pub fn new(primary_key: PublicKey) -> Self {
        Self {
            primary_key,
            private_key: None,
            identities: Vec::new(),
            subkeys: Vec::new(),
        }
    }

    /// An entity owning the private half of its primary key.
    pub fn from_private_key(private_key: PrivateKey) -> Self {
        Self {
            primary_key: private_key.public_key().clone(),
            private_key: Some(private_key),
            identities: Vec::new(),
            subkeys: Vec::new(),
        }
    }

    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.identities.push(identity);
        self
    }

    pub fn with_subkey(mut self, subkey: Subkey) -> Self {
        self.subkeys.push(subkey);
        self
    }

    pub fn key_id(&self) -> KeyId {
        self.primary_key.key_id()
    }

    /// The identity flagged primary, else the first one.
    pub fn primary_identity(&self) -> Option<&Identity> {
        self.identities
            .iter()
            .find(|i| i.self_signature.is_primary_id)
            .or_else(|| self.identities.first())
    }

    fn primary_usable_for(&self, capability: Capability) -> bool {
        let flags = self
            .primary_identity()
            .and_then(|i| i.self_signature.flags);
        supports(&self.primary_key, capability) && flags.is_none_or(|f| f.allows(capability))
    }

    /// Resolve the key to use for `capability`.
    ///
    /// Signing prefers the primary key; encryption prefers a subkey.
    pub fn key_for(&self, capability: Capability) -> ScribeResult<Key<'_>> {
        let primary = Key {
            entity: self,
            public_key: &self.primary_key,
            private_key: self.private_key.as_ref(),
            capability,
        };
        let subkey = self
            .subkeys
            .iter()
            .find(|s| s.usable_for(capability))
            .map(|s| Key {
                entity: self,
                public_key: &s.public_key,
                private_key: s.private_key.as_ref(),
                capability,
            });

        let key = match capability {
            Capability::Sign if self.primary_usable_for(capability) => Some(primary),
            Capability::Sign => subkey,
            Capability::Encrypt => subkey.or_else(|| {
                self.primary_usable_for(capability).then_some(primary)
            }),
        };

        key.ok_or_else(|| {
            let missing = match capability {
                Capability::Sign => InvalidArgument::NoSigningKey(self.key_id()),
                Capability::Encrypt => InvalidArgument::NoEncryptionKey(self.key_id()),
            };
            missing.into()
        })
    }
}

/// A key of an entity, resolved for one capability.
#[derive(Debug, Clone, Copy)]
pub struct Key<'a> {
    entity: &'a Entity,
    public_key: &'a PublicKey,
    private_key: Option<&'a PrivateKey>,
    capability: Capability,
}

impl<'a> Key<'a> {
    pub fn entity(&self) -> &'a Entity {
        self.entity
    }

    pub fn public_key(&self) -> &'a PublicKey {
        self.public_key
    }

    pub fn capability(&self) -> Capability {
        self.capability
    }

    pub fn key_id(&self) -> KeyId {
        self.public_key.key_id()
    }

    /// The decrypted private half, required for signing.
    pub fn private_key(&self) -> ScribeResult<&'a PrivateKey> {
        match self.private_key {
            None => Err(InvalidArgument::MissingPrivateKey(self.key_id()).into()),
            Some(k) if k.is_encrypted() => {
                Err(InvalidArgument::EncryptedPrivateKey(self.key_id()).into())
            }
            Some(k) => Ok(k),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scribe_core::ScribeError;

    fn full_entity() -> Entity {
        Entity::from_private_key(PrivateKey::ed25519([1; 32], 0).unwrap())
            .with_identity(Identity::new("Alice <alice@example.org>").primary())
            .with_subkey(Subkey::private(PrivateKey::x25519([2; 32], 0).unwrap()))
    }

    #[test]
    fn test_signing_uses_primary() {
        let entity = full_entity();
        let key = entity.key_for(Capability::Sign).unwrap();
        assert_eq!(key.key_id(), entity.key_id());
        assert_eq!(key.capability(), Capability::Sign);
        assert!(key.private_key().is_ok());
    }

    #[test]
    fn test_encryption_uses_subkey() {
        let entity = full_entity();
        let key = entity.key_for(Capability::Encrypt).unwrap();
        assert_eq!(key.key_id(), entity.subkeys[0].public_key.key_id());
        assert_ne!(key.key_id(), entity.key_id());
    }

    #[test]
    fn test_no_encryption_key() {
        let entity = Entity::from_private_key(PrivateKey::ed25519([1; 32], 0).unwrap());
        let err = entity.key_for(Capability::Encrypt).unwrap_err();
        match err {
            ScribeError::InvalidArgument(InvalidArgument::NoEncryptionKey(id)) => {
                assert_eq!(id, entity.key_id());
            }
            other => panic!("expected NoEncryptionKey, got: {other:?}"),
        }
    }

    #[test]
    fn test_subkey_flags_restrict_use() {
        let entity = Entity::from_private_key(PrivateKey::ed25519([1; 32], 0).unwrap()).with_subkey(
            Subkey::private(PrivateKey::x25519([2; 32], 0).unwrap()).with_flags(KeyFlags::signing()),
        );
        assert!(entity.key_for(Capability::Encrypt).is_err());
    }

    #[test]
    fn test_public_only_signer() {
        let public = PrivateKey::ed25519([1; 32], 0).unwrap().public_key().clone();
        let entity = Entity::new(public);
        let key = entity.key_for(Capability::Sign).unwrap();
        assert!(matches!(
            key.private_key(),
            Err(ScribeError::InvalidArgument(InvalidArgument::MissingPrivateKey(_)))
        ));
    }

    #[test]
    fn test_locked_signer() {
        let mut private_key = PrivateKey::ed25519([1; 32], 0).unwrap();
        private_key
            .lock(&secrecy::SecretString::from("passphrase"))
            .unwrap();
        let entity = Entity::from_private_key(private_key);
        let key = entity.key_for(Capability::Sign).unwrap();
        assert!(matches!(
            key.private_key(),
            Err(ScribeError::InvalidArgument(InvalidArgument::EncryptedPrivateKey(_)))
        ));
    }

    #[test]
    fn test_encryption_only_entity_cannot_sign() {
        let entity = Entity::from_private_key(PrivateKey::x25519([3; 32], 0).unwrap());
        assert!(matches!(
            entity.key_for(Capability::Sign),
            Err(ScribeError::InvalidArgument(InvalidArgument::NoSigningKey(_)))
        ));
        assert!(entity.key_for(Capability::Encrypt).is_ok());
    }

    #[test]
    fn test_primary_identity_selection() {
        let entity = Entity::new(PrivateKey::ed25519([1; 32], 0).unwrap().public_key().clone())
            .with_identity(Identity::new("first"))
            .with_identity(Identity::new("second").primary());
        assert_eq!(entity.primary_identity().unwrap().name, "second");

        let entity = Entity::new(PrivateKey::ed25519([1; 32], 0).unwrap().public_key().clone())
            .with_identity(Identity::new("only"));
        assert_eq!(entity.primary_identity().unwrap().name, "only");
    }
}
