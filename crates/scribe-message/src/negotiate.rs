//! Algorithm preference negotiation
//!
//! Each recipient's declared preferences are folded into the implementation's
//! own candidate lists with a stable filter: the result keeps the candidates'
//! order, never the recipient's. A recipient declaring nothing accepts only the
//! least-preferred candidate.

use scribe_core::{AlgorithmId, CipherFunction, HashAlgorithm, ScribeError, ScribeResult};

/// Ciphers offered for hybrid encryption, most preferred first.
pub const CIPHER_CANDIDATES: [CipherFunction; 4] = [
    CipherFunction::Aes256,
    CipherFunction::Aes192,
    CipherFunction::Aes128,
    CipherFunction::Cast5,
];

/// Hashes offered for message signatures, most preferred first.
pub const HASH_CANDIDATES: [HashAlgorithm; 6] = [
    HashAlgorithm::Sha512,
    HashAlgorithm::Sha384,
    HashAlgorithm::Sha256,
    HashAlgorithm::Sha224,
    HashAlgorithm::Sha1,
    HashAlgorithm::Ripemd160,
];

/// Weakest hash an inline message signature is made with.
pub const MIN_SIGNATURE_HASH: HashAlgorithm = HashAlgorithm::Sha256;

/// An ordered list of distinct algorithms, most preferred first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmSet<A> {
    algorithms: Vec<A>,
}

impl<A: AlgorithmId> AlgorithmSet<A> {
    /// Build a set, keeping the first occurrence of any repeated algorithm.
    pub fn new(algorithms: impl IntoIterator<Item = A>) -> Self {
        let mut out: Vec<A> = Vec::new();
        for a in algorithms {
            if !out.contains(&a) {
                out.push(a);
            }
        }
        Self { algorithms: out }
    }

    /// Build a set from wire identifiers. Identifiers this implementation
    /// does not know can never be negotiated and are dropped.
    pub fn from_ids(ids: &[u8]) -> Self {
        Self::new(ids.iter().filter_map(|&id| A::from_id(id)))
    }

    /// The single-entry set holding the least-preferred member.
    pub fn fallback(&self) -> Self {
        Self {
            algorithms: self.algorithms.last().copied().into_iter().collect(),
        }
    }

    /// Members of `self`, in `self`'s order, that also appear in `preferred`.
    pub fn intersect(&self, preferred: &Self) -> Self {
        Self {
            algorithms: self
                .algorithms
                .iter()
                .copied()
                .filter(|a| preferred.contains(*a))
                .collect(),
        }
    }

    pub fn contains(&self, algorithm: A) -> bool {
        self.algorithms.contains(&algorithm)
    }

    pub fn first(&self) -> Option<A> {
        self.algorithms.first().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.algorithms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.algorithms.len()
    }

    pub fn as_slice(&self) -> &[A] {
        &self.algorithms
    }

    pub fn ids(&self) -> Vec<u8> {
        self.algorithms.iter().map(|a| a.id()).collect()
    }
}

/// One recipient's declared preferences, as wire identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Preferences<'a> {
    pub symmetric: &'a [u8],
    pub hash: &'a [u8],
}

/// Outcome of a negotiation: the chosen algorithms plus everything that
/// remained acceptable to all recipients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Negotiated {
    pub cipher: CipherFunction,
    pub hash: HashAlgorithm,
    pub ciphers: AlgorithmSet<CipherFunction>,
    pub hashes: AlgorithmSet<HashAlgorithm>,
}

impl Negotiated {
    /// Hash for a signature inside the message: the negotiated hash, raised
    /// to [`MIN_SIGNATURE_HASH`] when its digest is shorter.
    pub fn signature_hash(&self) -> HashAlgorithm {
        if self.hash.digest_size() < MIN_SIGNATURE_HASH.digest_size() {
            MIN_SIGNATURE_HASH
        } else {
            self.hash
        }
    }
}

/// Fold every recipient's preferences into the candidate lists.
pub fn negotiate<'a>(
    recipients: impl IntoIterator<Item = Preferences<'a>>,
) -> ScribeResult<Negotiated> {
    let mut ciphers = AlgorithmSet::new(CIPHER_CANDIDATES);
    let mut hashes = AlgorithmSet::new(HASH_CANDIDATES);
    let default_ciphers = ciphers.fallback();
    let default_hashes = hashes.fallback();

    for prefs in recipients {
        let preferred_ciphers = if prefs.symmetric.is_empty() {
            default_ciphers.clone()
        } else {
            AlgorithmSet::from_ids(prefs.symmetric)
        };
        let preferred_hashes = if prefs.hash.is_empty() {
            default_hashes.clone()
        } else {
            AlgorithmSet::from_ids(prefs.hash)
        };
        ciphers = ciphers.intersect(&preferred_ciphers);
        hashes = hashes.intersect(&preferred_hashes);
    }

    let (Some(cipher), Some(hash)) = (ciphers.first(), hashes.first()) else {
        tracing::debug!(
            ciphers = ?ciphers.as_slice(),
            hashes = ?hashes.as_slice(),
            "no algorithm acceptable to every recipient"
        );
        return Err(ScribeError::NoCommonAlgorithm);
    };

    tracing::debug!(?cipher, ?hash, "negotiated message algorithms");
    Ok(Negotiated {
        cipher,
        hash,
        ciphers,
        hashes,
    })
}
