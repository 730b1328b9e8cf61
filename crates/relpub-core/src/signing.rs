//! Ed25519 signatures over release artifacts.
//!
//! Two modes are supported. `ed25519ph` streams the artifact through
//! SHA-512 and signs the digest with the product id as context, so memory
//! stays bounded. `ed25519` signs the raw bytes and has to hold the whole
//! artifact in memory.

use std::fmt;
use std::io::{self, Read, Seek};
use std::path::PathBuf;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use ed25519_dalek::{
    KEYPAIR_LENGTH, PUBLIC_KEY_LENGTH, SignatureError, Signer as _, SigningKey, Verifier as _,
    VerifyingKey,
};
use relpub_schema::Signature;
use thiserror::Error;

use crate::io::artifact::with_rewind;
use crate::io::digest;
use crate::paths::{ExpandError, expand_home};

#[derive(Error, Debug)]
pub enum SigningError {
    #[error("bad signing key ({0})")]
    KeyDecode(#[from] hex::FromHexError),

    #[error("bad signing key length (got {actual} expected {expected})")]
    KeyLength { actual: usize, expected: usize },

    #[error("bad signing key ({0})")]
    InvalidKey(SignatureError),

    #[error("signing algorithm \"{0}\" is not supported")]
    UnsupportedAlgorithm(String),

    #[error("signing-key path is not expandable ({0})")]
    KeyPathNotExpandable(ExpandError),

    #[error("signing-key path is not readable ({0})")]
    KeyPathNotReadable(io::Error),

    #[error("failed to read artifact for signing: {0}")]
    Io(#[from] io::Error),

    #[error("signing failed ({0})")]
    Sign(SignatureError),

    #[error("signature is not valid base64 ({0})")]
    BadSignature(String),

    #[error("signature verification failed")]
    Verification,
}

/// Signature scheme applied to the artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SigningAlgorithm {
    /// Ed25519 over the SHA-512 prehash of the artifact, with context.
    #[default]
    Ed25519ph,
    /// Plain Ed25519 over the artifact bytes.
    Ed25519,
}

impl SigningAlgorithm {
    /// Every supported algorithm.
    pub const ALL: [SigningAlgorithm; 2] = [Self::Ed25519ph, Self::Ed25519];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ed25519ph => "ed25519ph",
            Self::Ed25519 => "ed25519",
        }
    }

    /// Decoded key length the algorithm requires.
    pub fn key_length(&self) -> usize {
        match self {
            Self::Ed25519ph | Self::Ed25519 => KEYPAIR_LENGTH,
        }
    }
}

impl fmt::Display for SigningAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SigningAlgorithm {
    type Err = SigningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| SigningError::UnsupportedAlgorithm(s.to_string()))
    }
}

/// Where the hex-encoded signing key comes from.
#[derive(Clone, PartialEq, Eq)]
pub enum SigningKeySource {
    /// A file holding the hex key. `~` is expanded.
    Path(PathBuf),
    /// The hex key itself.
    Inline(String),
}

impl SigningKeySource {
    /// Pick the configured source. A key path wins over an inline key.
    pub fn select(path: Option<PathBuf>, inline: Option<String>) -> Option<Self> {
        path.map(Self::Path).or(inline.map(Self::Inline))
    }

    /// Read the hex key material.
    pub fn load(&self) -> Result<String, SigningError> {
        match self {
            Self::Path(path) => {
                let path = expand_home(path).map_err(SigningError::KeyPathNotExpandable)?;
                std::fs::read_to_string(path).map_err(SigningError::KeyPathNotReadable)
            }
            Self::Inline(hex) => Ok(hex.clone()),
        }
    }
}

impl fmt::Debug for SigningKeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Self::Inline(_) => f.debug_tuple("Inline").field(&"<redacted>").finish(),
        }
    }
}

/// Decode a hex signing key into keypair bytes.
///
/// Surrounding whitespace is ignored. The length is checked against what
/// `algorithm` needs before any artifact is touched.
pub fn decode_signing_key(
    hex_key: &str,
    algorithm: SigningAlgorithm,
) -> Result<Vec<u8>, SigningError> {
    let bytes = hex::decode(hex_key.trim())?;
    let expected = algorithm.key_length();
    if bytes.len() != expected {
        return Err(SigningError::KeyLength {
            actual: bytes.len(),
            expected,
        });
    }
    Ok(bytes)
}

/// A validated signing key bound to an algorithm.
pub struct Signer {
    key: SigningKey,
    algorithm: SigningAlgorithm,
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer")
            .field("algorithm", &self.algorithm)
            .field("public", &hex::encode(self.verifying_key().as_bytes()))
            .finish_non_exhaustive()
    }
}

impl Signer {
    /// Build a signer from a hex keypair (seed followed by public key).
    ///
    /// # Errors
    ///
    /// Fails on bad hex, a wrong length, or a public half that does not
    /// belong to the seed.
    pub fn from_hex(hex_key: &str, algorithm: SigningAlgorithm) -> Result<Self, SigningError> {
        let bytes = decode_signing_key(hex_key, algorithm)?;
        let mut keypair = [0u8; KEYPAIR_LENGTH];
        keypair.copy_from_slice(&bytes);

        let key = SigningKey::from_keypair_bytes(&keypair).map_err(SigningError::InvalidKey)?;
        Ok(Self { key, algorithm })
    }

    pub fn algorithm(&self) -> SigningAlgorithm {
        self.algorithm
    }

    /// Public half of the key.
    pub fn verifying_key(&self) -> VerifyingKey {
        self.key.verifying_key()
    }

    /// Sign everything `reader` yields, then rewind it.
    ///
    /// `context` binds an `ed25519ph` signature to its product; the direct
    /// mode ignores it.
    pub fn sign<R: Read + Seek>(
        &self,
        context: &str,
        reader: &mut R,
    ) -> Result<Signature, SigningError> {
        let sig = with_rewind(reader, |r| match self.algorithm {
            SigningAlgorithm::Ed25519ph => {
                let prehash = digest::sha512(r)?;
                self.key
                    .sign_prehashed(prehash, Some(context.as_bytes()))
                    .map_err(SigningError::Sign)
            }
            SigningAlgorithm::Ed25519 => {
                tracing::warn!(
                    "using ed25519 to sign large files is not recommended (use ed25519ph instead)"
                );
                let mut data = Vec::new();
                r.read_to_end(&mut data)?;
                Ok(self.key.sign(&data))
            }
        })?;

        Ok(Signature::new(digest::encode(&sig.to_bytes())))
    }
}

/// Check `signature` over everything `reader` yields, then rewind it.
pub fn verify<R: Read + Seek>(
    public: &[u8; PUBLIC_KEY_LENGTH],
    algorithm: SigningAlgorithm,
    context: &str,
    reader: &mut R,
    signature: &Signature,
) -> Result<(), SigningError> {
    let key = VerifyingKey::from_bytes(public).map_err(SigningError::InvalidKey)?;
    let raw = STANDARD_NO_PAD
        .decode(signature.as_str())
        .map_err(|e| SigningError::BadSignature(e.to_string()))?;
    let sig = ed25519_dalek::Signature::from_slice(&raw)
        .map_err(|e| SigningError::BadSignature(e.to_string()))?;

    with_rewind(reader, |r| match algorithm {
        SigningAlgorithm::Ed25519ph => {
            let prehash = digest::sha512(r)?;
            key.verify_prehashed(prehash, Some(context.as_bytes()), &sig)
                .map_err(|_| SigningError::Verification)
        }
        SigningAlgorithm::Ed25519 => {
            let mut data = Vec::new();
            r.read_to_end(&mut data)?;
            key.verify(&data, &sig).map_err(|_| SigningError::Verification)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::testing::SyntheticArtifact;
    use std::io::Cursor;

    fn test_key() -> String {
        hex::encode(SigningKey::from_bytes(&[7u8; 32]).to_keypair_bytes())
    }

    fn public_key() -> [u8; PUBLIC_KEY_LENGTH] {
        SigningKey::from_bytes(&[7u8; 32]).verifying_key().to_bytes()
    }

    #[test]
    fn prehashed_signature_is_bound_to_product() {
        let signer = Signer::from_hex(&test_key(), SigningAlgorithm::Ed25519ph).unwrap();
        let mut artifact = Cursor::new(b"release bytes".to_vec());

        let sig = signer.sign("prod-1", &mut artifact).unwrap();
        assert_eq!(artifact.position(), 0);
        // 64-byte signature -> 86 base64 chars without padding
        assert_eq!(sig.as_str().len(), 86);

        let public = public_key();
        verify(&public, SigningAlgorithm::Ed25519ph, "prod-1", &mut artifact, &sig).unwrap();
        assert!(matches!(
            verify(&public, SigningAlgorithm::Ed25519ph, "prod-2", &mut artifact, &sig),
            Err(SigningError::Verification)
        ));
    }

    #[test]
    fn tampered_artifact_fails_verification() {
        let signer = Signer::from_hex(&test_key(), SigningAlgorithm::Ed25519ph).unwrap();
        let sig = signer
            .sign("prod-1", &mut Cursor::new(b"abcdef".to_vec()))
            .unwrap();

        let err = verify(
            &public_key(),
            SigningAlgorithm::Ed25519ph,
            "prod-1",
            &mut Cursor::new(b"abcdeg".to_vec()),
            &sig,
        )
        .unwrap_err();
        assert!(matches!(err, SigningError::Verification));
    }

    #[test]
    fn direct_mode_signs_raw_bytes() {
        let signer = Signer::from_hex(&test_key(), SigningAlgorithm::Ed25519).unwrap();
        let mut artifact = Cursor::new(vec![42u8; 4096]);

        let sig = signer.sign("ignored", &mut artifact).unwrap();
        assert_eq!(artifact.position(), 0);

        verify(&public_key(), SigningAlgorithm::Ed25519, "", &mut artifact, &sig).unwrap();
    }

    #[test]
    fn prehashed_signing_streams_large_artifacts() {
        const LEN: u64 = 100 * 1024 * 1024;
        let signer = Signer::from_hex(&test_key(), SigningAlgorithm::Ed25519ph).unwrap();
        let mut artifact = SyntheticArtifact::new(LEN);
        let stats = artifact.stats();

        let sig = signer.sign("prod-1", &mut artifact).unwrap();

        assert_eq!(stats.bytes(), LEN);
        assert!(stats.largest() <= 64 * 1024, "read {} bytes at once", stats.largest());
        verify(&public_key(), SigningAlgorithm::Ed25519ph, "prod-1", &mut artifact, &sig).unwrap();
    }

    #[test]
    fn short_key_is_rejected() {
        let short = &test_key()[..62];
        let err = Signer::from_hex(short, SigningAlgorithm::Ed25519ph).unwrap_err();
        assert_eq!(
            err.to_string(),
            "bad signing key length (got 31 expected 64)"
        );
    }

    #[test]
    fn non_hex_key_is_rejected() {
        let err = Signer::from_hex("not-hex", SigningAlgorithm::Ed25519ph).unwrap_err();
        assert!(matches!(err, SigningError::KeyDecode(_)));
        assert!(err.to_string().starts_with("bad signing key ("));
    }

    #[test]
    fn mismatched_keypair_is_rejected() {
        let mut bytes = SigningKey::from_bytes(&[7u8; 32]).to_keypair_bytes();
        bytes[32..].copy_from_slice(SigningKey::from_bytes(&[8u8; 32]).verifying_key().as_bytes());

        let err = Signer::from_hex(&hex::encode(bytes), SigningAlgorithm::Ed25519ph).unwrap_err();
        assert!(matches!(err, SigningError::InvalidKey(_)));
    }

    #[test]
    fn key_file_trailing_newline_is_ignored() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut tmp, format!("{}\n", test_key()).as_bytes()).unwrap();

        let source = SigningKeySource::Path(tmp.path().to_path_buf());
        let signer = Signer::from_hex(&source.load().unwrap(), SigningAlgorithm::Ed25519ph);
        assert!(signer.is_ok());
    }

    #[test]
    fn path_wins_over_inline_key() {
        let selected = SigningKeySource::select(
            Some(PathBuf::from("release.key")),
            Some("abcd".to_string()),
        );
        assert_eq!(
            selected,
            Some(SigningKeySource::Path(PathBuf::from("release.key")))
        );
        assert_eq!(
            SigningKeySource::select(None, Some("abcd".to_string())),
            Some(SigningKeySource::Inline("abcd".to_string()))
        );
        assert_eq!(SigningKeySource::select(None, None), None);
    }

    #[test]
    fn missing_key_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let source = SigningKeySource::Path(dir.path().join("missing.key"));
        let err = source.load().unwrap_err();
        assert!(err.to_string().starts_with("signing-key path is not readable ("));
    }

    #[test]
    fn inline_key_is_redacted_in_debug() {
        let source = SigningKeySource::Inline(test_key());
        assert!(!format!("{source:?}").contains(&test_key()));
    }

    #[test]
    fn algorithm_names() {
        assert_eq!(SigningAlgorithm::default(), SigningAlgorithm::Ed25519ph);
        assert_eq!(
            "ed25519".parse::<SigningAlgorithm>().unwrap(),
            SigningAlgorithm::Ed25519
        );
        let err = "rsa".parse::<SigningAlgorithm>().unwrap_err();
        assert_eq!(err.to_string(), "signing algorithm \"rsa\" is not supported");
    }
}
