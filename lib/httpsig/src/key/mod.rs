//!
//! Verification keys
//!

use crate::{error::KeyError, Algorithm};
use dsa::{BigUint, VerifyingKey};
use ring::signature::{
    RsaParameters, RsaPublicKeyComponents, UnparsedPublicKey, VerificationAlgorithm,
    ECDSA_P256_SHA256_ASN1, ECDSA_P384_SHA384_ASN1, ED25519,
    RSA_PKCS1_2048_8192_SHA1_FOR_LEGACY_USE_ONLY, RSA_PKCS1_2048_8192_SHA256,
    RSA_PKCS1_2048_8192_SHA512,
};
use sha1::{Digest, Sha1};
use sha2::Sha256;
use signature::DigestVerifier;
use std::fmt;

mod parse;
mod ssh;

/// Length of a raw `r || s` DSA signature as produced by OpenSSH
const SSH_DSS_SIGNATURE_LEN: usize = 40;

/// Elliptic curves usable with ECDSA
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum EcdsaCurve {
    /// NIST P-256 (secp256r1)
    P256,

    /// NIST P-384 (secp384r1)
    P384,
}

impl EcdsaCurve {
    /// The signature algorithm bound to the curve
    #[must_use]
    pub fn algorithm(self) -> Algorithm {
        match self {
            Self::P256 => Algorithm::EcdsaSha256,
            Self::P384 => Algorithm::EcdsaSha384,
        }
    }

    pub(crate) fn ssh_name(self) -> &'static str {
        match self {
            Self::P256 => "nistp256",
            Self::P384 => "nistp384",
        }
    }
}

/// Encoding family of a key
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum KeyFormat {
    /// RSA key from a PKCS#1/SPKI encoding
    Rsa,

    /// RSA key from an OpenSSH `ssh-rsa` blob
    SshRsa,

    /// DSA key from an SPKI encoding
    Dsa,

    /// DSA key from an OpenSSH `ssh-dss` blob
    SshDss,

    /// ECDSA key on the P-256 curve
    EcdsaP256,

    /// ECDSA key on the P-384 curve
    EcdsaP384,

    /// Ed25519 key
    Ed25519,
}

impl KeyFormat {
    /// Algorithms a key of this format can verify
    #[must_use]
    pub fn algorithms(self) -> &'static [Algorithm] {
        match self {
            Self::Rsa => &[Algorithm::RsaSha256, Algorithm::RsaSha512, Algorithm::RsaSha1],
            Self::SshRsa => &[
                Algorithm::RsaSha256,
                Algorithm::RsaSha512,
                Algorithm::RsaSha1,
                Algorithm::SshRsa,
            ],
            Self::Dsa => &[Algorithm::DsaSha256, Algorithm::DsaSha1],
            Self::SshDss => &[Algorithm::DsaSha1, Algorithm::SshDss],
            Self::EcdsaP256 => &[Algorithm::EcdsaSha256],
            Self::EcdsaP384 => &[Algorithm::EcdsaSha384],
            Self::Ed25519 => &[Algorithm::Ed25519],
        }
    }

    #[must_use]
    pub fn supports(self, algorithm: Algorithm) -> bool {
        self.algorithms().contains(&algorithm)
    }
}

#[derive(Clone)]
pub(crate) enum PublicKey {
    /// PKCS#1 `RSAPublicKey` DER
    Rsa(Vec<u8>),

    /// Big-endian modulus and exponent, without leading zeroes
    SshRsa { n: Vec<u8>, e: Vec<u8> },

    Dsa(VerifyingKey),

    SshDss(VerifyingKey),

    /// Uncompressed SEC1 point
    Ecdsa { curve: EcdsaCurve, point: Vec<u8> },

    Ed25519(Vec<u8>),
}

fn rsa_parameters(algorithm: Algorithm) -> Option<&'static RsaParameters> {
    let parameters = match algorithm {
        Algorithm::RsaSha1 | Algorithm::SshRsa => &RSA_PKCS1_2048_8192_SHA1_FOR_LEGACY_USE_ONLY,
        Algorithm::RsaSha256 => &RSA_PKCS1_2048_8192_SHA256,
        Algorithm::RsaSha512 => &RSA_PKCS1_2048_8192_SHA512,
        _ => return None,
    };

    Some(parameters)
}

fn decode_dsa_signature(signature: &[u8], allow_raw: bool) -> Option<dsa::Signature> {
    if allow_raw && signature.len() == SSH_DSS_SIGNATURE_LEN {
        let (r, s) = signature.split_at(SSH_DSS_SIGNATURE_LEN / 2);
        return dsa::Signature::from_components(BigUint::from_bytes_be(r), BigUint::from_bytes_be(s))
            .ok();
    }

    dsa::Signature::try_from(signature).ok()
}

fn verify_dsa(key: &VerifyingKey, algorithm: Algorithm, msg: &[u8], signature: &dsa::Signature) -> bool {
    match algorithm {
        Algorithm::DsaSha1 | Algorithm::SshDss => key
            .verify_digest(Sha1::new_with_prefix(msg), signature)
            .is_ok(),
        Algorithm::DsaSha256 => key
            .verify_digest(Sha256::new_with_prefix(msg), signature)
            .is_ok(),
        _ => false,
    }
}

impl PublicKey {
    fn format(&self) -> KeyFormat {
        match self {
            Self::Rsa(..) => KeyFormat::Rsa,
            Self::SshRsa { .. } => KeyFormat::SshRsa,
            Self::Dsa(..) => KeyFormat::Dsa,
            Self::SshDss(..) => KeyFormat::SshDss,
            Self::Ecdsa {
                curve: EcdsaCurve::P256,
                ..
            } => KeyFormat::EcdsaP256,
            Self::Ecdsa {
                curve: EcdsaCurve::P384,
                ..
            } => KeyFormat::EcdsaP384,
            Self::Ed25519(..) => KeyFormat::Ed25519,
        }
    }

    fn verify(&self, algorithm: Algorithm, msg: &[u8], signature: &[u8]) -> bool {
        if !self.format().supports(algorithm) {
            return false;
        }

        match self {
            Self::Rsa(der) => {
                let Some(parameters) = rsa_parameters(algorithm) else {
                    return false;
                };

                UnparsedPublicKey::new(parameters, der)
                    .verify(msg, signature)
                    .is_ok()
            }
            Self::SshRsa { n, e } => {
                let Some(parameters) = rsa_parameters(algorithm) else {
                    return false;
                };

                RsaPublicKeyComponents { n, e }
                    .verify(parameters, msg, signature)
                    .is_ok()
            }
            Self::Dsa(key) => decode_dsa_signature(signature, false)
                .is_some_and(|signature| verify_dsa(key, algorithm, msg, &signature)),
            Self::SshDss(key) => decode_dsa_signature(signature, true)
                .is_some_and(|signature| verify_dsa(key, algorithm, msg, &signature)),
            Self::Ecdsa { curve, point } => {
                let verify_algo: &'static dyn VerificationAlgorithm = match curve {
                    EcdsaCurve::P256 => &ECDSA_P256_SHA256_ASN1,
                    EcdsaCurve::P384 => &ECDSA_P384_SHA384_ASN1,
                };

                UnparsedPublicKey::new(verify_algo, point)
                    .verify(msg, signature)
                    .is_ok()
            }
            Self::Ed25519(raw) => UnparsedPublicKey::new(&ED25519, raw)
                .verify(msg, signature)
                .is_ok(),
        }
    }
}

/// Public key registered under a key ID
#[derive(Clone)]
pub struct Key {
    id: String,
    public_key: PublicKey,
}

impl Key {
    fn new(id: impl Into<String>, public_key: PublicKey) -> Self {
        Self {
            id: id.into(),
            public_key,
        }
    }

    /// RSA key from its PKCS#1 `RSAPublicKey` DER encoding
    #[must_use]
    pub fn rsa(id: impl Into<String>, pkcs1_der: Vec<u8>) -> Self {
        Self::new(id, PublicKey::Rsa(pkcs1_der))
    }

    /// ECDSA key from its uncompressed SEC1 point encoding
    #[must_use]
    pub fn ecdsa(id: impl Into<String>, curve: EcdsaCurve, point: Vec<u8>) -> Self {
        Self::new(id, PublicKey::Ecdsa { curve, point })
    }

    /// Ed25519 key from its raw 32 byte encoding
    #[must_use]
    pub fn ed25519(id: impl Into<String>, raw: Vec<u8>) -> Self {
        Self::new(id, PublicKey::Ed25519(raw))
    }

    #[must_use]
    pub fn dsa(id: impl Into<String>, key: VerifyingKey) -> Self {
        Self::new(id, PublicKey::Dsa(key))
    }

    /// Decode a DER encoded SubjectPublicKeyInfo
    pub fn from_public_key_der(id: impl Into<String>, der: &[u8]) -> Result<Self, KeyError> {
        Ok(Self::new(id, parse::public_key_der(der)?))
    }

    /// Decode a PEM encoded SubjectPublicKeyInfo (`-----BEGIN PUBLIC KEY-----`)
    pub fn from_public_key_pem(id: impl Into<String>, pem: &str) -> Result<Self, KeyError> {
        Ok(Self::new(id, parse::public_key_pem(pem)?))
    }

    /// Decode the binary blob of an OpenSSH public key
    pub fn from_ssh_public_key(id: impl Into<String>, blob: &[u8]) -> Result<Self, KeyError> {
        Ok(Self::new(id, ssh::decode(blob)?))
    }

    /// Decode a line of an `authorized_keys` file
    ///
    /// The comment of the line is ignored, the key ID has to be supplied separately
    pub fn from_authorized_key(id: impl Into<String>, line: &str) -> Result<Self, KeyError> {
        Ok(Self::new(id, ssh::decode_line(line)?))
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn format(&self) -> KeyFormat {
        self.public_key.format()
    }

    /// Algorithms this key can verify
    #[must_use]
    pub fn algorithms(&self) -> &'static [Algorithm] {
        self.format().algorithms()
    }

    #[must_use]
    pub fn supports(&self, algorithm: Algorithm) -> bool {
        self.format().supports(algorithm)
    }

    /// Verify the signature over the content
    ///
    /// Any failure (unsupported algorithm, malformed signature, mismatch) yields `false`
    #[must_use]
    pub fn verify(&self, algorithm: Algorithm, content: &[u8], signature: &[u8]) -> bool {
        self.public_key.verify(algorithm, content, signature)
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Key")
            .field("id", &self.id)
            .field("format", &self.format())
            .finish_non_exhaustive()
    }
}
