//!
//! Decode public keys from their SubjectPublicKeyInfo (X.509) encoding
//!

use super::{EcdsaCurve, PublicKey};
use crate::error::KeyError;
use const_oid::db::{
    rfc5912::{ID_DSA, ID_EC_PUBLIC_KEY, RSA_ENCRYPTION, SECP_256_R_1, SECP_384_R_1},
    rfc8410::ID_ED_25519,
};
use pkcs8::{der::Decode, DecodePublicKey, Document, SubjectPublicKeyInfoRef};

/// Decode a DER encoded SubjectPublicKeyInfo structure
///
/// Currently supported algorithms:
///
/// - RSA
/// - DSA
/// - ECDSA (P-256 and P-384)
/// - Ed25519
pub fn public_key_der(der: &[u8]) -> Result<PublicKey, KeyError> {
    let spki = SubjectPublicKeyInfoRef::from_der(der)?;
    let oid = spki.algorithm.oid;

    if oid == ID_DSA {
        // The DSA domain parameters live in the algorithm parameters, let the `dsa` crate sort them out
        return Ok(PublicKey::Dsa(dsa::VerifyingKey::from_public_key_der(der)?));
    }

    let raw_bytes = spki
        .subject_public_key
        .as_bytes()
        .ok_or(KeyError::MalformedKey)?
        .to_vec();

    let public_key = if oid == RSA_ENCRYPTION {
        PublicKey::Rsa(raw_bytes)
    } else if oid == ID_EC_PUBLIC_KEY {
        let curve = spki.algorithm.parameters_oid()?;
        let curve = if curve == SECP_256_R_1 {
            EcdsaCurve::P256
        } else if curve == SECP_384_R_1 {
            EcdsaCurve::P384
        } else {
            return Err(KeyError::UnsupportedCurve);
        };

        PublicKey::Ecdsa {
            curve,
            point: raw_bytes,
        }
    } else if oid == ID_ED_25519 {
        PublicKey::Ed25519(raw_bytes)
    } else {
        return Err(KeyError::UnknownKeyType);
    };

    Ok(public_key)
}

/// Decode a PEM encoded SubjectPublicKeyInfo structure (`-----BEGIN PUBLIC KEY-----`)
pub fn public_key_pem(pem: &str) -> Result<PublicKey, KeyError> {
    let (_pem_tag, document) = Document::from_pem(pem)?;
    public_key_der(document.as_bytes())
}
