//!
//! OpenSSH public key wire format (RFC 4253, section 6.6)
//!

use super::{EcdsaCurve, PublicKey};
use crate::error::KeyError;
use dsa::{BigUint, Components, VerifyingKey};

const SSH_RSA: &str = "ssh-rsa";
const SSH_DSS: &str = "ssh-dss";
const SSH_ED25519: &str = "ssh-ed25519";
const ECDSA_NISTP256: &str = "ecdsa-sha2-nistp256";
const ECDSA_NISTP384: &str = "ecdsa-sha2-nistp384";

const KEY_TYPES: &[&str] = &[SSH_RSA, SSH_DSS, SSH_ED25519, ECDSA_NISTP256, ECDSA_NISTP384];

struct Reader<'a> {
    buf: &'a [u8],
}

impl<'a> Reader<'a> {
    fn take(&mut self, len: usize) -> Result<&'a [u8], KeyError> {
        if self.buf.len() < len {
            return Err(KeyError::MalformedKey);
        }

        let (head, tail) = self.buf.split_at(len);
        self.buf = tail;
        Ok(head)
    }

    fn read_u32(&mut self) -> Result<u32, KeyError> {
        let bytes = self.take(4)?;
        let mut buf = [0; 4];
        buf.copy_from_slice(bytes);
        Ok(u32::from_be_bytes(buf))
    }

    fn read_string(&mut self) -> Result<&'a [u8], KeyError> {
        let len = self.read_u32()?;
        let len = usize::try_from(len).map_err(|_| KeyError::MalformedKey)?;
        self.take(len)
    }

    /// Read a non-negative multiple precision integer, stripped of its leading zero bytes
    fn read_mpint(&mut self) -> Result<&'a [u8], KeyError> {
        let value = self.read_string()?;
        if value.first().is_some_and(|byte| byte & 0x80 != 0) {
            return Err(KeyError::MalformedKey);
        }

        let start = value
            .iter()
            .position(|byte| *byte != 0)
            .unwrap_or(value.len());

        Ok(&value[start..])
    }

    fn read_biguint(&mut self) -> Result<BigUint, KeyError> {
        self.read_mpint().map(BigUint::from_bytes_be)
    }

    fn finish(self) -> Result<(), KeyError> {
        if self.buf.is_empty() {
            Ok(())
        } else {
            Err(KeyError::MalformedKey)
        }
    }
}

fn read_dsa(reader: &mut Reader<'_>) -> Result<VerifyingKey, KeyError> {
    let p = reader.read_biguint()?;
    let q = reader.read_biguint()?;
    let g = reader.read_biguint()?;
    let y = reader.read_biguint()?;

    let components = Components::from_components(p, q, g).map_err(|_| KeyError::InvalidDsaKey)?;
    VerifyingKey::from_components(components, y).map_err(|_| KeyError::InvalidDsaKey)
}

fn read_ecdsa(reader: &mut Reader<'_>, curve: EcdsaCurve) -> Result<PublicKey, KeyError> {
    let curve_name = reader.read_string()?;
    if curve_name != curve.ssh_name().as_bytes() {
        return Err(KeyError::MalformedKey);
    }

    let point = reader.read_string()?.to_vec();
    Ok(PublicKey::Ecdsa { curve, point })
}

/// Decode the binary blob of an OpenSSH public key
pub fn decode(blob: &[u8]) -> Result<PublicKey, KeyError> {
    let mut reader = Reader { buf: blob };
    let key_type = reader.read_string()?;

    let public_key = match key_type {
        ty if ty == SSH_RSA.as_bytes() => {
            let e = reader.read_mpint()?.to_vec();
            let n = reader.read_mpint()?.to_vec();
            PublicKey::SshRsa { n, e }
        }
        ty if ty == SSH_DSS.as_bytes() => PublicKey::SshDss(read_dsa(&mut reader)?),
        ty if ty == SSH_ED25519.as_bytes() => PublicKey::Ed25519(reader.read_string()?.to_vec()),
        ty if ty == ECDSA_NISTP256.as_bytes() => read_ecdsa(&mut reader, EcdsaCurve::P256)?,
        ty if ty == ECDSA_NISTP384.as_bytes() => read_ecdsa(&mut reader, EcdsaCurve::P384)?,
        _ => return Err(KeyError::UnknownKeyType),
    };

    reader.finish()?;

    Ok(public_key)
}

/// Decode a single line in the `authorized_keys` format
///
/// ```text
/// [options] ssh-rsa AAAAB3NzaC1yc2E... [comment]
/// ```
pub fn decode_line(line: &str) -> Result<PublicKey, KeyError> {
    let mut tokens = line.split_whitespace();
    let key_type = tokens
        .find(|token| KEY_TYPES.contains(token))
        .ok_or(KeyError::UnknownKeyType)?;
    let encoded = tokens.next().ok_or(KeyError::MalformedKey)?;

    let blob = base64_simd::STANDARD.decode_to_vec(encoded)?;

    // The key type in front of the blob has to agree with the one inside of it
    let mut reader = Reader { buf: &blob };
    if reader.read_string()? != key_type.as_bytes() {
        return Err(KeyError::MalformedKey);
    }

    decode(&blob)
}
