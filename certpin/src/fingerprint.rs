//! Fingerprint of the public key of a certificate.
//!
//! The fingerprint is the digest of the raw subject public key, that is the contents of the
//! `subjectPublicKey` bit string, rendered as lowercase hexadecimal. It is **not** the digest
//! of the whole `SubjectPublicKeyInfo` structure, which is what HPKP style pins use.
use sha2::{Digest, Sha256};

use crate::x509::{self, MalformedCertificate, ParsedCertificate};

/// Extract the raw subject public key of a parsed certificate.
#[must_use]
pub fn extract_public_key(cert: &ParsedCertificate) -> &[u8] {
    cert.public_key()
}

/// SHA-256 fingerprint of the public key of a DER encoded certificate.
///
/// The result is 64 lowercase hexadecimal characters.
///
/// # Errors
///
/// Fails if the certificate cannot be parsed.
pub fn fingerprint(der: &[u8]) -> Result<String, MalformedCertificate> {
    fingerprint_with::<Sha256>(der)
}

/// Fingerprint of the public key of a DER encoded certificate, using the digest `D`.
///
/// # Errors
///
/// Fails if the certificate cannot be parsed.
pub fn fingerprint_with<D: Digest>(der: &[u8]) -> Result<String, MalformedCertificate> {
    let cert = x509::parse(der)?;
    Ok(hex::encode(D::digest(extract_public_key(&cert))))
}

/// SHA-256 fingerprint of the public key of an already parsed certificate.
#[must_use]
pub fn public_key_hash(cert: &ParsedCertificate) -> String {
    hex::encode(Sha256::digest(extract_public_key(cert)))
}
