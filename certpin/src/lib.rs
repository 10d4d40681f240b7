//! **certpin** extracts the subject public key of X.509 certificates and fingerprints it, to
//! pin the key of a server.
//!
//! The certificate is only parsed structurally: no signature, date or extension is checked.
//! The fingerprint is the SHA-256 digest of the raw subject public key, rendered as lowercase
//! hexadecimal.
//!
//! ```
//! let der = std::fs::read("tests/assets/ec.der")?;
//!
//! let cert = certpin::parse(&der)?;
//! assert_eq!(cert.version, 2);
//! assert_eq!(cert.subject.to_string(), "/O=Pinning Test/CN=ec.example.test");
//!
//! assert_eq!(
//!     certpin::fingerprint(&der)?,
//!     "fb88cf46e22541792f91adc1c77482013db2514af7d40160db6dc587bf8fe3cb",
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! The certificate of a remote server can be retrieved with [`fetch::fingerprint_for_url`],
//! which relies on a [`fetch::HttpsClient`] to do the network part.

pub mod decoder;
pub mod fetch;
pub mod fingerprint;
pub use fingerprint::{extract_public_key, fingerprint};
pub mod oid;
pub mod x509;
pub use x509::{parse, MalformedCertificate, ParsedCertificate};

#[cfg(test)]
mod test_helpers;
