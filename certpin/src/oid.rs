//! Names of object identifiers found in certificates.
//!
//! Those are only used to display certificates: parsing never depends on them.
use const_oid::db::{rfc3280, rfc4519, rfc5912, DB};
use der::asn1::ObjectIdentifier;

/// Name of a signature or public key algorithm, in the openssl naming style.
///
/// Other algorithms fall back to the name from the [`const_oid`] database, if any.
#[must_use]
pub fn algorithm_name(oid: &ObjectIdentifier) -> Option<&'static str> {
    match *oid {
        rfc5912::RSA_ENCRYPTION => Some("rsaEncryption"),
        rfc5912::ID_EC_PUBLIC_KEY => Some("id-ecPublicKey"),
        rfc5912::SHA_1_WITH_RSA_ENCRYPTION => Some("sha1WithRSAEncryption"),
        rfc5912::SHA_256_WITH_RSA_ENCRYPTION => Some("sha256WithRSAEncryption"),
        rfc5912::SHA_384_WITH_RSA_ENCRYPTION => Some("sha384WithRSAEncryption"),
        rfc5912::SHA_512_WITH_RSA_ENCRYPTION => Some("sha512WithRSAEncryption"),
        rfc5912::ECDSA_WITH_SHA_256 => Some("ecdsa-with-SHA256"),
        rfc5912::ECDSA_WITH_SHA_384 => Some("ecdsa-with-SHA384"),
        rfc5912::ECDSA_WITH_SHA_512 => Some("ecdsa-with-SHA512"),
        _ => DB.by_oid(oid),
    }
}

/// Short name of an attribute type used in distinguished names.
///
/// Other types fall back to the name from the [`const_oid`] database, if any.
#[must_use]
pub fn attribute_name(oid: &ObjectIdentifier) -> Option<&'static str> {
    match *oid {
        rfc4519::C => Some("C"),
        rfc4519::CN => Some("CN"),
        rfc4519::L => Some("L"),
        rfc4519::O => Some("O"),
        rfc4519::OU => Some("OU"),
        rfc4519::ST => Some("ST"),
        rfc3280::EMAIL => Some("emailAddress"),
        _ => DB.by_oid(oid),
    }
}
