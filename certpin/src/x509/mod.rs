//! Parsing of X.509 certificates.
//!
//! Only the structure of the certificate is parsed, following [RFC 5280 Section 4.1]:
//!
//! ```text
//! Certificate  ::=  SEQUENCE  {
//!     tbsCertificate       TBSCertificate,
//!     signatureAlgorithm   AlgorithmIdentifier,
//!     signature            BIT STRING
//! }
//!
//! TBSCertificate  ::=  SEQUENCE  {
//!     version         [0]  EXPLICIT Version DEFAULT v1,
//!     serialNumber         CertificateSerialNumber,
//!     signature            AlgorithmIdentifier,
//!     issuer               Name,
//!     validity             Validity,
//!     subject              Name,
//!     subjectPublicKeyInfo SubjectPublicKeyInfo,
//!     issuerUniqueID  [1]  IMPLICIT UniqueIdentifier OPTIONAL,
//!     subjectUniqueID [2]  IMPLICIT UniqueIdentifier OPTIONAL,
//!     extensions      [3]  Extensions OPTIONAL
//! }
//! ```
//!
//! Nothing is verified: not the signature, not the validity period, not the extensions. The
//! optional fields following the subject public key are kept as raw elements.
//!
//! [RFC 5280 Section 4.1]: https://datatracker.ietf.org/doc/html/rfc5280#section-4.1
use std::fmt;

use der::asn1::ObjectIdentifier;
use der::{Tag, TagNumber};
use num_bigint::BigInt;

use crate::decoder::{Decoder, Identifier, Tlv};

mod error;
pub use error::{Field, Malformation, MalformedCertificate};
use error::InField;
mod name;
pub use name::{AttributeValue, Name};

const VERSION_TAG: Tag = Tag::ContextSpecific {
    constructed: true,
    number: TagNumber::N0,
};

/// DER element kept unparsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TlvElement {
    /// Identifier of the element.
    pub tag: Identifier,

    /// Contents of the element, without its tag and length.
    pub value: Vec<u8>,
}

impl From<Tlv<'_>> for TlvElement {
    fn from(tlv: Tlv<'_>) -> Self {
        Self {
            tag: tlv.tag,
            value: tlv.value.to_vec(),
        }
    }
}

/// X.509 `AlgorithmIdentifier`.
///
/// ```text
/// AlgorithmIdentifier  ::=  SEQUENCE  {
///      algorithm               OBJECT IDENTIFIER,
///      parameters              ANY DEFINED BY algorithm OPTIONAL  }
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlgorithmIdentifier {
    /// Algorithm OID.
    pub oid: ObjectIdentifier,

    /// Algorithm parameters, if the identifier has any.
    ///
    /// Note that a `NULL` parameter is present: it is an element with an empty value.
    pub parameters: Option<TlvElement>,
}

impl fmt::Display for AlgorithmIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match crate::oid::algorithm_name(&self.oid) {
            Some(name) => write!(f, "{name}"),
            None => write!(f, "{}", self.oid),
        }
    }
}

/// Encoding of a [`Time`] value.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TimeKind {
    /// `UTCTime`, with a 2-digit year: `YYMMDDhhmmssZ`.
    Utc,
    /// `GeneralizedTime`, with a 4-digit year: `YYYYMMDDhhmmssZ`.
    Generalized,
}

/// Time value of a validity period, left as it is encoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Time {
    /// Encoding used.
    pub kind: TimeKind,

    /// Encoded value, for example `261016130835Z`.
    pub raw: String,
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// X.509 `Validity`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Validity {
    /// `notBefore` value.
    pub not_before: Time,

    /// `notAfter` value.
    pub not_after: Time,
}

/// X.509 `SubjectPublicKeyInfo`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubjectPublicKeyInfo {
    /// OID of the type of key, for example `rsaEncryption` or `id-ecPublicKey`.
    pub algorithm: ObjectIdentifier,

    /// Contents of the `subjectPublicKey` bit string.
    ///
    /// This is not decoded any further: for an RSA key, this is the DER encoding of the
    /// modulus and exponent, for an EC key this is the encoded point.
    pub key: Vec<u8>,
}

/// A parsed X.509 certificate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedCertificate {
    /// Encoded version: 0 for v1, 2 for v3.
    pub version: u8,

    /// Serial number.
    pub serial_number: BigInt,

    /// Algorithm used by the issuer to sign the certificate, from the `tbsCertificate`.
    pub signature: AlgorithmIdentifier,

    /// Issuer name.
    pub issuer: Name,

    /// Validity period.
    pub validity: Validity,

    /// Subject name.
    pub subject: Name,

    /// Public key of the subject.
    pub subject_public_key_info: SubjectPublicKeyInfo,

    /// Fields following the `subjectPublicKeyInfo`, in order: unique identifiers and
    /// extensions.
    pub optional_fields: Vec<TlvElement>,

    /// Algorithm used by the issuer to sign the certificate.
    pub signature_algorithm: AlgorithmIdentifier,

    /// Contents of the signature bit string.
    pub signature_value: Vec<u8>,
}

impl ParsedCertificate {
    /// Raw bytes of the subject public key.
    #[must_use]
    pub fn public_key(&self) -> &[u8] {
        &self.subject_public_key_info.key
    }

    /// Returns true if the issuer and subject names are the same.
    #[must_use]
    pub fn is_self_issued(&self) -> bool {
        self.issuer == self.subject
    }
}

/// Parse a DER encoded X.509 certificate.
///
/// Bytes following the certificate are ignored.
///
/// # Errors
///
/// Returns an error if the bytes do not follow the structure of a certificate. The error
/// indicates which field could not be parsed.
pub fn parse(der: &[u8]) -> Result<ParsedCertificate, MalformedCertificate> {
    let mut d = Decoder::new(der);

    // Certificate
    let tag = d.enter().in_field(Field::Envelope)?;
    check_tag(tag, Tag::Sequence).in_field(Field::Envelope)?;
    let tbs = d.read().in_field(Field::TbsCertificate)?;
    let raw_signature_algorithm = d.read().in_field(Field::SignatureAlgorithm)?;
    let raw_signature_value = d.read().in_field(Field::SignatureValue)?;
    if !d.eof() {
        let tag = d.peek().in_field(Field::Envelope)?;
        return Err(Malformation::TrailingElement(tag)).in_field(Field::Envelope);
    }
    d.leave().in_field(Field::Envelope)?;
    if !d.eof() {
        tracing::debug!("ignoring trailing bytes after the certificate");
    }
    check_tag(tbs.tag, Tag::Sequence).in_field(Field::TbsCertificate)?;

    // TBSCertificate
    d.start(tbs.value);
    let first = d.read().in_field(Field::Version)?;
    let (raw_version, raw_serial_number) = if first.tag == VERSION_TAG {
        (Some(first), d.read().in_field(Field::SerialNumber)?)
    } else {
        (None, first)
    };
    let raw_signature = d.read().in_field(Field::Signature)?;
    let raw_issuer = d.read().in_field(Field::Issuer)?;
    let raw_validity = d.read().in_field(Field::Validity)?;
    let raw_subject = d.read().in_field(Field::Subject)?;
    let raw_subject_public_key_info = d.read().in_field(Field::SubjectPublicKeyInfo)?;
    let mut optional_fields = Vec::new();
    while !d.eof() {
        optional_fields.push(d.read().in_field(Field::Extensions)?.into());
    }

    let version = match raw_version {
        Some(raw) => parse_version(&mut d, raw).in_field(Field::Version)?,
        // DEFAULT v1
        None => 0,
    };
    let serial_number = parse_serial_number(raw_serial_number).in_field(Field::SerialNumber)?;
    let signature = parse_algorithm_identifier(&mut d, raw_signature).in_field(Field::Signature)?;
    let issuer = parse_name(&mut d, raw_issuer).in_field(Field::Issuer)?;
    let validity = parse_validity(&mut d, raw_validity).in_field(Field::Validity)?;
    let subject = parse_name(&mut d, raw_subject).in_field(Field::Subject)?;
    let subject_public_key_info =
        parse_subject_public_key_info(&mut d, raw_subject_public_key_info)
            .in_field(Field::SubjectPublicKeyInfo)?;
    let signature_algorithm = parse_algorithm_identifier(&mut d, raw_signature_algorithm)
        .in_field(Field::SignatureAlgorithm)?;
    let signature_value = parse_bit_string(raw_signature_value).in_field(Field::SignatureValue)?;

    tracing::debug!(
        version,
        serial_number = %serial_number,
        issuer = %issuer,
        subject = %subject,
        optional_fields = optional_fields.len(),
        "parsed certificate"
    );

    Ok(ParsedCertificate {
        version,
        serial_number,
        signature,
        issuer,
        validity,
        subject,
        subject_public_key_info,
        optional_fields,
        signature_algorithm,
        signature_value,
    })
}

fn check_tag(found: Identifier, expected: Tag) -> Result<(), Malformation> {
    if found == expected {
        Ok(())
    } else {
        Err(Malformation::UnexpectedTag { expected, found })
    }
}

fn expect_value(tlv: Tlv<'_>, expected: Tag) -> Result<&[u8], Malformation> {
    check_tag(tlv.tag, expected)?;
    Ok(tlv.value)
}

/// `[0] EXPLICIT INTEGER`
fn parse_version<'a>(d: &mut Decoder<'a>, raw: Tlv<'a>) -> Result<u8, Malformation> {
    d.start(raw.value);
    let value = expect_value(d.read()?, Tag::Integer)?;
    match value {
        [v] if *v <= 0x7F => Ok(*v),
        _ => Err(Malformation::InvalidValue("unsupported version")),
    }
}

fn parse_serial_number(raw: Tlv<'_>) -> Result<BigInt, Malformation> {
    let value = expect_value(raw, Tag::Integer)?;
    if value.is_empty() {
        return Err(Malformation::InvalidValue("empty integer"));
    }
    Ok(BigInt::from_signed_bytes_be(value))
}

fn parse_oid(raw: Tlv<'_>) -> Result<ObjectIdentifier, Malformation> {
    let value = expect_value(raw, Tag::ObjectIdentifier)?;
    ObjectIdentifier::from_bytes(value).map_err(|_| Malformation::InvalidValue("object identifier"))
}

/// Contents of a bit string, without the leading "unused bits" byte.
fn parse_bit_string(raw: Tlv<'_>) -> Result<Vec<u8>, Malformation> {
    let value = expect_value(raw, Tag::BitString)?;
    match value.split_first() {
        Some((0, bits)) => Ok(bits.to_vec()),
        Some(_) => Err(Malformation::InvalidValue("bit string with unused bits")),
        None => Err(Malformation::InvalidValue("empty bit string")),
    }
}

fn parse_algorithm_identifier<'a>(
    d: &mut Decoder<'a>,
    raw: Tlv<'a>,
) -> Result<AlgorithmIdentifier, Malformation> {
    d.start(expect_value(raw, Tag::Sequence)?);
    let oid = parse_oid(d.read()?)?;
    let parameters = if d.eof() {
        None
    } else {
        Some(d.read()?.into())
    };

    Ok(AlgorithmIdentifier { oid, parameters })
}

/// `SEQUENCE OF SET OF SEQUENCE { type OBJECT IDENTIFIER, value ANY }`
fn parse_name<'a>(d: &mut Decoder<'a>, raw: Tlv<'a>) -> Result<Name, Malformation> {
    d.start(expect_value(raw, Tag::Sequence)?);

    let mut name = Name::default();
    while !d.eof() {
        check_tag(d.enter()?, Tag::Set)?;
        while !d.eof() {
            check_tag(d.enter()?, Tag::Sequence)?;
            let oid = parse_oid(d.read()?)?;
            let value = d.read()?;
            d.leave()?;

            if let Some(old) = name.insert(oid, AttributeValue::from_der(value.tag, value.value)) {
                tracing::debug!(%oid, ?old, "duplicated attribute in name, keeping the last one");
            }
        }
        d.leave()?;
    }

    Ok(name)
}

fn parse_time(raw: Tlv<'_>) -> Result<Time, Malformation> {
    let kind = match raw.tag.tag() {
        Some(Tag::UtcTime) => TimeKind::Utc,
        Some(Tag::GeneralizedTime) => TimeKind::Generalized,
        _ => {
            return Err(Malformation::UnexpectedTag {
                expected: Tag::UtcTime,
                found: raw.tag,
            })
        }
    };
    let raw = std::str::from_utf8(raw.value)
        .ok()
        .filter(|s| s.is_ascii())
        .ok_or(Malformation::InvalidValue("time is not ascii"))?;

    Ok(Time {
        kind,
        raw: raw.to_owned(),
    })
}

fn parse_validity<'a>(d: &mut Decoder<'a>, raw: Tlv<'a>) -> Result<Validity, Malformation> {
    d.start(expect_value(raw, Tag::Sequence)?);
    let not_before = parse_time(d.read()?)?;
    let not_after = parse_time(d.read()?)?;

    Ok(Validity {
        not_before,
        not_after,
    })
}

/// The parameters of the key algorithm are not kept.
fn parse_subject_public_key_info<'a>(
    d: &mut Decoder<'a>,
    raw: Tlv<'a>,
) -> Result<SubjectPublicKeyInfo, Malformation> {
    d.start(expect_value(raw, Tag::Sequence)?);
    let raw_algorithm = d.read()?;
    let raw_key = d.read()?;

    let key = parse_bit_string(raw_key)?;
    let AlgorithmIdentifier { oid, .. } = parse_algorithm_identifier(d, raw_algorithm)?;

    Ok(SubjectPublicKeyInfo {
        algorithm: oid,
        key,
    })
}
