//! Errors related to the parsing of certificates.
use std::fmt;

use der::Tag;

use crate::decoder::{DecodeError, Identifier};

/// Part of the certificate being parsed when an error occurred.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Field {
    /// The outer `Certificate` sequence.
    Envelope,
    /// The `tbsCertificate` sequence.
    TbsCertificate,
    /// The `version` field.
    Version,
    /// The `serialNumber` field.
    SerialNumber,
    /// The `signature` algorithm identifier inside the `tbsCertificate`.
    Signature,
    /// The `issuer` name.
    Issuer,
    /// The `validity` period.
    Validity,
    /// The `subject` name.
    Subject,
    /// The `subjectPublicKeyInfo` field.
    SubjectPublicKeyInfo,
    /// The optional fields following the `subjectPublicKeyInfo`.
    Extensions,
    /// The outer `signatureAlgorithm` field.
    SignatureAlgorithm,
    /// The outer `signatureValue` field.
    SignatureValue,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Envelope => "certificate",
            Self::TbsCertificate => "tbsCertificate",
            Self::Version => "version",
            Self::SerialNumber => "serialNumber",
            Self::Signature => "signature",
            Self::Issuer => "issuer",
            Self::Validity => "validity",
            Self::Subject => "subject",
            Self::SubjectPublicKeyInfo => "subjectPublicKeyInfo",
            Self::Extensions => "extensions",
            Self::SignatureAlgorithm => "signatureAlgorithm",
            Self::SignatureValue => "signatureValue",
        })
    }
}

/// Reason a certificate was rejected.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Malformation {
    /// The DER elements could not be walked.
    Decode(DecodeError),

    /// An element does not have the tag required by the X.509 schema.
    UnexpectedTag {
        /// Tag required by the schema.
        expected: Tag,
        /// Identifier found in the certificate.
        found: Identifier,
    },

    /// An element has the right tag but its value is invalid.
    InvalidValue(&'static str),

    /// An element was found after the last field of a structure with a fixed number of fields.
    TrailingElement(Identifier),
}

impl From<DecodeError> for Malformation {
    fn from(err: DecodeError) -> Self {
        Self::Decode(err)
    }
}

impl fmt::Display for Malformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode(err) => write!(f, "{err}"),
            Self::UnexpectedTag { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
            Self::InvalidValue(reason) => write!(f, "invalid value: {reason}"),
            Self::TrailingElement(tag) => write!(f, "unexpected trailing element {tag}"),
        }
    }
}

/// The certificate does not follow the X.509 structure.
///
/// No partial certificate is ever returned along with this error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MalformedCertificate {
    field: Field,
    cause: Malformation,
}

impl MalformedCertificate {
    pub(crate) fn new(field: Field, cause: Malformation) -> Self {
        Self { field, cause }
    }

    /// Field that was being parsed.
    #[must_use]
    pub fn field(&self) -> Field {
        self.field
    }

    /// What was wrong with this field.
    #[must_use]
    pub fn cause(&self) -> &Malformation {
        &self.cause
    }
}

impl fmt::Display for MalformedCertificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed certificate, in {}: {}", self.field, self.cause)
    }
}

impl std::error::Error for MalformedCertificate {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.cause {
            Malformation::Decode(err) => Some(err),
            _ => None,
        }
    }
}

/// Attach the field being parsed to an error.
pub(crate) trait InField<T> {
    fn in_field(self, field: Field) -> Result<T, MalformedCertificate>;
}

impl<T, E: Into<Malformation>> InField<T> for Result<T, E> {
    fn in_field(self, field: Field) -> Result<T, MalformedCertificate> {
        self.map_err(|err| MalformedCertificate::new(field, err.into()))
    }
}
