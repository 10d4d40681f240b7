//! Distinguished names of certificates.
use std::fmt::{self, Write};

use der::asn1::ObjectIdentifier;
use der::Tag;

use crate::decoder::Identifier;
use crate::oid::attribute_name;

/// `UniversalString`, which has no [`Tag`] variant.
const UNIVERSAL_STRING: Identifier = Identifier::universal(28);

/// Value of an attribute in a distinguished name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttributeValue {
    /// Value encoded as one of the ASN.1 string types.
    Text(String),

    /// Value of any other type, or a string that could not be decoded.
    Bytes {
        /// Identifier of the value.
        tag: Identifier,
        /// Raw contents of the value.
        value: Vec<u8>,
    },
}

impl AttributeValue {
    /// Build an attribute value from a DER element.
    #[must_use]
    pub fn from_der(tag: Identifier, value: &[u8]) -> Self {
        let text = match tag.tag() {
            Some(
                Tag::Utf8String
                | Tag::PrintableString
                | Tag::Ia5String
                | Tag::VisibleString
                | Tag::NumericString
                | Tag::TeletexString,
            ) => std::str::from_utf8(value).ok().map(str::to_owned),
            Some(Tag::BmpString) => decode_bmp_string(value),
            None if tag == UNIVERSAL_STRING => decode_universal_string(value),
            _ => None,
        };

        match text {
            Some(text) => Self::Text(text),
            None => Self::Bytes {
                tag,
                value: value.to_vec(),
            },
        }
    }

    /// Value as a string, if it is a text value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Bytes { .. } => None,
        }
    }

    /// Raw bytes of the value.
    ///
    /// For text values, this is the UTF-8 encoding of the text.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(s) => s.as_bytes(),
            Self::Bytes { value, .. } => value,
        }
    }
}

fn decode_bmp_string(value: &[u8]) -> Option<String> {
    if value.len() % 2 != 0 {
        return None;
    }
    let units = value
        .chunks_exact(2)
        .map(|c| u16::from_be_bytes([c[0], c[1]]));
    char::decode_utf16(units).collect::<Result<String, _>>().ok()
}

/// UCS-4, big endian.
fn decode_universal_string(value: &[u8]) -> Option<String> {
    if value.len() % 4 != 0 {
        return None;
    }
    value
        .chunks_exact(4)
        .map(|c| char::from_u32(u32::from_be_bytes([c[0], c[1], c[2], c[3]])))
        .collect()
}

/// Distinguished name of an issuer or a subject.
///
/// All the attributes of all the relative distinguished names are flattened into a single
/// map, keyed by attribute type. The order in which attributes are found is preserved. If an
/// attribute type appears several times, the last value wins, but it keeps the position of the
/// first occurrence.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Name {
    attributes: Vec<(ObjectIdentifier, AttributeValue)>,
}

impl Name {
    /// Insert an attribute, replacing the value of an attribute with the same type.
    ///
    /// The replaced value is returned.
    pub fn insert(
        &mut self,
        oid: ObjectIdentifier,
        value: AttributeValue,
    ) -> Option<AttributeValue> {
        match self.attributes.iter_mut().find(|(k, _)| *k == oid) {
            Some((_, old)) => Some(std::mem::replace(old, value)),
            None => {
                self.attributes.push((oid, value));
                None
            }
        }
    }

    /// Value of an attribute.
    #[must_use]
    pub fn get(&self, oid: &ObjectIdentifier) -> Option<&AttributeValue> {
        self.attributes
            .iter()
            .find_map(|(k, v)| (k == oid).then_some(v))
    }

    /// Iterate over the attributes, in the order in which they were found.
    pub fn iter(&self) -> impl Iterator<Item = (&ObjectIdentifier, &AttributeValue)> {
        self.attributes.iter().map(|(k, v)| (k, v))
    }

    /// Number of distinct attribute types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Returns true if the name has no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

/// Same format as the legacy `X509_NAME_oneline` openssl function:
/// - every attribute is prefixed with '/'
/// - no escaping is done, non printable bytes are written as `\xHH`
impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (oid, value) in &self.attributes {
            match attribute_name(oid) {
                Some(key) => write!(f, "/{key}=")?,
                None => write!(f, "/{oid}=")?,
            }

            match value {
                AttributeValue::Text(s) => {
                    for c in s.chars() {
                        if c.is_control() {
                            write!(f, "\\x{:02X}", u32::from(c))?;
                        } else {
                            f.write_char(c)?;
                        }
                    }
                }
                AttributeValue::Bytes { value, .. } => {
                    for b in value {
                        if *b < b' ' || *b > b'~' {
                            write!(f, "\\x{:02X}", *b)?;
                        } else {
                            f.write_char(char::from(*b))?;
                        }
                    }
                }
            }
        }

        Ok(())
    }
}
