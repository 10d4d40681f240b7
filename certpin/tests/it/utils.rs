use der::asn1::ObjectIdentifier;
use der::{Encode, Header, Length, Tag, TagNumber};

pub const RSA_HASH: &str = "fc1dbdd1e94f2c2f5777f66a896821f995a0ef32045ea0415ba6ecce03d9f858";
pub const EC_HASH: &str = "fb88cf46e22541792f91adc1c77482013db2514af7d40160db6dc587bf8fe3cb";

pub const OID_CN: &str = "2.5.4.3";
pub const OID_O: &str = "2.5.4.10";
pub const OID_OU: &str = "2.5.4.11";
pub const OID_EC_PUBLIC_KEY: &str = "1.2.840.10045.2.1";
pub const OID_PRIME256V1: &str = "1.2.840.10045.3.1.7";
pub const OID_ECDSA_SHA256: &str = "1.2.840.10045.4.3.2";
pub const OID_SHA256_RSA: &str = "1.2.840.113549.1.1.11";

pub fn asset(name: &str) -> Vec<u8> {
    let path = format!("{}/tests/assets/{name}", env!("CARGO_MANIFEST_DIR"));
    std::fs::read(&path).unwrap_or_else(|e| panic!("cannot read {path}: {e}"))
}

pub fn assets() -> Vec<(&'static str, Vec<u8>)> {
    ["rsa.der", "ec.der", "v1.der"]
        .into_iter()
        .map(|name| (name, asset(name)))
        .collect()
}

/// Encode an element with a raw identifier octet.
///
/// Used for elements without a [`Tag`] in `der`, and for malformed ones.
pub fn tlv(identifier: u8, contents: &[u8]) -> Vec<u8> {
    let mut out = vec![identifier];
    Length::try_from(contents.len())
        .unwrap()
        .encode_to_vec(&mut out)
        .unwrap();
    out.extend_from_slice(contents);
    out
}

/// Encode an element of a type known to `der`.
pub fn element(tag: Tag, contents: &[u8]) -> Vec<u8> {
    let mut out = Header::new(tag, contents.len()).unwrap().to_der().unwrap();
    out.extend_from_slice(contents);
    out
}

pub fn context_specific(number: TagNumber, constructed: bool, contents: &[u8]) -> Vec<u8> {
    element(
        Tag::ContextSpecific {
            constructed,
            number,
        },
        contents,
    )
}

pub fn seq(parts: &[&[u8]]) -> Vec<u8> {
    element(Tag::Sequence, &parts.concat())
}

pub fn set(parts: &[&[u8]]) -> Vec<u8> {
    element(Tag::Set, &parts.concat())
}

pub fn integer(value: &[u8]) -> Vec<u8> {
    element(Tag::Integer, value)
}

pub fn oid(oid: &str) -> Vec<u8> {
    ObjectIdentifier::new_unwrap(oid).to_der().unwrap()
}

pub fn bit_string(bits: &[u8]) -> Vec<u8> {
    let mut contents = vec![0];
    contents.extend_from_slice(bits);
    element(Tag::BitString, &contents)
}

pub fn utf8(value: &str) -> Vec<u8> {
    element(Tag::Utf8String, value.as_bytes())
}

pub fn algorithm(algo: &str, parameters: Option<&[u8]>) -> Vec<u8> {
    seq(&[&oid(algo), parameters.unwrap_or_default()])
}

pub fn attribute(attr: &str, value: &[u8]) -> Vec<u8> {
    seq(&[&oid(attr), value])
}

/// Name with one attribute per relative distinguished name.
pub fn name(attributes: &[(&str, &str)]) -> Vec<u8> {
    let rdns: Vec<Vec<u8>> = attributes
        .iter()
        .map(|(attr, value)| set(&[&attribute(attr, &utf8(value))]))
        .collect();
    let rdns: Vec<&[u8]> = rdns.iter().map(Vec::as_slice).collect();
    seq(&rdns)
}

pub fn validity(not_before: &[u8], not_after: &[u8]) -> Vec<u8> {
    seq(&[not_before, not_after])
}

pub fn utc_time(value: &str) -> Vec<u8> {
    element(Tag::UtcTime, value.as_bytes())
}

pub fn generalized_time(value: &str) -> Vec<u8> {
    element(Tag::GeneralizedTime, value.as_bytes())
}

/// Pieces of a certificate, each one already encoded.
pub struct CertBuilder {
    pub version: Option<Vec<u8>>,
    pub serial_number: Vec<u8>,
    pub signature: Vec<u8>,
    pub issuer: Vec<u8>,
    pub validity: Vec<u8>,
    pub subject: Vec<u8>,
    pub subject_public_key_info: Vec<u8>,
    pub optional_fields: Vec<Vec<u8>>,
    pub signature_algorithm: Vec<u8>,
    pub signature_value: Vec<u8>,
}

impl Default for CertBuilder {
    fn default() -> Self {
        Self {
            version: Some(context_specific(TagNumber::N0, true, &integer(&[2]))),
            serial_number: integer(&[0x01, 0x02, 0x03]),
            signature: algorithm(OID_ECDSA_SHA256, None),
            issuer: name(&[(OID_O, "Test CA"), (OID_CN, "ca.test")]),
            validity: validity(&utc_time("250101000000Z"), &utc_time("350101000000Z")),
            subject: name(&[(OID_CN, "leaf.test")]),
            subject_public_key_info: Self::spki(&[0x04; 65]),
            optional_fields: Vec::new(),
            signature_algorithm: algorithm(OID_ECDSA_SHA256, None),
            signature_value: bit_string(&[0xAA; 70]),
        }
    }
}

impl CertBuilder {
    pub fn spki(key: &[u8]) -> Vec<u8> {
        seq(&[
            &algorithm(OID_EC_PUBLIC_KEY, Some(&oid(OID_PRIME256V1))),
            &bit_string(key),
        ])
    }

    pub fn tbs(&self) -> Vec<u8> {
        let mut parts: Vec<&[u8]> = Vec::new();
        if let Some(version) = &self.version {
            parts.push(version);
        }
        parts.extend([
            self.serial_number.as_slice(),
            self.signature.as_slice(),
            self.issuer.as_slice(),
            self.validity.as_slice(),
            self.subject.as_slice(),
            self.subject_public_key_info.as_slice(),
        ]);
        parts.extend(self.optional_fields.iter().map(Vec::as_slice));
        seq(&parts)
    }

    pub fn build(&self) -> Vec<u8> {
        seq(&[
            &self.tbs(),
            &self.signature_algorithm,
            &self.signature_value,
        ])
    }
}
