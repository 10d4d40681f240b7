use certpin::fingerprint::{fingerprint_with, public_key_hash};
use certpin::x509::Field;
use der::TagNumber;
use sha2::{Digest, Sha256};

use crate::utils::*;

#[test]
fn test_assets() {
    assert_eq!(certpin::fingerprint(&asset("rsa.der")).unwrap(), RSA_HASH);
    assert_eq!(certpin::fingerprint(&asset("ec.der")).unwrap(), EC_HASH);
    assert_eq!(certpin::fingerprint(&asset("v1.der")).unwrap(), EC_HASH);
}

#[test]
fn test_digest_of_raw_key() {
    let key: Vec<u8> = (0..=255).collect();
    let der = CertBuilder {
        subject_public_key_info: CertBuilder::spki(&key),
        ..Default::default()
    }
    .build();

    let expected = hex::encode(Sha256::digest(&key));
    assert_eq!(certpin::fingerprint(&der).unwrap(), expected);

    let cert = certpin::parse(&der).unwrap();
    assert_eq!(certpin::extract_public_key(&cert), key);
    assert_eq!(public_key_hash(&cert), expected);

    // The digest of the whole SubjectPublicKeyInfo is not what is computed.
    let spki_hash = hex::encode(Sha256::digest(CertBuilder::spki(&key)));
    assert_ne!(certpin::fingerprint(&der).unwrap(), spki_hash);
}

#[test]
fn test_depends_only_on_key() {
    let a = CertBuilder::default();
    let b = CertBuilder {
        version: None,
        serial_number: integer(&[0x42]),
        issuer: name(&[(OID_CN, "other ca")]),
        subject: name(&[(OID_CN, "other.test")]),
        validity: validity(
            &generalized_time("20000101000000Z"),
            &generalized_time("20010101000000Z"),
        ),
        optional_fields: vec![context_specific(TagNumber::N3, true, &seq(&[]))],
        signature_value: bit_string(&[0x55; 64]),
        ..Default::default()
    };
    assert_eq!(
        certpin::fingerprint(&a.build()).unwrap(),
        certpin::fingerprint(&b.build()).unwrap()
    );

    let c = CertBuilder {
        subject_public_key_info: CertBuilder::spki(&[0x04; 64]),
        ..Default::default()
    };
    assert_ne!(
        certpin::fingerprint(&a.build()).unwrap(),
        certpin::fingerprint(&c.build()).unwrap()
    );
}

#[test]
fn test_output_format() {
    for (name, der) in assets() {
        let hash = certpin::fingerprint(&der).unwrap();
        assert_eq!(hash.len(), 64, "{name}");
        assert!(
            hash.bytes()
                .all(|c| c.is_ascii_digit() || (b'a'..=b'f').contains(&c)),
            "{name}: {hash}"
        );
        // Deterministic
        assert_eq!(certpin::fingerprint(&der).unwrap(), hash);
    }
}

#[test]
fn test_other_digest() {
    let der = asset("rsa.der");
    let key = certpin::parse(&der).unwrap().subject_public_key_info.key;
    assert_eq!(
        fingerprint_with::<sha2::Sha384>(&der).unwrap(),
        hex::encode(sha2::Sha384::digest(key))
    );
}

#[test]
fn test_malformed() {
    let err = certpin::fingerprint(b"").unwrap_err();
    assert_eq!(err.field(), Field::Envelope);

    let der = CertBuilder {
        subject_public_key_info: seq(&[&algorithm(OID_EC_PUBLIC_KEY, None)]),
        ..Default::default()
    }
    .build();
    let err = certpin::fingerprint(&der).unwrap_err();
    assert_eq!(err.field(), Field::SubjectPublicKeyInfo);
}
