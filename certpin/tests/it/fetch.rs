use std::cell::RefCell;

use certpin::fetch::{fingerprint_for_url, ClientError, FetchError, HttpsClient};
use certpin::x509::Field;
use url::Url;

use crate::utils::*;

/// Client serving a fixed certificate, recording the requested URLs.
struct FakeClient {
    certificate: Vec<u8>,
    requests: RefCell<Vec<String>>,
}

impl FakeClient {
    fn new(certificate: Vec<u8>) -> Self {
        Self {
            certificate,
            requests: RefCell::new(Vec::new()),
        }
    }
}

impl HttpsClient for FakeClient {
    fn peer_certificate(&self, url: &Url) -> Result<Vec<u8>, ClientError> {
        self.requests.borrow_mut().push(url.to_string());
        Ok(self.certificate.clone())
    }
}

#[test]
fn test_fingerprint_for_url() {
    let client = FakeClient::new(asset("rsa.der"));
    assert_eq!(
        fingerprint_for_url("https://rsa.example.test:8443/a?b=c", &client).unwrap(),
        RSA_HASH
    );
    assert_eq!(
        fingerprint_for_url("https://RSA.example.test", &client).unwrap(),
        RSA_HASH
    );
    assert_eq!(
        *client.requests.borrow(),
        [
            "https://rsa.example.test:8443/a?b=c",
            "https://rsa.example.test/"
        ]
    );
}

#[test]
fn test_scheme_checked_first() {
    let client = FakeClient::new(asset("ec.der"));
    for url in ["http://ec.example.test/", "ws://ec.example.test/", "data:text/plain,a"] {
        let err = fingerprint_for_url(url, &client).unwrap_err();
        assert!(matches!(err, FetchError::UnsupportedScheme(_)), "{url}: {err:?}");
    }
    assert!(client.requests.borrow().is_empty());
}

#[test]
fn test_malformed_certificate() {
    let client = FakeClient::new(asset("ec.der")[..200].to_vec());
    match fingerprint_for_url("https://ec.example.test/", &client).unwrap_err() {
        FetchError::MalformedCertificate(err) => assert_eq!(err.field(), Field::Envelope),
        err => panic!("unexpected error {err:?}"),
    }
}

#[test]
fn test_redirect() {
    let client = |url: &Url| -> Result<Vec<u8>, ClientError> {
        Err(ClientError::Redirect {
            location: Some(url.join("/moved").unwrap().to_string()),
        })
    };
    let err = fingerprint_for_url("https://a.test/old", &client).unwrap_err();
    assert_eq!(
        err.to_string(),
        "redirections are not supported, retry with https://a.test/moved"
    );
}

#[test]
fn test_transport_error() {
    let client = |_: &Url| -> Result<Vec<u8>, ClientError> {
        Err(std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out").into())
    };
    let err = fingerprint_for_url("https://a.test/", &client).unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)));
    assert_eq!(err.to_string(), "cannot retrieve certificate: timed out");
}
