//! Retrieval of the certificate of a remote server.
//!
//! The network is abstracted behind the [`HttpsClient`] trait: it only has to perform a GET
//! request on an https URL and return the leaf certificate presented by the server during the
//! handshake. [`fingerprint_for_url`] validates the URL, calls the client and computes the
//! fingerprint of the returned certificate.
//!
//! A client based on `reqwest` is provided as [`TlsClient`], when the `tls-client` feature is
//! enabled.
use url::Url;

use crate::fingerprint::fingerprint;

mod error;
pub use error::{ClientError, FetchError};

#[cfg(feature = "tls-client")]
mod params;
#[cfg(feature = "tls-client")]
pub use params::TlsClientParams;

#[cfg(feature = "tls-client")]
mod tls;
#[cfg(feature = "tls-client")]
pub use tls::TlsClient;

/// Client able to retrieve the certificate of an https server.
///
/// This is implemented for any closure taking an URL, which makes it easy to plug a custom
/// transport, or a fake one in tests.
pub trait HttpsClient {
    /// Perform a GET request on the URL and return the DER encoding of the leaf certificate
    /// presented by the server.
    ///
    /// The URL always has the `https` scheme.
    ///
    /// # Errors
    ///
    /// [`ClientError::Redirect`] must be returned if the server answers with a redirection.
    /// Any other failure is reported as [`ClientError::Transport`].
    fn peer_certificate(&self, url: &Url) -> Result<Vec<u8>, ClientError>;
}

impl<F> HttpsClient for F
where
    F: Fn(&Url) -> Result<Vec<u8>, ClientError>,
{
    fn peer_certificate(&self, url: &Url) -> Result<Vec<u8>, ClientError> {
        self(url)
    }
}

/// Compute the fingerprint of the public key of the certificate presented by a https server.
///
/// Only `https` URLs are accepted: any other scheme is rejected before the client is invoked.
/// Redirections are never followed.
///
/// # Errors
///
/// See [`FetchError`] for the possible failures.
pub fn fingerprint_for_url<C>(url: &str, client: &C) -> Result<String, FetchError>
where
    C: HttpsClient + ?Sized,
{
    let url = Url::parse(url).map_err(FetchError::InvalidUrl)?;
    if url.scheme() != "https" {
        return Err(FetchError::UnsupportedScheme(url.scheme().to_owned()));
    }

    let der = match client.peer_certificate(&url) {
        Ok(der) => der,
        Err(err) => {
            tracing::debug!(%url, error = %err, "cannot retrieve certificate");
            return Err(err.into());
        }
    };
    let hash = fingerprint(&der)?;
    tracing::debug!(%url, %hash, "computed fingerprint of server certificate");

    Ok(hash)
}
