//! Blocking https client built on `reqwest`.
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, LOCATION};
use reqwest::redirect::Policy;
use reqwest::tls::TlsInfo;
use reqwest::StatusCode;
use url::Url;

use super::{ClientError, HttpsClient, TlsClientParams};

/// Https client returning the leaf certificate presented by the server.
///
/// A GET request is sent on the URL. Redirections are not followed, and the body of the
/// response is never read.
#[derive(Clone, Debug)]
pub struct TlsClient {
    client: Client,
    params: TlsClientParams,
}

impl TlsClient {
    /// Create a client with default parameters.
    ///
    /// # Errors
    ///
    /// Fails if the TLS backend cannot be initialized.
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_params(TlsClientParams::default())
    }

    /// Create a client with the given parameters.
    ///
    /// # Errors
    ///
    /// Fails if the TLS backend cannot be initialized.
    pub fn with_params(params: TlsClientParams) -> Result<Self, reqwest::Error> {
        if !params.verify_chain {
            tracing::warn!("certificate chain verification is disabled");
        }

        let client = Client::builder()
            .use_rustls_tls()
            .tls_info(true)
            .redirect(Policy::none())
            .connect_timeout(params.connect_timeout)
            .timeout(params.timeout)
            .danger_accept_invalid_certs(!params.verify_chain)
            .user_agent(params.user_agent.as_str())
            .build()?;

        Ok(Self { client, params })
    }

    /// Parameters used by the client.
    #[must_use]
    pub fn params(&self) -> &TlsClientParams {
        &self.params
    }
}

impl HttpsClient for TlsClient {
    fn peer_certificate(&self, url: &Url) -> Result<Vec<u8>, ClientError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(ClientError::transport)?;
        tracing::debug!(%url, status = %response.status(), "received response");

        check_redirect(response.status(), response.headers())?;
        leaf_certificate(&response)
    }
}

fn check_redirect(status: StatusCode, headers: &HeaderMap) -> Result<(), ClientError> {
    if !status.is_redirection() {
        return Ok(());
    }
    let location = headers
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    Err(ClientError::Redirect { location })
}

fn leaf_certificate(response: &Response) -> Result<Vec<u8>, ClientError> {
    response
        .extensions()
        .get::<TlsInfo>()
        .and_then(TlsInfo::peer_certificate)
        .map(<[u8]>::to_vec)
        .ok_or_else(|| ClientError::transport("server did not present any certificate"))
}
