//! Parameters of the [`super::TlsClient`].

use std::time::Duration;

/// Parameters used to configure a [`super::TlsClient`].
#[derive(Clone, Debug)]
pub struct TlsClientParams {
    /// Max duration to establish the TCP connection.
    pub(crate) connect_timeout: Option<Duration>,

    /// Max duration of the whole request.
    pub(crate) timeout: Option<Duration>,

    /// Verify the certificate chain against the webpki roots.
    pub(crate) verify_chain: bool,

    /// Value of the `User-Agent` header.
    pub(crate) user_agent: String,
}

impl Default for TlsClientParams {
    fn default() -> Self {
        Self {
            connect_timeout: Some(Duration::from_secs(10)),
            timeout: Some(Duration::from_secs(10)),
            verify_chain: true,
            user_agent: concat!("certpin/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

impl TlsClientParams {
    /// Maximum duration to establish the TCP connection with the server.
    ///
    /// The default value is 10 seconds. `None` means the timeout of the operating system is
    /// used.
    #[must_use]
    pub fn connect_timeout(mut self, connect_timeout: Option<Duration>) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    /// Maximum duration of the request, from the connection to the reception of the response
    /// head.
    ///
    /// The default value is 10 seconds. `None` means no timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Verify the certificate chain of the server.
    ///
    /// When enabled, the handshake fails if the certificate of the server does not chain to
    /// one of the webpki root certificates, or does not match the host name.
    ///
    /// When disabled, any certificate is accepted. Comparing the fingerprint of the key with a
    /// pinned value is then the only check done on the server identity.
    ///
    /// The default value is `true`.
    #[must_use]
    pub fn verify_chain(mut self, verify_chain: bool) -> Self {
        self.verify_chain = verify_chain;
        self
    }

    /// Value of the `User-Agent` header sent with the request.
    ///
    /// The default value is `certpin/<version>`.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}
