//! Errors related to the retrieval of certificates.
use std::error::Error;
use std::fmt;

use crate::x509::MalformedCertificate;

/// Error returned by a [`super::HttpsClient`].
#[derive(Debug)]
pub enum ClientError {
    /// The connection to the server or the TLS handshake failed.
    Transport(Box<dyn Error + Send + Sync>),

    /// The server answered with a redirection.
    ///
    /// Redirections are not followed: the caller must retry with the final URL.
    Redirect {
        /// Value of the `Location` header, if any.
        location: Option<String>,
    },
}

impl ClientError {
    /// Build a transport error.
    #[must_use]
    pub fn transport<E>(err: E) -> Self
    where
        E: Into<Box<dyn Error + Send + Sync>>,
    {
        Self::Transport(err.into())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::transport(err)
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(err) => write!(f, "transport failure: {err}"),
            Self::Redirect { location: Some(location) } => {
                write!(f, "redirected to {location}")
            }
            Self::Redirect { location: None } => write!(f, "redirected"),
        }
    }
}

impl Error for ClientError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport(err) => Some(&**err),
            Self::Redirect { .. } => None,
        }
    }
}

/// Error while computing the fingerprint of the certificate of a remote server.
#[derive(Debug)]
pub enum FetchError {
    /// The URL could not be parsed.
    InvalidUrl(url::ParseError),

    /// The URL does not use the `https` scheme. No connection was attempted.
    UnsupportedScheme(String),

    /// The certificate could not be retrieved.
    Transport(Box<dyn Error + Send + Sync>),

    /// The server answered with a redirection, which is not followed.
    RedirectUnsupported {
        /// Value of the `Location` header, if any.
        location: Option<String>,
    },

    /// The certificate presented by the server could not be parsed.
    MalformedCertificate(MalformedCertificate),
}

impl From<ClientError> for FetchError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Transport(err) => Self::Transport(err),
            ClientError::Redirect { location } => Self::RedirectUnsupported { location },
        }
    }
}

impl From<MalformedCertificate> for FetchError {
    fn from(err: MalformedCertificate) -> Self {
        Self::MalformedCertificate(err)
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl(err) => write!(f, "invalid url: {err}"),
            Self::UnsupportedScheme(scheme) => {
                write!(f, "unsupported scheme {scheme:?}, only https is supported")
            }
            Self::Transport(err) => write!(f, "cannot retrieve certificate: {err}"),
            Self::RedirectUnsupported {
                location: Some(location),
            } => write!(f, "redirections are not supported, retry with {location}"),
            Self::RedirectUnsupported { location: None } => {
                write!(f, "redirections are not supported")
            }
            Self::MalformedCertificate(err) => write!(f, "{err}"),
        }
    }
}

impl Error for FetchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidUrl(err) => Some(err),
            Self::Transport(err) => Some(&**err),
            Self::MalformedCertificate(err) => Some(err),
            Self::UnsupportedScheme(_) | Self::RedirectUnsupported { .. } => None,
        }
    }
}
