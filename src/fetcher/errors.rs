use std::error::Error as _;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("dns failure: {0}")]
    Dns(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("tls error: {0}")]
    Tls(String),

    #[error("connect timeout")]
    ConnectTimeout,

    #[error("request timeout")]
    RequestTimeout,

    #[error("too many redirects")]
    RedirectLoop,

    #[error("body too large ({0} bytes)")]
    BodyTooLarge(u64),

    #[error("io error: {0}")]
    Io(String),

    #[error("unknown: {0}")]
    Unknown(String),
}

impl FetchError {
    /// Whether the failure happened before any response was received.
    ///
    /// `BodyTooLarge` means the server answered but the payload was unusable;
    /// everything else is a transport problem.
    pub fn is_connectivity(&self) -> bool {
        !matches!(self, Self::BodyTooLarge(_))
    }

    pub fn from_reqwest_error(err: reqwest::Error) -> Self {
        let chain = error_chain(&err);

        if err.is_timeout() {
            if err.is_connect() {
                Self::ConnectTimeout
            } else {
                Self::RequestTimeout
            }
        } else if err.is_redirect() {
            Self::RedirectLoop
        } else if chain.contains("certificate") || chain.contains("tls") {
            Self::Tls(chain)
        } else if chain.contains("dns error") || chain.contains("failed to lookup address") {
            Self::Dns(chain)
        } else if err.is_connect() || err.is_request() {
            Self::Connect(chain)
        } else if err.is_body() || err.is_decode() {
            Self::Io(chain)
        } else {
            Self::Unknown(chain)
        }
    }
}

// reqwest keeps the interesting part (hyper/rustls/resolver) in the source chain.
fn error_chain(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message.to_lowercase()
}
