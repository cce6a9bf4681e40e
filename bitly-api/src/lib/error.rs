use thiserror::Error;

pub type BitlyResult<T> = Result<T, BitlyError>;

/// Everything a bit.ly call can fail with. There are no retries, whatever
/// happened first is what the caller gets.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BitlyError {
  #[error(transparent)]
  Configuration(#[from] ConfigurationError),

  #[error(transparent)]
  Transport(#[from] TransportError),
}

/// Request was not set up properly, no network call has been made.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
  #[error("URL not set")]
  UrlNotSet,

  #[error("Endpoint \"{0}\" is not defined")]
  EndpointNotDefined(String),

  #[error("Invalid url {url:?}: {reason}")]
  InvalidUrl { url: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
  /// Client could not be built, e.g. bad TLS settings.
  Builder,
  Connect,
  Timeout,
  Redirect,
  Request,
  Body,
  Decode,
  /// CA bundle file could not be read or parsed.
  CaBundle,
}

impl std::fmt::Display for TransportErrorKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      TransportErrorKind::Builder => write!(f, "builder"),
      TransportErrorKind::Connect => write!(f, "connect"),
      TransportErrorKind::Timeout => write!(f, "timeout"),
      TransportErrorKind::Redirect => write!(f, "redirect"),
      TransportErrorKind::Request => write!(f, "request"),
      TransportErrorKind::Body => write!(f, "body"),
      TransportErrorKind::Decode => write!(f, "decode"),
      TransportErrorKind::CaBundle => write!(f, "ca-bundle"),
    }
  }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Transport failed ({kind}): {message}")]
pub struct TransportError {
  pub kind: TransportErrorKind,
  pub message: String,
}

impl TransportError {
  pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> TransportError {
    return TransportError {
      kind,
      message: message.into(),
    };
  }
}

impl From<reqwest::Error> for TransportError {
  fn from(err: reqwest::Error) -> Self {
    let kind = if err.is_builder() {
      TransportErrorKind::Builder
    } else if err.is_connect() {
      TransportErrorKind::Connect
    } else if err.is_timeout() {
      TransportErrorKind::Timeout
    } else if err.is_redirect() {
      TransportErrorKind::Redirect
    } else if err.is_body() {
      TransportErrorKind::Body
    } else if err.is_decode() {
      TransportErrorKind::Decode
    } else {
      TransportErrorKind::Request
    };

    return TransportError::new(kind, err.to_string());
  }
}
