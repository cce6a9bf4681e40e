use std::path::Path;
use std::path::PathBuf;

use slog::Logger;

use crate::endpoint;
use crate::endpoint::EndpointCatalog;
use crate::error::BitlyResult;
use crate::http::HttpClient;
use crate::query::build_query_string;
use crate::request::Request;
use crate::request::RequestOption;
use crate::request::RequestOptions;
use crate::transport::Transport;
use crate::transport::ReqwestTransport;

/// Certificate chain bundle, only used when it exists on disk.
pub const DEFAULT_CA_BUNDLE: &str = "bitly_ca.crt";

pub const USER_AGENT: &str = concat!(
  "crv-bitly/",
  env!("CARGO_PKG_VERSION"),
  " (github.com/cervon/crv-bitly-api)"
);

#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
  pub client_id: String,
  pub client_secret: String,
  pub oauth_token: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
  Json,
  Xml,
  Txt,
}

impl Default for ResponseFormat {
  fn default() -> Self {
    return ResponseFormat::Json;
  }
}

impl From<&str> for ResponseFormat {
  fn from(s: &str) -> Self {
    match s.to_lowercase().as_ref() {
      "xml" => ResponseFormat::Xml,
      "txt" => ResponseFormat::Txt,
      _ => ResponseFormat::Json,
    }
  }
}

impl std::fmt::Display for ResponseFormat {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      ResponseFormat::Json => write!(f, "json"),
      ResponseFormat::Xml => write!(f, "xml"),
      ResponseFormat::Txt => write!(f, "txt"),
    }
  }
}

pub struct BitlyClient {
  credentials: Credentials,
  catalog: EndpointCatalog,
  base_options: RequestOptions,
  http: HttpClient,
  logger: Logger,
}

impl BitlyClient {
  /// Client over a reqwest transport, picking up `bitly_ca.crt` from the
  /// working directory when it's there.
  pub fn new(credentials: Credentials, logger: Logger) -> BitlyResult<BitlyClient> {
    return BitlyClient::with_ca_bundle(credentials, DEFAULT_CA_BUNDLE, logger);
  }

  pub fn with_ca_bundle(
    credentials: Credentials,
    ca_bundle: impl AsRef<Path>,
    logger: Logger,
  ) -> BitlyResult<BitlyClient> {
    let transport = ReqwestTransport::new(logger.new(slog::o!("component" => "transport")))?;

    return Ok(BitlyClient::with_transport(
      credentials,
      ca_bundle,
      Box::new(transport),
      logger,
    ));
  }

  pub fn with_transport(
    credentials: Credentials,
    ca_bundle: impl AsRef<Path>,
    transport: Box<dyn Transport>,
    logger: Logger,
  ) -> BitlyClient {
    let mut base_options = RequestOptions::default();
    let ca_bundle = ca_bundle.as_ref();

    if ca_bundle.is_file() {
      slog::debug!(logger, "Using CA bundle"; "path" => %ca_bundle.display());
      base_options.add(RequestOption::CaBundle(PathBuf::from(ca_bundle)));
    }

    base_options.add(RequestOption::UserAgent(USER_AGENT.to_owned()));

    return BitlyClient {
      credentials,
      catalog: EndpointCatalog::v3(),
      base_options,
      http: HttpClient::new(transport, logger.new(slog::o!("component" => "http"))),
      logger,
    };
  }
}

impl BitlyClient {
  pub fn credentials(&self) -> &Credentials {
    return &self.credentials;
  }

  pub fn catalog(&self) -> &EndpointCatalog {
    return &self.catalog;
  }

  pub fn xauth(&self) -> XAuthApi<'_> {
    return XAuthApi { client: self };
  }

  pub fn links(&self) -> LinksApi<'_> {
    return LinksApi { client: self };
  }

  /// Fresh request carrying the client wide options (CA bundle, user agent)
  /// targeting the given endpoint.
  pub fn resolve_endpoint(&self, name: &str, query: Option<&str>) -> BitlyResult<Request> {
    let url = self.catalog.resolve(name, query)?;
    let mut request = Request::with_options(self.base_options.clone());

    request.set_target_url(&url)?;

    return Ok(request);
  }

  pub fn execute(&self, endpoint_name: &str, request: &Request) -> BitlyResult<String> {
    slog::info!(
      self.logger,
      "Calling bit.ly";
      "endpoint" => endpoint_name,
      "method" => request.options().method_name()
    );

    return self.http.execute(request);
  }
}

/// xAuth token exchange. Access has to be requested from bit.ly first.
pub struct XAuthApi<'a> {
  client: &'a BitlyClient,
}

impl<'a> XAuthApi<'a> {
  /// Returns the raw url encoded body, e.g.
  /// `access_token=...&login=...&apiKey=...`.
  pub fn request_token(&self, username: &str, password: &str) -> BitlyResult<String> {
    let credentials = &self.client.credentials;
    let mut request = self.client.resolve_endpoint(endpoint::ACCESS_TOKEN, None)?;

    request.set_post_body(vec![
      ("client_id", credentials.client_id.as_str()),
      ("client_secret", credentials.client_secret.as_str()),
      ("x_auth_username", username),
      ("x_auth_password", password),
    ]);

    return self.client.execute(endpoint::ACCESS_TOKEN, &request);
  }
}

/// Link calls authenticated with the held oauth token.
pub struct LinksApi<'a> {
  client: &'a BitlyClient,
}

impl<'a> LinksApi<'a> {
  pub fn shorten(&self, long_url: &str) -> BitlyResult<String> {
    return self.shorten_with_format(long_url, ResponseFormat::Json);
  }

  pub fn shorten_with_format(&self, long_url: &str, format: ResponseFormat) -> BitlyResult<String> {
    let format = format.to_string();

    return self.call(
      endpoint::SHORTEN,
      &[("format", format.as_str()), ("longUrl", long_url)],
    );
  }

  pub fn expand(&self, short_url: &str, format: ResponseFormat) -> BitlyResult<String> {
    let format = format.to_string();

    return self.call(
      endpoint::EXPAND,
      &[("format", format.as_str()), ("shortUrl", short_url)],
    );
  }

  /// GET on any catalog endpoint, the oauth token is added to `params`.
  pub fn call<K, V>(&self, endpoint_name: &str, params: &[(K, V)]) -> BitlyResult<String>
  where
    K: AsRef<str>,
    V: AsRef<str>,
  {
    let oauth_token = self
      .client
      .credentials
      .oauth_token
      .as_deref()
      .filter(|token| !token.is_empty());

    let query = build_query_string(params, oauth_token);
    let request = self.client.resolve_endpoint(endpoint_name, Some(&query))?;

    return self.client.execute(endpoint_name, &request);
  }
}
