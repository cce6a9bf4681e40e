use std::path::PathBuf;

use url::Url;

use crate::error::BitlyResult;
use crate::error::ConfigurationError;

/// A single transport option, recorded on a [`Request`] and applied when the
/// request gets executed.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestOption {
  FollowRedirects(bool),
  /// Prepend the response headers to the returned body.
  IncludeHeaders(bool),
  /// PEM bundle used as the only trusted roots.
  CaBundle(PathBuf),
  UserAgent(String),
  /// Form fields, having them makes the request a POST.
  PostFields(Vec<(String, String)>),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
  pub follow_redirects: bool,
  pub include_headers: bool,
  pub ca_bundle: Option<PathBuf>,
  pub user_agent: Option<String>,
  pub post_fields: Option<Vec<(String, String)>>,
}

impl RequestOptions {
  /// Later values overwrite earlier ones of the same option.
  pub fn add(&mut self, option: RequestOption) {
    match option {
      RequestOption::FollowRedirects(value) => self.follow_redirects = value,
      RequestOption::IncludeHeaders(value) => self.include_headers = value,
      RequestOption::CaBundle(path) => self.ca_bundle = Some(path),
      RequestOption::UserAgent(user_agent) => self.user_agent = Some(user_agent),
      RequestOption::PostFields(fields) => self.post_fields = Some(fields),
    }
  }

  pub fn is_post(&self) -> bool {
    return self.post_fields.is_some();
  }

  pub fn method_name(&self) -> &'static str {
    if self.is_post() {
      return "POST";
    }

    return "GET";
  }
}

/// Per call request configuration: target url plus the options to apply.
/// Handed to [`crate::http::HttpClient::execute`], nothing is shared between
/// two requests.
#[derive(Debug, Clone, Default)]
pub struct Request {
  url: Option<Url>,
  options: RequestOptions,
}

impl Request {
  pub fn new() -> Request {
    return Default::default();
  }

  pub fn with_options(options: RequestOptions) -> Request {
    return Request { url: None, options };
  }

  pub fn add_option(&mut self, option: RequestOption) -> &mut Request {
    self.options.add(option);

    return self;
  }

  pub fn set_target_url(&mut self, url: &str) -> BitlyResult<&mut Request> {
    if url.trim().is_empty() {
      return Err(
        ConfigurationError::InvalidUrl {
          url: url.to_owned(),
          reason: "url is empty".to_owned(),
        }
        .into(),
      );
    }

    let parsed = Url::parse(url).map_err(|err| ConfigurationError::InvalidUrl {
      url: url.to_owned(),
      reason: err.to_string(),
    })?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
      return Err(
        ConfigurationError::InvalidUrl {
          url: url.to_owned(),
          reason: format!("unsupported scheme {}", parsed.scheme()),
        }
        .into(),
      );
    }

    self.url = Some(parsed);

    return Ok(self);
  }

  pub fn set_post_body<K, V>(&mut self, fields: impl IntoIterator<Item = (K, V)>) -> &mut Request
  where
    K: Into<String>,
    V: Into<String>,
  {
    let fields = fields
      .into_iter()
      .map(|(key, value)| (key.into(), value.into()))
      .collect();

    return self.add_option(RequestOption::PostFields(fields));
  }

  pub fn url(&self) -> Option<&Url> {
    return self.url.as_ref();
  }

  pub fn options(&self) -> &RequestOptions {
    return &self.options;
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::error::BitlyError;

  mod add_option {
    use super::*;

    #[test]
    fn it_should_overwrite_previous_value() {
      let mut request = Request::new();

      request
        .add_option(RequestOption::UserAgent("first".into()))
        .add_option(RequestOption::UserAgent("second".into()))
        .add_option(RequestOption::FollowRedirects(true));

      assert_eq!(request.options().user_agent.as_deref(), Some("second"));
      assert!(request.options().follow_redirects);
      assert!(!request.options().include_headers);
      assert_eq!(request.options().ca_bundle, None);
    }
  }

  mod set_target_url {
    use super::*;

    #[test]
    fn it_should_store_valid_url() {
      let mut request = Request::new();

      request
        .set_target_url("https://api-ssl.bitly.com/v3/shorten?format=json")
        .unwrap();

      assert_eq!(
        request.url().map(Url::as_str),
        Some("https://api-ssl.bitly.com/v3/shorten?format=json")
      );
    }

    #[test]
    fn it_should_reject_empty_url() {
      let err = Request::new().set_target_url("  ").unwrap_err();

      assert!(matches!(
        err,
        BitlyError::Configuration(ConfigurationError::InvalidUrl { .. })
      ));
    }

    #[test]
    fn it_should_reject_malformed_url() {
      let err = Request::new().set_target_url("not a url").unwrap_err();

      assert!(matches!(
        err,
        BitlyError::Configuration(ConfigurationError::InvalidUrl { .. })
      ));
    }

    #[test]
    fn it_should_reject_non_http_scheme() {
      let err = Request::new()
        .set_target_url("ftp://api-ssl.bitly.com/")
        .unwrap_err();

      assert!(matches!(
        err,
        BitlyError::Configuration(ConfigurationError::InvalidUrl { .. })
      ));
    }

    #[test]
    fn it_should_keep_previous_url_on_failure() {
      let mut request = Request::new();
      request.set_target_url("https://example.com/").unwrap();

      assert!(request.set_target_url("").is_err());
      assert_eq!(request.url().map(Url::as_str), Some("https://example.com/"));
    }
  }

  mod set_post_body {
    use super::*;

    #[test]
    fn it_should_mark_request_as_post() {
      let mut request = Request::new();
      assert_eq!(request.options().method_name(), "GET");

      request.set_post_body(vec![("client_id", "abc"), ("client_secret", "def")]);

      assert!(request.options().is_post());
      assert_eq!(request.options().method_name(), "POST");
      assert_eq!(
        request.options().post_fields,
        Some(vec![
          ("client_id".to_owned(), "abc".to_owned()),
          ("client_secret".to_owned(), "def".to_owned()),
        ])
      );
    }
  }
}
