use std::collections::HashMap;

use bitly_common::hashmap_literal;

use crate::error::BitlyResult;
use crate::error::ConfigurationError;

pub const API_HOSTNAME: &str = "api-ssl.bitly.com";

pub const ACCESS_TOKEN: &str = "access_token";
pub const SHORTEN: &str = "shorten";
pub const EXPAND: &str = "expand";

/// Logical endpoint name -> path relative to the api host.
#[derive(Debug, Clone)]
pub struct EndpointCatalog {
  path_by_name: HashMap<&'static str, &'static str>,
}

impl Default for EndpointCatalog {
  fn default() -> Self {
    return EndpointCatalog::v3();
  }
}

impl EndpointCatalog {
  /// Every endpoint of the v3 API plus the oauth token exchange.
  pub fn v3() -> EndpointCatalog {
    let path_by_name = hashmap_literal! {
      ACCESS_TOKEN => "oauth/access_token",
      SHORTEN => "v3/shorten",
      EXPAND => "v3/expand",
      "validate" => "v3/validate",
      "clicks" => "v3/clicks",
      "referrers" => "v3/referrers",
      "countries" => "v3/countries",
      "clicks_by_minute" => "v3/clicks_by_minute",
      "clicks_by_day" => "v3/clicks_by_day",
      "bitly_pro_domain" => "v3/bitly_pro_domain",
      "lookup" => "v3/lookup",
      "info" => "v3/info",
      "user_clicks" => "v3/user/clicks",
      "user_referrers" => "v3/user/referrers",
      "user_countries" => "v3/user/countries",
      "user_realtime_links" => "v3/user/realtime_links",
    };

    return EndpointCatalog { path_by_name };
  }

  pub fn path(&self, name: &str) -> Option<&'static str> {
    return self.path_by_name.get(name).copied();
  }

  pub fn names(&self) -> Vec<&'static str> {
    let mut names: Vec<&'static str> = self.path_by_name.keys().copied().collect();
    names.sort_unstable();

    return names;
  }

  /// `https://api-ssl.bitly.com/<path>[?<query>]`, empty query is left out.
  pub fn resolve(&self, name: &str, query: Option<&str>) -> BitlyResult<String> {
    let path = self
      .path(name)
      .ok_or_else(|| ConfigurationError::EndpointNotDefined(name.to_owned()))?;

    let url = format!("https://{}/{}", API_HOSTNAME, path);

    return Ok(match query {
      Some(query) if !query.is_empty() => format!("{}?{}", url, query),
      _ => url,
    });
  }
}
