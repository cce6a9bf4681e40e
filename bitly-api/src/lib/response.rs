//! Decoding of raw bodies returned by the client. The client itself never
//! decodes anything, these are for callers that want typed values.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use url::form_urlencoded;

#[derive(Error, Debug)]
pub enum ResponseError {
  #[error("Could not deserialize response body {body} err {root_err}")]
  DeserializeError { body: String, root_err: String },

  #[error("bit.ly responded with {status_code} {status_txt}")]
  ApiError { status_code: u16, status_txt: String },

  #[error("Token response has no access_token, body {body}")]
  MissingAccessToken { body: String },
}

/// Envelope of every v3 json response.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ApiResponse<T> {
  pub status_code: u16,
  pub status_txt: String,
  pub data: Option<T>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ShortenData {
  pub url: String,
  pub hash: String,
  pub global_hash: String,
  pub long_url: String,
  #[serde(default)]
  pub new_hash: u8,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ExpandData {
  pub expand: Vec<ExpandedLink>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ExpandedLink {
  pub short_url: Option<String>,
  pub hash: Option<String>,
  pub global_hash: Option<String>,
  pub long_url: Option<String>,
  pub error: Option<String>,
}

/// Decoded xAuth body, `access_token=...&login=...&apiKey=...`.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenResponse {
  pub access_token: String,
  pub login: Option<String>,
  pub api_key: Option<String>,
  pub extra: HashMap<String, String>,
}

impl<T> ApiResponse<T>
where
  T: DeserializeOwned,
{
  pub fn from_body(body: &str) -> Result<ApiResponse<T>, ResponseError> {
    return serde_json::from_str(body).map_err(|err| ResponseError::DeserializeError {
      body: body.to_owned(),
      root_err: format!("{:#?}", err),
    });
  }

  /// Data of a 200 response, anything else becomes [`ResponseError::ApiError`].
  pub fn into_data(self) -> Result<T, ResponseError> {
    return match self.data {
      Some(data) if self.status_code == 200 => Ok(data),
      _ => Err(ResponseError::ApiError {
        status_code: self.status_code,
        status_txt: self.status_txt,
      }),
    };
  }
}

impl TokenResponse {
  pub fn from_body(body: &str) -> Result<TokenResponse, ResponseError> {
    let mut extra: HashMap<String, String> = form_urlencoded::parse(body.as_bytes())
      .into_owned()
      .collect();

    let access_token = extra
      .remove("access_token")
      .filter(|token| !token.is_empty())
      .ok_or_else(|| ResponseError::MissingAccessToken {
        body: body.to_owned(),
      })?;

    return Ok(TokenResponse {
      access_token,
      login: extra.remove("login"),
      api_key: extra.remove("apiKey"),
      extra,
    });
  }
}
