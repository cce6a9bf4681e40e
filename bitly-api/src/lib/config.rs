use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use bitly_common::types::ResultAnyError;

use crate::client::Credentials;
use crate::client::DEFAULT_CA_BUNDLE;

/// Bitly config
/// -------------
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BitlyConfig {
  pub client_id: String,
  pub client_secret: String,
  pub oauth_token: Option<String>,
  #[serde(default = "default_ca_bundle_path")]
  pub ca_bundle_path: String,
}

fn default_ca_bundle_path() -> String {
  return DEFAULT_CA_BUNDLE.to_owned();
}

impl BitlyConfig {
  pub fn credentials(&self) -> Credentials {
    return Credentials {
      client_id: self.client_id.clone(),
      client_secret: self.client_secret.clone(),
      oauth_token: self.oauth_token.clone(),
    };
  }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
  pub bitly: BitlyConfig,
}

impl Config {
  pub fn new(setting_path: impl AsRef<Path> + std::fmt::Display) -> ResultAnyError<Config> {
    let config_str = fs::read_to_string(&setting_path).map_err(|err| {
      return ConfigError::ReadConfigError {
        config_path: setting_path.to_string(),
        root_err: format!("{:#?}", err),
      };
    })?;

    return Config::from_yaml(&config_str, setting_path.to_string());
  }

  fn from_yaml(config_str: &str, config_path: String) -> ResultAnyError<Config> {
    let config: Config = serde_yaml::from_str(config_str).map_err(|err| {
      return ConfigError::ConfigDeserializeError {
        config_path,
        root_err: format!("{:#?}", err),
      };
    })?;

    return Ok(config);
  }
}

#[derive(Error, Debug)]
pub enum ConfigError {
  #[error("Failed reading config {config_path} err {root_err}")]
  ReadConfigError {
    config_path: String,
    root_err: String,
  },

  #[error("Could not deserialize config please check {config_path} err {root_err}")]
  ConfigDeserializeError {
    config_path: String,
    root_err: String,
  },
}
