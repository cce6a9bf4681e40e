use slog::Logger;

use crate::error::BitlyResult;
use crate::error::ConfigurationError;
use crate::request::Request;
use crate::transport::Transport;

/// Whitespace stripped off both ends of a body: space, tab, newline, carriage
/// return, NUL and vertical tab. Unicode spaces are part of the body.
const BODY_PADDING: &[char] = &[' ', '\t', '\n', '\r', '\0', '\x0B'];

/// Executes [`Request`] values over the transport it owns.
pub struct HttpClient {
  transport: Box<dyn Transport>,
  logger: Logger,
}

impl HttpClient {
  pub fn new(transport: Box<dyn Transport>, logger: Logger) -> HttpClient {
    return HttpClient { transport, logger };
  }
}

impl HttpClient {
  /// One synchronous call, no retries. The body comes back trimmed because
  /// bit.ly sometimes appends a newline.
  pub fn execute(&self, request: &Request) -> BitlyResult<String> {
    let url = request.url().ok_or(ConfigurationError::UrlNotSet)?;
    let options = request.options();

    slog::debug!(
      self.logger,
      "Executing request";
      "method" => options.method_name(),
      "host" => url.host_str().unwrap_or_default(),
      "path" => url.path()
    );

    let body = self.transport.perform(url, options).map_err(|err| {
      slog::warn!(self.logger, "Request failed"; "kind" => %err.kind, "message" => &err.message);

      return err;
    })?;

    slog::debug!(self.logger, "Request done"; "bytes" => body.len());

    return Ok(body.trim_matches(BODY_PADDING).to_owned());
  }
}
