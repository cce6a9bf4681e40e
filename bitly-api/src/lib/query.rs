use percent_encoding::utf8_percent_encode;
use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;

pub const ACCESS_TOKEN_PARAM: &str = "access_token";

/// RFC 3986 unreserved characters stay as they are, everything else is
/// escaped (space becomes `%20`, not `+`).
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
  .remove(b'-')
  .remove(b'_')
  .remove(b'.')
  .remove(b'~');

pub fn encode_component(component: &str) -> String {
  return utf8_percent_encode(component, QUERY_COMPONENT).to_string();
}

/// Builds `key=value&key=value` keeping the given order. When a token is given
/// it's stored under `access_token`, replacing an existing entry in place or
/// appended last.
pub fn build_query_string<K, V>(params: &[(K, V)], oauth_token: Option<&str>) -> String
where
  K: AsRef<str>,
  V: AsRef<str>,
{
  let mut pairs: Vec<(&str, &str)> = params
    .iter()
    .map(|(key, value)| (key.as_ref(), value.as_ref()))
    .collect();

  if let Some(token) = oauth_token {
    match pairs.iter_mut().find(|(key, _)| *key == ACCESS_TOKEN_PARAM) {
      Some(pair) => pair.1 = token,
      None => pairs.push((ACCESS_TOKEN_PARAM, token)),
    }
  }

  return pairs
    .into_iter()
    .map(|(key, value)| format!("{}={}", encode_component(key), encode_component(value)))
    .collect::<Vec<String>>()
    .join("&");
}
