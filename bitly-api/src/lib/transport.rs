use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use reqwest::blocking::Client;
use reqwest::blocking::Response;
use reqwest::redirect::Policy;
use reqwest::Certificate;
use slog::Logger;
use url::Url;

use crate::error::TransportError;
use crate::error::TransportErrorKind;
use crate::request::RequestOptions;

const PEM_BEGIN: &str = "-----BEGIN CERTIFICATE-----";
const PEM_END: &str = "-----END CERTIFICATE-----";
const MAX_REDIRECTS: usize = 10;

/// Performs exactly one blocking HTTP round trip and returns the raw body.
/// Non 2xx statuses are not failures, bit.ly reports its own status inside
/// the body.
#[cfg_attr(test, mockall::automock)]
pub trait Transport {
  fn perform(&self, url: &Url, options: &RequestOptions) -> Result<String, TransportError>;
}

/// The subset of options that lives on the reqwest client rather than on a
/// single request.
#[derive(Debug, Clone, Default, PartialEq)]
struct ClientSettings {
  follow_redirects: bool,
  ca_bundle: Option<PathBuf>,
  user_agent: Option<String>,
}

impl From<&RequestOptions> for ClientSettings {
  fn from(options: &RequestOptions) -> Self {
    return ClientSettings {
      follow_redirects: options.follow_redirects,
      ca_bundle: options.ca_bundle.clone(),
      user_agent: options.user_agent.clone(),
    };
  }
}

/// reqwest backed transport. Owns one client, created on construction and
/// only rebuilt when the client level settings of a request change.
pub struct ReqwestTransport {
  client: RefCell<(ClientSettings, Client)>,
  logger: Logger,
}

impl ReqwestTransport {
  pub fn new(logger: Logger) -> Result<ReqwestTransport, TransportError> {
    let settings = ClientSettings::default();
    let client = build_client(&settings)?;

    return Ok(ReqwestTransport {
      client: RefCell::new((settings, client)),
      logger,
    });
  }

  fn client_for(&self, settings: ClientSettings) -> Result<Client, TransportError> {
    let mut cached = self.client.borrow_mut();

    if cached.0 != settings {
      slog::debug!(self.logger, "Rebuilding http client"; "settings" => ?settings);

      let client = build_client(&settings)?;
      *cached = (settings, client);
    }

    // Client is reference counted, cloning shares the connection pool.
    return Ok(cached.1.clone());
  }
}

impl Transport for ReqwestTransport {
  fn perform(&self, url: &Url, options: &RequestOptions) -> Result<String, TransportError> {
    let client = self.client_for(options.into())?;

    let request = match &options.post_fields {
      Some(fields) => client.post(url.clone()).form(fields),
      None => client.get(url.clone()),
    };

    let response = request.send()?;

    slog::debug!(self.logger, "Received response"; "status" => response.status().as_u16());

    let head = if options.include_headers {
      format_head(&response)
    } else {
      String::new()
    };

    let body = response.text()?;

    return Ok(format!("{}{}", head, body));
  }
}

fn build_client(settings: &ClientSettings) -> Result<Client, TransportError> {
  let redirect_policy = if settings.follow_redirects {
    Policy::limited(MAX_REDIRECTS)
  } else {
    Policy::none()
  };

  let mut builder = Client::builder().redirect(redirect_policy);

  if let Some(user_agent) = &settings.user_agent {
    builder = builder.user_agent(user_agent.clone());
  }

  if let Some(ca_bundle) = &settings.ca_bundle {
    builder = builder.tls_built_in_root_certs(false);

    for certificate in read_ca_bundle(ca_bundle)? {
      builder = builder.add_root_certificate(certificate);
    }
  }

  return builder.build().map_err(TransportError::from);
}

/// Reads every certificate of a PEM chain bundle.
fn read_ca_bundle(path: &Path) -> Result<Vec<Certificate>, TransportError> {
  let pem = fs::read_to_string(path).map_err(|err| {
    return TransportError::new(
      TransportErrorKind::CaBundle,
      format!("Failed reading {} err {}", path.display(), err),
    );
  })?;

  let certificates = pem
    .split_inclusive(PEM_END)
    .filter_map(|block| block.find(PEM_BEGIN).map(|start| &block[start..]))
    .map(|block| {
      return Certificate::from_pem(block.as_bytes()).map_err(|err| {
        return TransportError::new(
          TransportErrorKind::CaBundle,
          format!("Invalid certificate in {} err {}", path.display(), err),
        );
      });
    })
    .collect::<Result<Vec<Certificate>, TransportError>>()?;

  if certificates.is_empty() {
    return Err(TransportError::new(
      TransportErrorKind::CaBundle,
      format!("No certificate found in {}", path.display()),
    ));
  }

  return Ok(certificates);
}

fn format_head(response: &Response) -> String {
  let mut head = format!("{:?} {}\r\n", response.version(), response.status());

  for (name, value) in response.headers() {
    head.push_str(&format!(
      "{}: {}\r\n",
      name,
      String::from_utf8_lossy(value.as_bytes())
    ));
  }

  head.push_str("\r\n");

  return head;
}

#[cfg(test)]
mod test {
  use super::*;
  use std::io::BufRead;
  use std::io::BufReader;
  use std::io::Write;
  use std::net::TcpListener;

  const TEST_CERT_1: &str = "-----BEGIN CERTIFICATE-----
MIIBhTCCASugAwIBAgIUQdlhbWv/1qYq9i7Zjg0i8f6zwQIwCgYIKoZIzj0EAwIw
FzEVMBMGA1UEAwwMYml0bHktdGVzdC0xMCAXDTI2MTAxNTAxMTAyN1oYDzIxMjYw
OTIxMDExMDI3WjAXMRUwEwYDVQQDDAxiaXRseS10ZXN0LTEwWTATBgcqhkjOPQIB
BggqhkjOPQMBBwNCAARNj9Bdss/MLn73o+Ws/r2vFjmFnzrzgUkY2uPPuG60sBIw
1l0TYx9C3takza0kzxLd3wVosBJlhWyZG7iM4J4go1MwUTAdBgNVHQ4EFgQUhLuJ
MzxR1FsBApS/8JkETskdRVswHwYDVR0jBBgwFoAUhLuJMzxR1FsBApS/8JkETskd
RVswDwYDVR0TAQH/BAUwAwEB/zAKBggqhkjOPQQDAgNIADBFAiAVT8SvT8bbFsP1
PEEAqbRDC1VuSGTCUoOZne7EARW/HQIhAJZj16IbNs/X7etMiI5+k0EMzikjIMTm
7WVbg5qdKceX
-----END CERTIFICATE-----
";

  const TEST_CERT_2: &str = "-----BEGIN CERTIFICATE-----
MIIBhTCCASugAwIBAgIUXlPAlfqtOJaBeDUsTt65MxESMQswCgYIKoZIzj0EAwIw
FzEVMBMGA1UEAwwMYml0bHktdGVzdC0yMCAXDTI2MTAxNTAxMTAyN1oYDzIxMjYw
OTIxMDExMDI3WjAXMRUwEwYDVQQDDAxiaXRseS10ZXN0LTIwWTATBgcqhkjOPQIB
BggqhkjOPQMBBwNCAASqX7muGdLDxWyYYVJ9ynk+Bfk9kSlveZTjf7apU31TyW9Q
Pp+qTaJAB4+XS6PnK87jDBXGy5YzsS1mBBxi+6Hzo1MwUTAdBgNVHQ4EFgQU0asg
wl6+H4rbD3gg18yey1DsnFcwHwYDVR0jBBgwFoAU0asgwl6+H4rbD3gg18yey1Ds
nFcwDwYDVR0TAQH/BAUwAwEB/zAKBggqhkjOPQQDAgNIADBFAiEA9fXKYXVyQABs
wPFJ1FRz9wmfVshGq+z1dKdpldZ09HoCIFXXOx8MfTHpuqGvVQe2bceHOEjy1Aa7
4NFrMA9lFSH4
-----END CERTIFICATE-----
";

  const OK_RESPONSE: &str = "HTTP/1.1 200 OK\r\ncontent-length: 2\r\nconnection: close\r\n\r\nok";

  fn transport() -> ReqwestTransport {
    return ReqwestTransport::new(bitly_common::logger::discard()).unwrap();
  }

  /// Local server answering one connection per canned response, in order.
  /// Returns its base url.
  fn serve(responses: Vec<&'static str>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap();

    std::thread::spawn(move || {
      for response in responses {
        let (mut stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut line = String::new();

        // Requests are GETs without body, the head is all there is.
        loop {
          line.clear();

          if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
            break;
          }
        }

        stream.write_all(response.as_bytes()).unwrap();
      }
    });

    return format!("http://{}", address);
  }

  fn bundle_file(pem: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", pem).unwrap();

    return file;
  }

  mod perform {
    use super::*;

    #[test]
    fn it_should_return_body_only_by_default() {
      let url = Url::parse(&format!("{}/v3/shorten", serve(vec![OK_RESPONSE]))).unwrap();

      let body = transport()
        .perform(&url, &RequestOptions::default())
        .unwrap();

      assert_eq!(body, "ok");
    }

    #[test]
    fn it_should_prepend_head_when_including_headers() {
      let url = Url::parse(&format!("{}/v3/shorten", serve(vec![OK_RESPONSE]))).unwrap();
      let options = RequestOptions {
        include_headers: true,
        ..Default::default()
      };

      let body = transport().perform(&url, &options).unwrap();

      assert!(body.starts_with("HTTP/1.1 200 OK\r\n"));
      assert!(body.contains("content-length: 2\r\n"));
      assert!(body.ends_with("\r\n\r\nok"));
    }

    #[test]
    fn it_should_not_follow_redirect_by_default() {
      let base_url = serve(vec![
        "HTTP/1.1 302 Found\r\nlocation: /landed\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
      ]);
      let url = Url::parse(&format!("{}/v3/expand", base_url)).unwrap();

      let body = transport()
        .perform(&url, &RequestOptions::default())
        .unwrap();

      assert_eq!(body, "");
    }

    #[test]
    fn it_should_follow_redirect_when_enabled() {
      let base_url = serve(vec![
        "HTTP/1.1 302 Found\r\nlocation: /landed\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
        "HTTP/1.1 200 OK\r\ncontent-length: 6\r\nconnection: close\r\n\r\nlanded",
      ]);
      let url = Url::parse(&format!("{}/v3/expand", base_url)).unwrap();
      let options = RequestOptions {
        follow_redirects: true,
        ..Default::default()
      };

      let body = transport().perform(&url, &options).unwrap();

      assert_eq!(body, "landed");
    }

    #[test]
    fn it_should_build_client_from_valid_ca_bundle() {
      let bundle = bundle_file(&format!("{}{}", TEST_CERT_1, TEST_CERT_2));
      let url = Url::parse(&format!("{}/v3/shorten", serve(vec![OK_RESPONSE]))).unwrap();
      let options = RequestOptions {
        ca_bundle: Some(bundle.path().to_path_buf()),
        ..Default::default()
      };

      let body = transport().perform(&url, &options).unwrap();

      assert_eq!(body, "ok");
    }

    #[test]
    fn it_should_map_connection_refused_to_connect_error() {
      // Nothing listens on port 1 locally.
      let url = Url::parse("http://127.0.0.1:1/v3/shorten").unwrap();

      let err = transport()
        .perform(&url, &RequestOptions::default())
        .unwrap_err();

      assert_eq!(err.kind, TransportErrorKind::Connect);
      assert!(!err.message.is_empty());
    }

    #[test]
    fn it_should_fail_on_missing_ca_bundle() {
      let url = Url::parse("https://api-ssl.bitly.com/v3/shorten").unwrap();
      let options = RequestOptions {
        ca_bundle: Some(PathBuf::from("/definitely/not/here/bitly_ca.crt")),
        ..Default::default()
      };

      let err = transport().perform(&url, &options).unwrap_err();

      assert_eq!(err.kind, TransportErrorKind::CaBundle);
    }
  }

  mod read_ca_bundle {
    use super::*;

    #[test]
    fn it_should_read_every_certificate_of_chain() {
      let single = bundle_file(TEST_CERT_1);
      let chain = bundle_file(&format!(
        "leading comment\n{}\nsubject=bitly-test-2\n{}",
        TEST_CERT_1, TEST_CERT_2
      ));

      assert_eq!(read_ca_bundle(single.path()).unwrap().len(), 1);
      assert_eq!(read_ca_bundle(chain.path()).unwrap().len(), 2);
    }

    #[test]
    fn it_should_reject_file_without_certificates() {
      let mut file = tempfile::NamedTempFile::new().unwrap();
      writeln!(file, "this is not a certificate").unwrap();

      let err = read_ca_bundle(file.path()).unwrap_err();

      assert_eq!(err.kind, TransportErrorKind::CaBundle);
      assert!(err.message.starts_with("No certificate found"));
    }

    #[test]
    fn it_should_reject_garbage_certificate_block() {
      let mut file = tempfile::NamedTempFile::new().unwrap();
      writeln!(file, "{}\nbm90IGEgY2VydA==\n{}", PEM_BEGIN, PEM_END).unwrap();

      let err = read_ca_bundle(file.path()).unwrap_err();

      assert_eq!(err.kind, TransportErrorKind::CaBundle);
      assert!(err.message.starts_with("Invalid certificate"));
    }
  }

  mod client_settings {
    use super::*;

    #[test]
    fn it_should_ignore_request_level_options() {
      let mut options = RequestOptions::default();
      options.user_agent = Some("ua".into());
      options.post_fields = Some(vec![("a".into(), "b".into())]);
      options.include_headers = true;

      let settings = ClientSettings::from(&options);

      assert_eq!(
        settings,
        ClientSettings {
          follow_redirects: false,
          ca_bundle: None,
          user_agent: Some("ua".into()),
        }
      );
    }
  }
}
