use clap::App as Cli;
use clap::Arg;
use clap::ArgMatches;
use clap::SubCommand;
use slog::Logger;

use crate::client::BitlyClient;
use crate::client::ResponseFormat;
use crate::config::Config;
use crate::response::ApiResponse;
use crate::response::ExpandData;
use crate::response::ShortenData;
use crate::response::TokenResponse;
use bitly_common::types::ResultAnyError;

pub struct BitlyCli {}

impl BitlyCli {
  pub fn cmd<'a, 'b>(name: &str) -> Cli<'a, 'b> {
    let raw_arg = Arg::with_name("raw")
      .long("--raw")
      .required(false)
      .help("Print the response body as returned by bit.ly");

    return Cli::new(name.to_owned())
      .setting(clap::AppSettings::ArgRequiredElseHelp)
      .about("bit.ly cli")
      .subcommand(
        SubCommand::with_name("shorten")
          .about("Shorten the given url")
          .arg(Arg::with_name("long_url").required(true).help("Long Url"))
          .arg(
            Arg::with_name("format")
              .long("--format")
              .required(false)
              .takes_value(true)
              .default_value("json")
              .possible_values(&["json", "xml", "txt"])
              .help("Response format requested from bit.ly"),
          )
          .arg(raw_arg.clone()),
      )
      .subcommand(
        SubCommand::with_name("expand")
          .about("Expand the given bit.ly url")
          .arg(Arg::with_name("short_url").required(true).help("Short Url"))
          .arg(raw_arg.clone()),
      )
      .subcommand(
        SubCommand::with_name("xauth")
          .about("Exchange username and password for an access token")
          .arg(Arg::with_name("username").required(true).help("bit.ly username"))
          .arg(Arg::with_name("password").required(true).help("bit.ly password"))
          .arg(raw_arg),
      );
  }

  pub fn run(cli: &ArgMatches<'_>, config: Config, logger: &'static Logger) -> ResultAnyError<()> {
    let client = BitlyClient::with_ca_bundle(
      config.bitly.credentials(),
      &config.bitly.ca_bundle_path,
      logger.new(slog::o!("cli" => "bitly")),
    )?;

    match cli.subcommand() {
      ("shorten", Some(shorten_cli)) => {
        let long_url: &str = shorten_cli.value_of("long_url").unwrap();
        let format: ResponseFormat = shorten_cli.value_of("format").unwrap().into();

        let body = client.links().shorten_with_format(long_url, format)?;

        if shorten_cli.is_present("raw") || format != ResponseFormat::Json {
          println!("{}", body);
        } else {
          let data = ApiResponse::<ShortenData>::from_body(&body)?.into_data()?;

          println!("{}", data.url);
        }
      }
      ("expand", Some(expand_cli)) => {
        let short_url: &str = expand_cli.value_of("short_url").unwrap();

        let body = client.links().expand(short_url, ResponseFormat::Json)?;

        if expand_cli.is_present("raw") {
          println!("{}", body);
        } else {
          let data = ApiResponse::<ExpandData>::from_body(&body)?.into_data()?;

          for link in data.expand {
            match (link.long_url, link.error) {
              (Some(long_url), _) => println!("{}", long_url),
              (None, Some(error)) => slog::warn!(logger, "Could not expand {}: {}", short_url, error),
              (None, None) => slog::warn!(logger, "Could not expand {}", short_url),
            }
          }
        }
      }
      ("xauth", Some(xauth_cli)) => {
        let username: &str = xauth_cli.value_of("username").unwrap();
        let password: &str = xauth_cli.value_of("password").unwrap();

        let body = client.xauth().request_token(username, password)?;

        if xauth_cli.is_present("raw") {
          println!("{}", body);
        } else {
          let token = TokenResponse::from_body(&body)?;

          println!("{}", token.access_token);
        }
      }
      _ => {}
    }

    return Ok(());
  }
}
