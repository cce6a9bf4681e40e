use clap::Arg;

use anyhow::anyhow;
use bitly_api::cli::BitlyCli;
use bitly_api::config::Config;
use bitly_common::logger;
use bitly_common::types::ResultAnyError;

pub mod built_info {
  include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

fn main() {
  let logger = logger::get();

  if let Err(err) = run(logger) {
    slog::error!(logger, "{:#}", err);

    // Let the async drain flush before exiting.
    std::thread::sleep(std::time::Duration::from_millis(50));
    std::process::exit(1);
  }
}

fn run(logger: &'static slog::Logger) -> ResultAnyError<()> {
  let cli = BitlyCli::cmd("bitly")
    .version(built_info::PKG_VERSION)
    .author(built_info::PKG_AUTHORS)
    .about(built_info::PKG_DESCRIPTION)
    .arg(
      Arg::with_name("config")
        .long("--config")
        .takes_value(true)
        .help("Config path, defaults to $HOME/.bitly"),
    )
    .get_matches();

  // Default config
  let config_path = match cli.value_of("config") {
    Some(path) => path.to_owned(),
    None => {
      let home_dir = std::env::var("HOME").map_err(|_| anyhow!("HOME is not set"))?;

      format!("{}/.bitly", home_dir)
    }
  };

  let config = Config::new(config_path)?;

  return BitlyCli::run(&cli, config, logger);
}
