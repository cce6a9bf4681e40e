use std::sync::OnceLock;

use slog::*;

static LOGGER: OnceLock<Logger> = OnceLock::new();

/// Process wide root logger, filtered by `RUST_LOG` (defaults to `info`).
pub fn get() -> &'static Logger {
  return LOGGER.get_or_init(|| {
    // reqwest and friends log through the `log` facade, a host application
    // may have installed its own `log` backend already.
    env_logger::try_init().ok();

    let log_decorator = slog_term::TermDecorator::new().build();
    let log_drain = slog_term::CompactFormat::new(log_decorator).build().fuse();
    let rust_log_val = std::env::var("RUST_LOG").unwrap_or("info".to_owned());
    let log_drain = slog_envlogger::LogBuilder::new(log_drain)
      .parse(&rust_log_val)
      .build();

    let log_drain = slog_async::Async::new(log_drain).build().fuse();

    return slog::Logger::root(log_drain, o!());
  });
}

/// Logger that swallows every record, for library callers that don't care.
pub fn discard() -> Logger {
  return slog::Logger::root(slog::Discard, o!());
}
