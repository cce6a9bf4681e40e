//! Simple bit.ly v3 API access.
//!
//! [`client::BitlyClient`] resolves a named endpoint, builds the query string
//! (or form body for xAuth) and runs exactly one blocking request through a
//! [`transport::Transport`]. Bodies come back raw, see [`response`] for
//! decoding them.

pub mod cli;
pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod query;
pub mod request;
pub mod response;
pub mod transport;

pub use client::BitlyClient;
pub use client::Credentials;
pub use client::ResponseFormat;
pub use error::BitlyError;
pub use error::BitlyResult;
