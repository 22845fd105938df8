mod auth;
mod client;
mod connection;
pub mod domain;
mod ledger_url;
#[cfg(test)]
mod test_server;

pub(crate) use ledger_url::*;

pub use auth::*;
pub use client::*;
pub use connection::*;
