pub mod config;
pub mod db;
pub mod errors;
pub mod logging;
pub mod service;

#[cfg(test)]
pub(crate) mod test_utils;

pub use errors::{LiftlogError, Result};
pub use service::{Service, UserId};
