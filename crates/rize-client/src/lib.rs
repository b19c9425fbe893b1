#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Client for the Rize time-tracking GraphQL API

mod client;
pub mod error;
pub mod model;
pub mod operations;
pub mod time_window;

pub use client::{DEFAULT_ENDPOINT, RizeClient};
pub use error::{ErrorKind, RizeError};
pub use operations::Operation;
pub use secrecy::SecretString;
