#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! MCP server exposing Rize time tracking as tools

pub mod errors;
pub mod format;
pub(crate) mod json_schema;
pub mod runtime;
pub mod server;
pub mod tools;
