// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Configuration module for rk.
//!
//! This module handles finding, loading and parsing `rk.toml`.

pub mod default;
mod loader;
mod schema;

pub use default::default_config;
pub use loader::{find_config_file, find_config_file_from, load_config, parse_config};
pub use schema::*;
