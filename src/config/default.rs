// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Default configuration values.

use super::schema::RkConfig;

/// Get the default configuration.
pub fn default_config() -> RkConfig {
    RkConfig::default()
}

/// Generate an example configuration file.
pub fn example_config() -> &'static str {
    r#"# RK Configuration File
# Author: Eshan Roy
# SPDX-License-Identifier: MIT

# Rule documents
[rules]
# Primary location searched first:
#   "bundled:<namespace>"  bundled resources (see `resources`)
#   "file:<dir>" or "<dir>" a directory on disk
location = "file:validation/"
file = "validation-rules.yml"
cache = true
# resources = "resources"

# Record kind -> rule-set identifier
[registry]
user = "user-validation.yml"

# Output
[output]
color = true
"#
}

/// Example rule document written next to a fresh configuration.
pub fn example_rules() -> &'static str {
    r#"rules:
  - field: "username"
    type: "notblank"
    message: "Username is required"
  - field: "username"
    type: "pattern"
    pattern: "^[a-zA-Z0-9_]+$"
    message: "Invalid username format"
  - field: "password"
    type: "size"
    min: 8
    max: 100
    message: "Password must be between 8 and 100 characters"
  - field: "address.state"
    type: "enum"
    values: ["NY", "CA", "TX"]
    message: "Invalid state"
  - field: "address.zipCode"
    type: "pattern"
    pattern: "\\d{5}"
    message: "Zip code must be 5 digits"
"#
}
