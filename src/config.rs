//! Router settings, loadable from TOML.
//!
//! ```toml
//! redirect_trailing_slash = true
//! handle_method_not_allowed = true
//! handle_options = true
//! merge_routes = false
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Redirect to the same path with (or without) a trailing slash when
    /// only that variant has a route.
    pub redirect_trailing_slash: bool,
    /// Answer `405 Method Not Allowed` when the path matches under another
    /// method.
    pub handle_method_not_allowed: bool,
    /// Answer `OPTIONS` requests automatically.
    pub handle_options: bool,
    /// Allow [`Router::merge_routes`](crate::Router::merge_routes).
    pub merge_routes: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            redirect_trailing_slash: true,
            handle_method_not_allowed: true,
            handle_options: true,
            merge_routes: false,
        }
    }
}

impl RouterConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}
