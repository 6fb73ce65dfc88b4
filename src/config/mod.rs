// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Application configuration.
//!
//! Settings are read from the `confy` configuration file and may then be
//! overridden by environment variables, which is convenient for keeping
//! credentials out of the file.

use std::{path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

const CONFIG_NAME: &str = "survcam";

const LOG_FILE_NAME: &str = "survcam.log";

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] confy::ConfyError),

    #[error("invalid value {value:?} for {name}")]
    InvalidEnv { name: &'static str, value: String },

    #[error(
        "username and password are not configured, set them in {path} or via SYNOLOGY_USERNAME and SYNOLOGY_PASS"
    )]
    MissingCredentials { path: String },

    #[error("port must not be zero")]
    InvalidPort,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub version: u32,

    pub host: String,
    pub port: u16,
    pub use_https: bool,
    pub accept_invalid_certs: bool,

    pub username: String,
    pub password: String,

    pub auth_api_path: String,
    pub camera_api_path: String,
    pub info_api_path: String,

    pub request_timeout_secs: u64,
    /// Longest an upload or download may go without progress. Not a limit on
    /// the length of the whole transfer.
    pub transfer_timeout_secs: u64,

    /// How long a held key may go without a repeat before it counts as
    /// released, for terminals that do not report key releases.
    ///
    /// Must exceed the keyboard auto-repeat delay (660 ms on a default X.org
    /// setup), otherwise a held key stutters between Start and Stop. Larger
    /// values make the camera coast longer after a release.
    pub release_timeout_ms: u64,

    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            host: "localhost".to_string(),
            port: 5000,
            use_https: false,
            accept_invalid_certs: true,
            username: String::new(),
            password: String::new(),
            auth_api_path: "/webapi/auth.cgi".to_string(),
            camera_api_path: "/webapi/entry.cgi".to_string(),
            info_api_path: "/webapi/query.cgi".to_string(),
            request_timeout_secs: 10,
            transfer_timeout_secs: 120,
            release_timeout_ms: 750,
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

impl AppConfig {
    pub(crate) fn base_url(&self) -> String {
        let scheme = if self.use_https { "https" } else { "http" };
        format!("{}://{}:{}", scheme, self.host, self.port)
    }

    pub(crate) fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub(crate) fn transfer_timeout(&self) -> Duration {
        Duration::from_secs(self.transfer_timeout_secs)
    }

    pub(crate) fn release_timeout(&self) -> Duration {
        Duration::from_millis(self.release_timeout_ms)
    }

    /// Applies environment overrides, `lookup` returns the value of a
    /// variable if it is set.
    pub(crate) fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(host) = lookup("SYNOLOGY_IP") {
            self.host = host;
        }
        if let Some(port) = lookup("SYNOLOGY_PORT") {
            self.port = port.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                name: "SYNOLOGY_PORT",
                value: port,
            })?;
        }
        if let Some(username) = lookup("SYNOLOGY_USERNAME") {
            self.username = username;
        }
        if let Some(password) = lookup("SYNOLOGY_PASS") {
            self.password = password;
        }
        if let Some(path) = lookup("AUTH_API_PATH") {
            self.auth_api_path = path;
        }
        if let Some(path) = lookup("CAMERA_API_PATH") {
            self.camera_api_path = path;
        }
        if let Some(path) = lookup("INFO_API_PATH") {
            self.info_api_path = path;
        }
        if let Some(level) = lookup("SURVCAM_LOG") {
            self.log_level = level;
        }
        Ok(())
    }

    /// Checks the settings required before connecting.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.username.is_empty() || self.password.is_empty() {
            return Err(ConfigError::MissingCredentials {
                path: config_path_display(),
            });
        }
        if self.port == 0 {
            return Err(ConfigError::InvalidPort);
        }
        Ok(())
    }

    /// The log file to write to, by default next to the configuration file.
    pub(crate) fn log_path(&self) -> PathBuf {
        if let Some(path) = &self.log_file {
            return path.clone();
        }
        confy::get_configuration_file_path(CONFIG_NAME, None)
            .ok()
            .and_then(|p| p.parent().map(|dir| dir.join(LOG_FILE_NAME)))
            .unwrap_or_else(|| PathBuf::from(LOG_FILE_NAME))
    }
}

fn config_path_display() -> String {
    confy::get_configuration_file_path(CONFIG_NAME, None)
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| CONFIG_NAME.to_string())
}

/// Loads the configuration file, applies environment overrides and validates
/// the result.
pub(crate) fn load_config() -> Result<AppConfig, ConfigError> {
    let mut config: AppConfig = confy::load(CONFIG_NAME, None)?;
    config.apply_env(|name| std::env::var(name).ok())?;
    config.validate()?;
    Ok(config)
}
