//! Application configuration loaded from environment variables.

use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;
use url::Url;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Upstream ===
    /// EMY patient data endpoint (env `EMYPATIENT`).
    pub emypatient: String,

    /// Skip TLS certificate verification for the upstream call.
    #[serde(default, rename = "emy_accept_invalid_certs")]
    pub accept_invalid_certs: bool,

    /// Total timeout for the upstream request in milliseconds.
    #[serde(default = "default_timeout_ms", rename = "emy_timeout_ms")]
    pub timeout_ms: u64,

    /// Connect timeout for the upstream request in milliseconds.
    #[serde(default = "default_connect_timeout_ms", rename = "emy_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    // === Server Configuration ===
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    // === Page Shell ===
    /// Document title of the rendered page shell.
    #[serde(default = "default_app_title")]
    pub app_title: String,

    /// Client bundle version embedded in the page object.
    #[serde(default)]
    pub asset_version: String,
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_connect_timeout_ms() -> u64 {
    5_000
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_app_title() -> String {
    "EMY DISPLAY".to_string()
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// `main` reads `.env` before argument parsing so the same values also
    /// reach the logging flags.
    pub fn load() -> Result<Self, envy::Error> {
        envy::from_env()
    }

    /// Build a configuration for the given upstream URL with every other
    /// field at its default.
    pub fn with_upstream(url: impl Into<String>) -> Self {
        Self {
            emypatient: url.into(),
            accept_invalid_certs: false,
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            host: default_host(),
            port: default_port(),
            app_title: default_app_title(),
            asset_version: String::new(),
        }
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.emypatient.trim().is_empty() {
            return Err("EMYPATIENT is required".to_string());
        }

        let url = Url::parse(&self.emypatient)
            .map_err(|e| format!("EMYPATIENT is not a valid URL: {}", e))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(format!(
                "EMYPATIENT must use http or https, got {}",
                url.scheme()
            ));
        }

        if self.timeout_ms == 0 {
            return Err("EMY_TIMEOUT_MS must be greater than 0".to_string());
        }

        if self.connect_timeout_ms == 0 {
            return Err("EMY_CONNECT_TIMEOUT_MS must be greater than 0".to_string());
        }

        if self.host.parse::<std::net::IpAddr>().is_err() {
            return Err(format!("HOST is not a valid IP address: {}", self.host));
        }

        Ok(())
    }

    /// Upstream request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Upstream connect timeout.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Socket address to bind the HTTP server to.
    ///
    /// Falls back to all interfaces when `host` does not parse; `validate`
    /// reports that case.
    pub fn bind_addr(&self) -> SocketAddr {
        let ip = self
            .host
            .parse()
            .unwrap_or(std::net::IpAddr::from([0, 0, 0, 0]));
        SocketAddr::new(ip, self.port)
    }
}
