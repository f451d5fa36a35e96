//! Pipeline and service configuration.
//!
//! [`PipelineConfig`] controls how the source table is decoded and which year columns are melted.
//! [`ServiceConfig`] is the small surface the HTTP binding reads at startup (host, port, data path).

use std::path::PathBuf;

use serde::Deserialize;

use crate::types::YearRange;

/// Header of the citizenship column.
pub const CITIZENSHIP_COLUMN: &str = "Citizenship";
/// Header of the 2-digit CIP code-and-description column.
pub const CIP_COLUMN: &str = "CIP Code and Description (2 digit)";
/// Header of the award level code column. Always decoded as text.
pub const AWARD_LEVEL_COLUMN: &str = "Award Level Code";

/// Categorical columns every source table must carry (year columns come from [`YearRange`]).
pub const REQUIRED_COLUMNS: [&str; 3] = [CITIZENSHIP_COLUMN, CIP_COLUMN, AWARD_LEVEL_COLUMN];

/// Options controlling how a source table is reshaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PipelineConfig {
    /// Year columns to melt; each is named by its decimal year (e.g. `"1997"`).
    pub years: YearRange,
}

impl PipelineConfig {
    pub fn new(years: YearRange) -> Self {
        Self { years }
    }
}

/// Port used when neither the config file nor the environment sets one.
pub const DEFAULT_PORT: u16 = 8050;

/// Runtime service configuration.
///
/// Deserialised from an optional TOML file, `STEM_*` environment variables, and finally the bare
/// `PORT` variable, in increasing precedence. See [`ServiceConfig::load`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_data_path() -> PathBuf {
    PathBuf::from("NCES_IPEDS_RAW_DATA.csv")
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            data_path: default_data_path(),
        }
    }
}

impl ServiceConfig {
    /// `host:port` string suitable for binding a listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(feature = "server")]
impl ServiceConfig {
    /// Load configuration from `file` (optional on disk) and the process environment.
    pub fn load(file: &std::path::Path) -> Result<Self, config::ConfigError> {
        Self::load_with_port(file, std::env::var("PORT").ok())
    }

    /// Like [`ServiceConfig::load`], with the `PORT` override passed explicitly.
    pub fn load_with_port(
        file: &std::path::Path,
        port_override: Option<String>,
    ) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from(file).required(false))
            .add_source(config::Environment::with_prefix("STEM"))
            .set_override_option("port", port_override)?
            .build()?
            .try_deserialize()
    }
}
