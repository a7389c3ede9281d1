use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Loader configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LoaderConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Source used when none is given on the command line
    #[serde(default = "default_source")]
    pub default_source: String,
    /// Number of list pages the CLI loads
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            user_agent: default_user_agent(),
            default_source: default_source(),
            max_pages: default_max_pages(),
        }
    }
}

// Default value functions
fn default_timeout() -> u64 {
    15
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36".to_string()
}

fn default_source() -> String {
    "povarenok".to_string()
}

fn default_max_pages() -> u32 {
    1
}

impl LoaderConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_LOADER__ prefix
    /// 2. recipe-loader.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_LOADER__TIMEOUT
    pub fn load() -> Result<Self, ConfigError> {
        load_config("recipe-loader")
    }
}

/// Load configuration from an optional file (extension resolved by `config`)
/// and `RECIPE_LOADER__*` environment variables.
pub fn load_config(file_name: &str) -> Result<LoaderConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name(file_name).required(false))
        .add_source(
            Environment::with_prefix("RECIPE_LOADER")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
