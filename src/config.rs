use serde::Deserialize;
use std::env;

use crate::game::mancala::DEFAULT_STONES_PER_HOLE;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub addr: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Redis,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub backend: StoreBackend,
    pub redis_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

fn default_stones_per_hole() -> u32 {
    DEFAULT_STONES_PER_HOLE
}

#[derive(Debug, Clone, Deserialize)]
pub struct GamesConfig {
    #[serde(default = "default_stones_per_hole")]
    pub mancala_stones_per_hole: u32,
}

impl Default for GamesConfig {
    fn default() -> Self {
        Self {
            mancala_stones_per_hole: DEFAULT_STONES_PER_HOLE,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub games: GamesConfig,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = env::var("RUN_ENV").unwrap_or_else(|_| "local".into());

        let builder = ::config::Config::builder()
            .add_source(config::File::with_name("config/default.toml"))
            .add_source(
                config::File::with_name(&format!("config/{}", env))
                    .required(false),
            )
            .add_source(config::File::with_name("config/local.toml").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"));

        builder.build()?.try_deserialize()
    }
}
