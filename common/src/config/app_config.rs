use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;

use crate::config::redis_conf::RedisConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub redis: RedisConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: String,
}

impl AppConfig {
    /// 从配置文件加载配置
    pub fn from_file(config_path: &str) -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            // 加载默认配置
            .add_source(File::with_name(config_path).required(false))
            // 加载环境特定配置
            .add_source(File::with_name(&format!("{}.{}", config_path, run_mode)).required(false))
            // 从环境变量加载配置（前缀为 APP_）
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    /// 从环境变量加载配置
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?;
        config.try_deserialize()
    }
}
