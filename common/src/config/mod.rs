// 配置模块

pub mod app_config;
pub mod db_conf;
pub mod redis_conf;

pub use app_config::{AppConfig, DatabaseConfig, LogConfig, ServerConfig};
pub use db_conf::{get_db, init_db, test_connection, DbConfig};
pub use redis_conf::RedisConfig;
