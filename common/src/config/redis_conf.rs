use serde::{Deserialize, Serialize};

/// Redis 缓存配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    /// Redis 主机地址
    #[serde(default = "default_host")]
    pub host: String,
    /// Redis 端口
    #[serde(default = "default_port")]
    pub port: u16,
    /// Redis 密码（可选）
    #[serde(default)]
    pub password: Option<String>,
    /// 数据库编号
    #[serde(default)]
    pub database: u8,
    /// 连接池大小
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    6379
}

fn default_pool_size() -> u32 {
    10
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 6379,
            password: None,
            database: 0,
            pool_size: 10,
        }
    }
}

impl RedisConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("REDIS_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: std::env::var("REDIS_PORT")
                .unwrap_or_else(|_| "6379".to_string())
                .parse()
                .unwrap_or(6379),
            password: std::env::var("REDIS_PASSWORD").ok(),
            database: std::env::var("REDIS_DATABASE")
                .unwrap_or_else(|_| "0".to_string())
                .parse()
                .unwrap_or(0),
            pool_size: std::env::var("REDIS_POOL_SIZE")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
        }
    }

    /// 构建 Redis 连接 URL
    ///
    /// 格式：
    /// - 无密码: redis://host:port/database
    /// - 有密码: redis://:password@host:port/database
    pub fn build_url(&self) -> String {
        match &self.password {
            Some(password) if !password.is_empty() => format!(
                "redis://:{}@{}:{}/{}",
                password, self.host, self.port, self.database
            ),
            _ => format!("redis://{}:{}/{}", self.host, self.port, self.database),
        }
    }
}
