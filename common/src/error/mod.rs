// 错误处理模块
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("账号不存在: {0}")]
    AccountNotFound(i64),

    #[error("{0}")]
    InsufficientFunds(String),

    #[error("无效的操作编号: {0}")]
    InvalidCode(String),

    #[error("通道拒绝请求: {0}")]
    GatewayRejected(String),

    #[error("通道暂时不可用: {0}")]
    GatewayTransient(String),

    #[error("数据保存失败: {0}")]
    DataPersistenceFailed(String),

    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("Redis错误: {0}")]
    RedisError(String),

    #[error("配置错误: {0}")]
    ConfigError(String),

    #[error("序列化错误: {0}")]
    SerializationError(String),

    #[error("业务错误: {0}")]
    BusinessError(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn database_error(msg: impl Into<String>) -> Self {
        AppError::DatabaseError(msg.into())
    }

    pub fn redis_error(msg: impl Into<String>) -> Self {
        AppError::RedisError(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        AppError::ConfigError(msg.into())
    }

    pub fn business(msg: impl Into<String>) -> Self {
        AppError::BusinessError(msg.into())
    }
}

// 从 rbatis 错误转换 (rbatis::Error 包含了 rbdc::Error)
impl From<rbatis::Error> for AppError {
    fn from(err: rbatis::Error) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

// 从 redis 连接池错误转换
impl From<deadpool_redis::PoolError> for AppError {
    fn from(err: deadpool_redis::PoolError) -> Self {
        AppError::RedisError(err.to_string())
    }
}

impl From<deadpool_redis::redis::RedisError> for AppError {
    fn from(err: deadpool_redis::redis::RedisError) -> Self {
        AppError::RedisError(err.to_string())
    }
}

// 从配置加载错误转换
impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::SerializationError(err.to_string())
    }
}
