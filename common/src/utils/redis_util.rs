use crate::error::AppError;
use deadpool_redis::{redis::cmd, Config, Connection, Pool, Runtime};

/// Redis 工具类 - 封装 deadpool-redis 连接池
#[derive(Clone)]
pub struct RedisUtil {
    pool: Pool,
}

impl RedisUtil {
    /// 从 URL 创建 Redis 连接池
    pub fn from_url(url: String) -> Result<Self, AppError> {
        log::info!("Initializing Redis connection pool");

        let cfg = Config::from_url(url);
        let pool = cfg
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| AppError::redis_error(format!("Failed to create Redis pool: {}", e)))?;

        Ok(RedisUtil { pool })
    }

    async fn conn(&self) -> Result<Connection, AppError> {
        self.pool
            .get()
            .await
            .map_err(|e| AppError::redis_error(format!("Redis connection error: {}", e)))
    }

    /// GET - 获取值
    pub async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let mut conn = self.conn().await?;
        let value: Option<String> = cmd("GET")
            .arg(&[key])
            .query_async(&mut conn)
            .await
            .map_err(|e| AppError::redis_error(format!("Redis GET error: {}", e)))?;
        Ok(value)
    }

    /// SETEX - 设置带过期时间的键值 (秒)
    pub async fn set_ex(&self, key: &str, value: &str, seconds: i64) -> Result<(), AppError> {
        let mut conn = self.conn().await?;
        cmd("SETEX")
            .arg(&[key, &seconds.to_string(), value])
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| AppError::redis_error(format!("Redis SETEX error: {}", e)))?;
        Ok(())
    }

    /// DEL - 删除键
    pub async fn del(&self, key: &str) -> Result<bool, AppError> {
        let mut conn = self.conn().await?;
        let deleted: i64 = cmd("DEL")
            .arg(&[key])
            .query_async(&mut conn)
            .await
            .map_err(|e| AppError::redis_error(format!("Redis DEL error: {}", e)))?;
        Ok(deleted > 0)
    }

    /// 按模式删除键 (KEYS + DEL)
    pub async fn del_pattern(&self, pattern: &str) -> Result<i64, AppError> {
        let mut conn = self.conn().await?;
        let keys: Vec<String> = cmd("KEYS")
            .arg(&[pattern])
            .query_async(&mut conn)
            .await
            .map_err(|e| AppError::redis_error(format!("Redis KEYS error: {}", e)))?;
        if keys.is_empty() {
            return Ok(0);
        }
        let mut del = cmd("DEL");
        for key in &keys {
            del.arg(key);
        }
        let deleted: i64 = del
            .query_async(&mut conn)
            .await
            .map_err(|e| AppError::redis_error(format!("Redis DEL error: {}", e)))?;
        Ok(deleted)
    }
}
