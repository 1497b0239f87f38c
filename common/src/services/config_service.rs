use crate::error::AppError;
use crate::services::config_mapping::ConfigMapping;
use crate::utils::redis_util::RedisUtil;

use rbatis::rbdc::datetime::DateTime;
use rbatis::{crud, RBatis};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// app配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub id: Option<i64>,
    pub code: Option<String>,
    pub value: Option<String>,
    pub remark: Option<String>,
    pub create_time: Option<DateTime>,
    pub update_time: Option<DateTime>,
}

crud!(AppConfig {}, "app_config");

/// 配置服务
///
/// 提供数据库配置的加载和缓存管理功能
pub struct ConfigService {
    rb: Arc<RBatis>,
    redis: Arc<RedisUtil>,
}

impl ConfigService {
    /// 创建新的配置服务实例
    pub fn new(rb: Arc<RBatis>, redis: Arc<RedisUtil>) -> Self {
        Self { rb, redis }
    }

    /// 加载类型 T 的配置, 优先读缓存
    pub async fn load_config<T: ConfigMapping>(&self) -> Result<T, AppError> {
        let cache_key = T::cache_key();

        // 1. 尝试从 Redis 缓存读取
        if let Ok(Some(cached_json)) = self.redis.get(&cache_key).await {
            if let Ok(loaded_config) = serde_json::from_str::<T>(&cached_json) {
                log::debug!("Config loaded from cache: {}", cache_key);
                return Ok(loaded_config);
            }
        }

        log::debug!("Cache miss for {}, loading from database", cache_key);

        // 2. 从数据库加载
        let configs = AppConfig::select_all(self.rb.as_ref())
            .await
            .map_err(|e| AppError::database_error(e.to_string()))?;

        // 3. 折叠为键值表
        let mut config_map: HashMap<String, String> = HashMap::new();
        for c in configs {
            if let (Some(code), Some(value)) = (c.code, c.value) {
                config_map.insert(code, value);
            }
        }

        // 4. 构建强类型配置
        let loaded_config = T::from_config_map(config_map);

        // 5. 缓存一小时
        let config_json = serde_json::to_string(&loaded_config)?;
        if let Err(e) = self.redis.set_ex(&cache_key, &config_json, 3600).await {
            log::warn!("Failed to cache config: {}", e);
        }

        Ok(loaded_config)
    }

    /// 失效全部配置缓存
    pub async fn invalidate_config_cache(&self) -> Result<(), AppError> {
        let deleted = self.redis.del_pattern("app_config:*").await?;
        log::info!("Config cache invalidated ({} keys deleted)", deleted);
        Ok(())
    }

    /// 更新单个配置项并失效缓存
    pub async fn set_value(&self, code: &str, value: &str) -> Result<(), AppError> {
        let rows: Vec<AppConfig> = self
            .rb
            .query_decode(
                "SELECT * FROM app_config WHERE code = ?",
                vec![rbs::to_value!(code)],
            )
            .await
            .map_err(|e| AppError::database_error(e.to_string()))?;

        match rows.into_iter().next() {
            Some(mut row) => {
                row.value = Some(value.to_string());
                row.update_time = Some(DateTime::now());
                AppConfig::update_by_map(self.rb.as_ref(), &row, rbs::value! {"code": code})
                    .await
                    .map_err(|e| AppError::database_error(e.to_string()))?;
            }
            None => {
                let row = AppConfig {
                    id: None,
                    code: Some(code.to_string()),
                    value: Some(value.to_string()),
                    remark: None,
                    create_time: Some(DateTime::now()),
                    update_time: Some(DateTime::now()),
                };
                AppConfig::insert(self.rb.as_ref(), &row)
                    .await
                    .map_err(|e| AppError::database_error(e.to_string()))?;
            }
        }

        self.invalidate_config_cache().await
    }
}
