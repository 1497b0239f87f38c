// 公共模块
// 提供数据库、Redis、日志、错误处理等通用功能

pub mod config;
pub mod error;
pub mod logger;
pub mod services;
pub mod utils;

// 重新导出常用类型和函数
pub use error::{AppError, AppResult};
pub use config::{AppConfig, DbConfig, RedisConfig};
pub use logger::{init_logger, init_logger_with_level};

// 数据库相关
pub use config::{init_db, get_db, test_connection as test_db_connection};
