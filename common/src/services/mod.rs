// 通用服务模块

pub mod config_mapping;
pub mod config_service;

pub use config_mapping::{ConfigMapping, PaymentSetting, TransferWxpayConfig};
pub use config_service::ConfigService;
