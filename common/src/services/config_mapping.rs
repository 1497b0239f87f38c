use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 数据库键值配置到强类型配置的映射
///
/// app_config 表按 (code, value) 存放散键, 实现方负责
/// 把散键折叠成自己的字段并提供缓存键
pub trait ConfigMapping: Serialize + DeserializeOwned {
    /// 缓存键
    fn cache_key() -> String;

    /// 从配置键值表构建
    fn from_config_map(map: HashMap<String, String>) -> Self;
}

/// 支付插件参数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSetting {
    /// 积分兑换比率 (多少积分折算一元)
    pub integral_rate: Decimal,
}

impl ConfigMapping for PaymentSetting {
    fn cache_key() -> String {
        "app_config:payment.setting".to_string()
    }

    fn from_config_map(map: HashMap<String, String>) -> Self {
        let integral_rate = map
            .get("payment.integral.rate")
            .and_then(|v| v.parse().ok())
            .unwrap_or(Decimal::ONE);
        Self { integral_rate }
    }
}

/// 微信提现商户配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferWxpayConfig {
    /// 公众号 appid
    pub appid: String,
    /// 小程序 appid
    pub wxapp_appid: String,
    /// 授权类型 (normal|wxapp|wechat)
    pub wechat_type: String,
    /// 商户号
    pub mch_id: String,
    /// 商户密钥
    pub mch_key: String,
}

impl ConfigMapping for TransferWxpayConfig {
    fn cache_key() -> String {
        "app_config:payment.transfer.wxpay".to_string()
    }

    fn from_config_map(map: HashMap<String, String>) -> Self {
        let take = |key: &str| map.get(key).cloned().unwrap_or_default();
        Self {
            appid: take("payment.transfer.appid"),
            wxapp_appid: take("payment.transfer.wxapp_appid"),
            wechat_type: take("payment.transfer.wechat_type"),
            mch_id: take("payment.transfer.mch_id"),
            mch_key: take("payment.transfer.mch_key"),
        }
    }
}
