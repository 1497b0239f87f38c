use async_trait::async_trait;
use common::services::{ConfigService, TransferWxpayConfig};
use common::{AppError, AppResult};
use orm::entities::AppAccountBind;
use rbatis::RBatis;
use std::sync::Arc;

/// 打款身份信息
#[derive(Debug, Clone)]
pub struct PayoutProfile {
    pub appid: String,
    pub openid: String,
}

/// 按用户解析打款身份 (appid/openid)
#[async_trait]
pub trait PayoutProvider: Send + Sync {
    async fn payout_profile(&self, unid: i64) -> AppResult<PayoutProfile>;
}

/// 基于商户配置与账号绑定表的打款身份解析
pub struct DbPayoutProvider {
    rb: Arc<RBatis>,
    config: Arc<ConfigService>,
}

impl DbPayoutProvider {
    pub fn new(rb: Arc<RBatis>, config: Arc<ConfigService>) -> Self {
        Self { rb, config }
    }
}

#[async_trait]
impl PayoutProvider for DbPayoutProvider {
    async fn payout_profile(&self, unid: i64) -> AppResult<PayoutProfile> {
        let cfg: TransferWxpayConfig = self.config.load_config().await?;
        if cfg.mch_id.is_empty() {
            return Err(AppError::config_error("未配置提现商户"));
        }

        // 按授权类型取用户 openid
        let bind = match cfg.wechat_type.as_str() {
            t @ ("wxapp" | "wechat") => {
                AppAccountBind::select_by_unid_type(self.rb.as_ref(), unid, t).await?
            }
            _ => AppAccountBind::select_first_with_openid(self.rb.as_ref(), unid).await?,
        };
        let openid = bind
            .and_then(|b| b.openid)
            .filter(|openid| !openid.is_empty())
            .ok_or_else(|| AppError::business("无法读取打款数据"))?;

        let appid = match cfg.wechat_type.as_str() {
            "wxapp" => cfg.wxapp_appid,
            _ => cfg.appid,
        };

        Ok(PayoutProfile { appid, openid })
    }
}
