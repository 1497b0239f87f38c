use common::services::{ConfigService, TransferWxpayConfig};
use common::AppResult;
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::store::TransferStore;

/// 提现数据统计
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransferAmount {
    /// 已受理提现合计 (status >= 1)
    pub total: Decimal,
    /// 已打款/打款中合计 (status >= 4)
    pub count: Decimal,
    /// 审核中合计 (1 <= status < 3)
    pub audit: Decimal,
    /// 待打款合计 (status = 3)
    pub locks: Decimal,
}

/// 获取提现商户配置
pub async fn payment(config: &ConfigService) -> AppResult<TransferWxpayConfig> {
    config.load_config().await
}

/// 用户提现数据服务
pub struct TransferService {
    store: Arc<dyn TransferStore>,
}

impl TransferService {
    pub fn new(store: Arc<dyn TransferStore>) -> Self {
        Self { store }
    }

    /// 同步统计用户提现数据, unid 为 0 时统计全量
    pub async fn amount(&self, unid: i64) -> AppResult<TransferAmount> {
        let unid = (unid > 0).then_some(unid);
        let locks = self.store.sum_in_status(unid, &[3]).await?.abs();
        let total = self
            .store
            .sum_in_status(unid, &[1, 2, 3, 4, 5])
            .await?
            .abs();
        let count = self.store.sum_in_status(unid, &[4, 5]).await?.abs();
        let audit = self.store.sum_in_status(unid, &[1, 2]).await?.abs();
        Ok(TransferAmount {
            total,
            count,
            audit,
            locks,
        })
    }
}
