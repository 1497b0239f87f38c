// 存储契约层
// 流水/账户/提现/订单的读写入口, 服务层只通过这里访问数据

pub mod db;
#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use common::AppResult;
use orm::entities::{AppPaymentRecord, AppPaymentRefund, AppPaymentTransfer, PaymentLedger};
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::pool::Pool;

pub use db::{DbAccountStore, DbLedgerStore, DbOrderStore, DbTransferStore};

/// 流水求和过滤条件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SumFilter {
    /// 全部有效流水 (未作废未删除)
    Active,
    /// 锁定中 (unlock = 0)
    Locked,
    /// 已生效支出 (amount < 0 且已解锁; 锁定中的扣减只计入 Locked)
    Outgoing,
    /// 收入 (amount > 0)
    Incoming,
}

/// 资金流水存储
///
/// 流水只增不改削, 作废与删除都是状态位; 除流水服务外
/// 任何组件不得直接写入
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// 按 (unid, code) 定位未删除流水
    async fn find(&self, pool: Pool, unid: i64, code: &str) -> AppResult<Option<PaymentLedger>>;

    /// 按 code 全局定位未删除流水
    async fn find_by_code(&self, pool: Pool, code: &str) -> AppResult<Option<PaymentLedger>>;

    /// 写入流水, id 已存在则按 id 覆盖
    async fn save(&self, pool: Pool, entry: &PaymentLedger) -> AppResult<PaymentLedger>;

    /// 按条件求和, unid 为 None 时统计全量
    async fn sum(&self, pool: Pool, unid: Option<i64>, filter: SumFilter) -> AppResult<Decimal>;
}

/// 账户存储 (资产快照落在账户附加字段上)
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// 账号是否存在
    async fn exists(&self, unid: i64) -> AppResult<bool>;

    /// 合并账户附加字段, 不覆盖无关键
    async fn merge_extra(
        &self,
        unid: i64,
        data: &HashMap<String, serde_json::Value>,
    ) -> AppResult<()>;
}

/// 提现订单存储
#[async_trait]
pub trait TransferStore: Send + Sync {
    /// 按游标顺序取线上通道待处理订单 (status in 3,4)
    async fn list_pending(&self) -> AppResult<Vec<AppPaymentTransfer>>;

    /// 按 id 回写订单
    async fn update(&self, job: &AppPaymentTransfer) -> AppResult<()>;

    /// 指定状态集合内的金额合计, unid 为 None 时统计全量
    async fn sum_in_status(&self, unid: Option<i64>, statuses: &[i32]) -> AppResult<Decimal>;
}

/// 支付记录/退款单存储 (归订单子系统所有, 这里只做对账读写)
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn find_record(&self, code: &str) -> AppResult<Option<AppPaymentRecord>>;

    async fn update_record(&self, record: &AppPaymentRecord) -> AppResult<()>;

    async fn find_refund(&self, code: &str) -> AppResult<Option<AppPaymentRefund>>;

    /// 写入退款单, id 已存在则按 id 覆盖
    async fn save_refund(&self, refund: &AppPaymentRefund) -> AppResult<AppPaymentRefund>;
}
