use rbatis::rbdc::datetime::DateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 资金流水行
///
/// 余额流水表与积分流水表列结构完全一致, 共用同一个行结构,
/// 读写时由资金池决定落在哪张表, 因此这里不绑定 crud 宏
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentLedger {
    pub id: Option<i64>,
    /// 主账号编号
    pub unid: i64,
    /// 交易标识, 同一账号未删除流水内唯一
    pub code: String,
    /// 交易标题
    pub name: String,
    /// 变更金额, 正数入账负数出账
    pub amount: Decimal,
    /// 变更描述
    pub remark: String,
    /// 解锁状态 (false 锁定中, true 已生效)
    pub unlock: bool,
    pub unlock_time: Option<DateTime>,
    /// 作废状态
    pub cancel: bool,
    pub cancel_time: Option<DateTime>,
    /// 删除状态 (软删除)
    pub deleted: bool,
    pub deleted_time: Option<DateTime>,
    pub create_time: Option<DateTime>,
}

impl PaymentLedger {
    /// 余额流水表
    pub const BALANCE_TABLE: &'static str = "app_payment_balance";
    /// 积分流水表
    pub const INTEGRAL_TABLE: &'static str = "app_payment_integral";

    /// 是否计入统计 (未作废且未删除)
    pub fn is_active(&self) -> bool {
        !self.cancel && !self.deleted
    }
}
