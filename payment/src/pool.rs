use orm::entities::PaymentLedger;

/// 资金池类型: 余额 / 积分
///
/// 两个资金池的流水结构与统计算法完全一致, 仅落表和
/// 个别数值语义不同, 由这里的枚举统一区分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pool {
    Balance,
    Integral,
}

impl Pool {
    /// 流水表名
    pub fn table(&self) -> &'static str {
        match self {
            Pool::Balance => PaymentLedger::BALANCE_TABLE,
            Pool::Integral => PaymentLedger::INTEGRAL_TABLE,
        }
    }

    /// 账户快照字段前缀 (balance_lock / integral_lock 等)
    pub fn prefix(&self) -> &'static str {
        match self {
            Pool::Balance => "balance",
            Pool::Integral => "integral",
        }
    }

    /// 扣减不足时的提示语
    pub fn insufficient_message(&self) -> &'static str {
        match self {
            Pool::Balance => "扣减余额不足",
            Pool::Integral => "扣减积分不足",
        }
    }

    /// 可用数是否四舍五入保留两位小数
    pub fn rounds_usable(&self) -> bool {
        matches!(self, Pool::Integral)
    }
}
