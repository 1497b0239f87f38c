use rbatis::rbdc::datetime::DateTime;
use rbatis::{crud, impl_select};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 支付退款申请记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppPaymentRefund {
    pub id: Option<i64>,
    pub unid: i64,
    /// 退款单号
    pub code: String,
    /// 关联的支付记录编号
    pub record_code: String,
    /// 退款完成时间
    pub refund_time: Option<DateTime>,
    /// 通道退款交易编号
    pub refund_trade: Option<String>,
    /// 退款状态 (0未退, 1已退, 2取消)
    pub refund_status: i32,
    /// 退款金额
    pub refund_amount: Decimal,
    /// 退回账号
    pub refund_account: Option<String>,
    /// 通道状态编码
    pub refund_scode: Option<String>,
    /// 退款备注
    pub refund_remark: Option<String>,
    /// 通知原文
    pub refund_notify: Option<String>,
    pub create_time: Option<DateTime>,
    pub update_time: Option<DateTime>,
}

crud!(AppPaymentRefund {}, "app_payment_refund");
impl_select!(AppPaymentRefund{select_by_code(code: &str) -> Option => "`where code = #{code} limit 1`"});

impl AppPaymentRefund {
    pub const TABLE_NAME: &'static str = "app_payment_refund";
}
