use rbatis::rbdc::datetime::DateTime;
use rbatis::{crud, impl_select};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 用户支付行为记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppPaymentRecord {
    pub id: Option<i64>,
    pub unid: i64,
    /// 发起支付号
    pub code: String,
    /// 原订单编号
    pub order_no: Option<String>,
    /// 原订单标题
    pub order_name: Option<String>,
    /// 原订单金额
    pub order_amount: Option<Decimal>,
    /// 支付通道类型
    pub channel_type: Option<String>,
    /// 支付通道编号
    pub channel_code: Option<String>,
    /// 支付生效时间
    pub payment_time: Option<DateTime>,
    /// 平台交易编号
    pub payment_trade: Option<String>,
    /// 支付状态 (0未付, 1已付, 2取消)
    pub payment_status: i32,
    /// 实际支付金额
    pub payment_amount: Decimal,
    /// 平台优惠券金额
    pub payment_coupon: Option<Decimal>,
    /// 支付通知内容
    pub payment_notify: Option<String>,
    /// 退款状态 (0未退, 1已退)
    pub refund_status: Option<i32>,
    /// 累计退款
    pub refund_amount: Option<Decimal>,
    pub create_time: Option<DateTime>,
    pub update_time: Option<DateTime>,
}

crud!(AppPaymentRecord {}, "app_payment_record");
impl_select!(AppPaymentRecord{select_by_code(code: &str) -> Option => "`where code = #{code} limit 1`"});

impl AppPaymentRecord {
    pub const TABLE_NAME: &'static str = "app_payment_record";
}
