use rbatis::rbdc::datetime::DateTime;
use rbatis::{crud, impl_select};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 用户提现申请订单
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppPaymentTransfer {
    pub id: Option<i64>,
    pub unid: i64,
    /// 提现单号 (与余额锁定流水共用同一编号)
    pub code: String,
    /// 提现通道编码
    pub r#type: String,
    /// 申请金额
    pub amount: Decimal,
    /// 手续费
    pub charge_amount: Decimal,
    /// 状态 (0失败, 1待审核, 2已驳回, 3待打款, 4打款中, 5已打款)
    pub status: i32,
    pub trade_no: Option<String>,
    pub trade_time: Option<DateTime>,
    pub appid: Option<String>,
    pub openid: Option<String>,
    /// 银行编码 (银行卡通道)
    pub bank_wseq: Option<String>,
    /// 银行卡号
    pub bank_code: Option<String>,
    /// 持卡人姓名
    pub bank_user: Option<String>,
    pub change_time: Option<DateTime>,
    /// 最近一次处理结果描述
    pub change_desc: Option<String>,
    pub create_time: Option<DateTime>,
    pub update_time: Option<DateTime>,
}

crud!(AppPaymentTransfer {}, "app_payment_transfer");
impl_select!(AppPaymentTransfer{select_by_code(code: &str) -> Option => "`where code = #{code} limit 1`"});

impl AppPaymentTransfer {
    pub const TABLE_NAME: &'static str = "app_payment_transfer";
}
