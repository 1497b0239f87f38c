// 支付通道适配层
// 打款/退款/通知在这里与通道子系统解耦, 协议细节对核心不可见

pub mod provider;

use async_trait::async_trait;
use common::AppResult;
use rbatis::rbdc::datetime::DateTime;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

pub use provider::{DbPayoutProvider, PayoutProfile, PayoutProvider};

/// 金额换算: 元 (两位小数) -> 分
pub fn to_minor(amount: Decimal) -> i64 {
    (amount * Decimal::from(100)).trunc().to_i64().unwrap_or(0)
}

/// 金额换算: 分 -> 元
pub fn from_minor(minor: i64) -> Decimal {
    Decimal::new(minor, 2)
}

/// 打款请求 (金额单位: 分)
#[derive(Debug, Clone)]
pub enum PayoutRequest {
    /// 付款到零钱
    Wallet(WalletPayout),
    /// 付款到银行卡
    Bank(BankPayout),
}

impl PayoutRequest {
    /// 商户侧交易单号
    pub fn partner_trade_no(&self) -> &str {
        match self {
            PayoutRequest::Wallet(req) => &req.partner_trade_no,
            PayoutRequest::Bank(req) => &req.partner_trade_no,
        }
    }

    /// 打款金额 (分)
    pub fn amount(&self) -> i64 {
        match self {
            PayoutRequest::Wallet(req) => req.amount,
            PayoutRequest::Bank(req) => req.amount,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WalletPayout {
    pub partner_trade_no: String,
    pub openid: String,
    pub amount: i64,
    pub desc: String,
}

#[derive(Debug, Clone)]
pub struct BankPayout {
    pub partner_trade_no: String,
    /// 收款银行卡号
    pub bank_no: String,
    /// 持卡人姓名
    pub true_name: String,
    /// 银行编码
    pub bank_code: String,
    pub amount: i64,
    pub desc: String,
}

/// 打款提交结果
#[derive(Debug, Clone)]
pub struct TransferCreated {
    pub success: bool,
    pub trade_no: Option<String>,
    pub pay_time: Option<DateTime>,
    pub error_reason: Option<String>,
}

/// 打款状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayoutStatus {
    Success,
    Failed,
    Pending,
}

/// 打款状态查询结果
#[derive(Debug, Clone)]
pub struct TransferQuery {
    pub status: PayoutStatus,
    pub pay_time: Option<DateTime>,
}

/// 退款提交 (金额单位: 分)
#[derive(Debug, Clone)]
pub struct RefundSubmit {
    /// 原支付单号
    pub order_code: String,
    /// 退款单号
    pub refund_code: String,
    /// 原单总金额
    pub total_amount: i64,
    /// 本次退款金额
    pub refund_amount: i64,
    pub reason: String,
}

/// 退款提交结果
#[derive(Debug, Clone)]
pub struct RefundCreated {
    pub accepted: bool,
    pub error_reason: Option<String>,
}

/// 异步通知场景
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyScene {
    Order,
    Refund,
}

/// 解析后的异步通知
///
/// Order 场景 order_code 为支付单号, Refund 场景为退款单号
#[derive(Debug, Clone)]
pub struct NotifyEvent {
    pub scene: NotifyScene,
    pub order_code: String,
    pub trade_id: String,
    /// 结算金额 (分)
    pub amount: i64,
    /// 优惠券金额 (分)
    pub coupon_amount: i64,
    pub success: bool,
    pub pay_time: Option<DateTime>,
}

/// 支付通道适配器
///
/// 由支付通道子系统实现并注入, 本核心只依赖该契约;
/// 所有金额以分为单位跨越此边界
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// 发起打款
    async fn create_transfer(&self, req: &PayoutRequest) -> AppResult<TransferCreated>;

    /// 查询打款状态
    async fn query_transfer(&self, trade_no: &str) -> AppResult<TransferQuery>;

    /// 发起退款
    async fn create_refund(&self, req: &RefundSubmit) -> AppResult<RefundCreated>;

    /// 解析异步通知原文
    fn parse_notification(&self, raw: &str) -> AppResult<NotifyEvent>;
}
