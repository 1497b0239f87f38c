use async_trait::async_trait;
use common::{AppError, AppResult};
use rbatis::rbdc::datetime::DateTime;
use std::sync::Arc;

use crate::gateway::{from_minor, NotifyEvent, NotifyScene, PaymentGateway};
use crate::store::OrderStore;

/// 通知应答
///
/// 由外层按通道协议序列化后返回, 通道依据应答决定是否重发
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyAck {
    Success,
    Error(String),
}

impl NotifyAck {
    pub fn is_success(&self) -> bool {
        matches!(self, NotifyAck::Success)
    }
}

/// 退款完成后的账务补偿挂钩
///
/// 余额/积分如何按比例退回由订单子系统决定, 这里只负责触发
#[async_trait]
pub trait RefundCompensator: Send + Sync {
    async fn sync_refund(&self, record_code: &str) -> AppResult<()>;
}

/// 支付/退款异步通知对账服务
///
/// 处理过程可重入, 通道重复投递同一通知只会重写相同字段
pub struct NotifyService {
    gateway: Arc<dyn PaymentGateway>,
    orders: Arc<dyn OrderStore>,
    compensator: Arc<dyn RefundCompensator>,
}

impl NotifyService {
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        orders: Arc<dyn OrderStore>,
        compensator: Arc<dyn RefundCompensator>,
    ) -> Self {
        Self {
            gateway,
            orders,
            compensator,
        }
    }

    /// 处理一次异步通知回调
    pub async fn handle(&self, scene: NotifyScene, raw: &str) -> NotifyAck {
        match self.dispatch(scene, raw).await {
            Ok(()) => NotifyAck::Success,
            Err(err) => {
                log::warn!("通知处理失败: {}", err);
                NotifyAck::Error(err.to_string())
            }
        }
    }

    async fn dispatch(&self, scene: NotifyScene, raw: &str) -> AppResult<()> {
        let event = self.gateway.parse_notification(raw)?;
        if event.scene != scene {
            return Err(AppError::business("通知场景不匹配"));
        }
        // 未支付成功的通知直接应答, 不做任何处理
        if !event.success {
            return Ok(());
        }
        match event.scene {
            NotifyScene::Order => self.apply_order(&event, raw).await,
            NotifyScene::Refund => self.apply_refund(&event, raw).await,
        }
    }

    /// 订单支付成功: 幂等更新支付行为记录
    async fn apply_order(&self, event: &NotifyEvent, raw: &str) -> AppResult<()> {
        let mut record = self
            .orders
            .find_record(&event.order_code)
            .await?
            .ok_or_else(|| AppError::DataPersistenceFailed("数据更新失败".to_string()))?;

        record.payment_status = 1;
        record.payment_trade = Some(event.trade_id.clone());
        record.payment_amount = from_minor(event.amount);
        record.payment_coupon = Some(from_minor(event.coupon_amount));
        // 重复投递保持首次生效时间
        if record.payment_time.is_none() {
            record.payment_time = Some(event.pay_time.clone().unwrap_or_else(DateTime::now));
        }
        record.payment_notify = Some(raw.to_string());
        self.orders.update_record(&record).await
    }

    /// 退款成功: 回写退款单并触发账务补偿
    async fn apply_refund(&self, event: &NotifyEvent, raw: &str) -> AppResult<()> {
        // 没有对应申请记录的退款通知重发也无意义, 直接报错
        let mut refund = self
            .orders
            .find_refund(&event.order_code)
            .await?
            .ok_or_else(|| AppError::InvalidCode(event.order_code.clone()))?;

        refund.refund_status = 1;
        refund.refund_trade = Some(event.trade_id.clone());
        refund.refund_scode = Some("SUCCESS".to_string());
        if refund.refund_time.is_none() {
            refund.refund_time = Some(event.pay_time.clone().unwrap_or_else(DateTime::now));
        }
        refund.refund_notify = Some(raw.to_string());
        let refund = self.orders.save_refund(&refund).await?;

        self.compensator.sync_refund(&refund.record_code).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::NotifyEvent;
    use crate::store::memory::{MemOrderStore, MockGateway, RecordingCompensator};
    use orm::entities::{AppPaymentRecord, AppPaymentRefund};
    use rust_decimal::Decimal;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    struct Fixture {
        gateway: Arc<MockGateway>,
        orders: Arc<MemOrderStore>,
        compensator: Arc<RecordingCompensator>,
        service: NotifyService,
    }

    fn setup() -> Fixture {
        let gateway = Arc::new(MockGateway::new());
        let orders = Arc::new(MemOrderStore::new());
        let compensator = Arc::new(RecordingCompensator::new());
        let service = NotifyService::new(gateway.clone(), orders.clone(), compensator.clone());
        Fixture {
            gateway,
            orders,
            compensator,
            service,
        }
    }

    fn record(code: &str) -> AppPaymentRecord {
        AppPaymentRecord {
            id: Some(1),
            unid: 7,
            code: code.to_string(),
            order_no: Some("ORD-1".to_string()),
            order_name: Some("测试订单".to_string()),
            order_amount: Some(dec("123.45")),
            channel_type: Some("wechat".to_string()),
            channel_code: Some("wx01".to_string()),
            payment_time: None,
            payment_trade: None,
            payment_status: 0,
            payment_amount: Decimal::ZERO,
            payment_coupon: None,
            payment_notify: None,
            refund_status: Some(0),
            refund_amount: Some(Decimal::ZERO),
            create_time: None,
            update_time: None,
        }
    }

    fn refund(code: &str, record_code: &str) -> AppPaymentRefund {
        AppPaymentRefund {
            id: Some(1),
            unid: 7,
            code: code.to_string(),
            record_code: record_code.to_string(),
            refund_time: None,
            refund_trade: None,
            refund_status: 0,
            refund_amount: dec("10"),
            refund_account: None,
            refund_scode: None,
            refund_remark: None,
            refund_notify: None,
            create_time: None,
            update_time: None,
        }
    }

    fn order_event(order_code: &str, success: bool) -> NotifyEvent {
        NotifyEvent {
            scene: NotifyScene::Order,
            order_code: order_code.to_string(),
            trade_id: "TX-100".to_string(),
            amount: 12345,
            coupon_amount: 100,
            success,
            pay_time: None,
        }
    }

    #[tokio::test]
    async fn test_order_notify_updates_record() {
        let fx = setup();
        fx.orders.push_record(record("P1"));
        fx.gateway.script_notify("raw-1", order_event("P1", true));

        let ack = fx.service.handle(NotifyScene::Order, "raw-1").await;
        assert!(ack.is_success());

        let updated = fx.orders.record("P1").unwrap();
        assert_eq!(updated.payment_status, 1);
        assert_eq!(updated.payment_trade.as_deref(), Some("TX-100"));
        assert_eq!(updated.payment_amount, dec("123.45"));
        assert_eq!(updated.payment_coupon, Some(dec("1.00")));
        assert_eq!(updated.payment_notify.as_deref(), Some("raw-1"));
        assert!(updated.payment_time.is_some());
    }

    #[tokio::test]
    async fn test_order_notify_is_idempotent() {
        let fx = setup();
        fx.orders.push_record(record("P1"));
        fx.gateway.script_notify("raw-1", order_event("P1", true));

        assert!(fx.service.handle(NotifyScene::Order, "raw-1").await.is_success());
        let first = fx.orders.record("P1").unwrap();

        // 重复投递同一通知, 内容不变
        assert!(fx.service.handle(NotifyScene::Order, "raw-1").await.is_success());
        let second = fx.orders.record("P1").unwrap();
        assert_eq!(first.payment_status, second.payment_status);
        assert_eq!(first.payment_amount, second.payment_amount);
        assert_eq!(first.payment_time, second.payment_time);
    }

    #[tokio::test]
    async fn test_order_notify_missing_record_errors() {
        let fx = setup();
        fx.gateway.script_notify("raw-1", order_event("MISSING", true));

        let ack = fx.service.handle(NotifyScene::Order, "raw-1").await;
        assert!(!ack.is_success());
    }

    #[tokio::test]
    async fn test_failed_notify_acknowledged_without_change() {
        let fx = setup();
        fx.orders.push_record(record("P1"));
        fx.gateway.script_notify("raw-1", order_event("P1", false));

        let ack = fx.service.handle(NotifyScene::Order, "raw-1").await;
        assert!(ack.is_success());
        // 未成功的通知不落任何字段
        assert_eq!(fx.orders.record("P1").unwrap().payment_status, 0);
    }

    #[tokio::test]
    async fn test_refund_notify_triggers_compensation() {
        let fx = setup();
        fx.orders.push_refund(refund("R1", "P1"));
        fx.gateway.script_notify(
            "raw-refund",
            NotifyEvent {
                scene: NotifyScene::Refund,
                order_code: "R1".to_string(),
                trade_id: "RTX-1".to_string(),
                amount: 1000,
                coupon_amount: 0,
                success: true,
                pay_time: None,
            },
        );

        let ack = fx.service.handle(NotifyScene::Refund, "raw-refund").await;
        assert!(ack.is_success());

        let updated = fx.orders.refund("R1").unwrap();
        assert_eq!(updated.refund_status, 1);
        assert_eq!(updated.refund_trade.as_deref(), Some("RTX-1"));
        assert_eq!(updated.refund_notify.as_deref(), Some("raw-refund"));
        assert!(updated.refund_time.is_some());
        assert_eq!(fx.compensator.calls(), vec!["P1".to_string()]);
    }

    #[tokio::test]
    async fn test_refund_notify_missing_request_errors() {
        let fx = setup();
        fx.gateway.script_notify(
            "raw-refund",
            NotifyEvent {
                scene: NotifyScene::Refund,
                order_code: "R-MISSING".to_string(),
                trade_id: "RTX-1".to_string(),
                amount: 1000,
                coupon_amount: 0,
                success: true,
                pay_time: None,
            },
        );

        let ack = fx.service.handle(NotifyScene::Refund, "raw-refund").await;
        assert!(!ack.is_success());
        assert!(fx.compensator.calls().is_empty());
    }

    #[tokio::test]
    async fn test_unparseable_payload_errors() {
        let fx = setup();
        let ack = fx.service.handle(NotifyScene::Order, "garbage").await;
        assert!(!ack.is_success());
    }

    #[tokio::test]
    async fn test_scene_mismatch_errors() {
        let fx = setup();
        fx.orders.push_record(record("P1"));
        fx.gateway.script_notify("raw-1", order_event("P1", true));

        let ack = fx.service.handle(NotifyScene::Refund, "raw-1").await;
        assert!(!ack.is_success());
    }
}
