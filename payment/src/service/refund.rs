use common::utils::snowflake;
use common::{AppError, AppResult};
use orm::entities::AppPaymentRefund;
use rbatis::rbdc::datetime::DateTime;
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::gateway::{to_minor, PaymentGateway, RefundSubmit};
use crate::store::OrderStore;

/// 支付退款提交服务
pub struct RefundService {
    orders: Arc<dyn OrderStore>,
    gateway: Arc<dyn PaymentGateway>,
}

impl RefundService {
    pub fn new(orders: Arc<dyn OrderStore>, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self { orders, gateway }
    }

    /// 发起支付退款
    ///
    /// 金额为零或负数时无需退款直接返回; 否则登记退款申请单
    /// 再向通道提交, 通道拒绝时申请单保留待人工处理
    pub async fn apply(
        &self,
        record_code: &str,
        amount: Decimal,
        reason: &str,
    ) -> AppResult<Option<AppPaymentRefund>> {
        if amount <= Decimal::ZERO {
            return Ok(None);
        }

        let record = self
            .orders
            .find_record(record_code)
            .await?
            .ok_or_else(|| AppError::InvalidCode(record_code.to_string()))?;

        // 登记退款申请
        let refund_code = snowflake::generate_code("R");
        let refund = AppPaymentRefund {
            id: None,
            unid: record.unid,
            code: refund_code.clone(),
            record_code: record.code.clone(),
            refund_time: None,
            refund_trade: None,
            refund_status: 0,
            refund_amount: amount,
            refund_account: None,
            refund_scode: None,
            refund_remark: Some(reason.to_string()),
            refund_notify: None,
            create_time: Some(DateTime::now()),
            update_time: None,
        };
        let refund = self.orders.save_refund(&refund).await?;

        // 提交通道退款申请
        let submit = RefundSubmit {
            order_code: record.code.clone(),
            refund_code,
            total_amount: to_minor(record.payment_amount),
            refund_amount: to_minor(amount),
            reason: reason.to_string(),
        };
        let result = self.gateway.create_refund(&submit).await?;
        if result.accepted {
            log::info!("已提交退款 {} (原单 {})", refund.code, record.code);
            Ok(Some(refund))
        } else {
            Err(AppError::GatewayRejected(
                result
                    .error_reason
                    .unwrap_or_else(|| "退款申请被拒绝".to_string()),
            ))
        }
    }
}
