//! 测试用内存存储与脚本化通道
//!
//! 行为与数据库实现保持一致, 供单元测试驱动各服务

use async_trait::async_trait;
use common::{AppError, AppResult};
use orm::entities::{AppPaymentRecord, AppPaymentRefund, AppPaymentTransfer, PaymentLedger};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::channel::TransferChannel;
use crate::gateway::{
    NotifyEvent, PaymentGateway, PayoutProfile, PayoutProvider, PayoutRequest, RefundCreated,
    RefundSubmit, TransferCreated, TransferQuery,
};
use crate::pool::Pool;
use crate::service::RefundCompensator;
use crate::store::{AccountStore, LedgerStore, OrderStore, SumFilter, TransferStore};

#[derive(Default)]
pub struct MemLedgerStore {
    rows: Mutex<Vec<(Pool, PaymentLedger)>>,
    next_id: Mutex<i64>,
}

impl MemLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self, pool: Pool) -> Vec<PaymentLedger> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|(p, _)| *p == pool)
            .map(|(_, e)| e.clone())
            .collect()
    }
}

#[async_trait]
impl LedgerStore for MemLedgerStore {
    async fn find(&self, pool: Pool, unid: i64, code: &str) -> AppResult<Option<PaymentLedger>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|(p, e)| *p == pool && e.unid == unid && e.code == code && !e.deleted)
            .map(|(_, e)| e.clone()))
    }

    async fn find_by_code(&self, pool: Pool, code: &str) -> AppResult<Option<PaymentLedger>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|(p, e)| *p == pool && e.code == code && !e.deleted)
            .map(|(_, e)| e.clone()))
    }

    async fn save(&self, pool: Pool, entry: &PaymentLedger) -> AppResult<PaymentLedger> {
        let mut rows = self.rows.lock().unwrap();
        match entry.id {
            Some(id) => {
                let slot = rows
                    .iter_mut()
                    .find(|(p, e)| *p == pool && e.id == Some(id))
                    .ok_or_else(|| {
                        AppError::DataPersistenceFailed("流水写入失败".to_string())
                    })?;
                slot.1 = entry.clone();
                Ok(entry.clone())
            }
            None => {
                let mut next_id = self.next_id.lock().unwrap();
                *next_id += 1;
                let mut saved = entry.clone();
                saved.id = Some(*next_id);
                rows.push((pool, saved.clone()));
                Ok(saved)
            }
        }
    }

    async fn sum(&self, pool: Pool, unid: Option<i64>, filter: SumFilter) -> AppResult<Decimal> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|(p, e)| *p == pool && e.is_active())
            .filter(|(_, e)| unid.map_or(true, |unid| e.unid == unid))
            .filter(|(_, e)| match filter {
                SumFilter::Active => true,
                SumFilter::Locked => !e.unlock,
                SumFilter::Outgoing => e.amount < Decimal::ZERO && e.unlock,
                SumFilter::Incoming => e.amount > Decimal::ZERO,
            })
            .map(|(_, e)| e.amount)
            .sum())
    }
}

#[derive(Default)]
pub struct MemAccountStore {
    extras: Mutex<HashMap<i64, serde_json::Map<String, serde_json::Value>>>,
}

impl MemAccountStore {
    pub fn with_accounts(unids: &[i64]) -> Self {
        let store = Self::default();
        {
            let mut extras = store.extras.lock().unwrap();
            for unid in unids {
                extras.insert(*unid, serde_json::Map::new());
            }
        }
        store
    }

    pub fn extra_of(&self, unid: i64) -> serde_json::Map<String, serde_json::Value> {
        self.extras
            .lock()
            .unwrap()
            .get(&unid)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl AccountStore for MemAccountStore {
    async fn exists(&self, unid: i64) -> AppResult<bool> {
        Ok(self.extras.lock().unwrap().contains_key(&unid))
    }

    async fn merge_extra(
        &self,
        unid: i64,
        data: &HashMap<String, serde_json::Value>,
    ) -> AppResult<()> {
        let mut extras = self.extras.lock().unwrap();
        let extra = extras
            .get_mut(&unid)
            .ok_or(AppError::AccountNotFound(unid))?;
        for (key, value) in data {
            extra.insert(key.clone(), value.clone());
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemTransferStore {
    jobs: Mutex<Vec<AppPaymentTransfer>>,
    /// 每个订单状态回写的轨迹, 用于断言状态机走向
    history: Mutex<HashMap<String, Vec<i32>>>,
}

impl MemTransferStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, job: AppPaymentTransfer) {
        self.jobs.lock().unwrap().push(job);
    }

    pub fn get(&self, code: &str) -> Option<AppPaymentTransfer> {
        self.jobs
            .lock()
            .unwrap()
            .iter()
            .find(|j| j.code == code)
            .cloned()
    }

    pub fn history_of(&self, code: &str) -> Vec<i32> {
        self.history
            .lock()
            .unwrap()
            .get(code)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl TransferStore for MemTransferStore {
    async fn list_pending(&self) -> AppResult<Vec<AppPaymentTransfer>> {
        let mut jobs: Vec<AppPaymentTransfer> = self
            .jobs
            .lock()
            .unwrap()
            .iter()
            .filter(|j| TransferChannel::ONLINE_CODES.contains(&j.r#type.as_str()))
            .filter(|j| j.status == 3 || j.status == 4)
            .cloned()
            .collect();
        jobs.sort_by_key(|j| j.id);
        Ok(jobs)
    }

    async fn update(&self, job: &AppPaymentTransfer) -> AppResult<()> {
        let mut jobs = self.jobs.lock().unwrap();
        let slot = jobs
            .iter_mut()
            .find(|j| j.id == job.id)
            .ok_or_else(|| AppError::DataPersistenceFailed("提现订单缺少主键".to_string()))?;
        *slot = job.clone();
        self.history
            .lock()
            .unwrap()
            .entry(job.code.clone())
            .or_default()
            .push(job.status);
        Ok(())
    }

    async fn sum_in_status(&self, unid: Option<i64>, statuses: &[i32]) -> AppResult<Decimal> {
        Ok(self
            .jobs
            .lock()
            .unwrap()
            .iter()
            .filter(|j| unid.map_or(true, |unid| j.unid == unid))
            .filter(|j| statuses.contains(&j.status))
            .map(|j| j.amount)
            .sum())
    }
}

#[derive(Default)]
pub struct MemOrderStore {
    records: Mutex<Vec<AppPaymentRecord>>,
    refunds: Mutex<Vec<AppPaymentRefund>>,
    next_refund_id: Mutex<i64>,
}

impl MemOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_record(&self, record: AppPaymentRecord) {
        self.records.lock().unwrap().push(record);
    }

    pub fn push_refund(&self, refund: AppPaymentRefund) {
        self.refunds.lock().unwrap().push(refund);
    }

    pub fn record(&self, code: &str) -> Option<AppPaymentRecord> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.code == code)
            .cloned()
    }

    pub fn refund(&self, code: &str) -> Option<AppPaymentRefund> {
        self.refunds
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.code == code)
            .cloned()
    }
}

#[async_trait]
impl OrderStore for MemOrderStore {
    async fn find_record(&self, code: &str) -> AppResult<Option<AppPaymentRecord>> {
        Ok(self.record(code))
    }

    async fn update_record(&self, record: &AppPaymentRecord) -> AppResult<()> {
        let mut records = self.records.lock().unwrap();
        let slot = records
            .iter_mut()
            .find(|r| r.id == record.id)
            .ok_or_else(|| AppError::DataPersistenceFailed("支付记录缺少主键".to_string()))?;
        *slot = record.clone();
        Ok(())
    }

    async fn find_refund(&self, code: &str) -> AppResult<Option<AppPaymentRefund>> {
        Ok(self.refund(code))
    }

    async fn save_refund(&self, refund: &AppPaymentRefund) -> AppResult<AppPaymentRefund> {
        let mut refunds = self.refunds.lock().unwrap();
        match refund.id {
            Some(id) => {
                let slot = refunds
                    .iter_mut()
                    .find(|r| r.id == Some(id))
                    .ok_or_else(|| {
                        AppError::DataPersistenceFailed("退款单写入失败".to_string())
                    })?;
                *slot = refund.clone();
                Ok(refund.clone())
            }
            None => {
                let mut next_id = self.next_refund_id.lock().unwrap();
                *next_id += 1;
                let mut saved = refund.clone();
                saved.id = Some(*next_id);
                refunds.push(saved.clone());
                Ok(saved)
            }
        }
    }
}

/// 脚本化通道, 按单号预置返回结果
#[derive(Default)]
pub struct MockGateway {
    create_results: Mutex<HashMap<String, Result<TransferCreated, String>>>,
    query_results: Mutex<HashMap<String, Result<TransferQuery, String>>>,
    refund_result: Mutex<Option<RefundCreated>>,
    notify_events: Mutex<HashMap<String, NotifyEvent>>,
    create_calls: Mutex<Vec<String>>,
    query_calls: Mutex<Vec<String>>,
    refund_calls: Mutex<Vec<RefundSubmit>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_create(&self, partner_trade_no: &str, result: Result<TransferCreated, String>) {
        self.create_results
            .lock()
            .unwrap()
            .insert(partner_trade_no.to_string(), result);
    }

    pub fn script_query(&self, trade_no: &str, result: Result<TransferQuery, String>) {
        self.query_results
            .lock()
            .unwrap()
            .insert(trade_no.to_string(), result);
    }

    pub fn script_refund(&self, result: RefundCreated) {
        *self.refund_result.lock().unwrap() = Some(result);
    }

    pub fn script_notify(&self, raw: &str, event: NotifyEvent) {
        self.notify_events
            .lock()
            .unwrap()
            .insert(raw.to_string(), event);
    }

    pub fn create_calls(&self) -> Vec<String> {
        self.create_calls.lock().unwrap().clone()
    }

    pub fn query_calls(&self) -> Vec<String> {
        self.query_calls.lock().unwrap().clone()
    }

    pub fn refund_calls(&self) -> Vec<RefundSubmit> {
        self.refund_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn create_transfer(&self, req: &PayoutRequest) -> AppResult<TransferCreated> {
        self.create_calls
            .lock()
            .unwrap()
            .push(req.partner_trade_no().to_string());
        match self
            .create_results
            .lock()
            .unwrap()
            .get(req.partner_trade_no())
        {
            Some(Ok(created)) => Ok(created.clone()),
            Some(Err(reason)) => Err(AppError::GatewayTransient(reason.clone())),
            None => Err(AppError::GatewayTransient("未预置打款结果".to_string())),
        }
    }

    async fn query_transfer(&self, trade_no: &str) -> AppResult<TransferQuery> {
        self.query_calls.lock().unwrap().push(trade_no.to_string());
        match self.query_results.lock().unwrap().get(trade_no) {
            Some(Ok(query)) => Ok(query.clone()),
            Some(Err(reason)) => Err(AppError::GatewayTransient(reason.clone())),
            None => Err(AppError::GatewayTransient("未预置查询结果".to_string())),
        }
    }

    async fn create_refund(&self, req: &RefundSubmit) -> AppResult<RefundCreated> {
        self.refund_calls.lock().unwrap().push(req.clone());
        Ok(self
            .refund_result
            .lock()
            .unwrap()
            .clone()
            .unwrap_or(RefundCreated {
                accepted: true,
                error_reason: None,
            }))
    }

    fn parse_notification(&self, raw: &str) -> AppResult<NotifyEvent> {
        self.notify_events
            .lock()
            .unwrap()
            .get(raw)
            .cloned()
            .ok_or_else(|| AppError::business("无法解析通知报文"))
    }
}

/// 固定身份的打款信息提供者
pub struct MockPayoutProvider {
    profile: PayoutProfile,
}

impl MockPayoutProvider {
    pub fn new(appid: &str, openid: &str) -> Self {
        Self {
            profile: PayoutProfile {
                appid: appid.to_string(),
                openid: openid.to_string(),
            },
        }
    }
}

#[async_trait]
impl PayoutProvider for MockPayoutProvider {
    async fn payout_profile(&self, _unid: i64) -> AppResult<PayoutProfile> {
        Ok(self.profile.clone())
    }
}

/// 记录调用的退款补偿挂钩
#[derive(Default)]
pub struct RecordingCompensator {
    calls: Mutex<Vec<String>>,
}

impl RecordingCompensator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RefundCompensator for RecordingCompensator {
    async fn sync_refund(&self, record_code: &str) -> AppResult<()> {
        self.calls.lock().unwrap().push(record_code.to_string());
        Ok(())
    }
}
