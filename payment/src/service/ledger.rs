use common::{AppError, AppResult};
use orm::entities::PaymentLedger;
use rbatis::rbdc::datetime::DateTime;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::pool::Pool;
use crate::store::{AccountStore, LedgerStore, SumFilter};

/// 账户资金统计
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Aggregate {
    /// 锁定中金额 (未解锁流水合计)
    pub lock: Decimal,
    /// 累计支出 (已生效负向流水合计的绝对值, 锁定中的扣减尚不计入)
    pub used: Decimal,
    /// 累计入账 (正向流水合计)
    pub total: Decimal,
    /// 可用金额 = total - used - lock
    pub usable: Decimal,
}

/// 资金流水调度服务
///
/// 余额与积分各实例化一份, 算法完全一致, 由资金池参数区分。
/// 同一账号的变更与统计通过账号级互斥锁串行执行, 避免
/// 实时合计与快照回写之间插入并发写
pub struct LedgerService {
    pool: Pool,
    store: Arc<dyn LedgerStore>,
    accounts: Arc<dyn AccountStore>,
    locks: Mutex<HashMap<i64, Arc<tokio::sync::Mutex<()>>>>,
}

impl LedgerService {
    pub fn new(pool: Pool, store: Arc<dyn LedgerStore>, accounts: Arc<dyn AccountStore>) -> Self {
        Self {
            pool,
            store,
            accounts,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// 余额流水服务
    pub fn balance(store: Arc<dyn LedgerStore>, accounts: Arc<dyn AccountStore>) -> Self {
        Self::new(Pool::Balance, store, accounts)
    }

    /// 积分流水服务
    pub fn integral(store: Arc<dyn LedgerStore>, accounts: Arc<dyn AccountStore>) -> Self {
        Self::new(Pool::Integral, store, accounts)
    }

    pub fn pool(&self) -> Pool {
        self.pool
    }

    /// 取账号级互斥锁
    fn account_mutex(&self, unid: i64) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().unwrap();
        locks
            .entry(unid)
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    /// 创建资金变更操作
    ///
    /// 同一账号下重复的 code 覆盖原流水而不是追加, 重复调用等价于一次;
    /// 负数金额按实时合计做扣减检查, 不读账户快照
    pub async fn create(
        &self,
        unid: i64,
        code: &str,
        name: &str,
        amount: Decimal,
        remark: &str,
        unlock: bool,
    ) -> AppResult<PaymentLedger> {
        let mutex = self.account_mutex(unid);
        let _guard = mutex.lock().await;

        if !self.accounts.exists(unid).await? {
            return Err(AppError::AccountNotFound(unid));
        }

        // 扣减检查
        if amount < Decimal::ZERO {
            let usable = self.store.sum(self.pool, Some(unid), SumFilter::Active).await?;
            if amount.abs() > usable {
                return Err(AppError::InsufficientFunds(
                    self.pool.insufficient_message().to_string(),
                ));
            }
        }

        // 检查编号是否重复, 重复则覆盖写入
        let now = DateTime::now();
        let mut entry = self
            .store
            .find(self.pool, unid, code)
            .await?
            .unwrap_or_else(|| PaymentLedger {
                id: None,
                unid,
                code: code.to_string(),
                name: String::new(),
                amount: Decimal::ZERO,
                remark: String::new(),
                unlock: false,
                unlock_time: None,
                cancel: false,
                cancel_time: None,
                deleted: false,
                deleted_time: None,
                create_time: Some(now.clone()),
            });
        entry.name = name.to_string();
        entry.amount = amount;
        entry.remark = remark.to_string();
        entry.unlock = unlock;
        if unlock {
            entry.unlock_time = Some(now);
        }

        let saved = self.store.save(self.pool, &entry).await?;
        self.recount_unlocked(unid).await?;
        Ok(saved)
    }

    /// 解锁资金变更操作
    ///
    /// 按 code 全局定位流水, 调用方需保证 code 跨账号唯一
    pub async fn unlock(&self, code: &str, unlock: bool) -> AppResult<PaymentLedger> {
        self.set(code, |entry| {
            entry.unlock = unlock;
            entry.unlock_time = Some(DateTime::now());
        })
        .await
    }

    /// 作废资金变更操作
    pub async fn cancel(&self, code: &str, cancel: bool) -> AppResult<PaymentLedger> {
        self.set(code, |entry| {
            entry.cancel = cancel;
            entry.cancel_time = Some(DateTime::now());
        })
        .await
    }

    /// 删除流水记录 (软删除)
    pub async fn remove(&self, code: &str) -> AppResult<PaymentLedger> {
        self.set(code, |entry| {
            entry.deleted = true;
            entry.deleted_time = Some(DateTime::now());
        })
        .await
    }

    /// 获取流水记录
    pub async fn get(&self, code: &str) -> AppResult<PaymentLedger> {
        self.store
            .find_by_code(self.pool, code)
            .await?
            .ok_or_else(|| AppError::InvalidCode(code.to_string()))
    }

    /// 更新流水并刷新所属账户
    async fn set(
        &self,
        code: &str,
        apply: impl FnOnce(&mut PaymentLedger),
    ) -> AppResult<PaymentLedger> {
        let found = self.get(code).await?;
        let mutex = self.account_mutex(found.unid);
        let _guard = mutex.lock().await;

        // 锁内重读, 避免与同账号其他写入交错
        let mut entry = self.get(code).await?;
        apply(&mut entry);
        let saved = self.store.save(self.pool, &entry).await?;
        self.recount_unlocked(entry.unid).await?;
        Ok(saved)
    }

    /// 刷新账户资金统计并回写账户快照
    pub async fn recount(&self, unid: i64) -> AppResult<Aggregate> {
        let mutex = self.account_mutex(unid);
        let _guard = mutex.lock().await;

        if !self.accounts.exists(unid).await? {
            return Err(AppError::AccountNotFound(unid));
        }
        self.recount_unlocked(unid).await
    }

    /// 批量模式: 仅填充统计字段, 不落库也不校验账号
    pub async fn recount_into(
        &self,
        unid: i64,
        data: &mut HashMap<String, serde_json::Value>,
    ) -> AppResult<Aggregate> {
        let aggregate = self.aggregate(Some(unid)).await?;
        self.fill(data, &aggregate)?;
        Ok(aggregate)
    }

    /// 统计全部账户的资金数据 (只读)
    pub async fn recount_all(&self) -> AppResult<Aggregate> {
        self.aggregate(None).await
    }

    async fn recount_unlocked(&self, unid: i64) -> AppResult<Aggregate> {
        let aggregate = self.aggregate(Some(unid)).await?;
        let mut data = HashMap::new();
        self.fill(&mut data, &aggregate)?;
        self.accounts.merge_extra(unid, &data).await?;
        Ok(aggregate)
    }

    async fn aggregate(&self, unid: Option<i64>) -> AppResult<Aggregate> {
        let lock = self.store.sum(self.pool, unid, SumFilter::Locked).await?;
        let used = self
            .store
            .sum(self.pool, unid, SumFilter::Outgoing)
            .await?
            .abs();
        let total = self.store.sum(self.pool, unid, SumFilter::Incoming).await?;
        let mut usable = total - used - lock;
        if self.pool.rounds_usable() {
            usable = usable.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        }
        Ok(Aggregate {
            lock,
            used,
            total,
            usable,
        })
    }

    fn fill(
        &self,
        data: &mut HashMap<String, serde_json::Value>,
        aggregate: &Aggregate,
    ) -> AppResult<()> {
        let prefix = self.pool.prefix();
        data.insert(
            format!("{}_lock", prefix),
            serde_json::to_value(aggregate.lock)?,
        );
        data.insert(
            format!("{}_used", prefix),
            serde_json::to_value(aggregate.used)?,
        );
        data.insert(
            format!("{}_total", prefix),
            serde_json::to_value(aggregate.total)?,
        );
        data.insert(
            format!("{}_usable", prefix),
            serde_json::to_value(aggregate.usable)?,
        );
        Ok(())
    }
}
